//! API error types with IntoResponse
//!
//! Note routes answer failures with a plain-text body and the matching
//! status code. The health routes build their own JSON error bodies and do
//! not go through this type.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::db::DbError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Request body is not valid JSON for the expected shape (400)
    InvalidBody,

    /// Input rejected by a route, with the message sent back (400)
    BadRequest(&'static str),

    /// Resource not found, with the message sent back (404)
    NotFound(&'static str),

    /// Store failure (500, logged)
    ///
    /// With `detail` set the store error is appended to the body as
    /// `"{context}: {source}"`.
    Database {
        context: &'static str,
        source: DbError,
        detail: bool,
    },
}

impl ApiError {
    /// Build a mapper that wraps a store error; the body carries `context` only.
    pub fn database(context: &'static str) -> impl FnOnce(DbError) -> Self {
        move |source| Self::Database {
            context,
            source,
            detail: false,
        }
    }

    /// Like [`ApiError::database`], but the body also carries the store error.
    pub fn database_with_detail(context: &'static str) -> impl FnOnce(DbError) -> Self {
        move |source| Self::Database {
            context,
            source,
            detail: true,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidBody | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            Self::InvalidBody => "Invalid request body".to_owned(),
            Self::BadRequest(message) | Self::NotFound(message) => message.to_owned(),
            Self::Database {
                context,
                source,
                detail,
            } => {
                tracing::error!(error = %source, kind = ?source.kind(), "{}", context);
                if detail {
                    format!("{}: {}", context, source)
                } else {
                    context.to_owned()
                }
            }
        };

        (status, message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use axum::http::header;

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn invalid_body_is_400() {
        let response = ApiError::InvalidBody.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(response).await, "Invalid request body");
    }

    #[tokio::test]
    async fn bad_request_is_400_plain_text() {
        let response = ApiError::BadRequest("Title is required").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.starts_with("text/plain"));
        assert_eq!(body_text(response).await, "Title is required");
    }

    #[tokio::test]
    async fn not_found_is_404() {
        let response = ApiError::NotFound("Note not found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_text(response).await, "Note not found");
    }

    #[tokio::test]
    async fn database_error_is_500_without_details() {
        let err = ApiError::database("Failed to get notes")(DbError::query(
            "get notes",
            sqlx::Error::PoolClosed,
        ));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_text(response).await, "Failed to get notes");
    }

    #[tokio::test]
    async fn database_error_with_detail_appends_cause() {
        let source = DbError::query("create note", sqlx::Error::PoolClosed);
        let expected = format!("Failed to create note: {}", source);

        let err = ApiError::database_with_detail("Failed to create note")(source);
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_text(response).await, expected);
    }
}
