//! Custom Axum extractors

use axum::body::Bytes;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use super::error::ApiError;

/// Extract and validate a UUID from path
///
/// Anything that is not a UUID is rejected with 400 "Invalid note ID".
pub struct ValidUuid(pub Uuid);

impl<S> FromRequestParts<S> for ValidUuid
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::BadRequest("Invalid note ID"))?;

        let uuid = Uuid::parse_str(&id).map_err(|_| ApiError::BadRequest("Invalid note ID"))?;

        Ok(Self(uuid))
    }
}

/// JSON body that rejects with a plain 400 for every failure.
///
/// Unlike `axum::Json` this ignores the request content type and does not
/// answer type mismatches with 422.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|_| ApiError::InvalidBody)?;

        serde_json::from_slice(&bytes)
            .map(Self)
            .map_err(|e| {
                tracing::debug!(error = %e, "Rejected request body");
                ApiError::InvalidBody
            })
    }
}
