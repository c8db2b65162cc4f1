//! Database connectivity endpoint

use std::time::Duration;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::db::DbError;
use crate::http::state::AppState;

/// Deadline for the ping behind GET /db/health
pub const DB_HEALTH_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Serialize)]
pub struct DbHealthResponse {
    pub status: &'static str,
    pub message: String,
    pub timestamp: String,
}

/// GET /db/health
async fn db_health(State(state): State<AppState>) -> (StatusCode, Json<DbHealthResponse>) {
    let result = tokio::time::timeout(DB_HEALTH_TIMEOUT, state.probe().ping())
        .await
        .unwrap_or(Err(DbError::Timeout(DB_HEALTH_TIMEOUT)));
    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);

    match result {
        Ok(()) => (
            StatusCode::OK,
            Json(DbHealthResponse {
                status: "ok",
                message: "Database connection is healthy".to_owned(),
                timestamp,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(DbHealthResponse {
                    status: "error",
                    message: format!("Database connection failed: {}", e),
                    timestamp,
                }),
            )
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/db/health", get(db_health))
}
