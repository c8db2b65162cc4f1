//! Request logging middleware

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

/// Log method and path of every request before it is dispatched.
pub async fn log_request(req: Request, next: Next) -> Response {
    tracing::info!("{} {}", req.method(), req.uri().path());
    next.run(req).await
}
