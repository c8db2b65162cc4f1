//! Route handlers organized by resource
//!
//! Static routes exist from construction; routes that need the database are
//! bound once it is connected and migrated.

pub mod db_health;
pub mod health;
pub mod home;
pub mod notes;

use axum::{middleware, Router};
use tower_http::trace::TraceLayer;

use super::middleware::log_request;
use super::state::AppState;

/// Routes that need no database
pub fn static_router() -> Router {
    Router::new()
        .merge(home::router())
        .merge(health::router())
}

/// Routes backed by the database
pub fn db_router(state: AppState) -> Router {
    Router::new()
        .merge(db_health::router())
        .merge(notes::router())
        .with_state(state)
}

/// Wrap a fully assembled router with request logging and tracing.
pub fn with_middleware(router: Router) -> Router {
    router
        .layer(middleware::from_fn(log_request))
        .layer(TraceLayer::new_for_http())
}

/// Build the complete application router.
pub fn build_router(state: AppState) -> Router {
    with_middleware(static_router().merge(db_router(state)))
}
