//! HTTP layer
//!
//! Axum server with:
//! - Request logging middleware and tracing spans
//! - Graceful shutdown on SIGTERM/Ctrl+C with a bounded grace period
//! - JSON success bodies, plain-text validation/not-found errors

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod shutdown;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use error::ApiError;
pub use server::{
    serve, InitializedServer, Server, ServerError, DB_CLOSE_TIMEOUT, SHUTDOWN_GRACE_PERIOD,
};
pub use shutdown::{Shutdown, ShutdownToken};
pub use state::AppState;
