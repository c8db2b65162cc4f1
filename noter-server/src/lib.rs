//! noter-server: HTTP service for notes
//!
//! Exposes a welcome route, liveness and database health checks, and
//! create/list/get operations on notes stored in PostgreSQL.

pub mod config;
pub mod db;
pub mod http;
pub mod models;

pub use config::{Config, ConfigError, DatabaseConfig};
pub use db::{Database, DbError, DbErrorKind};
pub use http::{AppState, InitializedServer, Server, ServerError};
