//! Database error type
//!
//! Each variant names the operation that failed, so callers can branch on
//! [`DbError::kind`] instead of matching message text.

use std::time::Duration;

/// Coarse classification of a [`DbError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbErrorKind {
    NotFound,
    Connection,
    Query,
    Transaction,
    Migration,
}

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("failed to connect to database: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("failed to ping database: {0}")]
    Ping(#[source] sqlx::Error),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("failed to {op}: {source}")]
    Query {
        op: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("error starting transaction: {0}")]
    Begin(#[source] sqlx::Error),

    #[error("error committing transaction: {0}")]
    Commit(#[source] sqlx::Error),

    #[error("error rolling back transaction: {rollback} (original error: {original})")]
    Rollback {
        #[source]
        original: Box<DbError>,
        rollback: sqlx::Error,
    },

    #[error("failed to run migrations: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

impl DbError {
    /// Wrap a sqlx error with the operation that was being attempted.
    pub fn query(op: &'static str, source: sqlx::Error) -> Self {
        Self::Query { op, source }
    }

    pub fn kind(&self) -> DbErrorKind {
        match self {
            Self::Connect(_) | Self::Ping(_) | Self::Timeout(_) => DbErrorKind::Connection,
            Self::Query { .. } => DbErrorKind::Query,
            Self::NotFound { .. } => DbErrorKind::NotFound,
            Self::Begin(_) | Self::Commit(_) | Self::Rollback { .. } => DbErrorKind::Transaction,
            Self::Migrate(_) => DbErrorKind::Migration,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == DbErrorKind::NotFound
    }
}
