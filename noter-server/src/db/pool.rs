//! Database connection pool management
//!
//! Uses sqlx PgPool with explicit connection limits.

use std::time::Duration;

use async_trait::async_trait;
use futures::future::BoxFuture;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Connection, PgPool, Postgres, Transaction};
use tracing::{info, warn};

use super::DbError;
use crate::config::DatabaseConfig;

/// Default maximum connections for the pool.
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Upper bound on establishing the pool and the first ping.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Something that can report whether the database is reachable.
#[async_trait]
pub trait HealthProbe: Send + Sync + 'static {
    async fn ping(&self) -> Result<(), DbError>;
}

/// Handle to the shared connection pool.
///
/// Cloning is cheap: clones share the same pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Open a pool for `config` and verify it with a ping.
    ///
    /// # Errors
    ///
    /// Returns an error if the pool cannot be built, the ping fails, or the
    /// whole sequence takes longer than [`CONNECT_TIMEOUT`].
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DbError> {
        info!(
            host = %config.host,
            port = config.port,
            database = %config.name,
            "Connecting to database"
        );

        let connect = async {
            let pool = PgPoolOptions::new()
                .max_connections(DEFAULT_MAX_CONNECTIONS)
                .acquire_timeout(CONNECT_TIMEOUT)
                .connect_with(config.connect_options())
                .await
                .map_err(DbError::Connect)?;

            let db = Self { pool };
            if let Err(e) = db.ping().await {
                db.close().await;
                return Err(e);
            }
            Ok(db)
        };

        tokio::time::timeout(CONNECT_TIMEOUT, connect)
            .await
            .map_err(|_| DbError::Timeout(CONNECT_TIMEOUT))?
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check that a pooled connection is alive.
    pub async fn ping(&self) -> Result<(), DbError> {
        let mut conn = self.pool.acquire().await.map_err(DbError::Ping)?;
        conn.ping().await.map_err(DbError::Ping)
    }

    /// Close the pool. Calling this more than once is a no-op.
    pub async fn close(&self) {
        if !self.pool.is_closed() {
            self.pool.close().await;
            info!("Database connection closed");
        }
    }

    /// Close the pool, giving up after `limit` if connections are still
    /// checked out. Returns `false` when the limit was hit.
    ///
    /// The pool stops handing out connections either way.
    pub async fn close_within(&self, limit: Duration) -> bool {
        tokio::time::timeout(limit, self.close()).await.is_ok()
    }

    /// Run `f` inside a transaction.
    ///
    /// Commits when `f` succeeds. When `f` fails the transaction is rolled
    /// back and the original error returned; if the rollback fails too, both
    /// errors are returned together as [`DbError::Rollback`].
    ///
    /// # Example
    ///
    /// ```ignore
    /// db.with_transaction(|tx| {
    ///     Box::pin(async move {
    ///         sqlx::query("DELETE FROM notes")
    ///             .execute(&mut **tx)
    ///             .await
    ///             .map_err(|e| DbError::query("clear notes", e))?;
    ///         Ok(())
    ///     })
    /// })
    /// .await?;
    /// ```
    pub async fn with_transaction<T, F>(&self, f: F) -> Result<T, DbError>
    where
        T: Send,
        F: for<'t> FnOnce(&'t mut Transaction<'static, Postgres>) -> BoxFuture<'t, Result<T, DbError>>
            + Send,
    {
        let mut tx = self.pool.begin().await.map_err(DbError::Begin)?;

        match f(&mut tx).await {
            Ok(value) => {
                tx.commit().await.map_err(DbError::Commit)?;
                Ok(value)
            }
            Err(original) => match tx.rollback().await {
                Ok(()) => Err(original),
                Err(rollback) => {
                    warn!(error = %rollback, "Transaction rollback failed");
                    Err(DbError::Rollback {
                        original: Box::new(original),
                        rollback,
                    })
                }
            },
        }
    }
}

#[async_trait]
impl HealthProbe for Database {
    async fn ping(&self) -> Result<(), DbError> {
        Database::ping(self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Integration tests require a real database
    // Run with: DB_HOST=... cargo test -p noter-server -- --ignored

    #[tokio::test]
    #[ignore = "requires database"]
    async fn connect_and_ping() {
        let config = crate::Config::load().expect("config");
        let db = Database::connect(&config.database).await.unwrap();
        db.ping().await.unwrap();
        db.close().await;
        // second close is a no-op
        db.close().await;
        assert!(db.pool().is_closed());
    }
}
