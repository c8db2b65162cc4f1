//! Schema migrations
//!
//! Forward-only SQL files under `noter-server/migrations`, embedded at build
//! time. Already-applied versions are skipped, so running with nothing
//! pending succeeds.

use sqlx::migrate::Migrator;
use sqlx::{Connection, PgConnection};
use tracing::info;

use super::DbError;
use crate::config::DatabaseConfig;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Apply all pending migrations over a dedicated connection.
pub async fn run_migrations(config: &DatabaseConfig) -> Result<(), DbError> {
    info!("Running migrations...");

    let mut conn = PgConnection::connect_with(&config.connect_options())
        .await
        .map_err(DbError::Connect)?;

    let result = MIGRATOR.run(&mut conn).await;

    let _ = conn.close().await;
    result?;

    info!(available = MIGRATOR.iter().count(), "Migrations complete");
    Ok(())
}
