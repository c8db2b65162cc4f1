//! Apply pending database migrations and exit

use anyhow::{Context, Result};
use clap::Parser;

use noter_server::db::run_migrations;
use noter_server::Config;

#[derive(Parser, Debug)]
pub struct MigrateArgs {}

pub async fn run_migrate(_args: MigrateArgs) -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    run_migrations(&config.database)
        .await
        .context("Failed to run migrations")?;
    Ok(())
}
