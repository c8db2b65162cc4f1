//! HTTP server command
//!
//! Loads configuration, connects and migrates the database, then serves
//! until Ctrl+C or SIGTERM.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use noter_server::{Config, Server};

/// Arguments for the serve command
#[derive(Parser, Debug, Default)]
pub struct ServeArgs {
    /// Port to listen on (overrides PORT from the environment or .env)
    #[arg(long, short = 'p')]
    pub port: Option<u16>,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(port) = args.port {
        config.server_port = port;
    }

    info!(
        port = config.server_port,
        db_host = %config.database.host,
        db_name = %config.database.name,
        "Configuration loaded"
    );

    let server = Server::new(config)
        .init_db()
        .await
        .context("Failed to initialize database")?;

    // Run server (blocks until shutdown)
    server.start().await.context("Server error")?;

    Ok(())
}
