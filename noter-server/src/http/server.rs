//! Server lifecycle
//!
//! `Server::new` binds the static routes. `Server::init_db` connects to the
//! database, applies migrations and binds the database routes.
//! `InitializedServer::start` listens until a termination signal arrives, then
//! drains in-flight requests for up to [`SHUTDOWN_GRACE_PERIOD`].

use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinError;
use tracing::{info, warn};

use super::routes;
use super::shutdown::{Shutdown, ShutdownToken};
use super::state::AppState;
use crate::config::Config;
use crate::db::{run_migrations, Database, DbError};

/// How long in-flight requests get to finish once shutdown starts.
pub const SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_secs(5);

/// How long closing the pool may wait for connections held by requests that
/// outlived the grace period.
pub const DB_CLOSE_TIMEOUT: Duration = Duration::from_secs(1);

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("error initializing database: {0}")]
    Database(#[from] DbError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("server task failed: {0}")]
    Join(#[from] JoinError),
}

/// A server with only the static routes bound.
pub struct Server {
    config: Config,
    router: Router,
}

/// A server with a live database and all routes bound.
pub struct InitializedServer {
    config: Config,
    router: Router,
    db: Database,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            router: routes::static_router(),
        }
    }

    /// Connect to the database, run migrations and bind the database routes.
    ///
    /// The pool is closed again if migrations fail.
    pub async fn init_db(self) -> Result<InitializedServer, ServerError> {
        let db = Database::connect(&self.config.database).await?;

        if let Err(e) = run_migrations(&self.config.database).await {
            db.close().await;
            return Err(e.into());
        }

        let router = self
            .router
            .merge(routes::db_router(AppState::from_database(db.clone())));
        info!("Database ready, routes bound");

        Ok(InitializedServer {
            config: self.config,
            router,
            db,
        })
    }
}

impl InitializedServer {
    /// Listen on the configured port until a termination signal arrives.
    ///
    /// The database is closed before returning, whatever the outcome. Closing
    /// is bounded by [`DB_CLOSE_TIMEOUT`] so a request stuck past the grace
    /// period cannot hold the process open.
    pub async fn start(self) -> Result<(), ServerError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.server_port));
        let listener = match TcpListener::bind(addr).await {
            Ok(listener) => listener,
            Err(e) => {
                self.db.close().await;
                return Err(e.into());
            }
        };

        let shutdown = Shutdown::new();
        let signals = shutdown.listen_for_signals();

        info!("Starting the server at port {}", self.config.server_port);
        let result = serve(listener, routes::with_middleware(self.router), shutdown.token()).await;

        signals.abort();
        if !self.db.close_within(DB_CLOSE_TIMEOUT).await {
            warn!(
                "Database close gave up after {:?}: connections still in use",
                DB_CLOSE_TIMEOUT
            );
        }
        result
    }
}

/// Serve `app` on `listener` until `shutdown` resolves.
///
/// Once it does, the listener stops accepting and in-flight requests get
/// [`SHUTDOWN_GRACE_PERIOD`] to complete before the server task is aborted.
pub async fn serve(
    listener: TcpListener,
    app: Router,
    shutdown: ShutdownToken,
) -> Result<(), ServerError> {
    if let Ok(addr) = listener.local_addr() {
        info!("Server listening on {}", addr);
    }

    let graceful = shutdown.clone();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(graceful.cancelled())
            .await
    });

    tokio::select! {
        joined = &mut server => {
            // stopped without being asked to
            joined??;
            return Ok(());
        }
        () = shutdown.cancelled() => {}
    }

    info!("Shutting down server...");
    match tokio::time::timeout(SHUTDOWN_GRACE_PERIOD, &mut server).await {
        Ok(joined) => {
            joined??;
            info!("Server shutdown complete");
        }
        Err(_) => {
            server.abort();
            warn!(
                "Server forced to shutdown: requests still running after {:?}",
                SHUTDOWN_GRACE_PERIOD
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::testing::{test_state, FakeProbe};
    use axum::routing::get;
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tokio::sync::Notify;
    use tokio::time::Instant;

    async fn raw_get(addr: SocketAddr, path: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let request = format!(
            "GET {} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
            path
        );
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        response
    }

    #[tokio::test]
    async fn serves_until_shutdown_then_stops() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = routes::build_router(test_state(FakeProbe::Healthy));

        let shutdown = Shutdown::new();
        let server = tokio::spawn(serve(listener, app, shutdown.token()));

        let response = raw_get(addr, "/health").await;
        assert!(response.starts_with("HTTP/1.1 200 OK"));
        assert!(response.contains(r#""status":"ok""#));

        let response = raw_get(addr, "/").await;
        assert!(response.contains("Ok, Let's Start!"));

        shutdown.trigger();
        tokio::time::timeout(SHUTDOWN_GRACE_PERIOD + Duration::from_secs(1), server)
            .await
            .expect("server should stop within the grace period")
            .unwrap()
            .unwrap();

        assert!(TcpStream::connect(addr).await.is_err());
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = routes::build_router(test_state(FakeProbe::Healthy));

        let shutdown = Shutdown::new();
        let server = tokio::spawn(serve(listener, app, shutdown.token()));

        let response = raw_get(addr, "/nope").await;
        assert!(response.starts_with("HTTP/1.1 404"));

        shutdown.trigger();
        server.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn stuck_request_is_abandoned_after_grace_period() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let entered = Arc::new(Notify::new());
        let app = Router::new().route(
            "/stuck",
            get({
                let entered = entered.clone();
                move || async move {
                    entered.notify_one();
                    std::future::pending::<&'static str>().await
                }
            }),
        );

        let shutdown = Shutdown::new();
        let server = tokio::spawn(serve(listener, app, shutdown.token()));
        let client = tokio::spawn(raw_get(addr, "/stuck"));
        entered.notified().await;

        let started = Instant::now();
        shutdown.trigger();
        tokio::time::timeout(SHUTDOWN_GRACE_PERIOD + Duration::from_secs(2), server)
            .await
            .expect("serve should return shortly after the grace period")
            .unwrap()
            .unwrap();
        assert!(started.elapsed() >= SHUTDOWN_GRACE_PERIOD);

        client.abort();
    }
}
