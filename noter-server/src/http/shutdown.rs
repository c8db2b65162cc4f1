//! Shutdown coordination
//!
//! [`Shutdown`] is the cancellation source owned by the serve loop. Tokens
//! handed out by [`Shutdown::token`] resolve once it is triggered, or once
//! the source is dropped.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

#[derive(Debug)]
pub struct Shutdown {
    tx: Arc<watch::Sender<bool>>,
}

/// Waits for a [`Shutdown`] to be triggered.
#[derive(Debug, Clone)]
pub struct ShutdownToken {
    rx: watch::Receiver<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    pub fn token(&self) -> ShutdownToken {
        ShutdownToken {
            rx: self.tx.subscribe(),
        }
    }

    /// Spawn a task that triggers this shutdown on Ctrl+C or SIGTERM.
    ///
    /// The task holds a weak reference, so it does not keep the source alive.
    pub fn listen_for_signals(&self) -> JoinHandle<()> {
        let tx = Arc::downgrade(&self.tx);
        tokio::spawn(async move {
            wait_for_signal().await;
            if let Some(tx) = tx.upgrade() {
                tx.send_replace(true);
            }
        })
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownToken {
    /// Resolve once shutdown has been triggered.
    pub async fn cancelled(mut self) {
        loop {
            if *self.rx.borrow_and_update() {
                return;
            }
            if self.rx.changed().await.is_err() {
                return;
            }
        }
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}
