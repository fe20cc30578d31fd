//! Graceful shutdown.
//!
//! A [`ShutdownCoordinator`] fans a single shutdown notification out to any
//! number of [`ShutdownSignal`]s (for example the future handed to
//! `axum::serve(..).with_graceful_shutdown`). [`run_with_graceful_shutdown`]
//! ties that to SIGINT/SIGTERM and bounds the drain period.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info, warn};

/// Shutdown coordinator for graceful termination.
#[derive(Debug)]
pub struct ShutdownCoordinator {
    tx: watch::Sender<bool>,
}

impl ShutdownCoordinator {
    /// Creates a new coordinator in the running state.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    /// Gets a shutdown receiver.
    #[must_use]
    pub fn subscribe(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.tx.subscribe(),
        }
    }

    /// Notifies every subscriber. Idempotent.
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    /// Whether shutdown has been triggered.
    #[must_use]
    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

/// Shutdown signal receiver.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl ShutdownSignal {
    /// Resolves once shutdown has been triggered (or the coordinator is gone).
    pub async fn recv(mut self) {
        let _ = self.rx.wait_for(|triggered| *triggered).await;
    }
}

/// Waits for SIGTERM or SIGINT.
///
/// If a handler cannot be installed the corresponding branch never resolves.
pub async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            info!("Received SIGTERM, initiating shutdown");
        }
    }
}

/// Runs a server future until it stops on its own or a signal arrives.
///
/// On a signal the coordinator is triggered and the server gets
/// `drain_timeout` to finish in-flight work before it is dropped.
pub async fn run_with_graceful_shutdown<F, E>(
    server: F,
    coordinator: ShutdownCoordinator,
    drain_timeout: Duration,
) where
    F: Future<Output = Result<(), E>>,
    E: Display,
{
    run_until(server, coordinator, drain_timeout, wait_for_signal()).await;
}

async fn run_until<F, E, S>(
    server: F,
    coordinator: ShutdownCoordinator,
    drain_timeout: Duration,
    stop: S,
) where
    F: Future<Output = Result<(), E>>,
    E: Display,
    S: Future<Output = ()>,
{
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => {
            log_server_exit(result);
            return;
        }
        () = stop => {
            info!("Shutdown signal received");
        }
    }

    coordinator.trigger();

    match tokio::time::timeout(drain_timeout, &mut server).await {
        Ok(result) => log_server_exit(result),
        Err(_) => warn!(
            timeout_secs = drain_timeout.as_secs(),
            "Shutdown timeout reached, dropping remaining connections"
        ),
    }

    info!("Shutdown complete");
}

fn log_server_exit<E: Display>(result: Result<(), E>) {
    match result {
        Ok(()) => info!("Server stopped normally"),
        Err(e) => error!(error = %e, "Server error"),
    }
}
