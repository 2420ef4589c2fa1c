//! Signal handling and the bounded graceful-shutdown drain

use std::future::Future;
use std::io;
use std::pin::pin;
use std::time::Duration;

use tokio::sync::oneshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownOutcome {
    /// The server stopped on its own or drained within the grace period
    Completed,
    /// In-flight work was still running when the grace period ran out
    TimedOut,
}

/// Drives `server` to completion, giving it at most `grace` once
/// `shutdown_started` fires. A dropped sender never starts the clock.
pub async fn serve_with_deadline<F>(
    server: F,
    shutdown_started: oneshot::Receiver<()>,
    grace: Duration,
) -> io::Result<ShutdownOutcome>
where
    F: Future<Output = io::Result<()>>,
{
    let mut server = pin!(server);

    tokio::select! {
        result = &mut server => return result.map(|()| ShutdownOutcome::Completed),
        Ok(()) = shutdown_started => {}
    }

    match tokio::time::timeout(grace, server).await {
        Ok(result) => result.map(|()| ShutdownOutcome::Completed),
        Err(_) => Ok(ShutdownOutcome::TimedOut),
    }
}

/// Resolves on SIGINT or, on unix, SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                log::error!("Failed to register SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => log::info!("Received SIGINT, shutting down..."),
        _ = terminate => log::info!("Received SIGTERM, shutting down..."),
    }
}
