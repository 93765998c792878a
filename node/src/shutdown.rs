//! Stopping reclaimd.
//!
//! The match worker and the HTTP server both watch one broadcast channel.
//! Ctrl-C, SIGTERM or [`ReclaimNode::stop`](crate::ReclaimNode::stop) fire it.

use std::future::Future;

use tokio::signal;
use tokio::sync::broadcast;

/// Fan-out stop signal for the node's background tasks.
pub struct ShutdownController {
    tx: broadcast::Sender<()>,
}

impl ShutdownController {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Receiver for tasks that poll the signal in their own `select!`, like
    /// the match worker between retries.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Resolves once [`shutdown`](Self::shutdown) fires. Subscribes at call
    /// time, so call it before the signal can be sent. Handed to axum's
    /// graceful shutdown.
    pub fn signalled(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut rx = self.subscribe();
        async move {
            let _ = rx.recv().await;
        }
    }

    pub fn shutdown(&self) {
        // No receivers left just means every task already exited.
        let _ = self.tx.send(());
    }

    /// Block until the process is asked to stop, then fire the signal.
    pub async fn wait_for_signal(&self) {
        let interrupt = signal::ctrl_c();

        #[cfg(unix)]
        let terminate = async {
            match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    sigterm.recv().await;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "SIGTERM handler unavailable, stopping on Ctrl-C only");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = interrupt => tracing::info!("interrupted, stopping reclaimd"),
            _ = terminate => tracing::info!("terminated, stopping reclaimd"),
        }

        self.shutdown();
    }
}

impl Default for ShutdownController {
    fn default() -> Self {
        Self::new()
    }
}
