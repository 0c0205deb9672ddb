//! Shutdown coordination.

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::lifecycle::signals;

/// Broadcasts a single stop request to the collector loop.
///
/// Detached probe wait loops never subscribe; they end when their worker
/// resolves or the process exits.
#[derive(Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Trigger shutdown once SIGINT or SIGTERM arrives.
    ///
    /// A failing signal handler also triggers shutdown, since the process
    /// could otherwise no longer be stopped cleanly.
    pub fn listen_for_signals(&self) -> JoinHandle<()> {
        let shutdown = self.clone();
        tokio::spawn(async move {
            match signals::wait_for_signal().await {
                Ok(name) => tracing::info!(signal = name, "Shutdown requested"),
                Err(e) => tracing::error!(error = %e, "Signal handler failed, shutting down"),
            }
            shutdown.trigger();
        })
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_trigger_reaches_every_subscriber() {
        let shutdown = Shutdown::new();
        let mut collector = shutdown.subscribe();
        let mut other = shutdown.clone().subscribe();

        shutdown.trigger();

        assert!(collector.recv().await.is_ok());
        assert!(other.recv().await.is_ok());
    }

    #[tokio::test]
    async fn test_signal_listener_can_be_aborted() {
        let shutdown = Shutdown::new();
        let mut rx = shutdown.subscribe();

        let listener = shutdown.listen_for_signals();
        listener.abort();

        assert!(listener.await.unwrap_err().is_cancelled());
        assert!(rx.try_recv().is_err());
    }
}
