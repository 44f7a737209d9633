//! Stop signal for the gateway.
//!
//! [`GatewayServer::start`](crate::GatewayServer::start) takes one receiver
//! and drains in-flight requests once it fires. The daemon fires it from
//! SIGINT/SIGTERM; tests call [`ShutdownController::shutdown`] directly.

use tokio::signal;
use tokio::sync::broadcast;

pub struct ShutdownController {
    tx: broadcast::Sender<()>,
}

impl ShutdownController {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Ask the gateway to stop. A no-op when nothing is serving.
    pub fn shutdown(&self) {
        let _ = self.tx.send(());
    }

    /// Park until the process is asked to stop, then stop the gateway.
    pub async fn wait_for_signal(&self) {
        let name = tokio::select! {
            _ = signal::ctrl_c() => "SIGINT",
            _ = terminate() => "SIGTERM",
        };
        tracing::info!(signal = name, "stopping gateway");
        self.shutdown();
    }
}

impl Default for ShutdownController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(unix)]
async fn terminate() {
    match signal::unix::signal(signal::unix::SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        Err(e) => {
            tracing::warn!("SIGTERM handler unavailable, only SIGINT stops the gateway: {e}");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn shutdown_reaches_the_server_receiver() {
        let controller = ShutdownController::new();
        let mut server_rx = controller.subscribe();
        controller.shutdown();
        assert!(server_rx.recv().await.is_ok());
    }

    #[test]
    fn shutdown_before_serving_is_a_no_op() {
        ShutdownController::default().shutdown();
    }
}
