// Signal handling module
//
// Supported signals:
// - SIGINT:  shutdown (Ctrl+C)
// - SIGTERM: shutdown
// Non-Unix platforms fall back to Ctrl+C only.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

use crate::logger;

/// Shutdown signal state shared with the serve loop
pub struct ShutdownSignal {
    /// Notified once when shutdown is requested
    pub notify: Arc<Notify>,
    /// Whether shutdown has been requested
    pub requested: Arc<AtomicBool>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self {
            notify: Arc::new(Notify::new()),
            requested: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Start the signal listener task (Unix)
///
/// Listens for SIGINT and SIGTERM and notifies the serve loop. The
/// notification carries a permit, so a signal arriving while the loop is
/// mid-accept is not lost.
#[cfg(unix)]
pub fn start_signal_handler(shutdown: &ShutdownSignal) {
    use tokio::signal::unix::{signal, SignalKind};

    let notify = Arc::clone(&shutdown.notify);
    let requested = Arc::clone(&shutdown.requested);

    tokio::spawn(async move {
        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(s) => s,
            Err(e) => {
                logger::log_error(&format!("Failed to register SIGTERM handler: {e}"));
                return;
            }
        };
        let mut sigint = match signal(SignalKind::interrupt()) {
            Ok(s) => s,
            Err(e) => {
                logger::log_error(&format!("Failed to register SIGINT handler: {e}"));
                return;
            }
        };

        tokio::select! {
            _ = sigterm.recv() => logger::log_signal_received("SIGTERM"),
            _ = sigint.recv() => logger::log_signal_received("SIGINT (Ctrl+C)"),
        }

        requested.store(true, Ordering::SeqCst);
        notify.notify_one();
    });
}

/// Non-Unix fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub fn start_signal_handler(shutdown: &ShutdownSignal) {
    let notify = Arc::clone(&shutdown.notify);
    let requested = Arc::clone(&shutdown.requested);

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            logger::log_signal_received("Ctrl+C");
            requested.store(true, Ordering::SeqCst);
            notify.notify_one();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_notify_permit_survives_late_wait() {
        let shutdown = ShutdownSignal::new();
        shutdown.requested.store(true, Ordering::SeqCst);
        shutdown.notify.notify_one();

        // The permit is stored, so a waiter arriving afterwards still wakes
        shutdown.notify.notified().await;
        assert!(shutdown.requested.load(Ordering::SeqCst));
    }
}
