// Server loop module
// Accepts connections until the shutdown notification fires

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

/// Run the accept loop until shutdown is requested.
///
/// Each accepted connection is handed to `accept_connection`; accept errors
/// are logged and the loop continues. On shutdown the listener is dropped,
/// releasing the port, while in-flight connections finish in their own
/// tasks.
pub async fn run_server_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: Arc<Notify>,
) {
    let active_connections = Arc::new(AtomicUsize::new(0));

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = shutdown.notified() => {
                break;
            }
        }
    }

    drop(listener);
    logger::log_shutdown();
}
