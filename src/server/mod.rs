//! Server module entry point
//!
//! Listener setup, the accept loop, and per-connection handling.

pub mod connection;
pub mod listener;
pub mod signal;

pub use listener::create_reusable_listener;

use crate::config::AppState;
use crate::logger;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Accept loop: runs until a shutdown signal arrives. Each accepted
/// connection is handled cooperatively on the same thread.
pub async fn run(
    listener: TcpListener,
    state: Arc<AppState>,
) -> Result<(), Box<dyn std::error::Error>> {
    let active_connections = Arc::new(AtomicUsize::new(0));

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        connection::accept_connection(
                            stream,
                            peer_addr,
                            &state,
                            &active_connections,
                        );
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = signal::shutdown_signal() => {
                logger::log_shutdown();
                return Ok(());
            }
        }
    }
}
