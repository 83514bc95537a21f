// Server module entry
// Accept loop, per-connection serving and shutdown handling

pub mod connection;
pub mod listener;
pub mod signal;

use std::future::Future;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::AppState;
use crate::logger;

pub use listener::create_listener;

/// Accept connections until SIGTERM or Ctrl+C
pub async fn run(listener: TcpListener, state: Arc<AppState>) {
    serve(listener, state, signal::shutdown_signal()).await;
}

/// Accept connections until `shutdown` resolves.
///
/// Connections already being served keep running in their own tasks.
pub async fn serve<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F)
where
    F: Future<Output = ()>,
{
    let active_connections = Arc::new(AtomicUsize::new(0));
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        connection::accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            () = &mut shutdown => {
                logger::log_info("Stopped accepting connections");
                break;
            }
        }
    }
}
