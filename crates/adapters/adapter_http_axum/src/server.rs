//! Serving the router on a TCP listener.

use std::future::Future;

use axum::Router;
use tokio::net::TcpListener;

/// Serve `router` on `listener` until `shutdown` completes.
///
/// # Errors
///
/// Returns the I/O error that stopped the server.
pub async fn serve<F>(listener: TcpListener, router: Router, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "inbound listener started");
    }
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
}
