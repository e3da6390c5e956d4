//! HTTP server lifecycle.

use tokio::net::TcpListener;
use tracing::info;

use super::handlers::AppState;
use super::routes::create_router;
use crate::error::Result;
use crate::utils::shutdown_signal;

/// Bind `host:port`, returning the listener.
pub async fn bind(host: &str, port: u16) -> Result<TcpListener> {
    let listener = TcpListener::bind((host, port)).await?;
    info!("Server running on http://{}", listener.local_addr()?);
    Ok(listener)
}

/// Serve the relay on `listener` until Ctrl-C or SIGTERM.
pub async fn serve(listener: TcpListener, state: AppState) -> Result<()> {
    let router = create_router(state);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}
