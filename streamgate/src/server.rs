use anyhow::Result;
use tracing::{error, info};

use streamgate_api::{create_router, AppState};

/// Bind the HTTP listener and serve until SIGTERM or Ctrl+C.
pub async fn serve(http_address: &str, state: AppState) -> Result<()> {
    let http_addr: std::net::SocketAddr = http_address
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid HTTP address '{http_address}': {e}"))?;

    let listener = tokio::net::TcpListener::bind(http_addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind HTTP address {http_addr}: {e}"))?;

    info!("HTTP server listening on {}", http_addr);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("HTTP server error: {e}"))?;

    info!("HTTP server shut down gracefully");
    Ok(())
}

/// Wait for a shutdown signal (SIGTERM or SIGINT/Ctrl+C)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { info!("Received Ctrl+C, shutting down"); }
        () = terminate => { info!("Received SIGTERM, shutting down"); }
    }
}
