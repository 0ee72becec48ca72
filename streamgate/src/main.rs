mod server;

use anyhow::Result;
use tracing::info;

use streamgate_api::AppState;
use streamgate_core::{
    bootstrap::{init_resolution_service, load_config},
    logging, ProxyUrlBuilder,
};
use streamgate_proxy::HlsProxy;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load and validate configuration
    let config = load_config()?;

    // 2. Initialize logging
    logging::init_logging(&config.logging)?;
    info!("StreamGate starting...");
    info!("HTTP address: {}", config.http_address());

    // 3. Wire resolution and proxy around one reference format
    let urls = ProxyUrlBuilder::new(config.server.public_base_url.as_str());
    if urls.public_base().is_empty() {
        info!("Proxy references are same-origin relative paths");
    } else {
        info!("Proxy references point at {}", urls.public_base());
    }

    let resolution_service = init_resolution_service(&config, &urls)?;
    let proxy = HlsProxy::new(&config.proxy, urls)
        .map_err(|e| anyhow::anyhow!("Failed to initialize proxy: {e}"))?;

    // 4. Serve until a shutdown signal arrives
    let state = AppState::new(resolution_service, proxy);
    server::serve(&config.http_address(), state).await?;

    info!("StreamGate stopped");
    Ok(())
}
