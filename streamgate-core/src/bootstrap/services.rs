//! Service initialization

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::info;

use crate::provider::{build_provider, StreamProvider};
use crate::{Config, ProxyUrlBuilder, ResolutionService};

/// Shared connection pool for aggregator calls.
///
/// Per-call budgets are enforced by each adapter, so the client itself only
/// bounds connection setup.
pub fn build_provider_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build provider HTTP client: {e}"))
}

/// Build the resolution service from every enabled provider instance.
pub fn init_resolution_service(config: &Config, proxy: &ProxyUrlBuilder) -> Result<ResolutionService> {
    let http = build_provider_client()?;

    let providers = config
        .enabled_providers()
        .map(|instance| {
            build_provider(instance, &http, proxy)
                .map_err(|e| anyhow::anyhow!("provider {:?}: {e}", instance.id))
        })
        .collect::<Result<Vec<Arc<dyn StreamProvider>>>>()?;

    let service = ResolutionService::new(providers);
    info!(providers = ?service.provider_ids(), "Resolution service initialized");
    Ok(service)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_providers_are_skipped() {
        let mut config = Config::default();
        config.providers[1].enabled = false;
        let service = init_resolution_service(&config, &ProxyUrlBuilder::default()).unwrap();
        assert_eq!(service.provider_ids(), vec!["aggregator-a"]);
    }
}
