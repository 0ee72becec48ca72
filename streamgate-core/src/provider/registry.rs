// Provider Registry
//
// Builds adapter instances from configuration

use std::sync::Arc;

use streamgate_media_providers::{DirectAggregatorClient, PlaylistAggregatorClient};

use super::{DirectProvider, PlaylistProvider, ProviderError, QualityPolicy, StreamProvider};
use crate::config::{ProviderInstanceConfig, ProviderKind};
use crate::proxy_url::ProxyUrlBuilder;

/// Create the adapter described by one configured instance.
///
/// All adapters share `http`, the aggregator connection pool.
pub fn build_provider(
    config: &ProviderInstanceConfig,
    http: &reqwest::Client,
    proxy: &ProxyUrlBuilder,
) -> Result<Arc<dyn StreamProvider>, ProviderError> {
    let provider: Arc<dyn StreamProvider> = match config.kind {
        ProviderKind::Playlist => {
            let client = PlaylistAggregatorClient::new(&config.base_url, http.clone())?;
            Arc::new(PlaylistProvider::new(
                config.id.clone(),
                config.priority,
                config.budget(),
                QualityPolicy::excluding(config.excluded_qualities.clone()),
                client,
                proxy.clone(),
            ))
        }
        ProviderKind::Direct => {
            let client = DirectAggregatorClient::new(&config.base_url, http.clone())?;
            Arc::new(DirectProvider::new(
                config.id.clone(),
                config.priority,
                config.budget(),
                client,
                proxy.clone(),
            ))
        }
    };
    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;

    #[test]
    fn test_build_default_providers() {
        let config = Config::default();
        let http = reqwest::Client::new();
        let proxy = ProxyUrlBuilder::default();

        let providers: Vec<_> = config
            .providers
            .iter()
            .map(|p| build_provider(p, &http, &proxy).unwrap())
            .collect();
        assert_eq!(providers[0].id(), "aggregator-a");
        assert_eq!(providers[0].budget().as_secs(), 90);
        assert_eq!(providers[1].id(), "aggregator-b");
        assert_eq!(providers[1].priority(), 1);
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let mut config = Config::default().providers.remove(0);
        config.base_url = "not a url".to_string();
        let result = build_provider(&config, &reqwest::Client::new(), &ProxyUrlBuilder::default());
        assert!(matches!(result, Err(ProviderError::InvalidConfig(_))));
    }
}
