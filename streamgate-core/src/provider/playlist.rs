// Playlist Aggregator Provider
//
// Adapter over PlaylistAggregatorClient: applies the quality policy, dedups
// by URL, orders by quality and wraps everything through the proxy.

use std::time::Duration;

use async_trait::async_trait;
use streamgate_media_providers::PlaylistAggregatorClient;
use url::Url;

use super::{ProviderError, Quality, QualityPolicy, StreamProvider};
use crate::models::{Caption, DeliveryType, MediaKey, ResolutionResult, Source};
use crate::proxy_url::ProxyUrlBuilder;

/// Playlist aggregator adapter
pub struct PlaylistProvider {
    id: String,
    priority: i32,
    budget: Duration,
    policy: QualityPolicy,
    client: PlaylistAggregatorClient,
    proxy: ProxyUrlBuilder,
}

impl PlaylistProvider {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        priority: i32,
        budget: Duration,
        policy: QualityPolicy,
        client: PlaylistAggregatorClient,
        proxy: ProxyUrlBuilder,
    ) -> Self {
        Self {
            id: id.into(),
            priority,
            budget,
            policy,
            client,
            proxy,
        }
    }
}

#[async_trait]
impl StreamProvider for PlaylistProvider {
    fn id(&self) -> &str {
        &self.id
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn budget(&self) -> Duration {
        self.budget
    }

    async fn fetch_streams(&self, key: &MediaKey) -> Result<ResolutionResult, ProviderError> {
        let payload = self.client.fetch(&key.title_path()).await?;
        let base = Url::parse(self.client.base_url())
            .map_err(|e| ProviderError::InvalidConfig(e.to_string()))?;

        let candidates = payload
            .candidates()
            .into_iter()
            .filter_map(|c| {
                let url = resolve_candidate_url(&base, &c.url)?;
                Some((url, Quality::parse(c.quality.as_deref())))
            })
            .collect();

        let sources = self
            .policy
            .rank(candidates)
            .into_iter()
            .map(|(url, quality)| Source {
                url: self.proxy.manifest(&url),
                delivery_type: DeliveryType::Direct,
                provider: self.id.clone(),
                quality: quality.label,
            })
            .collect();

        let captions = payload
            .caption_tracks()
            .into_iter()
            .filter_map(|track| {
                let url = resolve_candidate_url(&base, &track.url)?;
                let language = track.language.unwrap_or_else(|| "unknown".to_string());
                Some(Caption {
                    label: track.label.unwrap_or_else(|| language.clone()),
                    url: self.proxy.caption(&url),
                    language,
                    provider: self.id.clone(),
                })
            })
            .collect();

        Ok(ResolutionResult { sources, captions })
    }
}

/// Absolute http(s) form of an upstream URL; relative references resolve
/// against the aggregator base.
pub(crate) fn resolve_candidate_url(base: &Url, raw: &str) -> Option<String> {
    let resolved = base.join(raw.trim()).ok()?;
    matches!(resolved.scheme(), "http" | "https").then(|| resolved.to_string())
}
