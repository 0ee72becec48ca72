// Direct Aggregator Provider
//
// The aggregator already hands out playable URLs, so there is no quality
// filtering: every source URL goes through the manifest proxy and every
// caption through the caption proxy. Embed pages are tagged as iframe sources.

use std::time::Duration;

use async_trait::async_trait;
use streamgate_media_providers::direct::DirectKind;
use streamgate_media_providers::DirectAggregatorClient;
use url::Url;

use super::playlist::resolve_candidate_url;
use super::{ProviderError, Quality, StreamProvider};
use crate::models::{Caption, DeliveryType, MediaKey, ResolutionResult, Source};
use crate::proxy_url::ProxyUrlBuilder;

/// Direct aggregator adapter
pub struct DirectProvider {
    id: String,
    priority: i32,
    budget: Duration,
    client: DirectAggregatorClient,
    proxy: ProxyUrlBuilder,
}

impl DirectProvider {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        priority: i32,
        budget: Duration,
        client: DirectAggregatorClient,
        proxy: ProxyUrlBuilder,
    ) -> Self {
        Self {
            id: id.into(),
            priority,
            budget,
            client,
            proxy,
        }
    }
}

#[async_trait]
impl StreamProvider for DirectProvider {
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

        let sources = payload
            .sources()
            .into_iter()
            .filter_map(|source| {
                let url = resolve_candidate_url(&base, &source.url)?;
                let delivery_type = match source.kind {
                    DirectKind::Media => DeliveryType::Direct,
                    DirectKind::Embed => DeliveryType::Iframe,
                };
                Some(Source {
                    url: self.proxy.manifest(&url),
                    delivery_type,
                    provider: self.id.clone(),
                    quality: Quality::parse(source.quality.as_deref()).label,
                })
            })
            .collect();

        let captions = payload
            .captions()
            .into_iter()
            .filter_map(|caption| {
                let url = resolve_candidate_url(&base, &caption.url)?;
                let language = caption.language.unwrap_or_else(|| "unknown".to_string());
                Some(Caption {
                    label: caption.label.unwrap_or_else(|| language.clone()),
                    url: self.proxy.caption(&url),
                    language,
                    provider: self.id.clone(),
                })
            })
            .collect();

        Ok(ResolutionResult { sources, captions })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_direct_sources_and_captions_are_wrapped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tv/1399/1/2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "sources": [
                    {"url": "https://d/master.m3u8", "quality": "1080p"},
                    {"url": "https://d/embed/1399", "type": "iframe"}
                ],
                "subtitles": [
                    {"url": "https://d/en.vtt", "lang": "en", "label": "English"},
                    {"url": "https://d/xx.vtt"}
                ]
            })))
            .mount(&server)
            .await;

        let client = DirectAggregatorClient::new(&server.uri(), reqwest::Client::new()).unwrap();
        let proxy = ProxyUrlBuilder::new("http://127.0.0.1:8080");
        let provider = DirectProvider::new(
            "aggregator-b",
            1,
            Duration::from_secs(5),
            client,
            proxy.clone(),
        );

        let result = provider.resolve(&MediaKey::episode(1399, 1, 2)).await;

        // 1080 is only filtered for the playlist aggregator
        assert_eq!(result.sources.len(), 2);
        assert_eq!(result.sources[0].quality, "1080p");
        assert_eq!(result.sources[0].url, proxy.manifest("https://d/master.m3u8"));
        assert_eq!(result.sources[1].delivery_type, DeliveryType::Iframe);
        assert_eq!(result.sources[1].url, proxy.manifest("https://d/embed/1399"));
        assert!(result
            .sources
            .iter()
            .all(|s| s.url.starts_with("http://127.0.0.1:8080/proxy/manifest?url=")));
        assert_eq!(result.sources[1].quality, "unknown");

        assert_eq!(result.captions.len(), 2);
        assert_eq!(result.captions[0].url, proxy.caption("https://d/en.vtt"));
        assert_eq!(result.captions[0].provider, "aggregator-b");
        assert_eq!(result.captions[1].language, "unknown");
        assert_eq!(result.captions[1].label, "unknown");
    }

    #[tokio::test]
    async fn test_malformed_payload_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "error"})))
            .mount(&server)
            .await;

        let client = DirectAggregatorClient::new(&server.uri(), reqwest::Client::new()).unwrap();
        let provider = DirectProvider::new(
            "aggregator-b",
            1,
            Duration::from_secs(5),
            client,
            ProxyUrlBuilder::default(),
        );
        assert!(matches!(
            provider.fetch_streams(&MediaKey::movie(1)).await,
            Err(ProviderError::MalformedPayload(_))
        ));
        assert!(provider.resolve(&MediaKey::movie(1)).await.is_empty());
    }
}
