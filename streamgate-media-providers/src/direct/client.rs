//! Direct aggregator HTTP client

use reqwest::Client;
use tracing::debug;

use super::types::DirectPayload;
use crate::error::ProviderClientError;
use crate::request::{get_json, normalize_base_url, TitlePath};

/// Direct aggregator HTTP client
#[derive(Debug, Clone)]
pub struct DirectAggregatorClient {
    base_url: String,
    client: Client,
}

impl DirectAggregatorClient {
    /// Create a client on top of a shared connection pool
    pub fn new(base_url: &str, client: Client) -> Result<Self, ProviderClientError> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            client,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch playable sources and caption tracks for a title.
    pub async fn fetch(&self, path: &TitlePath) -> Result<DirectPayload, ProviderClientError> {
        let (url, value) = get_json(&self.client, &self.base_url, path).await?;

        let payload = DirectPayload::from_value(value)
            .ok_or(ProviderClientError::UnrecognizedShape { url: url.clone() })?;

        debug!(url = %url, sources = payload.sources().len(), "Direct payload decoded");
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_direct_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tv/100/1/3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "sources": [{"url": "https://d/ep3.m3u8", "quality": "1080p"}],
                "subtitles": [{"url": "https://d/en.vtt", "lang": "en"}]
            })))
            .mount(&server)
            .await;

        let client = DirectAggregatorClient::new(&server.uri(), Client::new()).unwrap();
        let payload = client
            .fetch(&TitlePath::Episode { id: 100, season: 1, episode: 3 })
            .await
            .unwrap();
        assert_eq!(payload.sources().len(), 1);
        assert_eq!(payload.captions().len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = DirectAggregatorClient::new(&server.uri(), Client::new()).unwrap();
        let err = client.fetch(&TitlePath::Movie { id: 9 }).await.unwrap_err();
        assert!(matches!(err, ProviderClientError::Http { .. }));
    }
}
