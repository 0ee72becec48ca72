//! Playlist aggregator HTTP client

use reqwest::Client;
use tracing::debug;

use super::types::AggregatorPayload;
use crate::error::ProviderClientError;
use crate::request::{get_json, normalize_base_url, TitlePath};

/// Playlist aggregator HTTP client
///
/// Fetches `{base}/movie/{id}` or `{base}/tv/{id}/{season}/{episode}` and
/// classifies the answer into an [`AggregatorPayload`].
#[derive(Debug, Clone)]
pub struct PlaylistAggregatorClient {
    base_url: String,
    client: Client,
}

impl PlaylistAggregatorClient {
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

    /// Fetch and classify the aggregator payload for a title.
    ///
    /// A payload that matches no known shape is an error so the adapter can
    /// log it; callers that only want candidates treat it as empty.
    pub async fn fetch(&self, path: &TitlePath) -> Result<AggregatorPayload, ProviderClientError> {
        let (url, value) = get_json(&self.client, &self.base_url, path).await?;

        let payload = AggregatorPayload::from_value(value);
        if !payload.is_recognized() {
            return Err(ProviderClientError::UnrecognizedShape { url });
        }

        debug!(url = %url, candidates = payload.candidates().len(), "Aggregator payload decoded");
        Ok(payload)
    }
}
