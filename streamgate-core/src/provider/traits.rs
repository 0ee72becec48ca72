// Stream Provider Trait
//
// Core interface for aggregator adapters

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::ProviderError;
use crate::models::{MediaKey, ResolutionResult};

/// Aggregator adapter
///
/// Only `fetch_streams()` is mandatory. `resolve()` wraps it with the
/// adapter's own time budget and turns every failure into an empty result.
#[async_trait]
pub trait StreamProvider: Send + Sync {
    /// Instance identity, stamped on every emitted source and caption
    fn id(&self) -> &str;

    /// Merge order; lower values come first
    fn priority(&self) -> i32;

    /// Hard time budget for one resolution
    fn budget(&self) -> Duration;

    /// Query the aggregator and normalize its answer.
    async fn fetch_streams(&self, key: &MediaKey) -> Result<ResolutionResult, ProviderError>;

    /// Budgeted, infallible resolution.
    async fn resolve(&self, key: &MediaKey) -> ResolutionResult {
        let budget = self.budget();
        let outcome = match tokio::time::timeout(budget, self.fetch_streams(key)).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout(budget)),
        };

        match outcome {
            Ok(result) => {
                debug!(
                    provider = self.id(),
                    key = %key,
                    sources = result.sources.len(),
                    captions = result.captions.len(),
                    "Provider resolved"
                );
                result
            }
            Err(e) => {
                warn!(provider = self.id(), key = %key, error = %e, "Provider failed, ignoring");
                ResolutionResult::default()
            }
        }
    }
}
