//! Resolution orchestrator
//!
//! Fans one `MediaKey` out to every provider at once, waits for all of them
//! to settle and concatenates their results in priority order. A provider that
//! fails or runs out of budget contributes nothing and never holds the others
//! back beyond its own budget.

use std::sync::Arc;

use futures::future::join_all;
use tracing::info;

use crate::models::{MediaKey, ResolutionResult};
use crate::provider::StreamProvider;

/// Multi-provider stream resolver
#[derive(Clone)]
pub struct ResolutionService {
    providers: Vec<Arc<dyn StreamProvider>>,
}

impl ResolutionService {
    /// Providers are kept in ascending priority; ties keep registration order.
    #[must_use]
    pub fn new(mut providers: Vec<Arc<dyn StreamProvider>>) -> Self {
        providers.sort_by_key(|p| p.priority());
        Self { providers }
    }

    /// Provider ids in merge order
    #[must_use]
    pub fn provider_ids(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.id()).collect()
    }

    /// Resolve sources and captions for a key.
    ///
    /// Never fails: an empty result means no provider currently has a stream.
    /// Sources from different providers are not deduplicated against each
    /// other, even when they likely point at the same content.
    #[tracing::instrument(skip_all, fields(key = %key))]
    pub async fn resolve_stream(&self, key: &MediaKey) -> ResolutionResult {
        let settled = join_all(self.providers.iter().map(|p| p.resolve(key))).await;

        let mut merged = ResolutionResult::default();
        for partial in settled {
            merged.append(partial);
        }

        info!(
            providers = self.providers.len(),
            sources = merged.sources.len(),
            captions = merged.captions.len(),
            "Resolution finished"
        );
        merged
    }
}
