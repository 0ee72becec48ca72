use serde::{Deserialize, Serialize};

/// How the player consumes a source URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryType {
    /// Fetched by the video element through the manifest proxy
    Direct,
    /// Embed page loaded in a frame
    Iframe,
}

/// A playable source. `url` is always proxy-wrapped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    pub url: String,
    pub delivery_type: DeliveryType,
    pub provider: String,
    pub quality: String,
}

/// A subtitle track. `url` is already routed through the caption proxy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caption {
    pub label: String,
    pub url: String,
    pub language: String,
    pub provider: String,
}

/// Merged outcome of one resolution. Empty means "no stream available".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionResult {
    pub sources: Vec<Source>,
    pub captions: Vec<Caption>,
}

impl ResolutionResult {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty() && self.captions.is_empty()
    }

    /// Append another provider's results after this one's.
    pub fn append(&mut self, mut other: Self) {
        self.sources.append(&mut other.sources);
        self.captions.append(&mut other.captions);
    }
}
