//! Direct Aggregator Client
//!
//! Pure HTTP client for aggregators that already return directly playable
//! URLs together with caption tracks.

mod client;
pub mod types;

pub use client::DirectAggregatorClient;
pub use types::*;
