//! Playlist Aggregator Client
//!
//! Pure HTTP client for aggregators that answer with HLS playlist candidates
//! in one of several JSON shapes. Independent of the `StreamProvider` adapter.
//!
//! # Example
//!
//! ```no_run
//! use streamgate_media_providers::{PlaylistAggregatorClient, TitlePath};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = PlaylistAggregatorClient::new("https://aggregator.example", reqwest::Client::new())?;
//! let payload = client.fetch(&TitlePath::Movie { id: 603 }).await?;
//! for candidate in payload.candidates() {
//!     println!("{} ({:?})", candidate.url, candidate.quality);
//! }
//! # Ok(())
//! # }
//! ```

mod client;
pub mod types;

pub use client::PlaylistAggregatorClient;
pub use types::*;
