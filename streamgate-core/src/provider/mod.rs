// Stream Provider System
//
// Adapters that turn one aggregator client into normalized, proxy-wrapped
// sources and captions for a MediaKey.

pub mod direct;
pub mod error;
pub mod playlist;
pub mod quality;
pub mod registry;
pub mod traits;

pub use direct::DirectProvider;
pub use error::{ProviderError, Result};
pub use playlist::PlaylistProvider;
pub use quality::{Quality, QualityPolicy};
pub use registry::build_provider;
pub use traits::StreamProvider;
