pub mod bootstrap;
pub mod config;
pub mod logging;
pub mod models;
pub mod provider;
pub mod proxy_url;
pub mod service;

pub use config::Config;
pub use models::{Caption, DeliveryType, MediaKey, MediaKeyError, MediaKind, ResolutionResult, Source};
pub use proxy_url::ProxyUrlBuilder;
pub use service::ResolutionService;
