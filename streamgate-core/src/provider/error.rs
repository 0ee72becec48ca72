// Provider Error Types

use std::time::Duration;

use streamgate_media_providers::ProviderClientError;

/// Provider-level failures. Adapters never surface these to callers; they are
/// logged and turned into an empty result.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Provider timed out after {0:?}")]
    Timeout(Duration),

    /// The HTTP client gave up before the provider budget ran out
    #[error("Provider request timed out: {0}")]
    RequestTimeout(String),

    #[error("Provider returned HTTP {status} for {url}")]
    Http { status: u16, url: String },

    #[error("Malformed provider payload: {0}")]
    MalformedPayload(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<ProviderClientError> for ProviderError {
    fn from(err: ProviderClientError) -> Self {
        match err {
            ProviderClientError::Http { status, url } => Self::Http {
                status: status.as_u16(),
                url,
            },
            ProviderClientError::Parse(msg) => Self::MalformedPayload(msg),
            ProviderClientError::UnrecognizedShape { url } => {
                Self::MalformedPayload(format!("unrecognized payload shape from {url}"))
            }
            ProviderClientError::ResponseTooLarge { size } => {
                Self::MalformedPayload(format!("response too large ({size} bytes)"))
            }
            ProviderClientError::InvalidConfig(msg) => Self::InvalidConfig(msg),
            ProviderClientError::Timeout(msg) => Self::RequestTimeout(msg),
            ProviderClientError::Network(msg) => Self::Network(msg),
        }
    }
}

pub type Result<T> = std::result::Result<T, ProviderError>;
