//! Request plumbing shared by the aggregator clients

use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT},
    Client,
};
use tracing::debug;

use crate::error::{check_response, json_with_limit, ProviderClientError};

/// Desktop browser identity. Several aggregators reject default client identifiers.
pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Provider-agnostic path of a title on an aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitlePath {
    Movie { id: u64 },
    Episode { id: u64, season: u32, episode: u32 },
}

impl TitlePath {
    /// `movie/{id}` or `tv/{id}/{season}/{episode}`
    #[must_use]
    pub fn to_path(&self) -> String {
        match self {
            Self::Movie { id } => format!("movie/{id}"),
            Self::Episode { id, season, episode } => format!("tv/{id}/{season}/{episode}"),
        }
    }
}

/// Validate and normalize an aggregator base URL (no trailing slash).
pub fn normalize_base_url(base_url: &str) -> Result<String, ProviderClientError> {
    let parsed = url::Url::parse(base_url)
        .map_err(|e| ProviderClientError::InvalidConfig(format!("invalid base_url {base_url:?}: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ProviderClientError::InvalidConfig(format!(
            "base_url must be http(s), got {base_url:?}"
        )));
    }
    Ok(base_url.trim_end_matches('/').to_string())
}

fn build_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers
}

/// GET `{base_url}/{path}` and decode the body as loose JSON.
pub(crate) async fn get_json(
    client: &Client,
    base_url: &str,
    path: &TitlePath,
) -> Result<(String, serde_json::Value), ProviderClientError> {
    let url = format!("{base_url}/{}", path.to_path());
    debug!(url = %url, "Requesting aggregator");

    let response = client.get(&url).headers(build_headers()).send().await?;
    let response = check_response(response)?;
    let value = json_with_limit(response).await?;
    Ok((url, value))
}
