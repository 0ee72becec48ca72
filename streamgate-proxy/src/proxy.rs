// Upstream fetch shared by the manifest and caption proxies

use async_trait::async_trait;
use bytes::Bytes;
use http::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_RANGES, CONTENT_LENGTH, CONTENT_RANGE,
    CONTENT_TYPE, RANGE, REFERER, USER_AGENT,
};
use http::StatusCode;
use streamgate_core::config::ProxyConfig;
use streamgate_core::ProxyUrlBuilder;
use tracing::{debug, warn};
use url::Url;

use crate::cors::proxy_headers;
use crate::playlist::{is_playlist, rewrite_playlist, HLS_CONTENT_TYPE};

/// Caption content type when the upstream does not name one
const DEFAULT_CAPTION_CONTENT_TYPE: &str = "text/vtt; charset=utf-8";

/// Upstream headers copied onto passthrough responses
const FORWARDED_HEADERS: [HeaderName; 4] = [CONTENT_TYPE, CONTENT_LENGTH, CONTENT_RANGE, ACCEPT_RANGES];

/// Proxy failure, each variant mapping onto one HTTP status
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("Upstream request took too long")]
    UpstreamTimeout,

    #[error("Upstream returned {status}")]
    UpstreamStatus { status: StatusCode },

    #[error("Upstream request failed: {0}")]
    Upstream(String),
}

impl ProxyError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
            Self::UpstreamStatus { status } => *status,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// `{"error": ..., "status": ...}` body shared by both transports
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::json!({
            "error": self.to_string(),
            "status": self.status().as_u16(),
        })
        .to_string()
    }

    fn from_transport(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::UpstreamTimeout
        } else {
            Self::Upstream(err.to_string())
        }
    }
}

/// One validated proxy request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyRequest {
    pub target: Url,
    /// Client `Range` header, forwarded verbatim
    pub range: Option<String>,
}

impl ProxyRequest {
    /// Validate the already-decoded `url` query parameter.
    pub fn parse(raw: Option<&str>) -> Result<Self, ProxyError> {
        let raw = raw
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .ok_or_else(|| ProxyError::InvalidRequest("Missing url parameter".to_string()))?;

        let target = Url::parse(raw)
            .map_err(|e| ProxyError::InvalidRequest(format!("Invalid url parameter: {e}")))?;
        if !matches!(target.scheme(), "http" | "https") {
            return Err(ProxyError::InvalidRequest(format!(
                "Unsupported url scheme: {}",
                target.scheme()
            )));
        }

        Ok(Self { target, range: None })
    }

    #[must_use]
    pub fn with_range(mut self, range: Option<String>) -> Self {
        self.range = range;
        self
    }
}

/// Body of a successful proxy answer
#[derive(Debug)]
pub enum ProxyBody {
    /// Rewritten playlist text
    Playlist(String),
    /// Upstream body, not yet read
    Upstream(reqwest::Response),
}

impl ProxyBody {
    /// Read the whole body into memory.
    pub async fn into_bytes(self) -> Result<Bytes, ProxyError> {
        match self {
            Self::Playlist(text) => Ok(Bytes::from(text)),
            Self::Upstream(response) => response
                .bytes()
                .await
                .map_err(|e| ProxyError::from_transport(&e)),
        }
    }
}

/// Successful proxy answer; CORS headers are already in `headers`
#[derive(Debug)]
pub struct ProxyResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: ProxyBody,
}

/// Fetch-and-rewrite contract shared by the HTTP routes and the custom scheme
#[async_trait]
pub trait ManifestProxy: Send + Sync {
    /// Fetch `request.target`; playlists come back rewritten, anything else
    /// (segments, keys) streams through untouched.
    async fn fetch_and_rewrite(&self, request: &ProxyRequest) -> Result<ProxyResponse, ProxyError>;

    /// Fetch a caption file and pass it through.
    async fn fetch_caption(&self, request: &ProxyRequest) -> Result<ProxyResponse, ProxyError>;
}

/// reqwest-backed [`ManifestProxy`]
#[derive(Debug, Clone)]
pub struct HlsProxy {
    client: reqwest::Client,
    urls: ProxyUrlBuilder,
    user_agent: String,
}

impl HlsProxy {
    pub fn new(config: &ProxyConfig, urls: ProxyUrlBuilder) -> Result<Self, ProxyError> {
        let mut builder = reqwest::Client::builder().connect_timeout(config.connect_timeout());
        if let Some(timeout) = config.upstream_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ProxyError::Upstream(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            urls,
            user_agent: config.user_agent.clone(),
        })
    }

    #[must_use]
    pub fn urls(&self) -> &ProxyUrlBuilder {
        &self.urls
    }

    async fn send(&self, request: &ProxyRequest) -> Result<reqwest::Response, ProxyError> {
        let target = &request.target;
        let mut upstream = self
            .client
            .get(target.clone())
            .header(USER_AGENT, &self.user_agent)
            .header(ACCEPT, "*/*")
            .header(REFERER, referer_for(target));
        if let Some(range) = &request.range {
            upstream = upstream.header(RANGE, range);
        }

        let response = upstream.send().await.map_err(|e| {
            warn!(url = %target, error = %e, "Proxy request failed");
            ProxyError::from_transport(&e)
        })?;

        let status = response.status();
        if !status.is_success() {
            debug!(url = %target, %status, "Upstream returned an error status");
            return Err(ProxyError::UpstreamStatus { status });
        }
        Ok(response)
    }

    fn passthrough(response: reqwest::Response, default_content_type: Option<&'static str>) -> ProxyResponse {
        let mut headers = proxy_headers();
        for name in FORWARDED_HEADERS {
            if let Some(value) = response.headers().get(&name) {
                headers.insert(name, value.clone());
            }
        }
        if let Some(default) = default_content_type {
            headers
                .entry(CONTENT_TYPE)
                .or_insert_with(|| HeaderValue::from_static(default));
        }

        ProxyResponse {
            status: response.status(),
            headers,
            body: ProxyBody::Upstream(response),
        }
    }
}

#[async_trait]
impl ManifestProxy for HlsProxy {
    async fn fetch_and_rewrite(&self, request: &ProxyRequest) -> Result<ProxyResponse, ProxyError> {
        let response = self.send(request).await?;
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        if !is_playlist(&request.target, content_type.as_deref()) {
            return Ok(Self::passthrough(response, None));
        }

        let text = response
            .text()
            .await
            .map_err(|e| ProxyError::from_transport(&e))?;
        let rewritten = rewrite_playlist(&text, &request.target, &self.urls);
        debug!(url = %request.target, bytes = rewritten.len(), "Rewrote playlist");

        let mut headers = proxy_headers();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(HLS_CONTENT_TYPE));
        Ok(ProxyResponse {
            status: StatusCode::OK,
            headers,
            body: ProxyBody::Playlist(rewritten),
        })
    }

    async fn fetch_caption(&self, request: &ProxyRequest) -> Result<ProxyResponse, ProxyError> {
        let response = self.send(request).await?;
        Ok(Self::passthrough(response, Some(DEFAULT_CAPTION_CONTENT_TYPE)))
    }
}

/// `scheme://host/path` of the target, which most CDNs accept as Referer
fn referer_for(target: &Url) -> String {
    format!(
        "{}://{}{}",
        target.scheme(),
        target.host_str().unwrap_or(""),
        target.path()
    )
}
