//! Manifest and caption proxy endpoints
//!
//! Thin axum binding over [`ManifestProxy`]; the custom-scheme binding in
//! `streamgate_proxy::protocol` serves the same routes.

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header::RANGE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use streamgate_core::proxy_url::{CAPTION_PROXY_PATH, MANIFEST_PROXY_PATH};
use streamgate_proxy::cors::{apply_cors, proxy_headers};
use streamgate_proxy::{ManifestProxy, ProxyBody, ProxyError, ProxyRequest, ProxyResponse};

use crate::http::error::AppError;
use crate::http::AppState;

/// Proxy router
pub fn create_proxy_router() -> Router<AppState> {
    Router::new()
        .route(MANIFEST_PROXY_PATH, get(proxy_manifest).options(proxy_preflight))
        .route(CAPTION_PROXY_PATH, get(proxy_caption).options(proxy_preflight))
}

#[derive(Debug, Deserialize)]
pub struct ProxyParams {
    pub url: Option<String>,
}

/// Error on a proxy route; unlike plain [`AppError`] it keeps the CORS headers
pub struct ProxyFailure(ProxyError);

impl IntoResponse for ProxyFailure {
    fn into_response(self) -> Response {
        let mut response = AppError::from(self.0).into_response();
        apply_cors(response.headers_mut());
        response
    }
}

fn proxy_request(params: &ProxyParams, headers: &HeaderMap) -> Result<ProxyRequest, ProxyError> {
    let range = headers
        .get(RANGE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    Ok(ProxyRequest::parse(params.url.as_deref())?.with_range(range))
}

fn into_response(proxied: ProxyResponse) -> Response {
    let body = match proxied.body {
        ProxyBody::Playlist(text) => Body::from(text),
        ProxyBody::Upstream(upstream) => Body::from_stream(upstream.bytes_stream()),
    };
    let mut response = Response::new(body);
    *response.status_mut() = proxied.status;
    *response.headers_mut() = proxied.headers;
    response
}

/// GET /proxy/manifest - Rewritten playlist, or the upstream bytes for segments
pub async fn proxy_manifest(
    State(state): State<AppState>,
    Query(params): Query<ProxyParams>,
    headers: HeaderMap,
) -> Result<Response, ProxyFailure> {
    let request = proxy_request(&params, &headers).map_err(ProxyFailure)?;
    tracing::debug!(url = %request.target, "Proxying manifest");
    state
        .proxy
        .fetch_and_rewrite(&request)
        .await
        .map(into_response)
        .map_err(ProxyFailure)
}

/// GET /proxy/caption - Caption file passthrough
pub async fn proxy_caption(
    State(state): State<AppState>,
    Query(params): Query<ProxyParams>,
    headers: HeaderMap,
) -> Result<Response, ProxyFailure> {
    let request = proxy_request(&params, &headers).map_err(ProxyFailure)?;
    tracing::debug!(url = %request.target, "Proxying caption");
    state
        .proxy
        .fetch_caption(&request)
        .await
        .map(into_response)
        .map_err(ProxyFailure)
}

/// OPTIONS preflight for both proxy routes
pub async fn proxy_preflight() -> impl IntoResponse {
    (StatusCode::OK, proxy_headers())
}
