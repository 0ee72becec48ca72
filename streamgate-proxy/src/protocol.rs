//! Custom URL scheme binding
//!
//! Desktop shells that register a scheme such as `streamgate://` hand each
//! intercepted request to [`handle_scheme_request`] instead of going through
//! the loopback HTTP server. Routes, CORS headers and error bodies are the
//! same as over HTTP. Playlists rewritten for this transport must point back
//! at the scheme, so build the proxy with [`scheme_url_builder`].

use bytes::Bytes;
use http::header::{HeaderMap, HeaderValue, CONTENT_TYPE, RANGE};
use http::{Method, Request, Response, StatusCode};
use streamgate_core::proxy_url::{CAPTION_PROXY_PATH, MANIFEST_PROXY_PATH};
use streamgate_core::ProxyUrlBuilder;
use tracing::debug;

use crate::cors::{apply_cors, proxy_headers};
use crate::{ManifestProxy, ProxyError, ProxyRequest};

pub const SCHEME: &str = "streamgate";
pub const SCHEME_HOST: &str = "app";

/// Proxy references of the form `streamgate://app/proxy/manifest?url=...`
#[must_use]
pub fn scheme_url_builder() -> ProxyUrlBuilder {
    ProxyUrlBuilder::new(format!("{SCHEME}://{SCHEME_HOST}"))
}

#[derive(Clone, Copy)]
enum Route {
    Manifest,
    Caption,
}

/// Serve one custom-scheme request with a fully buffered body.
pub async fn handle_scheme_request<P, B>(proxy: &P, request: &Request<B>) -> Response<Bytes>
where
    P: ManifestProxy + ?Sized,
{
    let route = match request.uri().path() {
        MANIFEST_PROXY_PATH => Route::Manifest,
        CAPTION_PROXY_PATH => Route::Caption,
        other => {
            debug!(path = other, "Unknown scheme route");
            return plain_status(StatusCode::NOT_FOUND);
        }
    };

    if request.method() == Method::OPTIONS {
        return plain_status(StatusCode::OK);
    }
    if request.method() != Method::GET {
        return plain_status(StatusCode::METHOD_NOT_ALLOWED);
    }

    let target = request.uri().query().and_then(|query| {
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == "url")
            .map(|(_, value)| value.into_owned())
    });
    let range = request
        .headers()
        .get(RANGE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    match serve(proxy, route, target.as_deref(), range).await {
        Ok(response) => response,
        Err(err) => error_response(&err),
    }
}

async fn serve<P>(
    proxy: &P,
    route: Route,
    target: Option<&str>,
    range: Option<String>,
) -> Result<Response<Bytes>, ProxyError>
where
    P: ManifestProxy + ?Sized,
{
    let request = ProxyRequest::parse(target)?.with_range(range);
    let proxied = match route {
        Route::Manifest => proxy.fetch_and_rewrite(&request).await?,
        Route::Caption => proxy.fetch_caption(&request).await?,
    };

    let mut response = Response::new(proxied.body.into_bytes().await?);
    *response.status_mut() = proxied.status;
    *response.headers_mut() = proxied.headers;
    Ok(response)
}

fn plain_status(status: StatusCode) -> Response<Bytes> {
    let mut response = Response::new(Bytes::new());
    *response.status_mut() = status;
    *response.headers_mut() = proxy_headers();
    response
}

fn error_response(err: &ProxyError) -> Response<Bytes> {
    let mut headers = HeaderMap::new();
    apply_cors(&mut headers);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    let mut response = Response::new(Bytes::from(err.to_json()));
    *response.status_mut() = err.status();
    *response.headers_mut() = headers;
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HlsProxy;
    use http::header::ACCESS_CONTROL_ALLOW_ORIGIN;
    use streamgate_core::config::ProxyConfig;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn scheme_proxy() -> HlsProxy {
        HlsProxy::new(&ProxyConfig::default(), scheme_url_builder()).unwrap()
    }

    fn scheme_request(method: Method, route: &str, target: Option<&str>) -> Request<()> {
        let uri = match target {
            Some(t) => format!(
                "{SCHEME}://{SCHEME_HOST}{route}?url={}",
                streamgate_core::proxy_url::encode_query_value(t)
            ),
            None => format!("{SCHEME}://{SCHEME_HOST}{route}"),
        };
        Request::builder().method(method).uri(uri).body(()).unwrap()
    }

    #[tokio::test]
    async fn test_manifest_rewritten_to_scheme() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/hls/master.m3u8"))
            .respond_with(ResponseTemplate::new(200).set_body_string("#EXTM3U\n720.m3u8"))
            .mount(&server)
            .await;

        let target = format!("{}/hls/master.m3u8", server.uri());
        let response = handle_scheme_request(
            &scheme_proxy(),
            &scheme_request(Method::GET, MANIFEST_PROXY_PATH, Some(&target)),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        let body = std::str::from_utf8(response.body()).unwrap();
        assert_eq!(
            body,
            format!(
                "#EXTM3U\n{}",
                scheme_url_builder().manifest(&format!("{}/hls/720.m3u8", server.uri()))
            )
        );
        assert!(body.contains("streamgate://app/proxy/manifest?url="));
    }

    #[tokio::test]
    async fn test_preflight_and_unknown_routes() {
        let proxy = scheme_proxy();

        let preflight =
            handle_scheme_request(&proxy, &scheme_request(Method::OPTIONS, CAPTION_PROXY_PATH, None))
                .await;
        assert_eq!(preflight.status(), StatusCode::OK);
        assert_eq!(preflight.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");

        let missing = handle_scheme_request(&proxy, &scheme_request(Method::GET, "/nope", None)).await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let post = handle_scheme_request(
            &proxy,
            &scheme_request(Method::POST, MANIFEST_PROXY_PATH, Some("https://c/a.m3u8")),
        )
        .await;
        assert_eq!(post.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_errors_carry_cors_and_json() {
        let proxy = scheme_proxy();
        let response =
            handle_scheme_request(&proxy, &scheme_request(Method::GET, MANIFEST_PROXY_PATH, None)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["status"], 400);
        assert_eq!(body["error"], "Missing url parameter");
    }
}
