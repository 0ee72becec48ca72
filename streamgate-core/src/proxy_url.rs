//! Proxy reference construction
//!
//! Every URL handed to the player is wrapped as
//! `{public_base}{route}?url=<percent-encoded absolute URL>`. Both the
//! orchestrator and the playlist rewriter go through [`ProxyUrlBuilder`] so
//! the two can never disagree on the format.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Route of the manifest rewriting proxy
pub const MANIFEST_PROXY_PATH: &str = "/proxy/manifest";

/// Route of the caption passthrough proxy
pub const CAPTION_PROXY_PATH: &str = "/proxy/caption";

/// Unreserved characters (RFC 3986) stay literal; everything else is escaped.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encode a value for use inside a query parameter.
#[must_use]
pub fn encode_query_value(input: &str) -> String {
    utf8_percent_encode(input, QUERY_VALUE).to_string()
}

/// Builds proxy-wrapped references.
///
/// `public_base` is empty for same-origin relative references, or an absolute
/// origin such as `http://127.0.0.1:8080` when the player lives elsewhere.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxyUrlBuilder {
    public_base: String,
}

impl ProxyUrlBuilder {
    #[must_use]
    pub fn new(public_base: impl Into<String>) -> Self {
        let public_base: String = public_base.into();
        Self {
            public_base: public_base.trim_end_matches('/').to_string(),
        }
    }

    #[must_use]
    pub fn public_base(&self) -> &str {
        &self.public_base
    }

    /// Reference routed through the manifest proxy
    #[must_use]
    pub fn manifest(&self, target: &str) -> String {
        self.wrap(MANIFEST_PROXY_PATH, target)
    }

    /// Reference routed through the caption proxy
    #[must_use]
    pub fn caption(&self, target: &str) -> String {
        self.wrap(CAPTION_PROXY_PATH, target)
    }

    fn wrap(&self, route: &str, target: &str) -> String {
        format!("{}{route}?url={}", self.public_base, encode_query_value(target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decoded_url_param(wrapped: &str) -> String {
        let parsed = url::Url::parse(&format!("http://local{wrapped}")).unwrap();
        parsed
            .query_pairs()
            .find(|(k, _)| k == "url")
            .map(|(_, v)| v.into_owned())
            .unwrap()
    }

    #[test]
    fn test_manifest_reference_round_trips() {
        let builder = ProxyUrlBuilder::default();
        let target = "https://cdn.example/a/b/index.m3u8?token=a+b&x=1";
        let wrapped = builder.manifest(target);
        assert!(wrapped.starts_with("/proxy/manifest?url=https%3A%2F%2Fcdn.example"));
        assert_eq!(decoded_url_param(&wrapped), target);
    }

    #[test]
    fn test_public_base_prefix() {
        let builder = ProxyUrlBuilder::new("http://127.0.0.1:8080/");
        assert_eq!(
            builder.caption("https://subs.example/en.vtt"),
            "http://127.0.0.1:8080/proxy/caption?url=https%3A%2F%2Fsubs.example%2Fen.vtt"
        );
    }

    #[test]
    fn test_encode_keeps_unreserved() {
        assert_eq!(encode_query_value("a-b_c.d~e f/"), "a-b_c.d~e%20f%2F");
    }
}
