//! Direct aggregator payload types

use serde::Deserialize;
use serde_json::Value;

use crate::payload::{first_quality, first_string, lenient_list};

/// How the aggregator expects a URL to be played.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectKind {
    /// HLS playlist or progressive file fetched by the player
    Media,
    /// Embed page loaded in a frame
    Embed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectSource {
    pub url: String,
    pub quality: Option<String>,
    pub kind: DirectKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectCaption {
    pub url: String,
    pub label: Option<String>,
    pub language: Option<String>,
}

/// `{ sources: [{url, quality, type}], subtitles | captions: [{url, label, lang}] }`
#[derive(Debug, Default, Deserialize)]
pub struct DirectPayload {
    #[serde(default, deserialize_with = "lenient_list")]
    sources: Vec<Value>,
    #[serde(default, deserialize_with = "lenient_list")]
    subtitles: Vec<Value>,
    #[serde(default, deserialize_with = "lenient_list")]
    captions: Vec<Value>,
}

impl DirectPayload {
    /// Decode a payload; `None` unless it is an object carrying `sources`.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        if !value.get("sources").is_some_and(Value::is_array) {
            return None;
        }
        serde_json::from_value(value).ok()
    }

    #[must_use]
    pub fn sources(&self) -> Vec<DirectSource> {
        self.sources
            .iter()
            .filter_map(|item| {
                let url = first_string(item, &["url", "file", "link"])?;
                let kind = match item.get("type").and_then(Value::as_str) {
                    Some(t) if t.eq_ignore_ascii_case("iframe") || t.eq_ignore_ascii_case("embed") => {
                        DirectKind::Embed
                    }
                    _ => DirectKind::Media,
                };
                Some(DirectSource {
                    url,
                    quality: first_quality(item, &["quality", "label"]),
                    kind,
                })
            })
            .collect()
    }

    #[must_use]
    pub fn captions(&self) -> Vec<DirectCaption> {
        self.subtitles
            .iter()
            .chain(self.captions.iter())
            .filter_map(|item| {
                Some(DirectCaption {
                    url: first_string(item, &["url", "file"])?,
                    label: first_string(item, &["label", "name"]),
                    language: first_string(item, &["lang", "language"]),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sources_and_kinds() {
        let payload = DirectPayload::from_value(json!({
            "sources": [
                {"url": "https://d/hls/master.m3u8", "quality": "auto", "type": "hls"},
                {"url": "https://d/embed/603", "type": "iframe"},
                {"quality": 720}
            ]
        }))
        .unwrap();
        let sources = payload.sources();
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].quality.as_deref(), Some("auto"));
        assert_eq!(sources[0].kind, DirectKind::Media);
        assert_eq!(sources[1].kind, DirectKind::Embed);
    }

    #[test]
    fn test_captions_from_both_keys() {
        let payload = DirectPayload::from_value(json!({
            "sources": [],
            "subtitles": [{"url": "https://d/en.vtt", "lang": "en", "label": "English"}],
            "captions": [{"file": "https://d/es.srt", "language": "es"}, {"label": "no url"}]
        }))
        .unwrap();
        let captions = payload.captions();
        assert_eq!(captions.len(), 2);
        assert_eq!(captions[1].language.as_deref(), Some("es"));
        assert_eq!(captions[1].label, None);
    }

    #[test]
    fn test_missing_sources_is_rejected() {
        assert!(DirectPayload::from_value(json!({"error": "rate limited"})).is_none());
        assert!(DirectPayload::from_value(json!({"sources": "none"})).is_none());
    }
}
