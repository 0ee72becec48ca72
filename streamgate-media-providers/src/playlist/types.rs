//! Playlist aggregator payload types
//!
//! The aggregator answers in (at least) two shapes. Both are decoded into
//! [`AggregatorPayload`] and flattened into [`StreamCandidate`]s so callers
//! never touch raw JSON.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::payload::{first_quality, first_string, lenient, lenient_list, RawQuality};

const URL_KEYS: &[&str] = &["url", "file", "playlist", "link"];
const QUALITY_KEYS: &[&str] = &["quality", "label", "resolution"];

/// One playable URL with whatever quality label the aggregator attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamCandidate {
    pub url: String,
    pub quality: Option<String>,
}

/// Subtitle track advertised alongside a flat payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionTrack {
    pub url: String,
    pub label: Option<String>,
    pub language: Option<String>,
}

/// `{ source, quality, sources: [{file, quality, type}] }`
#[derive(Debug, Default, Deserialize)]
pub struct FlatSources {
    #[serde(default, deserialize_with = "lenient")]
    pub source: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub quality: Option<RawQuality>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub sources: Vec<Value>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub tracks: Vec<Value>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub subtitles: Vec<Value>,
}

/// `{ streams: { <name>: { streams: [...], quality_options: [...] } } }`
#[derive(Debug, Default, Deserialize)]
pub struct NestedStreams {
    #[serde(default)]
    pub streams: BTreeMap<String, Value>,
}

#[derive(Debug, Default, Deserialize)]
struct NestedEntry {
    #[serde(default, deserialize_with = "lenient_list")]
    streams: Vec<Value>,
    #[serde(default, deserialize_with = "lenient_list")]
    quality_options: Vec<Value>,
}

/// Shape-tagged aggregator response.
#[derive(Debug)]
pub enum AggregatorPayload {
    Flat(FlatSources),
    Nested(NestedStreams),
    Unrecognized,
}

impl AggregatorPayload {
    /// Detect the payload shape. Never fails; unknown input is `Unrecognized`.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::Unrecognized;
        };

        if object.get("streams").is_some_and(Value::is_object) {
            return serde_json::from_value(value)
                .map_or(Self::Unrecognized, Self::Nested);
        }

        if object.contains_key("source") || object.contains_key("sources") {
            return serde_json::from_value(value)
                .map_or(Self::Unrecognized, Self::Flat);
        }

        Self::Unrecognized
    }

    #[must_use]
    pub const fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized)
    }

    /// Flatten to `{url, quality}` pairs in payload order.
    #[must_use]
    pub fn candidates(&self) -> Vec<StreamCandidate> {
        match self {
            Self::Flat(flat) => flat.candidates(),
            Self::Nested(nested) => nested.candidates(),
            Self::Unrecognized => Vec::new(),
        }
    }

    /// Caption tracks; only the flat shape carries them.
    #[must_use]
    pub fn caption_tracks(&self) -> Vec<CaptionTrack> {
        match self {
            Self::Flat(flat) => flat.caption_tracks(),
            Self::Nested(_) | Self::Unrecognized => Vec::new(),
        }
    }
}

impl FlatSources {
    fn candidates(&self) -> Vec<StreamCandidate> {
        let mut out = Vec::with_capacity(self.sources.len() + 1);

        if let Some(url) = self.source.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
            out.push(StreamCandidate {
                url: url.to_string(),
                quality: self.quality.as_ref().map(RawQuality::as_label),
            });
        }

        out.extend(self.sources.iter().filter_map(candidate_from_item));
        out
    }

    fn caption_tracks(&self) -> Vec<CaptionTrack> {
        self.tracks
            .iter()
            .chain(self.subtitles.iter())
            .filter(|track| {
                !matches!(
                    track.get("kind").and_then(Value::as_str),
                    Some("thumbnails" | "chapters")
                )
            })
            .filter_map(|track| {
                Some(CaptionTrack {
                    url: first_string(track, &["file", "url"])?,
                    label: first_string(track, &["label"]),
                    language: first_string(track, &["lang", "language", "srclang"]),
                })
            })
            .collect()
    }
}

impl NestedStreams {
    fn candidates(&self) -> Vec<StreamCandidate> {
        self.streams
            .values()
            .filter_map(|entry| serde_json::from_value::<NestedEntry>(entry.clone()).ok())
            .flat_map(|entry| entry.streams.into_iter().chain(entry.quality_options))
            .filter_map(|item| candidate_from_item(&item))
            .collect()
    }
}

/// A list item is either a bare URL or an object with URL and quality fields.
fn candidate_from_item(item: &Value) -> Option<StreamCandidate> {
    match item {
        Value::String(url) if !url.trim().is_empty() => Some(StreamCandidate {
            url: url.trim().to_string(),
            quality: None,
        }),
        Value::Object(_) => Some(StreamCandidate {
            url: first_string(item, URL_KEYS)?,
            quality: first_quality(item, QUALITY_KEYS),
        }),
        _ => None,
    }
}
