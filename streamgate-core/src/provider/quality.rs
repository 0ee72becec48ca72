//! Quality labels and the per-provider quality policy

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use streamgate_media_providers::payload::whole_number;

/// Normalized quality of one candidate.
///
/// `value` is the vertical resolution when the upstream label is numeric;
/// non-numeric labels (`auto`, `unknown`) have none and rank last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quality {
    pub value: Option<u32>,
    pub label: String,
}

impl Quality {
    /// Parse `720`, `"720p"`, `"720P"`, `"720.0"`, `"4K"`; anything else keeps its text.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
            return Self {
                value: None,
                label: "unknown".to_string(),
            };
        };

        let lowered = raw.to_ascii_lowercase();
        let numeric = match lowered.as_str() {
            "4k" | "uhd" => Some(2160),
            other => {
                let digits = other.strip_suffix('p').unwrap_or(other);
                digits.parse::<u32>().ok().or_else(|| {
                    digits
                        .parse::<f64>()
                        .ok()
                        .and_then(whole_number)
                        .and_then(|v| u32::try_from(v).ok())
                })
            }
        };

        match numeric {
            Some(value) => Self {
                value: Some(value),
                label: format!("{value}p"),
            },
            None => Self {
                value: None,
                label: raw.to_string(),
            },
        }
    }
}

/// Which reported qualities an aggregator is trusted with.
///
/// The playlist aggregator tags many 720p streams as 1080, so its default
/// configuration excludes 1080.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityPolicy {
    #[serde(default)]
    pub excluded: Vec<u32>,
}

impl QualityPolicy {
    #[must_use]
    pub fn excluding(excluded: impl Into<Vec<u32>>) -> Self {
        Self {
            excluded: excluded.into(),
        }
    }

    #[must_use]
    pub fn allows(&self, quality: &Quality) -> bool {
        quality.value.is_none_or(|v| !self.excluded.contains(&v))
    }

    /// Filter by policy, drop repeated URLs (first wins), then order by
    /// quality descending. The sort is stable so equal qualities keep
    /// upstream order.
    #[must_use]
    pub fn rank(&self, candidates: Vec<(String, Quality)>) -> Vec<(String, Quality)> {
        let mut seen = HashSet::new();
        let mut ranked: Vec<_> = candidates
            .into_iter()
            .filter(|(_, quality)| self.allows(quality))
            .filter(|(url, _)| seen.insert(url.clone()))
            .collect();
        ranked.sort_by(|(_, a), (_, b)| b.value.cmp(&a.value));
        ranked
    }
}
