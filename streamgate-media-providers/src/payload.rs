//! Lenient decoding helpers for aggregator payloads
//!
//! Aggregators change field types without notice, so every field goes through
//! `serde_json::Value` first and a mismatch degrades to `None` instead of
//! failing the whole payload.

use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::Value;

/// Quality as reported upstream: `720`, `"720"`, `"720p"`, `"auto"`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawQuality {
    Number(serde_json::Number),
    Text(String),
}

impl RawQuality {
    /// Upstream label as text, numbers rendered without decoration.
    /// Whole floats (`1080.0`) render as integers.
    #[must_use]
    pub fn as_label(&self) -> String {
        match self {
            Self::Number(n) => n
                .as_u64()
                .or_else(|| n.as_f64().and_then(whole_number))
                .map_or_else(|| n.to_string(), |v| v.to_string()),
            Self::Text(s) => s.trim().to_string(),
        }
    }
}

/// `Some(n)` when `value` is a non-negative whole number that fits in `u64`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn whole_number(value: f64) -> Option<u64> {
    let fits = value >= 0.0 && value.fract() == 0.0 && value <= u64::MAX as f64;
    fits.then(|| value as u64)
}

/// Deserialize a field, mapping any type mismatch to `None`.
pub fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Deserialize a list field, mapping a non-array to an empty list.
pub fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(items),
        _ => Ok(Vec::new()),
    }
}

/// First non-empty string among `keys` of a JSON object.
pub(crate) fn first_string(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| value.get(*key))
        .find_map(|v| match v {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            _ => None,
        })
}

/// First quality-like value among `keys` of a JSON object.
pub(crate) fn first_quality(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| value.get(*key))
        .find_map(|v| serde_json::from_value::<RawQuality>(v.clone()).ok())
        .map(|q| q.as_label())
        .filter(|label| !label.is_empty())
}
