//! Tolerant recovery of the JSON payload from raw model text.
//!
//! Models like to wrap their JSON in prose or code fences. We take the greedy
//! region from the first `{` to the last `}` and parse it; if that fails we try
//! the whole text. Anything else is an extraction failure.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractionFailure {
  #[error("model returned empty text")]
  Empty,
  #[error("no parseable JSON object in model text")]
  NoJsonObject,
}

/// Pull the first well-formed JSON object out of `raw`.
pub fn extract(raw: &str) -> Result<Value, ExtractionFailure> {
  if raw.trim().is_empty() {
    return Err(ExtractionFailure::Empty);
  }

  if let Some(region) = braced_region(raw) {
    if let Ok(v) = serde_json::from_str::<Value>(region) {
      return Ok(v);
    }
  }

  // Whole-text attempt only counts when it is an object.
  match serde_json::from_str::<Value>(raw.trim()) {
    Ok(v) if v.is_object() => Ok(v),
    _ => Err(ExtractionFailure::NoJsonObject),
  }
}

/// First `{` through last `}`, inclusive.
fn braced_region(s: &str) -> Option<&str> {
  let start = s.find('{')?;
  let end = s.rfind('}')?;
  if end <= start {
    return None;
  }
  Some(&s[start..=end])
}
