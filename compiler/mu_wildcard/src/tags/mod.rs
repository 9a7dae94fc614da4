//! Tag frequency metadata from safetensors-style model headers.
//!
//! Layout: an 8-byte little-endian length `N`, then `N` bytes of JSON. The
//! `__metadata__` object may carry `ss_tag_frequency`, shaped
//! `{bucket: {tag: count}}`, either inline or as a JSON-encoded string.

mod expand;

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::source::is_contained_name;
use crate::TagError;

pub use expand::{expand_tags, select_tags, TagExpander, TagMode, TagRequest, DEFAULT_TAG_COUNT};

/// Headers longer than this are rejected.
pub const MAX_HEADER_LEN: u64 = 100 * 1024 * 1024;

/// File extension appended to model names that have none.
pub const MODEL_EXTENSION: &str = "safetensors";

const TAG_FREQUENCY_KEY: &str = "ss_tag_frequency";

/// A tag with its count summed over all buckets.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TagRecord {
    pub name: String,
    pub count: u64,
}

#[derive(Deserialize)]
struct Header {
    #[serde(rename = "__metadata__", default)]
    metadata: Map<String, Value>,
}

/// Read the `__metadata__` object of a model header.
pub fn read_header(path: &Path) -> Result<Map<String, Value>, TagError> {
    let unreadable = |source| TagError::Unreadable {
        path: path.to_path_buf(),
        source,
    };
    let malformed = |reason: String| TagError::MalformedHeader {
        path: path.to_path_buf(),
        reason,
    };

    let mut file = File::open(path).map_err(unreadable)?;
    let mut len_bytes = [0u8; 8];
    file.read_exact(&mut len_bytes)
        .map_err(|err| malformed(format!("missing length prefix: {err}")))?;
    let len = u64::from_le_bytes(len_bytes);
    if len > MAX_HEADER_LEN {
        return Err(malformed(format!(
            "header length {len} exceeds {MAX_HEADER_LEN} bytes"
        )));
    }

    let mut json = Vec::new();
    file.take(len).read_to_end(&mut json).map_err(unreadable)?;
    if json.len() as u64 != len {
        return Err(malformed(format!(
            "header truncated: expected {len} bytes, found {}",
            json.len()
        )));
    }

    let header: Header =
        serde_json::from_slice(&json).map_err(|err| malformed(err.to_string()))?;
    tracing::trace!(path = %path.display(), keys = header.metadata.len(), "read model header");
    Ok(header.metadata)
}

/// Ranked tags of the model at `path`.
#[tracing::instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub fn extract_tags(path: &Path) -> Result<Vec<TagRecord>, TagError> {
    let metadata = read_header(path)?;
    let tags = tag_frequencies(&metadata, path)?;
    tracing::debug!(tags = tags.len(), "extracted tags");
    Ok(tags)
}

/// Aggregate `ss_tag_frequency` from a metadata object.
///
/// Names are trimmed with `_` read as a space. Counts are summed over
/// buckets and records sorted by descending count; ties keep the order in
/// which names were first seen.
pub fn tag_frequencies(
    metadata: &Map<String, Value>,
    path: &Path,
) -> Result<Vec<TagRecord>, TagError> {
    let no_metadata = || TagError::NoTagMetadata {
        path: path.to_path_buf(),
    };
    let decoded;
    let buckets = match metadata.get(TAG_FREQUENCY_KEY) {
        Some(Value::Object(buckets)) => buckets,
        Some(Value::String(encoded)) => {
            decoded = serde_json::from_str::<Map<String, Value>>(encoded).map_err(|err| {
                TagError::MalformedHeader {
                    path: path.to_path_buf(),
                    reason: format!("`{TAG_FREQUENCY_KEY}` is not a JSON object: {err}"),
                }
            })?;
            &decoded
        }
        _ => return Err(no_metadata()),
    };

    let mut records: Vec<TagRecord> = Vec::new();
    let mut index: FxHashMap<String, usize> = FxHashMap::default();
    for (bucket, tags) in buckets {
        let Value::Object(tags) = tags else {
            tracing::trace!(bucket, "skipping non-object bucket");
            continue;
        };
        for (raw, count) in tags {
            let Some(count) = parse_count(count) else {
                tracing::trace!(bucket, tag = raw, "skipping non-numeric count");
                continue;
            };
            let name = normalize_tag(raw);
            if name.is_empty() {
                continue;
            }
            match index.get(&name) {
                Some(&i) => records[i].count = records[i].count.saturating_add(count),
                None => {
                    index.insert(name.clone(), records.len());
                    records.push(TagRecord { name, count });
                }
            }
        }
    }

    records.sort_by(|a, b| b.count.cmp(&a.count));
    Ok(records)
}

/// `_` becomes a space; surrounding whitespace is dropped.
pub fn normalize_tag(raw: &str) -> String {
    raw.replace('_', " ").trim().to_string()
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "counts are checked non-negative and finite before truncation"
)]
fn parse_count(value: &Value) -> Option<u64> {
    let float = match value {
        Value::Number(number) => {
            if let Some(count) = number.as_u64() {
                return Some(count);
            }
            number.as_f64()?
        }
        Value::String(text) => {
            let text = text.trim();
            if let Ok(count) = text.parse::<u64>() {
                return Some(count);
            }
            text.parse::<f64>().ok()?
        }
        _ => return None,
    };
    (float.is_finite() && float >= 0.0).then_some(float as u64)
}

/// Path of the model called `name` under `dir`. Names must stay below `dir`.
pub fn model_path(dir: &Path, name: &str) -> Result<PathBuf, TagError> {
    if !is_contained_name(name) {
        return Err(TagError::InvalidModelName {
            name: name.to_string(),
        });
    }
    let path = dir.join(name);
    if path.extension().is_some() {
        Ok(path)
    } else {
        Ok(path.with_extension(MODEL_EXTENSION))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
