//! Cache key derivation
//!
//! A key is the deterministic identity of a `(tool, input)` pair: volatile
//! input fields are stripped, the remainder is canonicalized so map
//! ordering cannot leak into the digest, and the result is hashed with
//! SHA-256. Two semantically equal calls always collide; calls differing
//! in any cache-relevant field do not.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Input fields that never affect a tool's output (free-text descriptions
/// and execution-mode flags).
const VOLATILE_FIELDS: &[&str] = &["description", "sandbox", "run_in_background", "timeout"];

/// Rendered key length in hex chars (128 bits of the SHA-256 digest).
pub const KEY_LEN: usize = 32;

/// Deterministic identity of a tool call
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derive the key for a tool call
    ///
    /// Pure function: identical logical input yields an identical key
    /// regardless of process, platform, or map iteration order.
    pub fn build(tool_name: &str, tool_input: &serde_json::Value) -> Self {
        let canonical = normalize(tool_input);
        let payload = serde_json::to_string(&canonical).unwrap_or_default();

        let mut hasher = Sha256::new();
        hasher.update(tool_name.as_bytes());
        hasher.update([0u8]);
        hasher.update(payload.as_bytes());
        let digest = format!("{:x}", hasher.finalize());

        Self(digest[..KEY_LEN].to_string())
    }

    /// Reconstruct a key from its rendered form, e.g. an entry file name
    pub fn from_hex(hex: &str) -> Option<Self> {
        let valid = hex.len() == KEY_LEN && hex.bytes().all(|b| b.is_ascii_hexdigit());
        valid.then(|| Self(hex.to_string()))
    }

    /// The rendered key
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Strip volatile fields and canonicalize: the input identity a key is
/// derived from, and the form entries record for diagnostics.
pub fn normalize(tool_input: &serde_json::Value) -> serde_json::Value {
    canonicalize(&strip_volatile(tool_input))
}

/// Remove top-level fields that do not affect the result
fn strip_volatile(value: &serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(map) => serde_json::Value::Object(
            map.iter()
                .filter(|(k, _)| !VOLATILE_FIELDS.contains(&k.as_str()))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Canonicalize JSON for consistent hashing
fn canonicalize(value: &serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(map) => {
            // Sort keys for consistent ordering
            let mut sorted: Vec<_> = map.iter().collect();
            sorted.sort_by_key(|(k, _)| *k);

            let canonical: serde_json::Map<String, serde_json::Value> = sorted
                .into_iter()
                .map(|(k, v)| (k.clone(), canonicalize(v)))
                .collect();

            serde_json::Value::Object(canonical)
        }
        serde_json::Value::Array(arr) => {
            serde_json::Value::Array(arr.iter().map(canonicalize).collect())
        }
        other => other.clone(),
    }
}
