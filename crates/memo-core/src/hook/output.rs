//! Hook response payload

use crate::engine::CacheHit;
use serde::{Deserialize, Serialize};

/// Characters of the cached result shown in the human-readable reason
const PREVIEW_LEN: usize = 120;

/// Verdict of a pre-call check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheDecision {
    /// A fresh cached result exists; the runtime may skip execution
    Skip,
}

/// Response to a pre-call check
///
/// A miss serializes to `{}`; the runtime treats anything without a
/// decision as "proceed normally", so an empty object is the safe shape
/// for every degraded path too.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CheckOutput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision: Option<CacheDecision>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached_result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_secs: Option<u64>,
}

impl CheckOutput {
    /// Empty response: proceed with normal execution
    pub fn miss() -> Self {
        Self::default()
    }

    /// Response for a cache hit
    pub fn hit(hit: &CacheHit) -> Self {
        let age_secs = hit.age.as_secs();
        Self {
            decision: Some(CacheDecision::Skip),
            reason: Some(format!(
                "cached {age_secs}s ago: {}",
                preview(&hit.result)
            )),
            cached_result: Some(hit.result.clone()),
            age_secs: Some(age_secs),
        }
    }

    /// Whether this response lets execution proceed
    pub fn is_miss(&self) -> bool {
        self.decision.is_none()
    }
}

/// Single-line preview of a cached result
fn preview(result: &str) -> String {
    let mut out = String::with_capacity(PREVIEW_LEN + 3);
    for c in result.trim().chars().take(PREVIEW_LEN) {
        out.push(if c.is_control() { ' ' } else { c });
    }
    if result.trim().chars().count() > PREVIEW_LEN {
        out.push_str("...");
    }
    out
}
