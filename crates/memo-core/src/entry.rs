//! Cache entry representation
//!
//! An entry is immutable after creation: it is either live (younger than
//! its TTL) or expired, and expired entries are logically absent.

use crate::key::CacheKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// One cached tool result
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheEntry {
    /// Primary identity
    pub key: CacheKey,
    /// Tool that produced the result
    pub tool_name: String,
    /// Normalized input, kept for diagnostics and invalidation matching
    pub tool_input: serde_json::Value,
    /// Serialized tool output
    pub result: String,
    /// When the entry was created
    pub created_at: DateTime<Utc>,
    /// Time-to-live
    #[serde(with = "humantime_serde")]
    pub ttl: Duration,
    /// Filesystem paths this result depends on
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub file_paths: BTreeSet<PathBuf>,
}

impl CacheEntry {
    /// Create a new entry, stamped with the current time
    pub fn new(
        key: CacheKey,
        tool_name: impl Into<String>,
        tool_input: serde_json::Value,
        result: String,
        ttl: Duration,
        file_paths: BTreeSet<PathBuf>,
    ) -> Self {
        Self {
            key,
            tool_name: tool_name.into(),
            tool_input,
            result,
            created_at: Utc::now(),
            ttl,
            file_paths,
        }
    }

    /// Age of the entry
    pub fn age(&self) -> Duration {
        (Utc::now() - self.created_at).to_std().unwrap_or(Duration::ZERO)
    }

    /// Whether the entry has outlived its TTL
    pub fn is_expired(&self) -> bool {
        self.age() >= self.ttl
    }

    /// Whether the entry depends on the given path
    pub fn depends_on(&self, path: &Path) -> bool {
        self.file_paths.contains(path)
    }
}
