//! Cache engine
//!
//! Orchestrates the two halves of a tool call: a lookup before execution
//! and a store-or-invalidate pass after it. Within one pass invalidation
//! always runs before any store, so a mutating call can never leave
//! behind entries it has just made stale.
//!
//! The engine never raises to its caller; every internal failure degrades
//! to "proceed without caching". The worst case is a redundant tool
//! execution, never a stale answer.

use crate::config::CacheConfig;
use crate::entry::CacheEntry;
use crate::error::MemoResult;
use crate::key::{self, CacheKey};
use crate::policy::{InvalidationScope, ToolPolicy};
use crate::store::{CacheStore, DiskStore};
use chrono::Utc;
use serde_json::Value;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};


/// Input fields that name the filesystem path a tool touches
const PATH_FIELDS: &[&str] = &["file_path", "path", "notebook_path"];

/// Upper bound on dependency paths recorded per entry
const MAX_TRACKED_PATHS: usize = 256;

/// A successful cache lookup
#[derive(Debug, Clone)]
pub struct CacheHit {
    /// The stored result, exactly as originally recorded
    pub result: String,
    /// Age of the entry at lookup time
    pub age: Duration,
}

/// Orchestrates lookups and stores around tool execution
pub struct CacheEngine<S = DiskStore> {
    store: S,
    config: CacheConfig,
}

impl CacheEngine<DiskStore> {
    /// Open an engine over the configured disk store
    pub fn open(config: CacheConfig) -> MemoResult<Self> {
        let store = DiskStore::new(&config.cache_dir)?;
        Ok(Self::with_store(store, config))
    }
}

impl<S: CacheStore> CacheEngine<S> {
    /// Create an engine over an existing store
    pub fn with_store(store: S, config: CacheConfig) -> Self {
        Self { store, config }
    }

    /// Look up a fresh cached result for an identical call
    pub async fn check(&self, tool_name: &str, tool_input: &Value) -> Option<CacheHit> {
        if !self.config.enabled {
            return None;
        }
        if !ToolPolicy::for_tool(tool_name).cacheable {
            return None;
        }

        let key = CacheKey::build(tool_name, tool_input);
        let entry = self.store.get(&key).await?;
        let age = entry.age();
        debug!(tool = tool_name, key = %key, age = ?age, "cache hit");
        Some(CacheHit {
            result: entry.result,
            age,
        })
    }

    /// Record the outcome of an executed call: store the fresh result for
    /// a cacheable tool, or drop the entries a mutating tool made stale
    pub async fn record(
        &self,
        tool_name: &str,
        tool_input: &Value,
        tool_result: &Value,
        is_error: bool,
        cwd: Option<&Path>,
    ) {
        if !self.config.enabled {
            return;
        }

        let result = render_result(tool_result);
        if is_error || result.trim().is_empty() {
            debug!(tool = tool_name, is_error, "nothing to record");
            return;
        }

        let policy = ToolPolicy::for_tool(tool_name);

        // Invalidation strictly precedes any store in the same pass
        if !policy.invalidates.is_empty() {
            self.cascade_invalidation(tool_name, &policy, tool_input, cwd)
                .await;
        }

        if policy.cacheable {
            if result.len() > self.config.max_result_bytes {
                debug!(
                    tool = tool_name,
                    bytes = result.len(),
                    "result too large to cache"
                );
            } else {
                self.persist(tool_name, tool_input, result, &policy, cwd).await;
            }
        }

        self.maybe_sweep().await;
    }

    async fn cascade_invalidation(
        &self,
        tool_name: &str,
        policy: &ToolPolicy,
        tool_input: &Value,
        cwd: Option<&Path>,
    ) {
        let mut removed = 0;

        // The mutated path comes from the tool's own input; everything
        // depending on it goes, whatever tool produced it.
        if let Some(path) = input_path(tool_input, cwd) {
            removed += self.store.invalidate_file(&path).await;
        }

        // Global-scope targets are dropped wholesale: a listing or search
        // result is stale after any mutation in the tree.
        for target in policy.invalidates {
            if ToolPolicy::for_tool(target).scope == InvalidationScope::Global {
                removed += self.store.invalidate_tool(target).await;
            }
        }

        if removed > 0 {
            debug!(tool = tool_name, removed, "dropped stale entries after mutation");
        }
    }

    async fn persist(
        &self,
        tool_name: &str,
        tool_input: &Value,
        result: String,
        policy: &ToolPolicy,
        cwd: Option<&Path>,
    ) {
        let ttl = self.config.effective_ttl(tool_name, policy.ttl);
        let mut file_paths = dependency_paths(tool_name, tool_input, cwd);
        // Search results depend on the files they matched, not just the
        // search root named in the input.
        if matches!(tool_name, "Glob" | "Grep") {
            file_paths.extend(result_paths(tool_name, &result));
        }
        let entry = CacheEntry::new(
            CacheKey::build(tool_name, tool_input),
            tool_name,
            key::normalize(tool_input),
            result,
            ttl,
            file_paths,
        );

        match self.store.put(&entry).await {
            Ok(()) => debug!(tool = tool_name, key = %entry.key, ttl = ?ttl, "cached tool result"),
            Err(e) => warn!(tool = tool_name, "failed to persist cache entry: {e}"),
        }
    }

    /// Opportunistic expiry sweep, sampled from the wall clock rather than
    /// a timer: roughly one sweep per `sweep_rate` record calls.
    async fn maybe_sweep(&self) {
        let rate = self.config.sweep_rate.max(1);
        if Utc::now().timestamp_subsec_nanos() % rate == 0 {
            let removed = self.store.evict_expired().await;
            if removed > 0 {
                debug!(removed, "expiry sweep");
            }
        }
    }
}

/// Serialize a tool result into the opaque cached payload
fn render_result(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// The filesystem path named by a tool's input, if any
fn input_path(tool_input: &Value, cwd: Option<&Path>) -> Option<PathBuf> {
    let map = tool_input.as_object()?;
    for field in PATH_FIELDS {
        if let Some(raw) = map.get(*field).and_then(Value::as_str) {
            if !raw.is_empty() {
                return Some(anchor(Path::new(raw), cwd));
            }
        }
    }
    None
}

/// Resolve a possibly-relative path against the request's working directory
fn anchor(path: &Path, cwd: Option<&Path>) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        match cwd {
            Some(cwd) => cwd.join(path),
            None => path.to_path_buf(),
        }
    }
}

/// Paths a cached result depends on, taken from the input
fn dependency_paths(tool_name: &str, tool_input: &Value, cwd: Option<&Path>) -> BTreeSet<PathBuf> {
    let mut paths = BTreeSet::new();
    // Web results have no file dependency at all
    if matches!(tool_name, "WebFetch" | "WebSearch") {
        return paths;
    }
    if let Some(path) = input_path(tool_input, cwd) {
        paths.insert(path);
    }
    paths
}

/// Paths parsed out of a search tool's output
///
/// Glob prints one path per line; grep matches lead with `path:`. Only
/// absolute paths are recorded; anything else is match content or
/// decoration, and guessing at it would poison the dependency set.
fn result_paths(tool_name: &str, result: &str) -> BTreeSet<PathBuf> {
    let mut paths = BTreeSet::new();
    for line in result.lines() {
        if paths.len() >= MAX_TRACKED_PATHS {
            break;
        }
        let candidate = match tool_name {
            "Grep" => line.split(':').next().unwrap_or(""),
            _ => line,
        }
        .trim();
        let candidate = Path::new(candidate);
        if candidate.is_absolute() {
            paths.insert(candidate.to_path_buf());
        }
    }
    paths
}
