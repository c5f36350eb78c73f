//! Persisted cache store
//!
//! Every invocation of the cache is a fresh short-lived process, so all
//! shared state lives behind this interface. Reads never surface expired
//! or corrupt data; per-entry failures degrade to "entry absent" rather
//! than propagating.

mod disk;

pub use disk::DiskStore;

use crate::entry::CacheEntry;
use crate::error::MemoResult;
use crate::key::CacheKey;
use crate::stats::StoreStats;
use async_trait::async_trait;
use std::path::Path;

/// Storage interface for cache entries
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Return the live entry for a key; an expired entry is purged first
    /// and reported as a miss
    async fn get(&self, key: &CacheKey) -> Option<CacheEntry>;

    /// Persist an entry, replacing any previous entry for the same key
    async fn put(&self, entry: &CacheEntry) -> MemoResult<()>;

    /// Remove one entry
    async fn remove(&self, key: &CacheKey);

    /// Remove every entry depending on the given path; returns the count
    async fn invalidate_file(&self, path: &Path) -> usize;

    /// Remove every entry produced by the given tool; returns the count
    async fn invalidate_tool(&self, tool_name: &str) -> usize;

    /// Sweep entries past their TTL; returns the count removed
    async fn evict_expired(&self) -> usize;

    /// Remove all entries; returns the count removed
    async fn clear(&self) -> usize;

    /// Diagnostic snapshot
    async fn stats(&self) -> StoreStats;
}
