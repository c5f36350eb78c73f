//! Disk-backed store: one JSON document per entry
//!
//! Entry files are named `<key>.json` under the store directory. Writes
//! land in a process-unique `.tmp` sibling first and are renamed into
//! place, so a concurrent reader never observes a partial document.
//! Anything unreadable or undecodable is treated as absent and deleted
//! best-effort.

use super::CacheStore;
use crate::entry::CacheEntry;
use crate::error::{MemoError, MemoResult};
use crate::key::CacheKey;
use crate::stats::StoreStats;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

#[cfg(test)]
mod tests;

/// Disk-backed cache store
#[derive(Debug, Clone)]
pub struct DiskStore {
    dir: PathBuf,
}

impl DiskStore {
    /// Open (or create) a store rooted at `dir`
    pub fn new(dir: impl Into<PathBuf>) -> MemoResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| {
            MemoError::storage(format!("failed to create cache dir {}: {e}", dir.display()))
        })?;
        Ok(Self { dir })
    }

    /// Directory entry files live in
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Read and decode one entry file
    ///
    /// Any failure means "entry absent": unreadable or corrupt files are
    /// deleted best-effort so they cannot fail every future lookup too.
    async fn load(&self, path: &Path) -> Option<CacheEntry> {
        let raw = match fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                debug!("unreadable cache entry {}: {e}", path.display());
                self.discard(path).await;
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("corrupt cache entry {}: {e}", path.display());
                self.discard(path).await;
                None
            }
        }
    }

    async fn discard(&self, path: &Path) {
        if let Err(e) = fs::remove_file(path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                debug!("failed to remove cache entry {}: {e}", path.display());
            }
        }
    }

    /// Walk the store directory, yielding every decodable entry.
    /// Corrupt files are cleaned up as they are encountered.
    async fn scan(&self) -> Vec<(PathBuf, CacheEntry)> {
        let mut entries = Vec::new();
        let mut dir = match fs::read_dir(&self.dir).await {
            Ok(dir) => dir,
            Err(e) => {
                debug!("cannot scan cache dir {}: {e}", self.dir.display());
                return entries;
            }
        };
        while let Ok(Some(item)) = dir.next_entry().await {
            let path = item.path();
            // Skip in-flight .tmp files and strays
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            if let Some(entry) = self.load(&path).await {
                entries.push((path, entry));
            }
        }
        entries
    }
}

#[async_trait]
impl CacheStore for DiskStore {
    async fn get(&self, key: &CacheKey) -> Option<CacheEntry> {
        let path = self.entry_path(key);
        let entry = self.load(&path).await?;
        if entry.is_expired() {
            debug!(key = %key, tool = %entry.tool_name, "purged expired cache entry");
            self.discard(&path).await;
            return None;
        }
        Some(entry)
    }

    async fn put(&self, entry: &CacheEntry) -> MemoResult<()> {
        let path = self.entry_path(&entry.key);
        let tmp = path.with_extension(format!("json.{}.tmp", std::process::id()));
        let body = serde_json::to_string(entry)?;

        fs::write(&tmp, body)
            .await
            .map_err(|e| MemoError::storage(format!("failed to write {}: {e}", tmp.display())))?;
        fs::rename(&tmp, &path)
            .await
            .map_err(|e| MemoError::storage(format!("failed to publish {}: {e}", path.display())))?;
        Ok(())
    }

    async fn remove(&self, key: &CacheKey) {
        self.discard(&self.entry_path(key)).await;
    }

    async fn invalidate_file(&self, path: &Path) -> usize {
        let mut removed = 0;
        for (file, entry) in self.scan().await {
            if entry.depends_on(path) {
                self.discard(&file).await;
                removed += 1;
            }
        }
        if removed > 0 {
            debug!(path = %path.display(), removed, "invalidated entries depending on path");
        }
        removed
    }

    async fn invalidate_tool(&self, tool_name: &str) -> usize {
        let mut removed = 0;
        for (file, entry) in self.scan().await {
            if entry.tool_name.eq_ignore_ascii_case(tool_name) {
                self.discard(&file).await;
                removed += 1;
            }
        }
        if removed > 0 {
            debug!(tool = tool_name, removed, "invalidated tool entries");
        }
        removed
    }

    async fn evict_expired(&self) -> usize {
        let mut removed = 0;
        for (file, entry) in self.scan().await {
            if entry.is_expired() {
                self.discard(&file).await;
                removed += 1;
            }
        }
        removed
    }

    async fn clear(&self) -> usize {
        let mut removed = 0;
        for (file, _) in self.scan().await {
            self.discard(&file).await;
            removed += 1;
        }
        removed
    }

    async fn stats(&self) -> StoreStats {
        let mut stats = StoreStats::default();
        for (file, entry) in self.scan().await {
            stats.total += 1;
            stats.size_bytes += fs::metadata(&file).await.map(|m| m.len()).unwrap_or(0);
            if entry.is_expired() {
                stats.expired += 1;
            } else {
                stats.active += 1;
                *stats.by_tool.entry(entry.tool_name).or_default() += 1;
            }
        }
        stats
    }
}
