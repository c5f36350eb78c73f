//! Store maintenance commands

use anyhow::{Context, Result};
use memo_core::{CacheConfig, CacheStore, DiskStore};

/// Print a diagnostic snapshot of the persisted store
pub async fn stats(config: CacheConfig) -> Result<()> {
    let store = open(&config)?;
    let stats = store.stats().await;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    tracing::info!("{}", stats.summary());
    Ok(())
}

/// Run one expiry sweep
pub async fn evict(config: CacheConfig) -> Result<()> {
    let store = open(&config)?;
    let removed = store.evict_expired().await;
    println!("evicted {removed} expired entries");
    Ok(())
}

/// Drop every entry
pub async fn clear(config: CacheConfig) -> Result<()> {
    let store = open(&config)?;
    let removed = store.clear().await;
    println!("removed {removed} entries");
    Ok(())
}

fn open(config: &CacheConfig) -> Result<DiskStore> {
    DiskStore::new(&config.cache_dir).with_context(|| {
        format!("cannot open cache store at {}", config.cache_dir.display())
    })
}
