//! Tests for the disk store

use crate::entry::CacheEntry;
use crate::key::CacheKey;
use crate::store::{CacheStore, DiskStore};
use serde_json::json;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

fn open_store() -> (TempDir, DiskStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = DiskStore::new(dir.path()).unwrap();
    (dir, store)
}

fn entry(
    tool: &str,
    input: serde_json::Value,
    result: &str,
    ttl: Duration,
    paths: &[&str],
) -> CacheEntry {
    let key = CacheKey::build(tool, &input);
    let file_paths: BTreeSet<PathBuf> = paths.iter().map(PathBuf::from).collect();
    CacheEntry::new(key, tool, input, result.to_string(), ttl, file_paths)
}

fn read_entry(input: serde_json::Value, result: &str, paths: &[&str]) -> CacheEntry {
    entry("Read", input, result, Duration::from_secs(60), paths)
}

#[tokio::test]
async fn test_put_get_round_trip() {
    let (_dir, store) = open_store();
    let entry = read_entry(json!({"file_path": "/a.txt"}), "hello", &["/a.txt"]);

    store.put(&entry).await.unwrap();

    let loaded = store.get(&entry.key).await.unwrap();
    assert_eq!(loaded.result, "hello");
    assert_eq!(loaded.tool_name, "Read");
    assert_eq!(loaded, entry);
}

#[tokio::test]
async fn test_get_unknown_key_misses() {
    let (_dir, store) = open_store();
    let key = CacheKey::build("Read", &json!({"file_path": "/nope"}));
    assert!(store.get(&key).await.is_none());
}

#[tokio::test]
async fn test_put_overwrites_same_key() {
    let (_dir, store) = open_store();
    let first = read_entry(json!({"file_path": "/a.txt"}), "old", &["/a.txt"]);
    let second = read_entry(json!({"file_path": "/a.txt"}), "new", &["/a.txt"]);
    assert_eq!(first.key, second.key);

    store.put(&first).await.unwrap();
    store.put(&second).await.unwrap();

    assert_eq!(store.get(&first.key).await.unwrap().result, "new");
    assert_eq!(store.stats().await.total, 1);
}

#[tokio::test]
async fn test_expired_entry_purged_on_get() {
    let (_dir, store) = open_store();
    let entry = entry(
        "Read",
        json!({"file_path": "/a.txt"}),
        "hello",
        Duration::from_millis(20),
        &["/a.txt"],
    );
    store.put(&entry).await.unwrap();

    tokio::time::sleep(Duration::from_millis(60)).await;

    // No sweep ran, yet the expired entry must not surface
    assert!(store.get(&entry.key).await.is_none());
    // And the lazy purge removed the file
    assert_eq!(store.stats().await.total, 0);
}

#[tokio::test]
async fn test_remove() {
    let (_dir, store) = open_store();
    let entry = read_entry(json!({"file_path": "/a.txt"}), "hello", &["/a.txt"]);
    store.put(&entry).await.unwrap();

    store.remove(&entry.key).await;
    assert!(store.get(&entry.key).await.is_none());
}

#[tokio::test]
async fn test_invalidate_file_is_selective() {
    let (_dir, store) = open_store();
    let a = read_entry(json!({"file_path": "/a.txt"}), "a", &["/a.txt"]);
    let b = read_entry(json!({"file_path": "/b.txt"}), "b", &["/b.txt"]);
    store.put(&a).await.unwrap();
    store.put(&b).await.unwrap();

    let removed = store.invalidate_file(Path::new("/a.txt")).await;

    assert_eq!(removed, 1);
    assert!(store.get(&a.key).await.is_none());
    assert!(store.get(&b.key).await.is_some());
}

#[tokio::test]
async fn test_invalidate_file_matches_dependency_sets() {
    let (_dir, store) = open_store();
    let grep = entry(
        "Grep",
        json!({"pattern": "fn", "path": "/src"}),
        "/src/a.rs:1:fn main",
        Duration::from_secs(60),
        &["/src/a.rs", "/src/b.rs"],
    );
    store.put(&grep).await.unwrap();

    assert_eq!(store.invalidate_file(Path::new("/src/b.rs")).await, 1);
    assert!(store.get(&grep.key).await.is_none());
}

#[tokio::test]
async fn test_invalidate_tool() {
    let (_dir, store) = open_store();
    store
        .put(&read_entry(json!({"file_path": "/a"}), "a", &["/a"]))
        .await
        .unwrap();
    store
        .put(&read_entry(json!({"file_path": "/b"}), "b", &["/b"]))
        .await
        .unwrap();
    store
        .put(&entry(
            "Glob",
            json!({"pattern": "*"}),
            "/a\n/b",
            Duration::from_secs(60),
            &[],
        ))
        .await
        .unwrap();

    let removed = store.invalidate_tool("Read").await;

    assert_eq!(removed, 2);
    let stats = store.stats().await;
    assert_eq!(stats.total, 1);
    assert_eq!(stats.by_tool.get("Glob"), Some(&1));
}

#[tokio::test]
async fn test_evict_expired() {
    let (_dir, store) = open_store();
    store
        .put(&entry(
            "Read",
            json!({"file_path": "/old"}),
            "old",
            Duration::from_millis(20),
            &["/old"],
        ))
        .await
        .unwrap();
    store
        .put(&read_entry(json!({"file_path": "/new"}), "new", &["/new"]))
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(60)).await;

    assert_eq!(store.evict_expired().await, 1);
    let stats = store.stats().await;
    assert_eq!(stats.total, 1);
    assert_eq!(stats.active, 1);
}

#[tokio::test]
async fn test_clear() {
    let (_dir, store) = open_store();
    for path in ["/a", "/b", "/c"] {
        store
            .put(&read_entry(json!({"file_path": path}), "x", &[path]))
            .await
            .unwrap();
    }

    assert_eq!(store.clear().await, 3);
    assert_eq!(store.stats().await.total, 0);
}

#[tokio::test]
async fn test_corrupt_entry_is_a_miss_and_repaired() {
    let (_dir, store) = open_store();
    let key = CacheKey::build("Read", &json!({"file_path": "/a.txt"}));
    let path = store.dir().join(format!("{key}.json"));
    std::fs::write(&path, "not json {{{").unwrap();

    assert!(store.get(&key).await.is_none());
    // The offending file was deleted so it cannot keep failing
    assert!(!path.exists());
}

#[tokio::test]
async fn test_scan_ignores_stray_files() {
    let (_dir, store) = open_store();
    std::fs::write(store.dir().join("leftover.json.1234.tmp"), "partial").unwrap();
    std::fs::write(store.dir().join("README"), "not an entry").unwrap();
    store
        .put(&read_entry(json!({"file_path": "/a"}), "a", &["/a"]))
        .await
        .unwrap();

    let stats = store.stats().await;
    assert_eq!(stats.total, 1);
    // Strays are left alone, only entry files are managed
    assert!(store.dir().join("README").exists());
}

#[tokio::test]
async fn test_stats_snapshot() {
    let (_dir, store) = open_store();
    store
        .put(&read_entry(json!({"file_path": "/a"}), "aaaa", &["/a"]))
        .await
        .unwrap();
    store
        .put(&read_entry(json!({"file_path": "/b"}), "bbbb", &["/b"]))
        .await
        .unwrap();
    store
        .put(&entry(
            "Grep",
            json!({"pattern": "x"}),
            "match",
            Duration::from_secs(60),
            &[],
        ))
        .await
        .unwrap();

    let stats = store.stats().await;
    assert_eq!(stats.total, 3);
    assert_eq!(stats.active, 3);
    assert_eq!(stats.expired, 0);
    assert_eq!(stats.by_tool.get("Read"), Some(&2));
    assert_eq!(stats.by_tool.get("Grep"), Some(&1));
    assert!(stats.size_bytes > 0);
}
