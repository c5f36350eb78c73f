//! Store diagnostics

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Snapshot of the persisted store
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StoreStats {
    /// Entry files on disk, live or expired
    pub total: usize,
    /// Entries past their TTL
    pub expired: usize,
    /// Live entries
    pub active: usize,
    /// Live entries per tool
    pub by_tool: BTreeMap<String, usize>,
    /// Bytes of entry files on disk
    pub size_bytes: u64,
}

impl StoreStats {
    /// Format stats as a one-line summary
    pub fn summary(&self) -> String {
        format!(
            "{} active, {} expired, {} bytes on disk",
            self.active, self.expired, self.size_bytes
        )
    }
}
