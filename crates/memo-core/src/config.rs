//! Cache configuration
//!
//! Layered loading: built-in defaults, then an optional TOML file, then
//! environment overrides. A config that fails to load degrades to the
//! defaults with a warning; configuration trouble must never break a
//! tool call.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// Environment variable naming the cache directory
pub const ENV_CACHE_DIR: &str = "MEMO_CACHE_DIR";
/// Environment variable disabling the cache entirely
pub const ENV_DISABLED: &str = "MEMO_CACHE_DISABLED";
/// Environment variable overriding the result size limit
pub const ENV_MAX_RESULT_BYTES: &str = "MEMO_MAX_RESULT_BYTES";

/// Configuration for the tool-result cache
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Master switch
    pub enabled: bool,
    /// Directory entry files live in
    pub cache_dir: PathBuf,
    /// Results above this many serialized bytes are never cached
    pub max_result_bytes: usize,
    /// Expected record calls per opportunistic expiry sweep
    pub sweep_rate: u32,
    /// Per-tool TTLs overriding the policy defaults ("45s", "10m")
    #[serde(with = "ttl_map")]
    pub ttl_overrides: HashMap<String, Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cache_dir: default_cache_dir(),
            max_result_bytes: 100 * 1024,
            sweep_rate: 16,
            ttl_overrides: HashMap::new(),
        }
    }
}

impl CacheConfig {
    /// Load configuration: defaults, then the TOML file (explicit path or
    /// the platform default location), then environment overrides
    pub fn load(config_file: Option<&Path>) -> Self {
        let path = config_file
            .map(Path::to_path_buf)
            .or_else(default_config_file);
        let mut config = match path {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => Self::default(),
        };
        config.apply_env();
        config
    }

    /// Parse a TOML config file, falling back to defaults on any failure
    pub fn from_file(path: &Path) -> Self {
        let parsed = std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|raw| toml::from_str(&raw).map_err(|e| e.to_string()));
        match parsed {
            Ok(config) => config,
            Err(e) => {
                warn!("ignoring unusable config {}: {e}", path.display());
                Self::default()
            }
        }
    }

    fn apply_env(&mut self) {
        if let Ok(dir) = std::env::var(ENV_CACHE_DIR) {
            if !dir.is_empty() {
                self.cache_dir = PathBuf::from(dir);
            }
        }
        if let Ok(flag) = std::env::var(ENV_DISABLED) {
            if matches!(flag.as_str(), "1" | "true" | "yes") {
                self.enabled = false;
            }
        }
        if let Ok(limit) = std::env::var(ENV_MAX_RESULT_BYTES) {
            match limit.parse() {
                Ok(bytes) => self.max_result_bytes = bytes,
                Err(_) => warn!("ignoring non-numeric {ENV_MAX_RESULT_BYTES}={limit}"),
            }
        }
    }

    /// TTL for a tool: the configured override, else the policy default
    pub fn effective_ttl(&self, tool_name: &str, policy_ttl: Duration) -> Duration {
        self.ttl_overrides
            .get(tool_name)
            .copied()
            .unwrap_or(policy_ttl)
    }
}

fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("memo")
        .join("tool-results")
}

fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("memo").join("config.toml"))
}

/// Humantime strings ("30s", "5m") for per-tool TTL values
mod ttl_map {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::HashMap;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(
        map: &HashMap<String, Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let rendered: HashMap<&str, String> = map
            .iter()
            .map(|(tool, ttl)| (tool.as_str(), humantime::format_duration(*ttl).to_string()))
            .collect();
        rendered.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<HashMap<String, Duration>, D::Error> {
        let raw = HashMap::<String, String>::deserialize(deserializer)?;
        raw.into_iter()
            .map(|(tool, ttl)| {
                humantime::parse_duration(&ttl)
                    .map(|ttl| (tool, ttl))
                    .map_err(serde::de::Error::custom)
            })
            .collect()
    }
}
