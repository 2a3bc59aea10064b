/// Configuration for the sync layer.
/// Reads sync.json from ~/.config/wishlist/sync.json (or platform equivalent).

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_ENDPOINT: &str = "https://kvdb.io";
pub const DEFAULT_BUCKET_ID: &str = "4JqnYPuEYxqTZGWRyFbWou";

/// How a snapshot is laid out in the remote bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// One key holding the whole snapshot.
    #[default]
    Monolithic,
    /// Roster, list index and one key per list.
    Sharded,
}

impl Encoding {
    pub fn from_sharded(sharded: bool) -> Self {
        if sharded {
            Encoding::Sharded
        } else {
            Encoding::Monolithic
        }
    }

    pub fn is_sharded(self) -> bool {
        self == Encoding::Sharded
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_bucket_id")]
    pub default_bucket_id: String,
    #[serde(default)]
    pub sharded: bool,
    /// Directory for the local cache. Defaults to the platform data dir.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_bucket_id() -> String {
    DEFAULT_BUCKET_ID.to_string()
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            default_bucket_id: default_bucket_id(),
            sharded: false,
            cache_dir: None,
        }
    }
}

impl SyncConfig {
    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(default_cache_dir)
    }

    /// The per-process context handed to the orchestrator.
    pub fn context(&self) -> SyncContext {
        SyncContext {
            endpoint: self.endpoint.trim_end_matches('/').to_string(),
            default_bucket_id: self.default_bucket_id.clone(),
            encoding: Encoding::from_sharded(self.sharded),
        }
    }
}

/// Settings fixed for the lifetime of one orchestrator.
///
/// The active bucket and the encoding chosen at runtime live in the local
/// cache; these are the fallbacks used when the cache has no preference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncContext {
    pub endpoint: String,
    pub default_bucket_id: String,
    pub encoding: Encoding,
}

impl Default for SyncContext {
    fn default() -> Self {
        SyncConfig::default().context()
    }
}

/// Default config path: ~/.config/wishlist/sync.json
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wishlist")
        .join("sync.json")
}

/// Default cache dir: ~/.local/share/wishlist/cache
pub fn default_cache_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wishlist")
        .join("cache")
}

/// Load config from path. Returns default if file doesn't exist.
pub fn load_config(path: &Path) -> SyncConfig {
    match fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
            log::warn!("[wishlist.config] Failed to parse config {}: {}", path.display(), e);
            SyncConfig::default()
        }),
        Err(_) => {
            log::info!("[wishlist.config] No config at {}, using defaults", path.display());
            SyncConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = load_config(Path::new("/nonexistent/wishlist/sync.json"));
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.default_bucket_id, DEFAULT_BUCKET_ID);
        assert!(!config.sharded);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let mut tmp = NamedTempFile::new().unwrap();
        write!(tmp, r#"{{"sharded": true, "endpoint": "http://localhost:9000/"}}"#).unwrap();

        let config = load_config(tmp.path());
        assert!(config.sharded);
        assert_eq!(config.default_bucket_id, DEFAULT_BUCKET_ID);

        let ctx = config.context();
        assert_eq!(ctx.endpoint, "http://localhost:9000");
        assert_eq!(ctx.encoding, Encoding::Sharded);
    }

    #[test]
    fn test_malformed_file_gives_defaults() {
        let mut tmp = NamedTempFile::new().unwrap();
        write!(tmp, "sharded = true").unwrap();

        let config = load_config(tmp.path());
        assert!(!config.sharded);
    }

    #[test]
    fn test_cache_dir_override() {
        let config = SyncConfig {
            cache_dir: Some(PathBuf::from("/tmp/wl")),
            ..SyncConfig::default()
        };
        assert_eq!(config.cache_dir(), PathBuf::from("/tmp/wl"));
    }
}
