pub mod local;
pub mod memory;

use crate::types::AppData;

/// Entry holding the last resolved snapshot.
pub const KEY_DATA: &str = "north_pole_data_cache";
/// Entry holding the active bucket id.
pub const KEY_BUCKET: &str = "north_pole_bucket_id_v2";
/// Entry holding the sharded-encoding flag (`"true"` / `"false"`).
pub const KEY_SHARDED: &str = "north_pole_use_sharded";

/// Abstract string key-value store for device-local state.
/// Implementations: FileCache (one file per key), MemoryCache (tests, ephemeral sessions).
pub trait LocalCache: Send + Sync {
    /// Read an entry. `Ok(None)` when the key was never written or was removed.
    fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    fn set(&self, key: &str, value: &str) -> Result<(), CacheError>;

    /// Remove an entry. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), CacheError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Invalid cache key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot (de)serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Typed, failure-tolerant view over a `LocalCache`.
///
/// The cache is advisory: every read failure degrades to "nothing cached"
/// and every write failure is logged and dropped.
pub struct CacheView<'a> {
    cache: &'a dyn LocalCache,
}

impl<'a> CacheView<'a> {
    pub fn new(cache: &'a dyn LocalCache) -> Self {
        Self { cache }
    }

    pub fn try_read_snapshot(&self) -> Result<Option<AppData>, CacheError> {
        match self.cache.get(KEY_DATA)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn read_snapshot(&self) -> Option<AppData> {
        self.try_read_snapshot().unwrap_or_else(|e| {
            log::error!("[wishlist.cache.read] Cached snapshot unusable: {}", e);
            None
        })
    }

    pub fn try_write_snapshot(&self, data: &AppData) -> Result<(), CacheError> {
        let raw = serde_json::to_string(data)?;
        self.cache.set(KEY_DATA, &raw)
    }

    /// Returns false when the write was dropped.
    pub fn write_snapshot(&self, data: &AppData) -> bool {
        match self.try_write_snapshot(data) {
            Ok(()) => true,
            Err(e) => {
                log::error!("[wishlist.cache.write] Local save failed: {}", e);
                false
            }
        }
    }

    pub fn clear_snapshot(&self) {
        if let Err(e) = self.cache.remove(KEY_DATA) {
            log::warn!("[wishlist.cache.clear] Failed to drop cached snapshot: {}", e);
        }
    }

    pub fn bucket_id(&self) -> Option<String> {
        match self.cache.get(KEY_BUCKET) {
            Ok(Some(id)) if !id.trim().is_empty() => Some(id.trim().to_string()),
            Ok(_) => None,
            Err(e) => {
                log::warn!("[wishlist.cache.read] Failed to read bucket id: {}", e);
                None
            }
        }
    }

    pub fn set_bucket_id(&self, id: &str) {
        if let Err(e) = self.cache.set(KEY_BUCKET, id) {
            log::error!("[wishlist.cache.write] Failed to store bucket id: {}", e);
        }
    }

    /// `None` when no preference was stored.
    pub fn sharded(&self) -> Option<bool> {
        match self.cache.get(KEY_SHARDED) {
            Ok(Some(flag)) => Some(flag.trim() == "true"),
            Ok(None) => None,
            Err(e) => {
                log::warn!("[wishlist.cache.read] Failed to read sharded flag: {}", e);
                None
            }
        }
    }

    pub fn set_sharded(&self, sharded: bool) {
        let value = if sharded { "true" } else { "false" };
        if let Err(e) = self.cache.set(KEY_SHARDED, value) {
            log::error!("[wishlist.cache.write] Failed to store sharded flag: {}", e);
        }
    }
}
