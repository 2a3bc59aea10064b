//! Sync layer between a device-local wishlist cache and a hosted key-value bucket.

pub mod config;
pub mod logging;
pub mod orchestrator;
pub mod remote;

use std::sync::Arc;

use wishlist_core::storage::local::FileCache;
use wishlist_core::storage::CacheError;

use crate::config::SyncConfig;
use crate::orchestrator::SyncOrchestrator;
use crate::remote::http::HttpTransport;

pub use wishlist_core;

/// Build the production orchestrator: file cache under the configured dir,
/// reqwest transport against the configured endpoint.
pub fn open(config: &SyncConfig) -> Result<SyncOrchestrator<HttpTransport>, CacheError> {
    let cache_dir = config.cache_dir();
    let cache = FileCache::open(&cache_dir)?;
    log::info!(
        "[wishlist.sync.open] Cache at {}, endpoint {}",
        cache_dir.display(),
        config.endpoint
    );
    Ok(SyncOrchestrator::new(
        config.context(),
        Arc::new(cache),
        Arc::new(HttpTransport::new()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_uses_configured_cache_dir() {
        let tmp = TempDir::new().unwrap();
        let config = SyncConfig {
            cache_dir: Some(tmp.path().join("cache")),
            ..SyncConfig::default()
        };

        let sync = open(&config).unwrap();
        assert!(tmp.path().join("cache").is_dir());
        assert_eq!(sync.active_bucket(), config::DEFAULT_BUCKET_ID);
        sync.set_active_bucket("fam-7");
        assert!(tmp.path().join("cache").join("north_pole_bucket_id_v2.json").exists());
    }
}
