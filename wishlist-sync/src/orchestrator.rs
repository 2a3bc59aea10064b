/// Sequences cache, remote store and merge for the UI.
///
/// load:
///   1. Read cached snapshot (unusable cache = nothing cached)
///   2. Resolve active bucket (cache entry, else context default)
///   3. Fetch remote with the active encoding (failure = remote absent, health Local)
///   4. Merge both / take the one that exists / seed
///   5. Backfill an empty roster from list owners
///   6. Write the result back to the cache
///
/// save:
///   1. Write cache first, so the edit survives a failed network call
///   2. Write remote
///   3. Report Synced or Local; never fail
///
/// One writer per process: the UI serializes mutations, so no locking around
/// load/save. Concurrent edits from other devices are reconciled by the merge
/// on the next load.
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use wishlist_core::merge::merge_snapshots;
use wishlist_core::seed::seed_data;
use wishlist_core::storage::{CacheView, LocalCache};
use wishlist_core::sync::{LoadOutcome, Resolution, SyncHealth};
use wishlist_core::types::AppData;

use crate::config::{Encoding, SyncContext};
use crate::remote::{fetch_remote, save_remote, KvClient, KvTransport};

pub struct SyncOrchestrator<T> {
    context: SyncContext,
    cache: Arc<dyn LocalCache>,
    client: KvClient<T>,
    health_tx: Arc<watch::Sender<SyncHealth>>,
}

impl<T> Clone for SyncOrchestrator<T> {
    fn clone(&self) -> Self {
        Self {
            context: self.context.clone(),
            cache: Arc::clone(&self.cache),
            client: self.client.clone(),
            health_tx: Arc::clone(&self.health_tx),
        }
    }
}

impl<T: KvTransport> SyncOrchestrator<T> {
    pub fn new(context: SyncContext, cache: Arc<dyn LocalCache>, transport: Arc<T>) -> Self {
        let client = KvClient::new(transport, context.endpoint.clone());
        let (health_tx, _) = watch::channel(SyncHealth::Local);
        Self {
            context,
            cache,
            client,
            health_tx: Arc::new(health_tx),
        }
    }

    fn cache(&self) -> CacheView<'_> {
        CacheView::new(self.cache.as_ref())
    }

    pub fn context(&self) -> &SyncContext {
        &self.context
    }

    pub fn client(&self) -> &KvClient<T> {
        &self.client
    }

    /// Health as last published.
    pub fn health(&self) -> SyncHealth {
        *self.health_tx.borrow()
    }

    /// Receiver that sees every health transition, including ones published
    /// by detached saves.
    pub fn subscribe_health(&self) -> watch::Receiver<SyncHealth> {
        self.health_tx.subscribe()
    }

    fn publish(&self, health: SyncHealth) {
        self.health_tx.send_replace(health);
    }

    pub fn active_bucket(&self) -> String {
        self.cache()
            .bucket_id()
            .unwrap_or_else(|| self.context.default_bucket_id.clone())
    }

    /// Switch to another family's bucket. The cached snapshot belongs to the
    /// old bucket and is dropped so it is never shown under the new one.
    pub fn set_active_bucket(&self, bucket_id: &str) {
        let bucket_id = bucket_id.trim();
        if bucket_id.is_empty() {
            log::warn!("[wishlist.sync.bucket] Ignoring empty bucket id");
            return;
        }
        let cache = self.cache();
        cache.set_bucket_id(bucket_id);
        cache.clear_snapshot();
        log::info!("[wishlist.sync.bucket] Active bucket is now {}", bucket_id);
    }

    pub fn encoding(&self) -> Encoding {
        self.cache()
            .sharded()
            .map(Encoding::from_sharded)
            .unwrap_or(self.context.encoding)
    }

    pub fn set_encoding(&self, encoding: Encoding) {
        self.cache().set_sharded(encoding.is_sharded());
        log::info!("[wishlist.sync.encoding] Using {:?} encoding", encoding);
    }

    pub async fn load(&self) -> LoadOutcome {
        let cache = self.cache();
        let local = cache.read_snapshot();
        let bucket = self.active_bucket();
        let encoding = self.encoding();

        self.publish(SyncHealth::Syncing);
        let (remote, health) = match fetch_remote(&self.client, &bucket, encoding).await {
            Ok(remote) => (remote, SyncHealth::Synced),
            Err(e) => {
                log::warn!("[wishlist.sync.load] Cloud fetch failed for bucket {}: {}", bucket, e);
                (None, SyncHealth::Local)
            }
        };

        let (mut data, resolution) = match (remote, local) {
            (Some(remote), Some(local)) => {
                let result = merge_snapshots(&remote, &local);
                log::info!(
                    "[wishlist.sync.merge] Merged {} shared lists, {} items overridden locally, {} carried over",
                    result.lists_merged,
                    result.items_overridden,
                    result.items_carried
                );
                (result.data, Resolution::Merged)
            }
            (Some(remote), None) => (remote, Resolution::RemoteOnly),
            (None, Some(local)) => (local, Resolution::CacheOnly),
            (None, None) => (seed_data(), Resolution::Seeded),
        };

        if data.backfill_roster() {
            log::info!("[wishlist.sync.load] Rebuilt roster from {} list owners", data.users.len());
        }

        // The bucket may have been switched while the fetch was in flight.
        let current = self.active_bucket();
        if current == bucket {
            cache.write_snapshot(&data);
        } else {
            log::warn!(
                "[wishlist.sync.load] Bucket changed to {} during load of {}, not caching",
                current,
                bucket
            );
        }
        log::info!(
            "[wishlist.sync.load] Bucket {} resolved via {:?} ({} lists, health {:?})",
            bucket,
            resolution,
            data.lists.len(),
            health
        );
        self.publish(health);

        LoadOutcome { data, health }
    }

    pub async fn save(&self, data: &AppData) -> SyncHealth {
        self.cache().write_snapshot(data);
        self.publish(SyncHealth::Syncing);

        let bucket = self.active_bucket();
        let encoding = self.encoding();
        let health = self.save_remote_only(&bucket, encoding, data).await;
        self.publish(health);
        health
    }

    /// Write the cache now and push to the remote store in a detached task.
    ///
    /// The target bucket and encoding are fixed at call time. The task runs to
    /// completion even if the handle is dropped; its result is published on the
    /// health channel.
    pub fn save_detached(&self, data: AppData) -> JoinHandle<SyncHealth> {
        self.cache().write_snapshot(&data);
        self.publish(SyncHealth::Syncing);

        let bucket = self.active_bucket();
        let encoding = self.encoding();
        let this = self.clone();
        tokio::spawn(async move {
            let health = this.save_remote_only(&bucket, encoding, &data).await;
            this.publish(health);
            health
        })
    }

    /// Replace everything with the empty snapshot.
    pub async fn reset_all(&self) -> SyncHealth {
        log::warn!("[wishlist.sync.reset] Clearing all data in bucket {}", self.active_bucket());
        self.save(&AppData::default()).await
    }

    async fn save_remote_only(&self, bucket: &str, encoding: Encoding, data: &AppData) -> SyncHealth {
        match save_remote(&self.client, bucket, encoding, data).await {
            Ok(()) => {
                log::debug!("[wishlist.sync.save] Saved to bucket {} ({:?})", bucket, encoding);
                SyncHealth::Synced
            }
            Err(e) => {
                log::warn!("[wishlist.sync.save] Cloud sync failed for bucket {}: {}", bucket, e);
                SyncHealth::Local
            }
        }
    }
}
