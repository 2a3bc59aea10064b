/// Snapshot layouts in a bucket.
///
/// Keys:
///   data_v1          -> whole AppData            (monolithic)
///   users_v2         -> roster, string[]          (sharded)
///   list_ids_v2      -> list index, string[]      (sharded)
///   list_{id}_v2     -> one WishList per list id  (sharded)
///
/// Sharded writes go roster, index, then bodies, and are not atomic: when a
/// later key fails, earlier keys stay written. The index can therefore name
/// lists whose bodies are stale or missing; reads skip missing bodies.
use std::future::Future;

use wishlist_core::types::{AppData, WishList};

use super::{KvClient, KvTransport, RemoteError};
use crate::config::Encoding;

pub const MONOLITHIC_KEY: &str = "data_v1";
pub const USERS_KEY: &str = "users_v2";
pub const LIST_IDS_KEY: &str = "list_ids_v2";

pub fn list_key(list_id: &str) -> String {
    format!("list_{}_v2", list_id)
}

/// One way of spreading a snapshot across store keys.
pub trait StoreLayout: Send + Sync {
    fn name(&self) -> &'static str;

    /// `Ok(None)` when this layout has nothing usable in the bucket.
    fn fetch<T: KvTransport>(
        &self,
        client: &KvClient<T>,
        bucket: &str,
    ) -> impl Future<Output = Result<Option<AppData>, RemoteError>> + Send;

    fn save<T: KvTransport>(
        &self,
        client: &KvClient<T>,
        bucket: &str,
        data: &AppData,
    ) -> impl Future<Output = Result<(), RemoteError>> + Send;
}

pub struct MonolithicLayout;

impl StoreLayout for MonolithicLayout {
    fn name(&self) -> &'static str {
        "monolithic"
    }

    async fn fetch<T: KvTransport>(&self, client: &KvClient<T>, bucket: &str) -> Result<Option<AppData>, RemoteError> {
        client.get_json(bucket, MONOLITHIC_KEY).await
    }

    async fn save<T: KvTransport>(&self, client: &KvClient<T>, bucket: &str, data: &AppData) -> Result<(), RemoteError> {
        client.put_json(bucket, MONOLITHIC_KEY, data).await
    }
}

pub struct ShardedLayout;

impl StoreLayout for ShardedLayout {
    fn name(&self) -> &'static str {
        "sharded"
    }

    async fn fetch<T: KvTransport>(&self, client: &KvClient<T>, bucket: &str) -> Result<Option<AppData>, RemoteError> {
        let Some(users) = client.get_json::<Vec<String>>(bucket, USERS_KEY).await? else {
            return Ok(None);
        };
        let Some(list_ids) = client.get_json::<Vec<String>>(bucket, LIST_IDS_KEY).await? else {
            log::warn!(
                "[wishlist.remote.sharded] Bucket has a roster but no list index, ignoring sharded data"
            );
            return Ok(None);
        };

        let mut lists = Vec::with_capacity(list_ids.len());
        for list_id in &list_ids {
            match client.get_json::<WishList>(bucket, &list_key(list_id)).await? {
                Some(list) => lists.push(list),
                None => log::warn!(
                    "[wishlist.remote.sharded] List {} is indexed but has no body, skipping",
                    list_id
                ),
            }
        }

        Ok(Some(AppData { users, lists }))
    }

    async fn save<T: KvTransport>(&self, client: &KvClient<T>, bucket: &str, data: &AppData) -> Result<(), RemoteError> {
        let total = data.lists.len() + 2;
        let mut written = 0;

        let result = async {
            client.put_json(bucket, USERS_KEY, &data.users).await?;
            written += 1;

            let list_ids: Vec<&str> = data.lists.iter().map(|l| l.id.as_str()).collect();
            client.put_json(bucket, LIST_IDS_KEY, &list_ids).await?;
            written += 1;

            for list in &data.lists {
                client.put_json(bucket, &list_key(&list.id), list).await?;
                written += 1;
            }
            Ok::<(), RemoteError>(())
        }
        .await;

        match result {
            Ok(()) => Ok(()),
            Err(e) if written == 0 => Err(e),
            Err(e) => {
                log::error!(
                    "[wishlist.remote.sharded] Save stopped after {}/{} keys, remote is partially updated: {}",
                    written,
                    total,
                    e
                );
                Err(RemoteError::PartialWrite {
                    written,
                    total,
                    source: Box::new(e),
                })
            }
        }
    }
}

/// Fetch a bucket's snapshot with the given encoding.
///
/// Sharded reads fall back to the monolithic key before reporting absence, so
/// a bucket written before sharding was switched on is still found.
pub async fn fetch_remote<T: KvTransport>(
    client: &KvClient<T>,
    bucket: &str,
    encoding: Encoding,
) -> Result<Option<AppData>, RemoteError> {
    match encoding {
        Encoding::Monolithic => MonolithicLayout.fetch(client, bucket).await,
        Encoding::Sharded => match ShardedLayout.fetch(client, bucket).await? {
            Some(data) => Ok(Some(data)),
            None => {
                log::info!(
                    "[wishlist.remote.fetch] No sharded data in bucket {}, trying {}",
                    bucket,
                    MONOLITHIC_KEY
                );
                MonolithicLayout.fetch(client, bucket).await
            }
        },
    }
}

/// Write a snapshot with the given encoding.
pub async fn save_remote<T: KvTransport>(
    client: &KvClient<T>,
    bucket: &str,
    encoding: Encoding,
    data: &AppData,
) -> Result<(), RemoteError> {
    match encoding {
        Encoding::Monolithic => MonolithicLayout.save(client, bucket, data).await,
        Encoding::Sharded => ShardedLayout.save(client, bucket, data).await,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::remote::memory::MemoryKvStore;
    use wishlist_core::seed::seed_data;

    fn client() -> KvClient<MemoryKvStore> {
        KvClient::new(Arc::new(MemoryKvStore::new()), "https://kv.test")
    }

    #[tokio::test]
    async fn test_monolithic_roundtrip_single_key() {
        let client = client();
        save_remote(&client, "fam", Encoding::Monolithic, &seed_data()).await.unwrap();

        assert_eq!(client.transport().writes(), vec![client.key_url("fam", MONOLITHIC_KEY)]);
        let fetched = fetch_remote(&client, "fam", Encoding::Monolithic).await.unwrap();
        assert_eq!(fetched, Some(seed_data()));
    }

    #[tokio::test]
    async fn test_sharded_write_order_and_roundtrip() {
        let client = client();
        save_remote(&client, "fam", Encoding::Sharded, &seed_data()).await.unwrap();

        assert_eq!(
            client.transport().writes(),
            vec![
                client.key_url("fam", USERS_KEY),
                client.key_url("fam", LIST_IDS_KEY),
                client.key_url("fam", "list_list-megan_v2"),
                client.key_url("fam", "list_list-erin_v2"),
            ]
        );
        assert_eq!(
            client.transport().entry(&client.key_url("fam", LIST_IDS_KEY)).as_deref(),
            Some(r#"["list-megan","list-erin"]"#)
        );

        let fetched = fetch_remote(&client, "fam", Encoding::Sharded).await.unwrap();
        assert_eq!(fetched, Some(seed_data()));
    }

    #[tokio::test]
    async fn test_missing_bucket_is_absent_not_error() {
        let client = client();
        assert_eq!(fetch_remote(&client, "empty", Encoding::Monolithic).await.unwrap(), None);
        assert_eq!(fetch_remote(&client, "empty", Encoding::Sharded).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_sharded_falls_back_to_monolithic() {
        let client = client();
        save_remote(&client, "fam", Encoding::Monolithic, &seed_data()).await.unwrap();

        let fetched = fetch_remote(&client, "fam", Encoding::Sharded).await.unwrap();
        assert_eq!(fetched, Some(seed_data()));
    }

    #[tokio::test]
    async fn test_sharded_missing_index_falls_back() {
        let client = client();
        client
            .transport()
            .insert(&client.key_url("fam", USERS_KEY), r#"["Megan"]"#);

        assert_eq!(fetch_remote(&client, "fam", Encoding::Sharded).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_partial_sharded_write_is_reported() {
        let client = client();
        client.transport().fail_key("list_list-erin_v2", 500);

        let err = save_remote(&client, "fam", Encoding::Sharded, &seed_data())
            .await
            .unwrap_err();
        assert!(matches!(err, RemoteError::PartialWrite { written: 3, total: 4, .. }));

        // Roster and index are ahead of the bodies; reading still works.
        client.transport().heal();
        let fetched = fetch_remote(&client, "fam", Encoding::Sharded).await.unwrap().unwrap();
        assert_eq!(fetched.users, seed_data().users);
        assert_eq!(fetched.lists.len(), 1);
        assert_eq!(fetched.lists[0].id, "list-megan");
    }

    #[tokio::test]
    async fn test_first_shard_failure_is_plain_error() {
        let client = client();
        client.transport().fail_key(USERS_KEY, 503);

        let err = save_remote(&client, "fam", Encoding::Sharded, &seed_data())
            .await
            .unwrap_err();
        assert!(matches!(err, RemoteError::Status { status: 503, .. }));
        assert!(client.transport().writes().is_empty());
    }

    #[tokio::test]
    async fn test_transport_failure_propagates() {
        let client = client();
        client.transport().set_offline(true);

        assert!(fetch_remote(&client, "fam", Encoding::Monolithic).await.is_err());
        assert!(fetch_remote(&client, "fam", Encoding::Sharded).await.is_err());
    }
}
