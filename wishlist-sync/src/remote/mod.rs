/// Remote key-value store client.
///
/// The store is a dumb blob endpoint: `GET {endpoint}/{bucket}/{key}` returns
/// the stored JSON (404 when never written), `POST` with a JSON body replaces
/// it. `KvClient` turns that into typed reads and writes; `layout` decides
/// which keys a snapshot is spread across.
pub mod http;
pub mod layout;
pub mod memory;

use std::future::Future;
use std::sync::Arc;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub use layout::{fetch_remote, save_remote, MonolithicLayout, ShardedLayout, StoreLayout};

/// Unreserved path characters (RFC 3986) stay as-is; everything else is escaped.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

/// Raw reply from the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KvResponse {
    pub status: u16,
    pub body: String,
}

impl KvResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }
}

/// HTTP-level access to the store. Implementations: HttpTransport (reqwest), MemoryKvStore.
pub trait KvTransport: Send + Sync + 'static {
    /// Uncached read of `url`. Non-success statuses are returned, not raised.
    fn get(&self, url: &str) -> impl Future<Output = Result<KvResponse, RemoteError>> + Send;

    /// Replace the value at `url` with a JSON `body`.
    fn post(&self, url: &str, body: String) -> impl Future<Output = Result<KvResponse, RemoteError>> + Send;
}

#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Remote returned status {status} for key {key}")]
    Status { key: String, status: u16 },

    #[error("Malformed data under key {key}: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode value for key {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Sharded write stopped after {written} of {total} keys: {source}")]
    PartialWrite {
        written: usize,
        total: usize,
        #[source]
        source: Box<RemoteError>,
    },
}

/// Typed access to one store endpoint. Stateless apart from the transport.
pub struct KvClient<T> {
    transport: Arc<T>,
    endpoint: String,
}

impl<T> Clone for KvClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            endpoint: self.endpoint.clone(),
        }
    }
}

impl<T: KvTransport> KvClient<T> {
    pub fn new(transport: Arc<T>, endpoint: impl Into<String>) -> Self {
        let endpoint: String = endpoint.into();
        Self {
            transport,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }

    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    pub fn key_url(&self, bucket: &str, key: &str) -> String {
        format!(
            "{}/{}/{}",
            self.endpoint,
            utf8_percent_encode(bucket, SEGMENT),
            utf8_percent_encode(key, SEGMENT)
        )
    }

    /// Read and decode a key. `Ok(None)` means the key does not exist yet.
    pub async fn get_json<V: DeserializeOwned>(&self, bucket: &str, key: &str) -> Result<Option<V>, RemoteError> {
        let url = self.key_url(bucket, key);
        let response = self.transport.get(&url).await?;

        if response.is_not_found() {
            log::debug!("[wishlist.remote.get] {} not found", key);
            return Ok(None);
        }
        if !response.is_success() {
            return Err(RemoteError::Status {
                key: key.to_string(),
                status: response.status,
            });
        }

        serde_json::from_str(&response.body)
            .map(Some)
            .map_err(|source| RemoteError::Decode {
                key: key.to_string(),
                source,
            })
    }

    /// Encode and store a value under a key.
    pub async fn put_json<V: Serialize + ?Sized>(&self, bucket: &str, key: &str, value: &V) -> Result<(), RemoteError> {
        let body = serde_json::to_string(value).map_err(|source| RemoteError::Encode {
            key: key.to_string(),
            source,
        })?;
        let url = self.key_url(bucket, key);
        let response = self.transport.post(&url, body).await?;

        if !response.is_success() {
            return Err(RemoteError::Status {
                key: key.to_string(),
                status: response.status,
            });
        }
        Ok(())
    }
}
