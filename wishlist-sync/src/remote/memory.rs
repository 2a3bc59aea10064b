/// In-process stand-in for the remote store, with failure injection.
///
/// Values are keyed by full URL. Failures are keyed by the last path segment
/// (the store key), so tests can break `list_x_v2` in any bucket.
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use super::{KvResponse, KvTransport, RemoteError};

#[derive(Debug, Clone, Copy)]
enum Failure {
    Status(u16),
    Unreachable,
}

#[derive(Default)]
pub struct MemoryKvStore {
    values: Mutex<HashMap<String, String>>,
    failures: Mutex<HashMap<String, Failure>>,
    writes: Mutex<Vec<String>>,
    offline: AtomicBool,
    requests: AtomicUsize,
}

fn lock<V>(m: &Mutex<V>) -> MutexGuard<'_, V> {
    m.lock().unwrap_or_else(|p| p.into_inner())
}

fn store_key(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, url: &str, body: &str) {
        lock(&self.values).insert(url.to_string(), body.to_string());
    }

    pub fn entry(&self, url: &str) -> Option<String> {
        lock(&self.values).get(url).cloned()
    }

    pub fn len(&self) -> usize {
        lock(&self.values).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Answer every request for `key` with `status`.
    pub fn fail_key(&self, key: &str, status: u16) {
        lock(&self.failures).insert(key.to_string(), Failure::Status(status));
    }

    /// Make every request for `key` fail at the transport level.
    pub fn drop_key(&self, key: &str) {
        lock(&self.failures).insert(key.to_string(), Failure::Unreachable);
    }

    pub fn heal(&self) {
        lock(&self.failures).clear();
        self.offline.store(false, Ordering::SeqCst);
    }

    /// Fail every request at the transport level.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// URLs successfully written, in order.
    pub fn writes(&self) -> Vec<String> {
        lock(&self.writes).clone()
    }

    fn check(&self, url: &str) -> Result<Option<KvResponse>, RemoteError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            return Err(RemoteError::Transport(format!("offline: {}", url)));
        }
        match lock(&self.failures).get(store_key(url)) {
            Some(Failure::Unreachable) => Err(RemoteError::Transport(format!("connection reset: {}", url))),
            Some(Failure::Status(status)) => Ok(Some(KvResponse {
                status: *status,
                body: String::new(),
            })),
            None => Ok(None),
        }
    }
}

impl KvTransport for MemoryKvStore {
    async fn get(&self, url: &str) -> Result<KvResponse, RemoteError> {
        if let Some(injected) = self.check(url)? {
            return Ok(injected);
        }
        Ok(match lock(&self.values).get(url) {
            Some(body) => KvResponse {
                status: 200,
                body: body.clone(),
            },
            None => KvResponse {
                status: 404,
                body: "Not Found".to_string(),
            },
        })
    }

    async fn post(&self, url: &str, body: String) -> Result<KvResponse, RemoteError> {
        if let Some(injected) = self.check(url)? {
            return Ok(injected);
        }
        lock(&self.values).insert(url.to_string(), body);
        lock(&self.writes).push(url.to_string());
        Ok(KvResponse {
            status: 200,
            body: String::new(),
        })
    }
}
