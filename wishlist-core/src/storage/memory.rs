/// In-process cache backend. Nothing survives the process.
use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use super::{CacheError, LocalCache};

#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, String>>,
    /// When set, every `set` fails as if storage quota were exhausted.
    fail_writes: AtomicBool,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Relaxed);
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl LocalCache for MemoryCache {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        if self.fail_writes.load(Ordering::Relaxed) {
            return Err(CacheError::Io(io::Error::other("cache quota exceeded")));
        }
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CacheError> {
        self.entries().remove(key);
        Ok(())
    }
}
