//! In-memory key-value store with optional quota and fault injection.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use bridge_traits::error::{BridgeError, Result};
use bridge_traits::storage::KeyValueStore;

/// `KeyValueStore` backed by a `HashMap`.
///
/// Supports an optional byte budget so persistence-layer quota handling can
/// be tested, and a one-shot write failure switch.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<HashMap<String, String>>,
    capacity_bytes: Option<usize>,
    fail_writes: AtomicBool,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that refuses writes once the sum of stored value bytes would
    /// exceed `capacity_bytes`, mimicking local-storage quota exhaustion.
    pub fn with_capacity_bytes(capacity_bytes: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            capacity_bytes: Some(capacity_bytes),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Make every subsequent `set` fail until switched back.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Snapshot of the raw stored value for a key, for assertions.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.lock().expect("store poisoned").get(key).cloned()
    }

    fn stored_bytes_excluding(&self, entries: &HashMap<String, String>, key: &str) -> usize {
        entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(_, v)| v.len())
            .sum()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().expect("store poisoned").get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(BridgeError::OperationFailed(format!(
                "injected write failure for key '{key}'"
            )));
        }
        let mut entries = self.entries.lock().expect("store poisoned");
        if let Some(capacity) = self.capacity_bytes {
            let used = self.stored_bytes_excluding(&entries, key);
            if used + value.len() > capacity {
                return Err(BridgeError::QuotaExceeded {
                    key: key.to_string(),
                });
            }
        }
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().expect("store poisoned").remove(key);
        Ok(())
    }
}
