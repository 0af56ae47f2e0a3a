#![allow(dead_code)]

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use waymark_core::{CollectionStore, StoreError, StoreResult};

/// In-memory collection store with save accounting and failure injection.
#[derive(Default)]
pub struct MemoryStore {
    docs: Mutex<HashMap<String, String>>,
    save_calls: AtomicUsize,
    fail_saves: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeds one persisted document from raw JSON text.
    pub fn with_document(self, key: &str, raw_json: &str) -> Self {
        self.docs
            .lock()
            .insert(key.to_string(), raw_json.to_string());
        self
    }

    /// Number of `save` calls observed, failed ones included.
    pub fn save_calls(&self) -> usize {
        self.save_calls.load(Ordering::SeqCst)
    }

    /// While set, every `save` fails with a simulated disk-full error.
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Parses the persisted document under `key`, if any.
    pub fn saved_json(&self, key: &str) -> Option<serde_json::Value> {
        let docs = self.docs.lock();
        let raw = docs.get(key)?;
        serde_json::from_str(raw).ok()
    }
}

impl CollectionStore for MemoryStore {
    fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let docs = self.docs.lock();
        let raw = docs.get(key)?;
        serde_json::from_str(raw).ok()
    }

    fn save<T: Serialize>(&self, key: &str, value: &T) -> StoreResult<()> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(simulated_disk_full());
        }

        let payload = serde_json::to_string(value).map_err(|source| StoreError::Serialize {
            key: key.to_string(),
            source,
        })?;
        self.docs.lock().insert(key.to_string(), payload);
        Ok(())
    }
}

fn simulated_disk_full() -> StoreError {
    StoreError::from(rusqlite::Error::SqliteFailure(
        rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_FULL),
        Some("simulated disk full".to_string()),
    ))
}
