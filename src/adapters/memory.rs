//! In-memory adapter: Implementation of the key-value store port.
//!
//! Used by tests and ephemeral (unsaved) sessions. Nothing survives the
//! process.

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Mutex;

use serde_json::Value;

use crate::ports::KeyValueStore;

/// Volatile key-value store backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys, for test assertions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().expect("memory store mutex poisoned").len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    type Error = Infallible;

    fn get(&self, key: &str) -> Result<Option<Value>, Self::Error> {
        Ok(self
            .entries
            .lock()
            .expect("memory store mutex poisoned")
            .get(key)
            .cloned())
    }

    fn set(&self, key: &str, value: &Value) -> Result<(), Self::Error> {
        self.entries
            .lock()
            .expect("memory store mutex poisoned")
            .insert(key.to_string(), value.clone());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        self.entries
            .lock()
            .expect("memory store mutex poisoned")
            .remove(key);
        Ok(())
    }
}
