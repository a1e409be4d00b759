//! Storage port: Trait for the key-value persistence capability.
//!
//! The substrate is external and interchangeable: get/set/remove of
//! JSON-serializable values by string key. History keys are namespaced per
//! identity by the history service; the store knows nothing about users.

use serde_json::Value;

/// Trait for local key-value persistence.
///
/// Callers treat persistence as best-effort: a failing store degrades the
/// history view to empty rather than propagating an error to the user.
pub trait KeyValueStore: Send + Sync {
    /// Error type for storage operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read a value by key.
    ///
    /// # Returns
    /// `None` if the key is absent.
    ///
    /// # Errors
    /// Returns error if the read fails or the stored value is not JSON.
    fn get(&self, key: &str) -> Result<Option<Value>, Self::Error>;

    /// Write a value under a key, replacing any previous value.
    ///
    /// # Errors
    /// Returns error if the write fails.
    fn set(&self, key: &str, value: &Value) -> Result<(), Self::Error>;

    /// Remove a key. Removing an absent key is not an error.
    ///
    /// # Errors
    /// Returns error if the removal fails.
    fn remove(&self, key: &str) -> Result<(), Self::Error>;
}
