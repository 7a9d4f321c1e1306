//! Local persistence helper.
//!
//! String-keyed JSON blobs behind a small `KeyValueStore` trait, the same
//! contract the site had with `localStorage`. `LocalStore` layers serde on
//! top and swallows every failure: callers see either a value or `None`,
//! never an error. Failures are logged through `tracing`.

pub mod keys;
pub mod memory;
pub mod sqlite;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Quota exceeded writing {key} ({bytes} bytes)")]
    QuotaExceeded { key: String, bytes: usize },

    #[error("Lock poisoned")]
    LockPoisoned,
}

/// Raw string storage. Implementations must be shareable across the
/// auto-save task and UI handlers.
pub trait KeyValueStore: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// JSON (de)serialising facade over a `KeyValueStore`.
///
/// No schema versioning: a stored shape that no longer matches `T` reads
/// back as `None`.
#[derive(Clone)]
pub struct LocalStore {
    backend: Arc<dyn KeyValueStore>,
}

impl LocalStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Volatile store, used by tests and when no data dir is writable.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Serialize `value` and write it under `key`. Never fails.
    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(key, "Could not serialize value for local storage: {e}");
                return;
            }
        };
        if let Err(e) = self.backend.set_item(key, &json) {
            tracing::warn!(key, "Could not save to local storage: {e}");
        }
    }

    /// Read and deserialize `key`. `None` when missing, unreadable or
    /// malformed.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.backend.get_item(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(key, "Could not read from local storage: {e}");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, "Discarding malformed local storage value: {e}");
                None
            }
        }
    }

    /// `load` falling back to `T::default()`; list-shaped keys start empty.
    pub fn load_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        self.load(key).unwrap_or_default()
    }

    /// Raw string value, for keys the site wrote without JSON encoding.
    pub fn load_text(&self, key: &str) -> Option<String> {
        match self.backend.get_item(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, "Could not read from local storage: {e}");
                None
            }
        }
    }

    pub fn save_text(&self, key: &str, value: &str) {
        if let Err(e) = self.backend.set_item(key, value) {
            tracing::warn!(key, "Could not save to local storage: {e}");
        }
    }

    /// Whether anything is stored under `key`.
    pub fn contains(&self, key: &str) -> bool {
        matches!(self.backend.get_item(key), Ok(Some(_)))
    }

    pub fn remove(&self, key: &str) {
        if let Err(e) = self.backend.remove_item(key) {
            tracing::warn!(key, "Could not remove local storage key: {e}");
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Simulates private-browsing mode: every call fails.
    pub struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("storage disabled".into()))
        }

        fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
            Err(StorageError::QuotaExceeded {
                key: key.into(),
                bytes: value.len(),
            })
        }

        fn remove_item(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("storage disabled".into()))
        }
    }

    pub fn failing_store() -> LocalStore {
        LocalStore::new(Arc::new(FailingStore))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde::Deserialize;

    use super::test_support::failing_store;
    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        tags: Vec<String>,
        nested: BTreeMap<String, i64>,
        flag: Option<bool>,
    }

    fn sample() -> Sample {
        let mut nested = BTreeMap::new();
        nested.insert("systolic".into(), 120);
        nested.insert("diastolic".into(), 80);
        Sample {
            name: "Amina".into(),
            tags: vec!["vitals".into(), "weekly".into()],
            nested,
            flag: None,
        }
    }

    #[test]
    fn save_then_load_is_deep_equal() {
        let store = LocalStore::in_memory();
        store.save("healthData", &sample());
        let loaded: Sample = store.load("healthData").unwrap();
        assert_eq!(loaded, sample());
    }

    #[test]
    fn load_missing_key_is_none() {
        let store = LocalStore::in_memory();
        assert!(store.load::<Sample>("never-written").is_none());
        assert!(!store.contains("never-written"));
    }

    #[test]
    fn load_malformed_json_is_none() {
        let backend = Arc::new(MemoryStore::new());
        backend.set_item("theme", "{not json").unwrap();
        let store = LocalStore::new(backend);
        assert!(store.load::<String>("theme").is_none());
    }

    #[test]
    fn load_with_mismatched_shape_is_none() {
        let store = LocalStore::in_memory();
        store.save("bookingData", &vec![1, 2, 3]);
        assert!(store.load::<Sample>("bookingData").is_none());
    }

    #[test]
    fn load_or_default_gives_empty_list() {
        let store = LocalStore::in_memory();
        let list: Vec<String> = store.load_or_default(keys::MEDICATIONS);
        assert!(list.is_empty());
    }

    #[test]
    fn remove_clears_key() {
        let store = LocalStore::in_memory();
        store.save("theme", "dark");
        store.remove("theme");
        assert!(store.load::<String>("theme").is_none());
    }

    #[test]
    fn failing_backend_is_swallowed() {
        let store = failing_store();
        store.save("bookingData", &sample());
        assert!(store.load::<Sample>("bookingData").is_none());
        assert!(!store.contains("bookingData"));
        store.remove("bookingData");
    }

    #[test]
    fn text_values_stored_verbatim() {
        let backend = Arc::new(MemoryStore::new());
        let store = LocalStore::new(backend.clone());
        store.save_text("theme", "dark");
        assert_eq!(backend.get_item("theme").unwrap().as_deref(), Some("dark"));
        assert_eq!(store.load_text("theme").as_deref(), Some("dark"));
        assert!(failing_store().load_text("theme").is_none());
    }

    #[test]
    fn json_scalars_round_trip() {
        let store = LocalStore::in_memory();
        store.save("highContrast", &true);
        store.save("count", &42u32);
        assert_eq!(store.load::<bool>("highContrast"), Some(true));
        assert_eq!(store.load::<u32>("count"), Some(42));
    }
}
