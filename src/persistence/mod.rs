//! Key-value persistence
//!
//! The game only persists a couple of small strings (best score, settings),
//! so storage is a minimal string map:
//! - `MemoryStore` for tests and native runs
//! - `LocalStore` backed by browser LocalStorage on wasm32

mod memory;
#[cfg(target_arch = "wasm32")]
mod local_storage;

pub use memory::MemoryStore;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStore;

use thiserror::Error;

/// Storage failures
///
/// None of these are fatal: callers log and carry on with defaults.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage is unavailable")]
    Unavailable,
    #[error("failed to write key '{key}'")]
    WriteFailed { key: String },
    #[error("failed to read key '{key}'")]
    ReadFailed { key: String },
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A string key-value store
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// Read and deserialize a JSON value, `None` if the key is absent
pub fn load_json<T, S>(store: &S, key: &str) -> Result<Option<T>, StoreError>
where
    T: serde::de::DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    match store.get(key)? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

/// Serialize a value as JSON and store it
pub fn save_json<T, S>(store: &mut S, key: &str, value: &T) -> Result<(), StoreError>
where
    T: serde::Serialize,
    S: KeyValueStore + ?Sized,
{
    let json = serde_json::to_string(value)?;
    store.set(key, &json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        a: u32,
    }

    #[test]
    fn test_json_roundtrip_through_store() {
        let mut store = MemoryStore::new();
        save_json(&mut store, "k", &Sample { a: 7 }).unwrap();
        let loaded: Option<Sample> = load_json(&store, "k").unwrap();
        assert_eq!(loaded, Some(Sample { a: 7 }));
    }

    #[test]
    fn test_missing_and_corrupt_json() {
        let mut store = MemoryStore::new();
        let missing: Option<Sample> = load_json(&store, "k").unwrap();
        assert!(missing.is_none());

        store.set("k", "{oops").unwrap();
        let err = load_json::<Sample, _>(&store, "k").unwrap_err();
        assert!(matches!(err, StoreError::Json(_)));
    }

    #[test]
    fn test_trait_object_store() {
        let mut store: Box<dyn KeyValueStore> = Box::new(MemoryStore::new());
        store.set("x", "1").unwrap();
        assert_eq!(store.get("x").unwrap().as_deref(), Some("1"));
        store.remove("x").unwrap();
        assert_eq!(store.get("x").unwrap(), None);
    }
}
