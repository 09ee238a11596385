//! Browser LocalStorage store (wasm32 only)

use web_sys::Storage;

use super::{KeyValueStore, StoreError};

/// Store backed by `window.localStorage`
pub struct LocalStore {
    storage: Option<Storage>,
}

impl LocalStore {
    /// Open LocalStorage; if the browser refuses (privacy mode, sandboxed
    /// iframe) every operation reports `Unavailable`
    pub fn open() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if storage.is_none() {
            log::warn!("LocalStorage unavailable, scores will not persist");
        }
        Self { storage }
    }

    fn storage(&self) -> Result<&Storage, StoreError> {
        self.storage.as_ref().ok_or(StoreError::Unavailable)
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage()?
            .get_item(key)
            .map_err(|_| StoreError::ReadFailed {
                key: key.to_string(),
            })
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage()?
            .set_item(key, value)
            .map_err(|_| StoreError::WriteFailed {
                key: key.to_string(),
            })
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.storage()?
            .remove_item(key)
            .map_err(|_| StoreError::WriteFailed {
                key: key.to_string(),
            })
    }
}
