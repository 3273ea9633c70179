//! Browser LocalStorage backend (wasm32 only)

use super::KeyValueStore;
use crate::error::StorageError;

/// `window.localStorage`
#[derive(Debug, Clone)]
pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    /// `None` when there is no window or storage is disabled
    pub fn open() -> Option<Self> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()?;
        Some(Self { storage })
    }
}

impl KeyValueStore for LocalStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| StorageError::Backend(format!("{e:?}")))
    }
}
