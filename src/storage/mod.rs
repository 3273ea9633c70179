//! Durable key-value storage
//!
//! Each collection lives under its own key as a JSON array:
//! - `students`
//! - `courses`
//! - `fees`
//!
//! Loading is forgiving: an absent blob, or one that is not a JSON array,
//! yields `None` and the caller falls back to an empty (or seeded)
//! collection. Inside an array each record decodes on its own, so one bad
//! record is dropped without taking its neighbours with it.

#[cfg(target_arch = "wasm32")]
pub mod local;
pub mod memory;

#[cfg(target_arch = "wasm32")]
pub use local::LocalStorage;
pub use memory::MemoryStore;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::StorageError;

pub const STUDENTS_KEY: &str = "students";
pub const COURSES_KEY: &str = "courses";
pub const FEES_KEY: &str = "fees";

/// Minimal string store, shaped like the Web Storage API
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Read and decode the records stored under `key`
///
/// Returns `None` when nothing is stored or the blob is not an array.
/// Records that fail to decode are skipped with a warning.
pub fn load<T, S>(store: &S, key: &str) -> Option<Vec<T>>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let json = store.get_item(key)?;
    let raw = match serde_json::from_str::<Vec<serde_json::Value>>(&json) {
        Ok(raw) => raw,
        Err(e) => {
            log::warn!("Discarding malformed '{}' data: {}", key, e);
            return None;
        }
    };
    let total = raw.len();
    let records: Vec<T> = raw
        .into_iter()
        .enumerate()
        .filter_map(|(i, value)| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                log::warn!("Dropping record {} of '{}': {}", i, key, e);
                None
            }
        })
        .collect();
    if records.len() < total {
        log::warn!("Loaded {} of {} records from '{}'", records.len(), total, key);
    } else {
        log::info!("Loaded {} records from '{}'", records.len(), key);
    }
    Some(records)
}

/// Encode `records` and overwrite whatever is stored under `key`
pub fn save<T, S>(store: &S, key: &str, records: &[T]) -> Result<(), StorageError>
where
    T: Serialize,
    S: KeyValueStore + ?Sized,
{
    let json = serde_json::to_string(records)?;
    store.set_item(key, &json)
}
