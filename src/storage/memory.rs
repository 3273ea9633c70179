//! In-memory store for native builds and tests

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::KeyValueStore;
use crate::error::StorageError;

/// Shared in-memory map. Clones see the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
