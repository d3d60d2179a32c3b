use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::error::KVError;
use crate::traits::KVStore;

/// MemoryStore is a KVStore held entirely in process memory.
///
/// This is the reference deployment backend: all state is lost on
/// restart. A durable deployment swaps in [`crate::RedbStore`] instead;
/// both sit behind the same `Arc<dyn KVStore>`.
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KVStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| KVError::Storage(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), KVError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| KVError::Storage(e.to_string()))?;
        entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn set_if_absent(&self, key: &str, value: &[u8]) -> Result<bool, KVError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| KVError::Storage(e.to_string()))?;
        if entries.contains_key(key) {
            return Ok(false);
        }
        entries.insert(key.to_string(), value.to_vec());
        Ok(true)
    }
}
