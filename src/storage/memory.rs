use std::collections::HashMap;

use crate::error::StorageError;
use crate::storage::BlobStore;

/// In-process blob store, the server-side stand-in for browser local storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    blobs: HashMap<String, String>,
}

impl MemoryStore {
    pub fn with_blob(mut self, key: &str, value: &str) -> Self {
        self.blobs.insert(key.to_string(), value.to_string());
        self
    }
}

impl BlobStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.blobs.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.blobs.insert(key.to_string(), value);
        Ok(())
    }
}
