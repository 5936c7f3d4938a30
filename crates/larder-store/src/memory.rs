//! In-memory blob store for tests and throwaway sessions.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use crate::blob::{BlobStore, validate_key};
use crate::error::StorageError;

/// Blob store holding everything in a sorted map.
///
/// Applies the same key validation as [`LocalBlobStore`](crate::LocalBlobStore)
/// so tests written against it do not pass keys the filesystem would reject.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored blobs.
    pub fn len(&self) -> usize {
        self.blobs.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl BlobStore for MemoryBlobStore {
    fn save(&self, key: &str, data: &[u8]) -> Result<(), StorageError> {
        validate_key(key)?;
        self.blobs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), data.to_vec());
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        validate_key(key)?;
        Ok(self
            .blobs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned())
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        self.blobs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        Ok(self
            .blobs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }

    fn exists(&self, key: &str) -> Result<bool, StorageError> {
        validate_key(key)?;
        Ok(self
            .blobs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn behaves_like_a_blob_store() {
        let store = MemoryBlobStore::new();
        assert!(store.is_empty());

        store.save("u/b.json", b"b").unwrap();
        store.save("u/a.json", b"a").unwrap();
        store.save("v/a.json", b"va").unwrap();

        assert_eq!(store.load("u/a.json").unwrap().unwrap(), b"a");
        assert_eq!(store.list("u/").unwrap(), vec!["u/a.json", "u/b.json"]);
        assert!(store.exists("v/a.json").unwrap());

        store.delete("v/a.json").unwrap();
        store.delete("v/a.json").unwrap();
        assert!(!store.exists("v/a.json").unwrap());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn rejects_invalid_keys() {
        let store = MemoryBlobStore::new();
        assert!(store.save("/abs", b"x").is_err());
        assert!(store.load("a/../b").is_err());
    }
}
