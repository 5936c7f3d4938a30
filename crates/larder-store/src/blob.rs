//! The blob store port.

use crate::error::StorageError;

/// File-name prefix reserved for in-flight temporary files. No key segment
/// may start with it.
pub(crate) const TEMP_PREFIX: &str = ".larder-";

/// Low-level keyed byte storage.
///
/// Keys are `/`-separated relative paths such as `default/dishes.json`.
/// Implementations must make [`save`](BlobStore::save) atomic per key: a
/// reader observes either the previous content or the new content, never a
/// partial write. There is no cross-key or cross-process locking; two
/// writers racing on the same key resolve as "last save wins".
pub trait BlobStore: Send + Sync {
    /// Replace the content stored at `key`.
    fn save(&self, key: &str, data: &[u8]) -> Result<(), StorageError>;

    /// Return the bytes last saved at `key`, or `None` if nothing is stored.
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Remove `key`. Removing a key that does not exist succeeds.
    fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// All keys starting with `prefix`, sorted lexicographically.
    fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError>;

    /// Whether a blob is stored at `key`.
    fn exists(&self, key: &str) -> Result<bool, StorageError>;
}

/// Reject keys that could escape the store root or that no adapter can map
/// onto a path.
pub fn validate_key(key: &str) -> Result<(), StorageError> {
    let invalid = |reason| StorageError::InvalidKey {
        key: key.to_owned(),
        reason,
    };

    if key.is_empty() {
        return Err(invalid("key is empty"));
    }
    if key.starts_with('/') {
        return Err(invalid("key must be relative"));
    }
    if key.contains('\\') || key.contains('\0') {
        return Err(invalid("key contains a forbidden character"));
    }
    for segment in key.split('/') {
        match segment {
            "" => return Err(invalid("key contains an empty segment")),
            "." | ".." => return Err(invalid("key contains a relative segment")),
            s if s.starts_with(TEMP_PREFIX) => {
                return Err(invalid("key uses the reserved temp-file prefix"));
            }
            _ => {}
        }
    }
    Ok(())
}
