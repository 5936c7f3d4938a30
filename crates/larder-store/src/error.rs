use std::io;

use thiserror::Error;

/// Failures surfaced by a [`BlobStore`](crate::BlobStore) adapter.
///
/// A missing key is never an error: `load` returns `Ok(None)` and `delete`
/// is a no-op. Everything here is an I/O-level fault the caller cannot fix
/// by retrying with different domain input.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid blob key {key:?}: {reason}")]
    InvalidKey { key: String, reason: &'static str },

    #[error("I/O error on blob {key:?}: {source}")]
    Io {
        key: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to replace blob {key:?} atomically: {source}")]
    Persist {
        key: String,
        #[source]
        source: io::Error,
    },
}

impl StorageError {
    pub(crate) fn io(key: &str, source: io::Error) -> Self {
        Self::Io {
            key: key.to_owned(),
            source,
        }
    }
}
