//! Filesystem-backed blob store.
//!
//! Keys map to files under a root directory: `default/dishes.json` lives at
//! `<root>/default/dishes.json`. Saves go through a temporary file in the
//! target directory which is flushed and then renamed over the final path,
//! so a crash mid-write leaves the previous content intact.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::blob::{BlobStore, TEMP_PREFIX, validate_key};
use crate::error::StorageError;

/// Blob store rooted at a local directory.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    /// Open a store at `root`, creating the directory if needed.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| StorageError::io(&root.display().to_string(), e))?;
        info!(path = %root.display(), "opened local blob store");
        Ok(Self { root })
    }

    /// Root directory of this store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(key.split('/').fold(self.root.clone(), |p, seg| p.join(seg)))
    }

    fn key_for(&self, path: &Path) -> Option<String> {
        let rel = path.strip_prefix(&self.root).ok()?;
        let segments: Vec<&str> = rel
            .components()
            .map(|c| c.as_os_str().to_str())
            .collect::<Option<_>>()?;
        Some(segments.join("/"))
    }
}

impl BlobStore for LocalBlobStore {
    fn save(&self, key: &str, data: &[u8]) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let parent = path.parent().unwrap_or(self.root.as_path());
        fs::create_dir_all(parent).map_err(|e| StorageError::io(key, e))?;

        let mut tmp = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .suffix(".tmp")
            .tempfile_in(parent)
            .map_err(|e| StorageError::io(key, e))?;
        tmp.write_all(data).map_err(|e| StorageError::io(key, e))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| StorageError::io(key, e))?;

        // On failure the temp file is removed when `e.file` drops.
        tmp.persist(&path).map_err(|e| StorageError::Persist {
            key: key.to_owned(),
            source: e.error,
        })?;

        debug!(key, bytes = data.len(), "saved blob");
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read(&path) {
            Ok(bytes) => {
                debug!(key, bytes = bytes.len(), "loaded blob");
                Ok(Some(bytes))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::io(key, e)),
        }
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                info!(key, "deleted blob");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::io(key, e)),
        }
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let mut paths = Vec::new();
        collect_files(&self.root, &mut paths).map_err(|e| StorageError::io(prefix, e))?;

        let mut keys: Vec<String> = paths
            .iter()
            .filter_map(|p| self.key_for(p))
            .filter(|k| k.starts_with(prefix))
            .collect();
        keys.sort();
        Ok(keys)
    }

    fn exists(&self, key: &str) -> Result<bool, StorageError> {
        let path = self.path_for(key)?;
        match fs::metadata(&path) {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::io(key, e)),
        }
    }
}

/// Recursively collect regular files, skipping in-flight temp files.
fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            collect_files(&path, out)?;
        } else if file_type.is_file() {
            let is_temp = entry
                .file_name()
                .to_str()
                .is_some_and(|n| n.starts_with(TEMP_PREFIX));
            if is_temp {
                warn!(path = %path.display(), "skipping leftover temp file");
                continue;
            }
            out.push(path);
        }
    }
    Ok(())
}
