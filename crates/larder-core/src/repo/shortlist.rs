use std::sync::Arc;

use larder_store::BlobStore;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::model::{DishId, Shortlist};

/// The user's [`Shortlist`], kept in one blob and loaded on first use.
///
/// Like [`EntityStore`](super::EntityStore), changes stay in memory until
/// [`save`](Self::save).
pub struct ShortlistStore {
    blobs: Arc<dyn BlobStore>,
    key: String,
    current: Option<Shortlist>,
    dirty: bool,
}

impl std::fmt::Debug for ShortlistStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShortlistStore")
            .field("key", &self.key)
            .field("loaded", &self.current.as_ref().map(Shortlist::len))
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl ShortlistStore {
    pub const FILE_NAME: &'static str = "shortlist.json";

    pub fn for_user(blobs: Arc<dyn BlobStore>, user_id: &str) -> Self {
        Self {
            blobs,
            key: format!("{user_id}/{}", Self::FILE_NAME),
            current: None,
            dirty: false,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn get(&mut self) -> Result<Shortlist> {
        Ok(self.current_mut()?.clone())
    }

    /// Append `id`. Returns `false` when it was already listed.
    pub fn add(&mut self, id: DishId) -> Result<bool> {
        let current = self.current_mut()?;
        if current.contains(id.as_str()) {
            return Ok(false);
        }
        *current = current.with_dish(id);
        self.dirty = true;
        Ok(true)
    }

    /// Remove `id`. Returns `false` when it was not listed.
    pub fn remove(&mut self, id: &str) -> Result<bool> {
        let current = self.current_mut()?;
        if !current.contains(id) {
            return Ok(false);
        }
        *current = current.without_dish(id);
        self.dirty = true;
        Ok(true)
    }

    /// Keep only the dishes `keep` accepts. Returns how many were dropped.
    pub fn retain(&mut self, keep: impl Fn(&DishId) -> bool) -> Result<usize> {
        let current = self.current_mut()?;
        let kept = current.retain(keep);
        let dropped = current.len() - kept.len();
        if dropped > 0 {
            *current = kept;
            self.dirty = true;
        }
        Ok(dropped)
    }

    /// Empty the shortlist. Returns how many dishes it held.
    pub fn clear(&mut self) -> Result<usize> {
        self.retain(|_| false)
    }

    pub fn save(&mut self) -> Result<()> {
        let Some(current) = &self.current else {
            return Ok(());
        };
        let bytes = serde_json::to_vec_pretty(current).map_err(|source| Error::Decode {
            key: self.key.clone(),
            source,
        })?;
        self.blobs.save(&self.key, &bytes)?;
        self.dirty = false;
        info!(key = %self.key, count = current.len(), "saved shortlist");
        Ok(())
    }

    pub fn reload(&mut self) {
        self.current = None;
        self.dirty = false;
    }

    fn current_mut(&mut self) -> Result<&mut Shortlist> {
        if self.current.is_none() {
            self.current = Some(self.read()?);
        }
        Ok(self.current.get_or_insert_with(Shortlist::new))
    }

    fn read(&self) -> Result<Shortlist> {
        let Some(bytes) = self.blobs.load(&self.key)? else {
            debug!(key = %self.key, "no stored shortlist, starting empty");
            return Ok(Shortlist::new());
        };
        let shortlist: Shortlist =
            serde_json::from_slice(&bytes).map_err(|source| Error::Decode {
                key: self.key.clone(),
                source,
            })?;
        shortlist.validate()?;
        Ok(shortlist)
    }
}
