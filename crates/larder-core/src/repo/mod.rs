//! Entity stores: one in-memory collection per entity kind, lazily loaded from
//! and explicitly saved to a single blob under the user's prefix.
//!
//! The shortlist is a single value rather than a keyed collection and has its
//! own [`ShortlistStore`] with the same load and save rules.
//!
//! Mutations only touch memory. Nothing is durable until [`EntityStore::save`]
//! runs, which the [`Session`](crate::Session) does on a successful commit.

mod catalogue;
mod contexts;
mod plans;
mod shortlist;

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use larder_store::BlobStore;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::error::{EntityKind, Error, Result};
use crate::model::{Dish, Ingredient, MonthlyPlan, UserContext};

pub use shortlist::ShortlistStore;

pub type IngredientStore = EntityStore<Ingredient>;
pub type DishStore = EntityStore<Dish>;
pub type PlanStore = EntityStore<MonthlyPlan>;
pub type ContextStore = EntityStore<UserContext>;

/// A record kept in an [`EntityStore`].
pub trait Entity: Clone + Serialize + DeserializeOwned {
    type Id: Ord + Clone + Borrow<str> + fmt::Display + Serialize;

    const KIND: EntityKind;
    /// Blob name under the user prefix, e.g. `dishes.json`.
    const FILE_NAME: &'static str;

    fn id(&self) -> &Self::Id;

    fn id_str(&self) -> &str {
        self.id().borrow()
    }

    /// Checks applied to every record read back from storage.
    fn validate(&self) -> Result<()>;
}

impl Entity for Ingredient {
    type Id = crate::model::IngredientId;
    const KIND: EntityKind = EntityKind::Ingredient;
    const FILE_NAME: &'static str = "ingredients.json";

    fn id(&self) -> &Self::Id {
        Ingredient::id(self)
    }

    fn validate(&self) -> Result<()> {
        Ingredient::validate(self)
    }
}

impl Entity for Dish {
    type Id = crate::model::DishId;
    const KIND: EntityKind = EntityKind::Dish;
    const FILE_NAME: &'static str = "dishes.json";

    fn id(&self) -> &Self::Id {
        Dish::id(self)
    }

    fn validate(&self) -> Result<()> {
        Dish::validate(self)
    }
}

impl Entity for MonthlyPlan {
    type Id = crate::model::PlanId;
    const KIND: EntityKind = EntityKind::Plan;
    const FILE_NAME: &'static str = "plans.json";

    fn id(&self) -> &Self::Id {
        MonthlyPlan::id(self)
    }

    // Month format and week count are enforced while decoding.
    // The id must still agree with the month.
    fn validate(&self) -> Result<()> {
        MonthlyPlan::validate(self)
    }
}

impl Entity for UserContext {
    type Id = crate::model::ContextId;
    const KIND: EntityKind = EntityKind::Context;
    const FILE_NAME: &'static str = "contexts.json";

    fn id(&self) -> &Self::Id {
        UserContext::id(self)
    }

    fn validate(&self) -> Result<()> {
        UserContext::validate(self)
    }
}

// -----------------------------------------------------------------------
// EntityStore
// -----------------------------------------------------------------------

/// In-memory collection of `E` backed by one blob.
pub struct EntityStore<E: Entity> {
    blobs: Arc<dyn BlobStore>,
    key: String,
    items: Option<BTreeMap<E::Id, E>>,
    dirty: bool,
}

impl<E: Entity> fmt::Debug for EntityStore<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityStore")
            .field("key", &self.key)
            .field("loaded", &self.items.as_ref().map(BTreeMap::len))
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl<E: Entity> EntityStore<E> {
    /// Store for `user_id`'s collection. Nothing is read until first use.
    pub fn for_user(blobs: Arc<dyn BlobStore>, user_id: &str) -> Self {
        Self {
            blobs,
            key: format!("{user_id}/{}", E::FILE_NAME),
            items: None,
            dirty: false,
        }
    }

    /// Blob key this store reads and writes.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether there are changes not yet written by [`save`](Self::save).
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn add(&mut self, entity: E) -> Result<E> {
        let items = self.items_mut()?;
        if items.contains_key(entity.id_str()) {
            return Err(Error::duplicate(E::KIND, entity.id()));
        }
        items.insert(entity.id().clone(), entity.clone());
        self.dirty = true;
        debug!(kind = %E::KIND, id = %entity.id(), "added");
        Ok(entity)
    }

    pub fn get(&mut self, id: &str) -> Result<E> {
        self.items_mut()?
            .get(id)
            .cloned()
            .ok_or_else(|| Error::not_found(E::KIND, id))
    }

    pub fn contains(&mut self, id: &str) -> Result<bool> {
        Ok(self.items_mut()?.contains_key(id))
    }

    /// Every record, ordered by id.
    pub fn list_all(&mut self) -> Result<Vec<E>> {
        Ok(self.items_mut()?.values().cloned().collect())
    }

    /// Records matching `pred`, ordered by id.
    pub fn filter(&mut self, pred: impl Fn(&E) -> bool) -> Result<Vec<E>> {
        Ok(self
            .items_mut()?
            .values()
            .filter(|e| pred(e))
            .cloned()
            .collect())
    }

    /// Replace the record with the same id. Fails when there is none.
    pub fn update(&mut self, entity: E) -> Result<E> {
        let items = self.items_mut()?;
        let Some(slot) = items.get_mut(entity.id_str()) else {
            return Err(Error::not_found(E::KIND, entity.id()));
        };
        *slot = entity.clone();
        self.dirty = true;
        debug!(kind = %E::KIND, id = %entity.id(), "updated");
        Ok(entity)
    }

    /// Insert or replace.
    pub fn upsert(&mut self, entity: E) -> Result<E> {
        self.items_mut()?.insert(entity.id().clone(), entity.clone());
        self.dirty = true;
        Ok(entity)
    }

    pub fn delete(&mut self, id: &str) -> Result<()> {
        if self.items_mut()?.remove(id).is_none() {
            return Err(Error::not_found(E::KIND, id));
        }
        self.dirty = true;
        debug!(kind = %E::KIND, id, "deleted");
        Ok(())
    }

    /// Write the collection as a JSON object keyed by id.
    ///
    /// A store that was never read has nothing to write and is left alone.
    pub fn save(&mut self) -> Result<()> {
        let Some(items) = &self.items else {
            return Ok(());
        };
        let bytes = serde_json::to_vec_pretty(items).map_err(|source| Error::Decode {
            key: self.key.clone(),
            source,
        })?;
        self.blobs.save(&self.key, &bytes)?;
        self.dirty = false;
        info!(key = %self.key, count = items.len(), bytes = bytes.len(), "saved collection");
        Ok(())
    }

    /// Drop the in-memory copy, unsaved changes included. The next access
    /// reads the blob again.
    pub fn reload(&mut self) {
        self.items = None;
        self.dirty = false;
    }

    fn items_mut(&mut self) -> Result<&mut BTreeMap<E::Id, E>> {
        if self.items.is_none() {
            self.items = Some(self.read()?);
        }
        Ok(self.items.get_or_insert_with(BTreeMap::new))
    }

    fn read(&self) -> Result<BTreeMap<E::Id, E>> {
        let Some(bytes) = self.blobs.load(&self.key)? else {
            debug!(key = %self.key, "no stored collection, starting empty");
            return Ok(BTreeMap::new());
        };
        let decoded: BTreeMap<String, E> =
            serde_json::from_slice(&bytes).map_err(|source| Error::Decode {
                key: self.key.clone(),
                source,
            })?;

        let mut items = BTreeMap::new();
        for (stored_key, entity) in decoded {
            entity.validate()?;
            if stored_key != entity.id_str() {
                return Err(Error::validation(format!(
                    "{}: entry {stored_key:?} holds {} {:?}",
                    self.key,
                    E::KIND,
                    entity.id_str()
                )));
            }
            items.insert(entity.id().clone(), entity);
        }
        debug!(key = %self.key, count = items.len(), "loaded collection");
        Ok(items)
    }
}
