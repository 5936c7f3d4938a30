//! Shared test utilities for larder integration tests.
//!
//! [`TempStore`] gives each test its own on-disk blob store that is removed
//! when the fixture drops. The catalogue helpers build the small
//! Rice / Spinach / Fried Rice data set most scenarios start from.

use std::path::Path;
use std::sync::Arc;

use larder_core::Session;
use larder_core::model::{Cuisine, Dish, Ingredient, Month, PurchaseType};
use larder_store::{BlobStore, LocalBlobStore, StoreConfig};
use tempfile::TempDir;

/// Local blob store rooted in a temporary directory.
pub struct TempStore {
    blobs: Arc<LocalBlobStore>,
    // Dropped last; removes the directory.
    _dir: TempDir,
}

impl TempStore {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let blobs = LocalBlobStore::new(dir.path()).expect("failed to open blob store");
        Self {
            blobs: Arc::new(blobs),
            _dir: dir,
        }
    }

    pub fn path(&self) -> &Path {
        self.blobs.root()
    }

    pub fn blobs(&self) -> Arc<dyn BlobStore> {
        self.blobs.clone()
    }

    /// Config pointing at this store for `user_id`.
    pub fn config(&self, user_id: &str) -> StoreConfig {
        StoreConfig::new(self.path(), user_id)
    }

    /// A fresh session for `user_id`; nothing is loaded yet.
    pub fn session(&self, user_id: &str) -> Session {
        Session::open(self.blobs(), user_id)
    }
}

impl Default for TempStore {
    fn default() -> Self {
        Self::new()
    }
}

/// `2025-01`.
pub fn january() -> Month {
    "2025-01".parse().expect("valid month")
}

/// `ING-1` Rice, bought in bulk.
pub fn rice() -> Ingredient {
    Ingredient::from_parts("ING-1", "Rice", PurchaseType::Bulk).expect("valid ingredient")
}

/// `ING-2` Spinach, bought weekly.
pub fn spinach() -> Ingredient {
    Ingredient::from_parts("ING-2", "Spinach", PurchaseType::Weekly).expect("valid ingredient")
}

/// `DISH-1` Fried Rice using Rice and Spinach.
pub fn fried_rice() -> Dish {
    Dish::from_parts("DISH-1", "Fried Rice", Cuisine::Chinese)
        .expect("valid dish")
        .with_ingredients(["ING-1", "ING-2"])
}

/// Add Rice, Spinach and Fried Rice to `session` and commit them.
pub fn seed_fried_rice(session: &mut Session) {
    session
        .run(|s| {
            s.ingredients().add(rice())?;
            s.ingredients().add(spinach())?;
            s.dishes().add(fried_rice())?;
            Ok(())
        })
        .expect("failed to seed catalogue");
}
