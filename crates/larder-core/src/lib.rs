//! Meal-planning domain: the catalogue and plan model, the entity stores that
//! persist them through a [`BlobStore`](larder_store::BlobStore), the pure
//! shopping/variety/distribution operations, a built-in starter catalogue,
//! and the [`Session`] that wires them together for one user.

pub mod defaults;
pub mod error;
pub mod model;
pub mod ops;
pub mod repo;
pub mod session;

pub use error::{DanglingReference, EntityKind, Error, MissingReferences, Referrer, Result};
pub use session::Session;
