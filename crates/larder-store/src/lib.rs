//! Byte-oriented persistence for larder.
//!
//! A [`BlobStore`] maps opaque, path-like string keys to byte blobs. It knows
//! nothing about JSON, users or meal planning; serialization belongs to the
//! caller. Two adapters are provided: [`LocalBlobStore`] for the filesystem
//! and [`MemoryBlobStore`] for tests and ephemeral sessions.

pub mod blob;
pub mod config;
pub mod error;
pub mod local;
pub mod memory;
pub mod migration;

pub use blob::{BlobStore, validate_key};
pub use config::StoreConfig;
pub use error::StorageError;
pub use local::LocalBlobStore;
pub use memory::MemoryBlobStore;
