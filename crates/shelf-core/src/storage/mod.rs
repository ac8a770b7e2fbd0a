//! Storage layer
//!
//! Handles persistence of the book catalog.
//!
//! ## Architecture
//!
//! - **KeyValueStore**: whole-value slots (files on disk, or memory)
//! - **BookPersistence**: the catalog as one JSON blob under a fixed key
//!
//! Every mutation rewrites the blob in full.

pub mod error;
pub mod kv;
pub mod persistence;

pub use error::{StorageError, StorageResult};
pub use kv::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
pub use persistence::{BookPersistence, STORAGE_KEY};
