//! Book list persistence
//!
//! The whole catalog is stored as one JSON array under a fixed key. Every
//! save overwrites the slot in full; loads never fail, a missing or damaged
//! blob simply yields an empty catalog.

use tracing::{error, info};

use super::error::StorageResult;
use super::kv::KeyValueStore;
use crate::models::Book;

/// Key of the slot holding the catalog
pub const STORAGE_KEY: &str = "shelf_books";

/// Serializes the book list into a key-value slot
#[derive(Debug, Clone)]
pub struct BookPersistence<K> {
    backend: K,
}

impl<K: KeyValueStore> BookPersistence<K> {
    /// Wrap a key-value backend
    pub fn new(backend: K) -> Self {
        Self { backend }
    }

    /// Get the underlying backend
    pub fn backend(&self) -> &K {
        &self.backend
    }

    /// Get mutable access to the underlying backend
    pub fn backend_mut(&mut self) -> &mut K {
        &mut self.backend
    }

    /// Read the persisted catalog
    ///
    /// Returns an empty list when nothing has been stored yet. Unreadable or
    /// unparseable data is logged and also treated as an empty list.
    pub fn load(&self) -> Vec<Book> {
        let raw = match self.backend.get(STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                error!("Failed to read books from storage: {}", e);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Book>>(&raw) {
            Ok(books) => {
                info!(
                    "Loaded {} book(s) from {}",
                    books.len(),
                    self.backend.describe(STORAGE_KEY)
                );
                books
            }
            Err(e) => {
                error!("Failed to parse books from storage: {}", e);
                Vec::new()
            }
        }
    }

    /// Overwrite the persisted catalog with `books`
    pub fn save(&mut self, books: &[Book]) -> StorageResult<()> {
        let blob = serde_json::to_string(books)?;
        self.backend.set(STORAGE_KEY, &blob)
    }

    /// Location of the catalog slot, for status output
    pub fn location(&self) -> String {
        self.backend.describe(STORAGE_KEY)
    }

    /// Size of the persisted blob in bytes
    pub fn blob_size(&self) -> StorageResult<Option<u64>> {
        self.backend.size_of(STORAGE_KEY)
    }
}
