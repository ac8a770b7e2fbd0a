//! Catalog store
//!
//! The `Store` is the single owner of the book list. It loads the list once
//! when opened and writes the full list back after every mutation.
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = Store::open()?;
//!
//! let book = store.add("Dune", "Frank Herbert", "Fiction")?;
//! store.sort_by_title(SortDirection::Ascending)?;
//! store.remove(book.id)?;
//! ```

use std::cmp::Ordering;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{ShelfResult, ValidationError};
use crate::models::{Book, BookId, IdGenerator, SortDirection};
use crate::storage::{
    BookPersistence, FileKeyValueStore, KeyValueStore, MemoryKeyValueStore, StorageResult,
    STORAGE_KEY,
};

/// Owner of the book list and its persisted mirror
pub struct Store<K = FileKeyValueStore> {
    /// The full list, in insertion order or the order of the last sort
    books: Vec<Book>,
    /// Persistence for the list
    persistence: BookPersistence<K>,
    /// Source of fresh ids
    ids: IdGenerator,
}

impl Store<FileKeyValueStore> {
    /// Open the store using the default configuration
    pub fn open() -> Result<Self> {
        let config = Config::load().context("Failed to load configuration")?;
        Ok(Self::open_with_config(&config))
    }

    /// Open the store in the data directory of `config`
    pub fn open_with_config(config: &Config) -> Self {
        Self::with_backend(FileKeyValueStore::new(&config.data_dir))
    }
}

impl Store<MemoryKeyValueStore> {
    /// Open an in-memory copy of the catalog saved under `config`
    ///
    /// Changes are kept for the life of the store and never written back.
    pub fn ephemeral(config: &Config) -> Self {
        let file = FileKeyValueStore::new(&config.data_dir);
        let backend = match file.get(STORAGE_KEY) {
            Ok(Some(blob)) => MemoryKeyValueStore::with_value(STORAGE_KEY, blob),
            Ok(None) => MemoryKeyValueStore::new(),
            Err(e) => {
                warn!("Could not read {}: {}", file.describe(STORAGE_KEY), e);
                MemoryKeyValueStore::new()
            }
        };
        Self::with_backend(backend)
    }
}

impl<K: KeyValueStore> Store<K> {
    /// Open a store on any key-value backend, loading the persisted list
    pub fn with_backend(backend: K) -> Self {
        let persistence = BookPersistence::new(backend);
        let books = persistence.load();
        let ids = IdGenerator::seeded(books.iter().map(|b| &b.id));

        Self {
            books,
            persistence,
            ids,
        }
    }

    // ==================== Mutations ====================

    /// Add a new book
    ///
    /// Title and author are trimmed and must not be empty. The category is
    /// taken as given. Nothing is changed or written when validation fails.
    pub fn add(&mut self, title: &str, author: &str, category: &str) -> ShelfResult<Book> {
        ValidationError::check(title, author)?;

        let id = self.ids.next_id(|id| self.books.iter().any(|b| b.id == id));
        let book = Book::new(id, title.trim(), author.trim(), category);
        debug!("Adding book {} ({:?})", book.id, book.title);
        self.books.push(book.clone());
        self.save()?;
        Ok(book)
    }

    /// Remove the book with `id`
    ///
    /// Removing an id that is not held is a no-op. Returns whether a book
    /// was removed.
    pub fn remove(&mut self, id: BookId) -> ShelfResult<bool> {
        let before = self.books.len();
        self.books.retain(|b| b.id != id);
        let removed = self.books.len() != before;
        self.save()?;
        Ok(removed)
    }

    /// Remove every book
    pub fn clear(&mut self) -> ShelfResult<()> {
        self.books.clear();
        self.save()?;
        Ok(())
    }

    /// Reorder the list by title, ignoring case
    ///
    /// The sort is stable: books whose titles compare equal keep their
    /// relative order.
    pub fn sort_by_title(&mut self, direction: SortDirection) -> ShelfResult<()> {
        self.books.sort_by(|a, b| match direction {
            SortDirection::Ascending => compare_titles(&a.title, &b.title),
            SortDirection::Descending => compare_titles(&b.title, &a.title),
        });
        self.save()?;
        Ok(())
    }

    /// Write the full list to storage
    pub fn save(&mut self) -> StorageResult<()> {
        self.persistence.save(&self.books)?;
        debug!("Saved {} book(s)", self.books.len());
        Ok(())
    }

    // ==================== Queries ====================

    /// All books in their current order
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    /// Get a book by id
    pub fn get(&self, id: BookId) -> Option<&Book> {
        self.books.iter().find(|b| b.id == id)
    }

    /// Number of books held
    pub fn len(&self) -> usize {
        self.books.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Categories used by at least one book, with counts, in order of
    /// first appearance
    pub fn categories_in_use(&self) -> Vec<(String, usize)> {
        let mut counts: Vec<(String, usize)> = Vec::new();
        for book in &self.books {
            match counts.iter_mut().find(|(name, _)| *name == book.category) {
                Some((_, count)) => *count += 1,
                None => counts.push((book.category.clone(), 1)),
            }
        }
        counts
    }

    // ==================== Storage ====================

    /// Location of the persisted blob
    pub fn location(&self) -> String {
        self.persistence.location()
    }

    /// Size of the persisted blob in bytes
    pub fn blob_size(&self) -> StorageResult<Option<u64>> {
        self.persistence.blob_size()
    }

    /// Get the storage backend
    pub fn backend(&self) -> &K {
        self.persistence.backend()
    }

    /// Get mutable access to the storage backend
    pub fn backend_mut(&mut self) -> &mut K {
        self.persistence.backend_mut()
    }
}

/// Case-insensitive title ordering
fn compare_titles(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ShelfError;
    use crate::storage::{MemoryKeyValueStore, StorageError, STORAGE_KEY};
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn memory_store() -> Store<MemoryKeyValueStore> {
        Store::with_backend(MemoryKeyValueStore::new())
    }

    fn titles<K: KeyValueStore>(store: &Store<K>) -> Vec<&str> {
        store.books().iter().map(|b| b.title.as_str()).collect()
    }

    fn test_config(temp_dir: &TempDir) -> Config {
        Config {
            data_dir: temp_dir.path().to_path_buf(),
            categories: vec!["Fiction".to_string(), "Science".to_string()],
            log_file: None,
        }
    }

    #[test]
    fn test_open_empty_store() {
        let store = memory_store();
        assert!(store.is_empty());
        assert_eq!(store.backend().writes(), 0);
    }

    #[test]
    fn test_open_with_malformed_blob_starts_empty() {
        let store = Store::with_backend(MemoryKeyValueStore::with_value(STORAGE_KEY, "[{oops"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_add_after_max_id_stays_unique() {
        let blob = format!(
            r#"[{{"id":{},"title":"Last","author":"A","category":"Fiction","imageUrl":"x.jpg"}}]"#,
            BookId::MAX
        );
        let mut store = Store::with_backend(MemoryKeyValueStore::with_value(STORAGE_KEY, blob));

        let first = store.add("New", "B", "Fiction").unwrap();
        let second = store.add("Newer", "C", "Fiction").unwrap();
        assert_ne!(first.id, BookId::MAX);
        assert_ne!(first.id, second.id);
        assert_ne!(second.id, BookId::MAX);

        // Removing the new book leaves the loaded one in place
        assert!(store.remove(first.id).unwrap());
        assert_eq!(titles(&store), vec!["Last", "Newer"]);
    }

    #[test]
    fn test_add_appends_and_saves() {
        let mut store = memory_store();
        store.add("Dune", "Frank Herbert", "Fiction").unwrap();

        let book = store.add("Cosmos", "Carl Sagan", "Science").unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.get(book.id), Some(&book));
        assert_eq!(store.books().last(), Some(&book));
        assert_eq!(store.backend().writes(), 2);

        // The saved blob is the full updated list
        let reloaded = Store::with_backend(store.backend().clone());
        assert_eq!(reloaded.books(), store.books());
    }

    #[test]
    fn test_add_trims_fields() {
        let mut store = memory_store();
        let book = store.add("  Dune ", "\tFrank Herbert\n", "Fiction").unwrap();
        assert_eq!(book.title, "Dune");
        assert_eq!(book.author, "Frank Herbert");
    }

    #[test]
    fn test_add_empty_title_rejected_without_write() {
        let mut store = memory_store();

        let err = store.add("   ", "Someone", "Fiction").unwrap_err();
        assert!(matches!(
            err,
            ShelfError::Validation(ValidationError::MissingTitle)
        ));
        assert!(store.is_empty());
        assert_eq!(store.backend().writes(), 0);
    }

    #[test]
    fn test_add_empty_author_rejected_without_write() {
        let mut store = memory_store();

        let err = store.add("Dune", "", "Fiction").unwrap_err();
        assert!(matches!(
            err,
            ShelfError::Validation(ValidationError::MissingAuthor)
        ));
        assert!(store.is_empty());
        assert_eq!(store.backend().writes(), 0);
    }

    #[test]
    fn test_title_checked_before_author() {
        let mut store = memory_store();
        let err = store.add("", "", "Fiction").unwrap_err();
        assert!(matches!(
            err,
            ShelfError::Validation(ValidationError::MissingTitle)
        ));
    }

    #[test]
    fn test_ids_are_unique() {
        let mut store = memory_store();
        let ids: Vec<BookId> = (0..50)
            .map(|i| store.add(&format!("Book {}", i), "Author", "Fiction").unwrap().id)
            .collect();

        let mut deduped = ids.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(deduped.len(), ids.len());
    }

    #[test]
    fn test_ids_stay_unique_after_reload() {
        let mut store = memory_store();
        let first = store.add("One", "A", "Fiction").unwrap();

        let mut reopened = Store::with_backend(store.backend().clone());
        let second = reopened.add("Two", "B", "Fiction").unwrap();
        assert!(second.id > first.id);
    }

    #[test]
    fn test_remove() {
        let mut store = memory_store();
        let book = store.add("Dune", "Frank Herbert", "Fiction").unwrap();

        assert!(store.remove(book.id).unwrap());
        assert!(store.is_empty());
        assert!(store.get(book.id).is_none());
    }

    #[test]
    fn test_remove_absent_id_is_noop() {
        let mut store = memory_store();
        store.add("Dune", "Frank Herbert", "Fiction").unwrap();

        assert!(!store.remove(42).unwrap());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut store = memory_store();
        store.add("Dune", "Frank Herbert", "Fiction").unwrap();
        store.add("Cosmos", "Carl Sagan", "Science").unwrap();

        store.clear().unwrap();
        assert!(store.is_empty());

        let reloaded = Store::with_backend(store.backend().clone());
        assert!(reloaded.is_empty());
    }

    #[test]
    fn test_sort_is_case_insensitive() {
        let mut store = memory_store();
        store.add("Banana", "A", "Fiction").unwrap();
        store.add("apple", "B", "Fiction").unwrap();

        store.sort_by_title(SortDirection::Ascending).unwrap();
        assert_eq!(titles(&store), vec!["apple", "Banana"]);

        store.sort_by_title(SortDirection::Descending).unwrap();
        assert_eq!(titles(&store), vec!["Banana", "apple"]);
    }

    #[test]
    fn test_sort_desc_reverses_asc() {
        let mut store = memory_store();
        for title in ["kiwi", "Fig", "date", "Cherry", "elderberry", "grape"] {
            store.add(title, "Grower", "Fiction").unwrap();
        }

        store.sort_by_title(SortDirection::Ascending).unwrap();
        let mut ascending: Vec<String> = titles(&store).iter().map(|t| t.to_string()).collect();

        store.sort_by_title(SortDirection::Descending).unwrap();
        ascending.reverse();
        assert_eq!(titles(&store), ascending);
    }

    #[test]
    fn test_sort_is_stable_for_equal_titles() {
        let mut store = memory_store();
        let first = store.add("Same", "First", "Fiction").unwrap();
        let second = store.add("SAME", "Second", "Fiction").unwrap();
        store.add("Another", "Third", "Fiction").unwrap();

        store.sort_by_title(SortDirection::Ascending).unwrap();
        assert_eq!(store.books()[1].id, first.id);
        assert_eq!(store.books()[2].id, second.id);

        store.sort_by_title(SortDirection::Descending).unwrap();
        assert_eq!(store.books()[0].id, first.id);
        assert_eq!(store.books()[1].id, second.id);
    }

    #[test]
    fn test_sort_persists_order() {
        let mut store = memory_store();
        store.add("b", "x", "Fiction").unwrap();
        store.add("a", "y", "Fiction").unwrap();
        store.sort_by_title(SortDirection::Ascending).unwrap();

        let reloaded = Store::with_backend(store.backend().clone());
        assert_eq!(titles(&reloaded), vec!["a", "b"]);
    }

    #[test]
    fn test_sort_empty_list() {
        let mut store = memory_store();
        store.sort_by_title(SortDirection::Descending).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_write_failure_propagates() {
        let mut store = memory_store();
        store.backend_mut().fail_writes(true);

        let err = store.add("Dune", "Frank Herbert", "Fiction").unwrap_err();
        assert!(matches!(
            err,
            ShelfError::Storage(StorageError::DiskFull { .. })
        ));
    }

    #[test]
    fn test_categories_in_use() {
        let mut store = memory_store();
        store.add("Dune", "Frank Herbert", "Fiction").unwrap();
        store.add("Cosmos", "Carl Sagan", "Science").unwrap();
        store.add("Emma", "Jane Austen", "Fiction").unwrap();

        assert_eq!(
            store.categories_in_use(),
            vec![("Fiction".to_string(), 2), ("Science".to_string(), 1)]
        );
    }

    #[test]
    fn test_data_persists_across_reopens() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        let added;
        {
            let mut store = Store::open_with_config(&config);
            added = store.add("Persistent", "Author", "Science").unwrap();
        }

        let store = Store::open_with_config(&config);
        assert_eq!(store.books(), &[added]);
        assert_eq!(
            PathBuf::from(store.location()),
            temp_dir.path().join("shelf_books.json")
        );
    }

    #[test]
    fn test_ephemeral_store_never_writes_back() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        let saved = {
            let mut store = Store::open_with_config(&config);
            store.add("Kept", "Author", "Fiction").unwrap()
        };

        let mut scratch = Store::ephemeral(&config);
        assert_eq!(scratch.books(), &[saved.clone()]);
        scratch.clear().unwrap();
        assert!(scratch.is_empty());

        let store = Store::open_with_config(&config);
        assert_eq!(store.books(), &[saved]);
    }
}
