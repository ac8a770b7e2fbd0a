//! Data models for SHELF
//!
//! A `Book` is the only persisted entity. The serialized field names match
//! the blob layout (`imageUrl` in camel case) so existing catalogs load
//! unchanged.

use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Identifier of a book, unique among the books currently held
pub type BookId = i64;

/// Cover shown for every book
pub const PLACEHOLDER_IMAGE: &str = "https://m.media-amazon.com/images/I/71ZB18P3inL._SY522_.jpg";

/// A catalogued book
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Book {
    /// Unique identifier
    pub id: BookId,
    /// Book title
    pub title: String,
    /// Author name
    pub author: String,
    /// Category the book is filed under
    pub category: String,
    /// Cover image reference
    #[serde(rename = "imageUrl")]
    pub image_url: String,
}

impl Book {
    /// Create a book with the placeholder cover
    pub fn new(
        id: BookId,
        title: impl Into<String>,
        author: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            author: author.into(),
            category: category.into(),
            image_url: PLACEHOLDER_IMAGE.to_string(),
        }
    }
}

/// Direction for title sorting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// A → Z
    Ascending,
    /// Z → A
    Descending,
}

impl SortDirection {
    /// Short label shown in status messages
    pub fn label(self) -> &'static str {
        match self {
            SortDirection::Ascending => "A→Z",
            SortDirection::Descending => "Z→A",
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" | "az" | "a-z" => Ok(SortDirection::Ascending),
            "desc" | "descending" | "za" | "z-a" => Ok(SortDirection::Descending),
            other => Err(format!(
                "Unknown sort direction '{}'. Use 'asc' or 'desc'.",
                other
            )),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Ascending => write!(f, "asc"),
            SortDirection::Descending => write!(f, "desc"),
        }
    }
}

/// Hands out book ids
///
/// Ids track the wall clock in milliseconds but never repeat: each id is
/// strictly greater than every id held when the generator was seeded and
/// every id it has issued since.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: BookId,
}

impl IdGenerator {
    /// Seed from the ids already in the catalog
    pub fn seeded<'a>(ids: impl IntoIterator<Item = &'a BookId>) -> Self {
        Self {
            last: ids.into_iter().copied().max().unwrap_or(0),
        }
    }

    /// Issue the next id
    ///
    /// Ids normally climb past every id issued or held. Once `BookId::MAX`
    /// is taken there is nothing above it, so the newest free id at or
    /// below the current time is issued instead. `is_held` reports ids
    /// already in the catalog.
    pub fn next_id(&mut self, is_held: impl Fn(BookId) -> bool) -> BookId {
        let now = Utc::now().timestamp_millis();
        if let Some(next) = self.last.checked_add(1) {
            self.last = now.max(next);
            return self.last;
        }

        (BookId::MIN..=now)
            .rev()
            .find(|id| !is_held(*id))
            .unwrap_or(BookId::MIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_new_uses_placeholder() {
        let book = Book::new(7, "Dune", "Frank Herbert", "Fiction");
        assert_eq!(book.id, 7);
        assert_eq!(book.title, "Dune");
        assert_eq!(book.image_url, PLACEHOLDER_IMAGE);
    }

    #[test]
    fn test_book_blob_field_names() {
        let book = Book::new(1, "Dune", "Frank Herbert", "Fiction");
        let json = serde_json::to_value(&book).unwrap();
        assert_eq!(json["imageUrl"], PLACEHOLDER_IMAGE);
        assert!(json.get("image_url").is_none());
        assert_eq!(json["id"], 1);
    }

    #[test]
    fn test_book_parses_stored_layout() {
        let raw = r#"{"id":1700000000123,"title":"Emma","author":"Jane Austen","category":"Fiction","imageUrl":"x.jpg"}"#;
        let book: Book = serde_json::from_str(raw).unwrap();
        assert_eq!(book.id, 1_700_000_000_123);
        assert_eq!(book.author, "Jane Austen");
        assert_eq!(book.image_url, "x.jpg");
    }

    #[test]
    fn test_sort_direction_parse() {
        assert_eq!("asc".parse::<SortDirection>(), Ok(SortDirection::Ascending));
        assert_eq!("Z-A".parse::<SortDirection>(), Ok(SortDirection::Descending));
        assert!("sideways".parse::<SortDirection>().is_err());
        assert_eq!(SortDirection::Descending.to_string(), "desc");
    }

    #[test]
    fn test_ids_strictly_increase() {
        let mut ids = IdGenerator::default();
        let first = ids.next_id(|_| false);
        let second = ids.next_id(|_| false);
        let third = ids.next_id(|_| false);
        assert!(first < second && second < third);
    }

    #[test]
    fn test_seeded_ids_stay_above_held_ids() {
        let far_future = Utc::now().timestamp_millis() + 1_000_000;
        let held = [3, far_future, 12];
        let mut ids = IdGenerator::seeded(held.iter());
        assert_eq!(ids.next_id(|_| false), far_future + 1);
    }

    #[test]
    fn test_ids_past_max_skip_held_ids() {
        let now = Utc::now().timestamp_millis();
        let held = [BookId::MAX, now, now + 1];
        let mut ids = IdGenerator::seeded(held.iter());

        let first = ids.next_id(|id| held.contains(&id));
        assert!(!held.contains(&first));

        let taken = [BookId::MAX, now, now + 1, first];
        let second = ids.next_id(|id| taken.contains(&id));
        assert!(!taken.contains(&second));
    }
}
