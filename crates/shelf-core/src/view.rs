//! View derivation
//!
//! The visible list is always recomputed from the full list and the active
//! category filter. Nothing here mutates its input.

use std::fmt;

use crate::models::Book;

/// Text of the sentinel filter that matches every book
pub const ALL_FILTER: &str = "All";

/// Active category restriction
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// No restriction
    #[default]
    All,
    /// Only books whose category equals this value exactly
    Category(String),
}

impl CategoryFilter {
    /// Filter from optional user input; unset means `All`
    pub fn from_option(value: Option<&str>) -> Self {
        value.map(Self::from).unwrap_or_default()
    }

    /// Whether `book` passes the filter
    pub fn matches(&self, book: &Book) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Category(category) => book.category == *category,
        }
    }

    /// Text shown in selectors and status lines
    pub fn label(&self) -> &str {
        match self {
            CategoryFilter::All => ALL_FILTER,
            CategoryFilter::Category(category) => category,
        }
    }
}

impl From<&str> for CategoryFilter {
    fn from(value: &str) -> Self {
        if value.is_empty() || value == ALL_FILTER {
            CategoryFilter::All
        } else {
            CategoryFilter::Category(value.to_string())
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Derive the visible books from the full list
///
/// `All` yields a copy of the whole list in its current order; a category
/// yields only the books filed under it, order preserved.
pub fn build_view(books: &[Book], filter: &CategoryFilter) -> Vec<Book> {
    books
        .iter()
        .filter(|book| filter.matches(book))
        .cloned()
        .collect()
}
