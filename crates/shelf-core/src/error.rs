//! Catalog errors

use thiserror::Error;

use crate::storage::StorageError;

/// A new book was rejected before it reached the catalog
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Title was empty after trimming
    #[error("Please enter a book title.")]
    MissingTitle,

    /// Author was empty after trimming
    #[error("Please enter the author's name.")]
    MissingAuthor,
}

impl ValidationError {
    /// Check the fields of a new book, title first
    ///
    /// Both fields are judged after trimming.
    pub fn check(title: &str, author: &str) -> Result<(), ValidationError> {
        if title.trim().is_empty() {
            return Err(ValidationError::MissingTitle);
        }
        if author.trim().is_empty() {
            return Err(ValidationError::MissingAuthor);
        }
        Ok(())
    }
}

/// Errors returned by catalog operations
#[derive(Error, Debug)]
pub enum ShelfError {
    /// Input failed validation; nothing was changed
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The catalog could not be persisted
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ShelfError {
    /// Whether this error should be shown to the user as a form message
    pub fn is_validation(&self) -> bool {
        matches!(self, ShelfError::Validation(_))
    }
}

/// Result type for catalog operations
pub type ShelfResult<T> = Result<T, ShelfError>;
