//! Command handlers

pub mod book;
pub mod config;
pub mod export;
pub mod status;

use shelf_core::ShelfError;

/// Turn a catalog error into a CLI error, adding a recovery hint for
/// storage failures
pub fn with_hint(err: ShelfError) -> anyhow::Error {
    let hint = match &err {
        ShelfError::Storage(storage) => storage.recovery_suggestion(),
        ShelfError::Validation(_) => None,
    };

    match hint {
        Some(hint) => anyhow::Error::new(err).context(format!("Failed to save catalog. {}", hint)),
        None => anyhow::Error::new(err),
    }
}
