//! SHELF Core Library
//!
//! This crate provides the core functionality for SHELF, a personal book
//! catalog: adding books, sorting and filtering them, and rendering the
//! visible set as cards.
//!
//! # Architecture
//!
//! Every interaction runs the same synchronous cycle:
//!
//! 1. mutate the `Store`, which rewrites the persisted list in full
//! 2. derive the visible list with `build_view`
//! 3. render it into a `Container` with the `Renderer`
//!
//! A `Session` owns all of the above and runs the cycle.
//!
//! # Quick Start
//!
//! ```text
//! let store = Store::open()?;
//! let mut session = Session::new(store);
//!
//! session.add_book("Dune", "Frank Herbert", "Fiction")?;
//! session.sort(SortDirection::Ascending)?;
//! session.set_filter(CategoryFilter::from("Fiction"));
//!
//! for card in session.container().cards() {
//!     println!("{}", card.title);
//! }
//! ```
//!
//! # Modules
//!
//! - `store`: Owner of the book list (main entry point)
//! - `view`: Category filtering
//! - `render`: Cards, container and empty state
//! - `session`: The mutate/persist/render cycle
//! - `models`: Book records, ids, sort direction
//! - `storage`: Key-value persistence
//! - `config`: Application configuration

pub mod config;
pub mod error;
pub mod models;
pub mod render;
pub mod session;
pub mod storage;
pub mod store;
pub mod view;

pub use config::Config;
pub use error::{ShelfError, ShelfResult, ValidationError};
pub use models::{Book, BookId, SortDirection};
pub use render::{Card, CardAction, Container, EmptyState, Renderer};
pub use session::Session;
pub use storage::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore, StorageError};
pub use store::Store;
pub use view::{build_view, CategoryFilter};
