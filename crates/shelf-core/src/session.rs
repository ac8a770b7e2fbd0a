//! Interaction cycle
//!
//! A `Session` owns everything a running catalog needs: the store, the
//! active filter, the renderer and what it renders into. Every interaction
//! goes through the same steps: mutate the store (which persists), derive
//! the view, render it.

use tracing::debug;

use crate::error::ShelfResult;
use crate::models::{Book, BookId, SortDirection};
use crate::render::{Container, EmptyState, Renderer};
use crate::storage::{FileKeyValueStore, KeyValueStore};
use crate::store::Store;
use crate::view::{build_view, CategoryFilter};

/// A running catalog: store, active filter and rendered output
pub struct Session<K = FileKeyValueStore> {
    store: Store<K>,
    filter: CategoryFilter,
    renderer: Renderer,
    container: Container,
    empty_state: EmptyState,
}

impl<K: KeyValueStore> Session<K> {
    /// Start a session over `store` and render the initial view
    pub fn new(store: Store<K>) -> Self {
        Self::with_filter(store, CategoryFilter::All)
    }

    /// Start a session with a filter already selected
    pub fn with_filter(store: Store<K>, filter: CategoryFilter) -> Self {
        let mut session = Self {
            store,
            filter,
            renderer: Renderer::new(),
            container: Container::new(),
            empty_state: EmptyState::new(),
        };
        session.refresh();
        session
    }

    // ==================== Interactions ====================

    /// Add a book and re-render
    ///
    /// A rejected book leaves the rendered view untouched.
    pub fn add_book(&mut self, title: &str, author: &str, category: &str) -> ShelfResult<Book> {
        match self.store.add(title, author, category) {
            Err(e) if e.is_validation() => Err(e),
            result => self.settle(result),
        }
    }

    /// Sort the full list by title and re-render
    pub fn sort(&mut self, direction: SortDirection) -> ShelfResult<()> {
        let result = self.store.sort_by_title(direction);
        self.settle(result)
    }

    /// Change the active filter and re-render
    pub fn set_filter(&mut self, filter: CategoryFilter) {
        debug!("Filter set to {}", filter);
        self.filter = filter;
        self.refresh();
    }

    /// Remove a book and re-render with the current filter
    pub fn delete(&mut self, id: BookId) -> ShelfResult<bool> {
        let result = self.store.remove(id);
        self.settle(result)
    }

    /// Remove every book, but only once the user has confirmed
    ///
    /// Returns whether the catalog was cleared. Declining changes nothing.
    pub fn clear_all(&mut self, confirmed: bool) -> ShelfResult<bool> {
        if !confirmed {
            debug!("Clear all declined");
            return Ok(false);
        }
        let result = self.store.clear().map(|()| true);
        self.settle(result)
    }

    /// Toggle the completed look of a displayed card
    pub fn toggle_complete(&mut self, id: BookId) -> Option<bool> {
        self.renderer.toggle_complete(&mut self.container, id)
    }

    /// Rebuild the view from the store and render it
    pub fn refresh(&mut self) {
        self.renderer.retain_books(self.store.books());
        let view = build_view(self.store.books(), &self.filter);
        self.renderer
            .render(&mut self.container, &mut self.empty_state, &view);
    }

    /// Re-render after a mutation, whether or not it was persisted
    fn settle<T>(&mut self, result: ShelfResult<T>) -> ShelfResult<T> {
        self.refresh();
        result
    }

    // ==================== Accessors ====================

    pub fn store(&self) -> &Store<K> {
        &self.store
    }

    pub fn filter(&self) -> &CategoryFilter {
        &self.filter
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn empty_state(&self) -> &EmptyState {
        &self.empty_state
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Markup for the grid and the empty-state indicator
    pub fn to_html(&self) -> String {
        format!(
            "{}\n{}",
            self.container.to_html(),
            self.empty_state.to_html()
        )
    }
}
