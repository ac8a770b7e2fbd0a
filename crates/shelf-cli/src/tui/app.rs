//! Application state and logic

use std::time::{Duration, Instant};

use shelf_core::{
    BookId, Card, CategoryFilter, Config, KeyValueStore, Session, ShelfError, SortDirection,
};

/// Input mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Normal navigation mode
    Normal,
    /// The add-book form is open
    AddForm,
    /// Waiting for a yes/no on clearing the catalog
    ConfirmClear,
}

/// Which pane has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivePane {
    Filters,
    Items,
    Detail,
}

impl ActivePane {
    /// Move to the next pane (wrapping)
    pub fn next(self) -> Self {
        match self {
            ActivePane::Filters => ActivePane::Items,
            ActivePane::Items => ActivePane::Detail,
            ActivePane::Detail => ActivePane::Filters,
        }
    }

    /// Move to the previous pane (wrapping)
    pub fn prev(self) -> Self {
        match self {
            ActivePane::Filters => ActivePane::Detail,
            ActivePane::Items => ActivePane::Filters,
            ActivePane::Detail => ActivePane::Items,
        }
    }
}

/// Field of the add form that has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Author,
    Category,
}

impl FormField {
    pub fn next(self) -> Self {
        match self {
            FormField::Title => FormField::Author,
            FormField::Author => FormField::Category,
            FormField::Category => FormField::Title,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            FormField::Title => FormField::Category,
            FormField::Author => FormField::Title,
            FormField::Category => FormField::Author,
        }
    }
}

/// Contents of the add-book form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddForm {
    pub title: String,
    pub author: String,
    /// Index into the configured categories
    pub category_index: usize,
    pub field: FormField,
}

impl Default for AddForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            author: String::new(),
            category_index: 0,
            field: FormField::Title,
        }
    }
}

impl AddForm {
    /// Type a character into the focused text field
    pub fn insert_char(&mut self, c: char) {
        match self.field {
            FormField::Title => self.title.push(c),
            FormField::Author => self.author.push(c),
            FormField::Category => {}
        }
    }

    /// Delete the last character of the focused text field
    pub fn delete_char(&mut self) {
        match self.field {
            FormField::Title => {
                self.title.pop();
            }
            FormField::Author => {
                self.author.pop();
            }
            FormField::Category => {}
        }
    }

    /// Step through the category options (wrapping)
    pub fn cycle_category(&mut self, forward: bool, count: usize) {
        if count == 0 {
            return;
        }
        self.category_index = if forward {
            (self.category_index + 1) % count
        } else {
            (self.category_index + count - 1) % count
        };
    }
}

/// Application state
pub struct App<K: KeyValueStore> {
    /// The catalog and its rendered view
    pub session: Session<K>,
    /// Configured categories, offered by the add form
    pub categories: Vec<String>,
    /// Filter entries: "All" followed by each category
    pub filters: Vec<CategoryFilter>,
    /// Currently selected filter index
    pub filter_index: usize,
    /// Currently selected card index
    pub card_index: usize,
    /// Which pane has focus
    pub active_pane: ActivePane,
    /// Current input mode
    pub input_mode: InputMode,
    /// The add form, while open
    pub form: AddForm,
    /// Whether the app should exit
    pub should_quit: bool,
    /// Status message to display temporarily
    pub status_message: Option<String>,
    /// When the status message was set (for auto-dismiss)
    pub status_message_time: Option<Instant>,
    /// Message shown in the blocking error modal
    pub error_message: Option<String>,
    /// Whether help overlay is visible
    pub show_help: bool,
    /// Last applied sort, for the status bar
    pub last_sort: Option<SortDirection>,
    /// Pending 'g' keypress for gg sequence (with timestamp)
    pub pending_g: Option<Instant>,
}

impl<K: KeyValueStore> App<K> {
    /// Create a new app around a session
    pub fn new(session: Session<K>, config: &Config) -> Self {
        let categories = config.categories.clone();

        // Books filed under categories no longer configured still get a filter
        let mut filter_names = categories.clone();
        for (name, _) in session.store().categories_in_use() {
            if !filter_names.contains(&name) {
                filter_names.push(name);
            }
        }
        let filters = std::iter::once(CategoryFilter::All)
            .chain(filter_names.into_iter().map(CategoryFilter::Category))
            .collect();

        Self {
            session,
            categories,
            filters,
            filter_index: 0,
            card_index: 0,
            active_pane: ActivePane::Items,
            input_mode: InputMode::Normal,
            form: AddForm::default(),
            should_quit: false,
            status_message: None,
            status_message_time: None,
            error_message: None,
            show_help: false,
            last_sort: None,
            pending_g: None,
        }
    }

    // ==================== Messages ====================

    /// Set a status message (will auto-dismiss after 3 seconds)
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_message_time = Some(Instant::now());
    }

    /// Check and clear expired status message
    pub fn check_status_timeout(&mut self) {
        if let Some(time) = self.status_message_time {
            if time.elapsed() > Duration::from_secs(3) {
                self.status_message = None;
                self.status_message_time = None;
            }
        }
    }

    /// Show a blocking error modal
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error_message = Some(message.into());
    }

    pub fn has_error(&self) -> bool {
        self.error_message.is_some()
    }

    pub fn clear_error(&mut self) {
        self.error_message = None;
    }

    /// Show a failed operation in the error modal
    fn report(&mut self, err: ShelfError) {
        let message = match &err {
            ShelfError::Storage(storage) => match storage.recovery_suggestion() {
                Some(hint) => format!("{}\n\n{}", err, hint),
                None => err.to_string(),
            },
            ShelfError::Validation(_) => err.to_string(),
        };
        self.set_error(message);
    }

    /// Toggle help overlay
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    // ==================== Selection ====================

    /// Get the currently selected filter entry
    pub fn current_filter(&self) -> Option<&CategoryFilter> {
        self.filters.get(self.filter_index)
    }

    /// Get the currently selected card
    pub fn current_card(&self) -> Option<&Card> {
        self.session.container().cards().get(self.card_index)
    }

    /// Number of books filed under a filter entry
    pub fn count_for(&self, filter: &CategoryFilter) -> usize {
        self.session
            .store()
            .books()
            .iter()
            .filter(|b| filter.matches(b))
            .count()
    }

    /// Move selection up in the current pane
    pub fn move_up(&mut self) {
        match self.active_pane {
            ActivePane::Filters => {
                self.filter_index = self.filter_index.saturating_sub(1);
            }
            ActivePane::Items | ActivePane::Detail => {
                self.card_index = self.card_index.saturating_sub(1);
            }
        }
    }

    /// Move selection down in the current pane
    pub fn move_down(&mut self) {
        match self.active_pane {
            ActivePane::Filters => {
                if self.filter_index < self.filters.len().saturating_sub(1) {
                    self.filter_index += 1;
                }
            }
            ActivePane::Items | ActivePane::Detail => {
                if self.card_index < self.session.container().len().saturating_sub(1) {
                    self.card_index += 1;
                }
            }
        }
    }

    /// Move selection to first item in the current pane (vim 'gg')
    pub fn move_to_first(&mut self) {
        match self.active_pane {
            ActivePane::Filters => self.filter_index = 0,
            ActivePane::Items | ActivePane::Detail => self.card_index = 0,
        }
    }

    /// Move selection to last item in the current pane (vim 'G')
    pub fn move_to_last(&mut self) {
        match self.active_pane {
            ActivePane::Filters => {
                self.filter_index = self.filters.len().saturating_sub(1);
            }
            ActivePane::Items | ActivePane::Detail => {
                self.card_index = self.session.container().len().saturating_sub(1);
            }
        }
    }

    /// Move focus to the next pane
    pub fn next_pane(&mut self) {
        self.active_pane = self.active_pane.next();
    }

    /// Move focus to the previous pane
    pub fn prev_pane(&mut self) {
        self.active_pane = self.active_pane.prev();
    }

    /// Keep the card selection inside the rendered list
    fn clamp_selection(&mut self) {
        let len = self.session.container().len();
        self.card_index = self.card_index.min(len.saturating_sub(1));
    }

    // ==================== Actions ====================

    /// Handle Enter key in current pane
    pub fn handle_enter(&mut self) {
        match self.active_pane {
            ActivePane::Filters => {
                self.apply_filter();
                self.active_pane = ActivePane::Items;
            }
            ActivePane::Items | ActivePane::Detail => self.toggle_complete_current(),
        }
    }

    /// Apply the currently selected filter entry
    pub fn apply_filter(&mut self) {
        let filter = self.current_filter().cloned().unwrap_or_default();
        self.session.set_filter(filter);
        self.card_index = 0;
    }

    /// Sort the whole catalog by title
    pub fn sort(&mut self, direction: SortDirection) {
        match self.session.sort(direction) {
            Ok(()) => {
                self.last_sort = Some(direction);
                self.set_status(format!("Sorted {}", direction.label()));
            }
            Err(e) => self.report(e),
        }
        self.clamp_selection();
    }

    /// Toggle the completed look of the selected card
    pub fn toggle_complete_current(&mut self) {
        let Some(id) = self.current_card().map(|c| c.id) else {
            return;
        };
        if let Some(completed) = self.session.toggle_complete(id) {
            self.set_status(if completed {
                "Marked completed"
            } else {
                "Unmarked"
            });
        }
    }

    /// Delete the selected book
    pub fn delete_current(&mut self) {
        let Some((id, title)) = self.current_card().map(|c| (c.id, c.title.clone())) else {
            return;
        };
        self.delete(id, &title);
    }

    fn delete(&mut self, id: BookId, title: &str) {
        let saved_index = self.card_index;
        match self.session.delete(id) {
            Ok(_) => self.set_status(format!("Deleted '{}'", title)),
            Err(e) => self.report(e),
        }
        self.card_index = saved_index;
        self.clamp_selection();
    }

    /// Open the add form with the default category preselected
    pub fn open_add_form(&mut self) {
        self.form = AddForm::default();
        self.input_mode = InputMode::AddForm;
    }

    /// Close the add form without adding anything
    pub fn cancel_add_form(&mut self) {
        self.form = AddForm::default();
        self.input_mode = InputMode::Normal;
    }

    /// Category currently chosen in the add form
    pub fn form_category(&self) -> &str {
        self.categories
            .get(self.form.category_index)
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Submit the add form
    ///
    /// A rejected book keeps the form open with its contents so the user can
    /// fix it after dismissing the error.
    pub fn submit_add_form(&mut self) {
        let category = self.form_category().to_string();
        let result = self
            .session
            .add_book(&self.form.title, &self.form.author, &category);

        match result {
            Ok(book) => {
                self.set_status(format!("Added '{}'", book.title));
                self.cancel_add_form();
                if let Some(index) = self
                    .session
                    .container()
                    .cards()
                    .iter()
                    .position(|c| c.id == book.id)
                {
                    self.card_index = index;
                }
            }
            Err(e) if e.is_validation() => self.report(e),
            Err(e) => {
                self.report(e);
                self.cancel_add_form();
            }
        }
    }

    /// Ask before clearing the catalog
    pub fn request_clear(&mut self) {
        if self.session.store().is_empty() {
            self.set_status("Nothing to clear");
            return;
        }
        self.input_mode = InputMode::ConfirmClear;
    }

    /// Answer the clear-all confirmation
    pub fn resolve_clear(&mut self, confirmed: bool) {
        self.input_mode = InputMode::Normal;
        let count = self.session.store().len();
        match self.session.clear_all(confirmed) {
            Ok(true) => self.set_status(format!("Removed {} book(s)", count)),
            Ok(false) => self.set_status("Clear cancelled"),
            Err(e) => self.report(e),
        }
        self.clamp_selection();
    }
}
