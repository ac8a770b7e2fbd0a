//! Card rendering
//!
//! Turns a list of books into the cards of a `Container` and keeps the
//! empty-state indicator in step with it. Every render replaces the whole
//! container; there is no incremental patching.
//!
//! The "completed" look of a card is view state only. It is tracked per book
//! id in `CompletionMarks`, so it survives re-renders but never reaches the
//! store or the persisted blob.

use std::collections::HashSet;

use serde::Serialize;

use crate::models::{Book, BookId};

/// Title color of a card marked completed
pub const COMPLETED_COLOR: &str = "#16a34a";

/// Message shown when no card is visible
pub const EMPTY_STATE_MESSAGE: &str = "No books found. Add one to get started.";

/// Action wired to a card, bound to the book's id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardAction {
    /// Toggle the completed look of the card
    Complete(BookId),
    /// Remove the book from the catalog
    Delete(BookId),
}

impl CardAction {
    /// Id of the book the action is bound to
    pub fn id(self) -> BookId {
        match self {
            CardAction::Complete(id) | CardAction::Delete(id) => id,
        }
    }

    /// Value of the `data-action` attribute
    pub fn name(self) -> &'static str {
        match self {
            CardAction::Complete(_) => "complete",
            CardAction::Delete(_) => "delete",
        }
    }

    /// Button caption
    pub fn label(self) -> &'static str {
        match self {
            CardAction::Complete(_) => "Complete",
            CardAction::Delete(_) => "Delete",
        }
    }
}

/// Presentation of a card title
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TitleStyle {
    pub strikethrough: bool,
    pub color: Option<&'static str>,
}

/// Display unit for one book
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: BookId,
    pub image_url: String,
    pub title: String,
    pub author: String,
    pub category: String,
    pub completed: bool,
}

impl Card {
    fn from_book(book: &Book, completed: bool) -> Self {
        Self {
            id: book.id,
            image_url: book.image_url.clone(),
            title: book.title.clone(),
            author: book.author.clone(),
            category: book.category.clone(),
            completed,
        }
    }

    /// The two controls of the card
    pub fn actions(&self) -> [CardAction; 2] {
        [CardAction::Complete(self.id), CardAction::Delete(self.id)]
    }

    /// How the title should be drawn
    pub fn title_style(&self) -> TitleStyle {
        if self.completed {
            TitleStyle {
                strikethrough: true,
                color: Some(COMPLETED_COLOR),
            }
        } else {
            TitleStyle::default()
        }
    }

    /// Markup for the card; all text is escaped
    pub fn to_html(&self) -> String {
        let title = escape_markup(&self.title);
        let style = self.title_style();
        let title_attr = match style.color {
            Some(color) if style.strikethrough => format!(
                " style=\"text-decoration: line-through; color: {}\"",
                color
            ),
            _ => String::new(),
        };

        let buttons: Vec<String> = self
            .actions()
            .iter()
            .map(|action| {
                let class = match action {
                    CardAction::Complete(_) => "small-btn complete",
                    CardAction::Delete(_) => "small-btn danger",
                };
                format!(
                    "    <button class=\"{}\" data-action=\"{}\" data-id=\"{}\">{}</button>",
                    class,
                    action.name(),
                    action.id(),
                    action.label()
                )
            })
            .collect();

        format!(
            "<div class=\"book-card\" data-id=\"{id}\">\n\
             \x20 <img src=\"{src}\" alt=\"{title} cover\" />\n\
             \x20 <div class=\"book-meta\">\n\
             \x20   <h3 class=\"book-title\"{title_attr}>{title}</h3>\n\
             \x20   <p class=\"book-author\">By {author}</p>\n\
             \x20   <div class=\"book-category\">{category}</div>\n\
             \x20 </div>\n\
             \x20 <div class=\"card-actions\">\n\
             {buttons}\n\
             \x20 </div>\n\
             </div>",
            id = self.id,
            src = escape_markup(&self.image_url),
            title = title,
            title_attr = title_attr,
            author = escape_markup(&self.author),
            category = escape_markup(&self.category),
            buttons = buttons.join("\n"),
        )
    }
}

/// Cards currently on display
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Container {
    cards: Vec<Card>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Card for `id`, if it is on display
    pub fn card(&self, id: BookId) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    fn card_mut(&mut self, id: BookId) -> Option<&mut Card> {
        self.cards.iter_mut().find(|c| c.id == id)
    }

    /// Markup of the whole grid
    pub fn to_html(&self) -> String {
        let cards: Vec<String> = self.cards.iter().map(Card::to_html).collect();
        if cards.is_empty() {
            "<div id=\"booksGrid\"></div>".to_string()
        } else {
            format!("<div id=\"booksGrid\">\n{}\n</div>", cards.join("\n"))
        }
    }
}

/// Indicator shown in place of the grid when it is empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    visible: bool,
    message: String,
}

impl Default for EmptyState {
    fn default() -> Self {
        Self {
            visible: false,
            message: EMPTY_STATE_MESSAGE.to_string(),
        }
    }
}

impl EmptyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// Markup for the indicator
    pub fn to_html(&self) -> String {
        format!(
            "<p id=\"noBooksMsg\" style=\"display: {}\">{}</p>",
            if self.visible { "block" } else { "none" },
            escape_markup(&self.message)
        )
    }
}

/// Ids of books whose cards are marked completed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionMarks {
    ids: HashSet<BookId>,
}

impl CompletionMarks {
    pub fn contains(&self, id: BookId) -> bool {
        self.ids.contains(&id)
    }

    /// Flip the mark for `id`, returning the new state
    pub fn toggle(&mut self, id: BookId) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    /// Drop marks of books no longer held
    pub fn retain_books(&mut self, books: &[Book]) {
        self.ids.retain(|id| books.iter().any(|b| b.id == *id));
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Reconciles a container with a list of books
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    marks: CompletionMarks,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents of `container` with one card per book
    ///
    /// An empty list shows `empty_state` and leaves the container empty;
    /// otherwise `empty_state` is hidden.
    pub fn render(&self, container: &mut Container, empty_state: &mut EmptyState, books: &[Book]) {
        container.cards.clear();

        if books.is_empty() {
            empty_state.show();
            return;
        }
        empty_state.hide();

        container.cards.extend(
            books
                .iter()
                .map(|book| Card::from_book(book, self.marks.contains(book.id))),
        );
    }

    /// Toggle the completed look of the card for `id`
    ///
    /// Returns the new state, or `None` when no such card is on display.
    pub fn toggle_complete(&mut self, container: &mut Container, id: BookId) -> Option<bool> {
        let card = container.card_mut(id)?;
        let completed = self.marks.toggle(id);
        card.completed = completed;
        Some(completed)
    }

    /// Whether the card for `id` is marked completed
    pub fn is_completed(&self, id: BookId) -> bool {
        self.marks.contains(id)
    }

    /// Forget marks of books that are gone
    pub fn retain_books(&mut self, books: &[Book]) {
        self.marks.retain_books(books);
    }

    pub fn marks(&self) -> &CompletionMarks {
        &self.marks
    }
}

/// Escape text for inclusion in markup
///
/// `&`, `<` and `>` are always escaped; quotes are escaped too so the result
/// is safe inside attribute values.
pub fn escape_markup(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
