//! SHELF TUI
//!
//! Terminal user interface for the book catalog.
//!
//! ## Layout
//!
//! Three-pane layout:
//! - Left: Filters (All, then one entry per category)
//! - Middle: Book cards in the current view
//! - Right: Detail of the selected book
//!
//! ## Navigation
//!
//! - j/k or ↑/↓: Move selection up/down
//! - h/l or ←/→: Switch focus between panes
//! - Tab: Cycle through panes
//! - Enter: Apply filter / Toggle completed
//! - q: Quit
//!
//! ## Commands
//!
//! - a: Add book
//! - s / S: Sort A→Z / Z→A
//! - c: Toggle completed
//! - d: Delete book
//! - X: Clear all (asks first)

mod app;
mod ui;

use std::fs::File;
use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use shelf_core::{Config, KeyValueStore, Session, SortDirection, Store};

use app::{App, FormField, InputMode};

use crate::LOG_ENV;

/// Run the TUI application
pub fn run(config: &Config, ephemeral: bool) -> Result<()> {
    // Initialize TUI logging (file-based, only if SHELF_LOG is set)
    init_tui_logging(config);

    if ephemeral {
        run_session(config, Session::new(Store::ephemeral(config)))
    } else {
        run_session(config, Session::new(Store::open_with_config(config)))
    }
}

fn run_session<K: KeyValueStore>(config: &Config, session: Session<K>) -> Result<()> {
    let mut app = App::new(session, config);

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

fn run_app<B: Backend, K: KeyValueStore>(terminal: &mut Terminal<B>, app: &mut App<K>) -> Result<()> {
    loop {
        // Check for status message timeout
        app.check_status_timeout();

        // Draw UI
        terminal.draw(|frame| ui::draw(frame, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (not release)
                if key.kind == KeyEventKind::Press {
                    handle_key(app, key);
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Dispatch a key press to the handler for the current mode
fn handle_key<K: KeyValueStore>(app: &mut App<K>, key: KeyEvent) {
    // If error modal is showing, any key dismisses it
    if app.has_error() {
        app.clear_error();
        return;
    }

    // If help is showing, any key dismisses it
    if app.show_help {
        app.show_help = false;
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key.code, key.modifiers),
        InputMode::AddForm => handle_form_mode(app, key.code, key.modifiers),
        InputMode::ConfirmClear => handle_confirm_mode(app, key.code),
    }
}

/// Handle key events in normal mode
fn handle_normal_mode<K: KeyValueStore>(app: &mut App<K>, code: KeyCode, modifiers: KeyModifiers) {
    // Clear status message on navigation keys
    if matches!(
        code,
        KeyCode::Char('j')
            | KeyCode::Char('k')
            | KeyCode::Up
            | KeyCode::Down
            | KeyCode::Char('h')
            | KeyCode::Char('l')
            | KeyCode::Left
            | KeyCode::Right
            | KeyCode::Tab
            | KeyCode::BackTab
    ) {
        app.status_message = None;
    }

    // Clear pending 'g' if timeout expired (500ms)
    if let Some(time) = app.pending_g {
        if time.elapsed() > Duration::from_millis(500) {
            app.pending_g = None;
        }
    }

    match code {
        // Quit
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
        }

        // Navigation
        KeyCode::Char('k') | KeyCode::Up => app.move_up(),
        KeyCode::Char('j') | KeyCode::Down => app.move_down(),
        KeyCode::Char('h') | KeyCode::Left | KeyCode::BackTab => app.prev_pane(),
        KeyCode::Char('l') | KeyCode::Right | KeyCode::Tab => app.next_pane(),
        KeyCode::Enter => app.handle_enter(),

        // Commands
        KeyCode::Char('a') => app.open_add_form(),
        KeyCode::Char('s') => app.sort(SortDirection::Ascending),
        KeyCode::Char('S') => app.sort(SortDirection::Descending),
        KeyCode::Char('c') | KeyCode::Char(' ') => app.toggle_complete_current(),
        KeyCode::Char('d') | KeyCode::Delete => app.delete_current(),
        KeyCode::Char('X') => app.request_clear(),
        KeyCode::Char('?') => app.toggle_help(),

        // Vim navigation: G (go to last)
        KeyCode::Char('G') => {
            app.pending_g = None;
            app.move_to_last();
        }

        // Vim navigation: g (start of gg sequence)
        KeyCode::Char('g') => {
            if app.pending_g.take().is_some() {
                app.move_to_first();
            } else {
                app.pending_g = Some(Instant::now());
            }
        }

        _ => {
            // Any other key clears pending 'g'
            app.pending_g = None;
        }
    }
}

/// Handle key events while the add form is open
fn handle_form_mode<K: KeyValueStore>(app: &mut App<K>, code: KeyCode, modifiers: KeyModifiers) {
    match code {
        KeyCode::Esc => app.cancel_add_form(),
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => app.cancel_add_form(),
        KeyCode::Enter => app.submit_add_form(),

        KeyCode::Tab | KeyCode::Down => app.form.field = app.form.field.next(),
        KeyCode::BackTab | KeyCode::Up => app.form.field = app.form.field.prev(),

        KeyCode::Left if app.form.field == FormField::Category => {
            app.form.cycle_category(false, app.categories.len());
        }
        KeyCode::Right | KeyCode::Char(' ') if app.form.field == FormField::Category => {
            app.form.cycle_category(true, app.categories.len());
        }

        KeyCode::Char(c) => app.form.insert_char(c),
        KeyCode::Backspace => app.form.delete_char(),

        _ => {}
    }
}

/// Handle the yes/no answer to the clear-all prompt
fn handle_confirm_mode<K: KeyValueStore>(app: &mut App<K>, code: KeyCode) {
    let confirmed = matches!(code, KeyCode::Char('y') | KeyCode::Char('Y'));
    app.resolve_clear(confirmed);
}

/// Initialize logging for TUI mode
///
/// Only initializes if SHELF_LOG environment variable is set.
/// Logs to file (config.log_file or default {data_dir}/debug.log).
fn init_tui_logging(config: &Config) {
    let Ok(log_level) = std::env::var(LOG_ENV) else {
        return;
    };

    let log_path = config.log_path();

    let log_file = match File::create(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not create log file {:?}: {}", log_path, e);
            return;
        }
    };

    let env_filter = EnvFilter::new(format!(
        "shelf_core={},shelf_cli={}",
        log_level, log_level
    ));

    // Initialize file-based logging (ignore error if already initialized)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(log_file)
        .try_init();

    info!("TUI logging initialized to {:?}", log_path);
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_core::MemoryKeyValueStore;

    fn app() -> App<MemoryKeyValueStore> {
        let session = Session::new(Store::with_backend(MemoryKeyValueStore::new()));
        App::new(session, &Config::default())
    }

    fn press<K: KeyValueStore>(app: &mut App<K>, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_str<K: KeyValueStore>(app: &mut App<K>, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_add_book_through_form() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.input_mode, InputMode::AddForm);

        type_str(&mut app, "Dune");
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "Frank Herbert");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.input_mode, InputMode::Normal);
        let book = &app.session.store().books()[0];
        assert_eq!(book.title, "Dune");
        assert_eq!(book.author, "Frank Herbert");
        assert_eq!(book.category, "Science");
    }

    #[test]
    fn test_error_modal_swallows_next_key() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Enter);
        assert!(app.has_error());

        // The key that dismisses the modal is not typed into the form
        press(&mut app, KeyCode::Char('x'));
        assert!(!app.has_error());
        assert!(app.form.title.is_empty());
        assert_eq!(app.input_mode, InputMode::AddForm);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_clear_declined_by_any_other_key() {
        let mut app = app();
        app.session.add_book("Dune", "Frank Herbert", "Fiction").unwrap();

        press(&mut app, KeyCode::Char('X'));
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.session.store().len(), 1);

        press(&mut app, KeyCode::Char('X'));
        press(&mut app, KeyCode::Char('y'));
        assert!(app.session.store().is_empty());
    }

    #[test]
    fn test_sort_keys() {
        let mut app = app();
        app.session.add_book("Banana", "A", "Fiction").unwrap();
        app.session.add_book("apple", "B", "Fiction").unwrap();

        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.current_card().unwrap().title, "apple");

        press(&mut app, KeyCode::Char('S'));
        assert_eq!(app.current_card().unwrap().title, "Banana");
    }

    #[test]
    fn test_gg_and_g_navigation() {
        let mut app = app();
        for title in ["One", "Two", "Three"] {
            app.session.add_book(title, "A", "Fiction").unwrap();
        }

        press(&mut app, KeyCode::Char('G'));
        assert_eq!(app.card_index, 2);
        press(&mut app, KeyCode::Char('g'));
        press(&mut app, KeyCode::Char('g'));
        assert_eq!(app.card_index, 0);
    }

    #[test]
    fn test_help_toggle_and_quit() {
        let mut app = app();
        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.show_help);
        assert!(!app.should_quit);

        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
