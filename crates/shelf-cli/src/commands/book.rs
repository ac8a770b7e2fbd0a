//! Book command handlers

use anyhow::{bail, Result};

use shelf_core::{
    BookId, CategoryFilter, Config, KeyValueStore, Session, SortDirection, ValidationError,
};

use super::with_hint;
use crate::output::Output;
use crate::prompt::confirm;

/// Add a new book
pub fn add<K: KeyValueStore>(
    session: &mut Session<K>,
    config: &Config,
    title: String,
    author: String,
    category: Option<String>,
    output: &Output,
) -> Result<()> {
    ValidationError::check(&title, &author)?;
    let category = resolve_category(config, category)?;

    let book = session
        .add_book(&title, &author, &category)
        .map_err(with_hint)?;

    output.success(&format!("Added '{}' ({})", book.title, book.id));
    output.print_book(&book)
}

/// List books, optionally restricted to one category
pub fn list<K: KeyValueStore>(
    session: &mut Session<K>,
    category: Option<String>,
    output: &Output,
) -> Result<()> {
    session.set_filter(CategoryFilter::from_option(category.as_deref()));
    output.print_cards(session.container().cards(), session.empty_state())
}

/// Sort the whole catalog by title
pub fn sort<K: KeyValueStore>(
    session: &mut Session<K>,
    direction: SortDirection,
    output: &Output,
) -> Result<()> {
    session.sort(direction).map_err(with_hint)?;

    output.success(&format!(
        "Sorted {} book(s) {}",
        session.store().len(),
        direction.label()
    ));
    Ok(())
}

/// Delete a book by id
pub fn delete<K: KeyValueStore>(
    session: &mut Session<K>,
    id: BookId,
    output: &Output,
) -> Result<()> {
    let title = session.store().get(id).map(|b| b.title.clone());

    let removed = session.delete(id).map_err(with_hint)?;

    match title {
        Some(title) if removed => output.success(&format!("Deleted '{}'", title)),
        _ => output.message(&format!("No book with id {}", id)),
    }
    Ok(())
}

/// Remove every book after confirmation
pub fn clear<K: KeyValueStore>(session: &mut Session<K>, yes: bool, output: &Output) -> Result<()> {
    let count = session.store().len();
    if count == 0 {
        output.message("Nothing to clear.");
        return Ok(());
    }

    let confirmed = yes
        || (output.should_prompt()
            && confirm(&format!("Remove all {} book(s)? This cannot be undone.", count))?);

    if session.clear_all(confirmed).map_err(with_hint)? {
        output.success(&format!("Removed {} book(s)", count));
    } else {
        output.message("Cancelled.");
    }
    Ok(())
}

/// List configured categories with usage counts
///
/// Categories found on stored books but no longer configured are listed
/// after the configured ones.
pub fn categories<K: KeyValueStore>(
    session: &Session<K>,
    config: &Config,
    output: &Output,
) -> Result<()> {
    let in_use = session.store().categories_in_use();
    output.print_categories(&category_counts(config, &in_use))
}

/// Merge configured categories with the counts of those in use
fn category_counts(config: &Config, in_use: &[(String, usize)]) -> Vec<(String, usize)> {
    let count_of = |name: &str| {
        in_use
            .iter()
            .find(|(used, _)| used == name)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    };

    let mut counts: Vec<(String, usize)> = config
        .categories
        .iter()
        .map(|name| (name.clone(), count_of(name)))
        .collect();

    counts.extend(
        in_use
            .iter()
            .filter(|(name, _)| !config.is_known_category(name))
            .cloned(),
    );
    counts
}

/// Pick the category for a new book, checking it against the configured set
fn resolve_category(config: &Config, category: Option<String>) -> Result<String> {
    match category {
        None => Ok(config.default_category().to_string()),
        Some(category) if config.is_known_category(&category) => Ok(category),
        Some(category) => bail!(
            "Unknown category: '{}'\nValid categories: {}",
            category,
            config.categories.join(", ")
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use shelf_core::{MemoryKeyValueStore, Store};

    fn session() -> Session<MemoryKeyValueStore> {
        Session::new(Store::with_backend(MemoryKeyValueStore::new()))
    }

    fn quiet() -> Output {
        Output::new(OutputFormat::Quiet)
    }

    #[test]
    fn test_resolve_category() {
        let config = Config::default();
        assert_eq!(resolve_category(&config, None).unwrap(), "Fiction");
        assert_eq!(
            resolve_category(&config, Some("History".to_string())).unwrap(),
            "History"
        );
        let err = resolve_category(&config, Some("Poetry".to_string())).unwrap_err();
        assert!(err.to_string().contains("Unknown category: 'Poetry'"));
    }

    #[test]
    fn test_add_uses_default_category() {
        let mut session = session();
        let config = Config::default();
        add(
            &mut session,
            &config,
            "Dune".to_string(),
            "Frank Herbert".to_string(),
            None,
            &quiet(),
        )
        .unwrap();

        assert_eq!(session.store().books()[0].category, "Fiction");
    }

    #[test]
    fn test_add_rejects_empty_author() {
        let mut session = session();
        let err = add(
            &mut session,
            &Config::default(),
            "Dune".to_string(),
            "   ".to_string(),
            None,
            &quiet(),
        )
        .unwrap_err();

        assert_eq!(err.to_string(), "Please enter the author's name.");
        assert!(session.store().is_empty());
    }

    #[test]
    fn test_add_reports_missing_title_before_category() {
        let mut session = session();
        let err = add(
            &mut session,
            &Config::default(),
            String::new(),
            String::new(),
            Some("Poetry".to_string()),
            &quiet(),
        )
        .unwrap_err();

        assert_eq!(err.to_string(), "Please enter a book title.");
        assert!(session.store().is_empty());
    }

    #[test]
    fn test_clear_without_confirmation_keeps_books() {
        let mut session = session();
        session.add_book("Dune", "Frank Herbert", "Fiction").unwrap();

        // Quiet output never prompts, so only --yes clears
        clear(&mut session, false, &quiet()).unwrap();
        assert_eq!(session.store().len(), 1);

        clear(&mut session, true, &quiet()).unwrap();
        assert!(session.store().is_empty());
    }

    #[test]
    fn test_delete_absent_id_is_not_an_error() {
        let mut session = session();
        delete(&mut session, 42, &quiet()).unwrap();
    }

    #[test]
    fn test_list_applies_filter() {
        let mut session = session();
        session.add_book("Dune", "Frank Herbert", "Fiction").unwrap();
        session.add_book("Cosmos", "Carl Sagan", "Science").unwrap();

        list(&mut session, Some("Science".to_string()), &quiet()).unwrap();
        assert_eq!(session.container().len(), 1);

        list(&mut session, None, &quiet()).unwrap();
        assert_eq!(session.container().len(), 2);
    }

    #[test]
    fn test_category_counts_include_unconfigured() {
        let config = Config {
            categories: vec!["Fiction".to_string(), "Science".to_string()],
            ..Config::default()
        };
        let in_use = vec![("Fiction".to_string(), 2), ("Poetry".to_string(), 1)];

        assert_eq!(
            category_counts(&config, &in_use),
            vec![
                ("Fiction".to_string(), 2),
                ("Science".to_string(), 0),
                ("Poetry".to_string(), 1),
            ]
        );
    }
}
