//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use anyhow::Result;

use shelf_core::{Book, Card, EmptyState};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print a single book
    pub fn print_book(&self, book: &Book) -> Result<()> {
        match self.format {
            OutputFormat::Human => {
                println!("ID:       {}", book.id);
                println!("Title:    {}", book.title);
                println!("Author:   {}", book.author);
                println!("Category: {}", book.category);
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(book)?);
            }
            OutputFormat::Quiet => {
                println!("{}", book.id);
            }
        }
        Ok(())
    }

    /// Print rendered cards, or the empty-state message when there are none
    pub fn print_cards(&self, cards: &[Card], empty_state: &EmptyState) -> Result<()> {
        match self.format {
            OutputFormat::Human => {
                if empty_state.is_visible() {
                    println!("{}", empty_state.message());
                    return Ok(());
                }
                for card in cards {
                    println!("{}", card_line(card));
                }
                println!("\n{} book(s)", cards.len());
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(cards)?);
            }
            OutputFormat::Quiet => {
                for card in cards {
                    println!("{}", card.id);
                }
            }
        }
        Ok(())
    }

    /// Print configured categories with the number of books filed under each
    pub fn print_categories(&self, categories: &[(String, usize)]) -> Result<()> {
        match self.format {
            OutputFormat::Human => {
                for (name, count) in categories {
                    println!("{} ({})", name, count);
                }
                println!("\n{} categories", categories.len());
            }
            OutputFormat::Json => {
                let json_categories: Vec<_> = categories
                    .iter()
                    .map(|(name, count)| serde_json::json!({"name": name, "count": count}))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&json_categories)?);
            }
            OutputFormat::Quiet => {
                for (name, _) in categories {
                    println!("{}", name);
                }
            }
        }
        Ok(())
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

/// One-line summary of a card
fn card_line(card: &Card) -> String {
    format!(
        "{} | {} | {} | {}",
        card.id,
        truncate(&card.title, 35),
        truncate(&card.author, 25),
        card.category
    )
}

/// Truncate a string to max characters, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
