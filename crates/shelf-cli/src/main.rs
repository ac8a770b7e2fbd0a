//! SHELF CLI
//!
//! Command-line interface for SHELF - a personal book catalog.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use shelf_core::{BookId, Config, KeyValueStore, Session, SortDirection, Store};

mod commands;
mod output;
mod prompt;
mod tui;

use output::{Output, OutputFormat};

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "SHELF_LOG";

#[derive(Parser)]
#[command(name = "shelf")]
#[command(about = "SHELF - Personal book catalog")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Work on an in-memory copy of the catalog; nothing is saved
    #[arg(long, global = true)]
    ephemeral: bool,

    /// Use this config file instead of the default
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the TUI interface
    Tui,
    /// Add a book
    Add {
        /// Book title
        title: String,
        /// Author name
        author: String,
        /// Category (defaults to the first configured category)
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List books
    #[command(alias = "ls")]
    List {
        /// Only show books in this category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Sort the catalog by title (asc or desc)
    Sort {
        #[arg(default_value = "asc")]
        direction: SortDirection,
    },
    /// Delete a book
    #[command(alias = "rm")]
    Delete {
        /// Book ID
        id: BookId,
    },
    /// Remove every book
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Export the catalog as an HTML page
    Export {
        /// Write to this file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
        /// Only export books in this category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List categories with book counts
    Categories,
    /// Show status (storage location, counts)
    Status,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, categories, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() -> Result<()> {
    let Cli {
        json,
        quiet,
        ephemeral,
        config: config_path,
        command,
    } = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(json, quiet));

    // Config commands work on the file directly
    if let Some(Commands::Config { command }) = command {
        return handle_config_command(command, config_path.as_ref(), &output);
    }

    let config = Config::load_with_cli_override(config_path.as_ref())
        .context("Failed to load configuration")?;

    // TUI is the default when no command is given
    let command = match command {
        None | Some(Commands::Tui) => return tui::run(&config, ephemeral),
        Some(command) => command,
    };

    init_cli_logging();

    if ephemeral {
        let mut session = Session::new(Store::ephemeral(&config));
        run_command(command, &mut session, &config, &output)
    } else {
        let mut session = Session::new(Store::open_with_config(&config));
        run_command(command, &mut session, &config, &output)
    }
}

fn run_command<K: KeyValueStore>(
    command: Commands,
    session: &mut Session<K>,
    config: &Config,
    output: &Output,
) -> Result<()> {
    match command {
        Commands::Add {
            title,
            author,
            category,
        } => commands::book::add(session, config, title, author, category, output),
        Commands::List { category } => commands::book::list(session, category, output),
        Commands::Sort { direction } => commands::book::sort(session, direction, output),
        Commands::Delete { id } => commands::book::delete(session, id, output),
        Commands::Clear { yes } => commands::book::clear(session, yes, output),
        Commands::Export {
            output: path,
            category,
        } => commands::export::export(session, category, path, output),
        Commands::Categories => commands::book::categories(session, config, output),
        Commands::Status => commands::status::show(session, config, output),
        Commands::Tui => unreachable!(),           // Handled in main
        Commands::Config { .. } => unreachable!(), // Handled in main
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

/// Initialize logging for CLI commands
///
/// Logs go to stderr so they never mix with command output. The filter
/// comes from SHELF_LOG and defaults to warnings only.
fn init_cli_logging() {
    let env_filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_command_means_tui() {
        let cli = Cli::try_parse_from(["shelf"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_parse_add_with_category() {
        let cli =
            Cli::try_parse_from(["shelf", "add", "Dune", "Frank Herbert", "-c", "Fiction"]).unwrap();
        match cli.command {
            Some(Commands::Add {
                title,
                author,
                category,
            }) => {
                assert_eq!(title, "Dune");
                assert_eq!(author, "Frank Herbert");
                assert_eq!(category.as_deref(), Some("Fiction"));
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn test_parse_sort_direction() {
        let cli = Cli::try_parse_from(["shelf", "sort"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Sort {
                direction: SortDirection::Ascending
            })
        ));

        let cli = Cli::try_parse_from(["shelf", "sort", "z-a"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Sort {
                direction: SortDirection::Descending
            })
        ));

        assert!(Cli::try_parse_from(["shelf", "sort", "sideways"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["shelf", "list", "--json", "--ephemeral"]).unwrap();
        assert!(cli.json);
        assert!(cli.ephemeral);
    }

    #[test]
    fn test_delete_requires_numeric_id() {
        assert!(Cli::try_parse_from(["shelf", "delete", "abc"]).is_err());
        assert!(Cli::try_parse_from(["shelf", "rm", "1700000000000"]).is_ok());
    }
}
