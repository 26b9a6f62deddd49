//! Bookshelf CLI
//!
//! Command-line interface for Bookshelf - browse and manage a library
//! catalog served by the catalog API.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use bookshelf_core::{Catalog, CatalogError, Config, HttpCatalogClient, PreviewRegistry};

mod commands;
mod logging;
mod output;

use commands::book::BookInput;
use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "bookshelf")]
#[command(about = "Bookshelf - browse and manage a library catalog")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use this config file instead of the default
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log requests and cache updates
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all books
    #[command(alias = "ls")]
    List {
        /// Only show books whose title, author or year contains this
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Search books by title, author or year
    Search {
        /// Search query
        query: String,
    },
    /// Show book details
    #[command(alias = "preview")]
    Show {
        /// Book ID
        id: i64,
    },
    /// Add a new book
    #[command(alias = "create")]
    Add {
        #[arg(short = 'T', long)]
        title: String,
        #[arg(short, long)]
        author: String,
        /// Year of publication
        #[arg(short, long, allow_negative_numbers = true)]
        year: i32,
        #[arg(short, long)]
        description: String,
        /// Cover image file
        #[arg(short, long)]
        image: PathBuf,
    },
    /// Edit a book (only the given fields change)
    Edit {
        /// Book ID
        id: i64,
        #[arg(short = 'T', long)]
        title: Option<String>,
        #[arg(short, long)]
        author: Option<String>,
        /// Year of publication
        #[arg(short, long, allow_negative_numbers = true)]
        year: Option<i32>,
        #[arg(short, long)]
        description: Option<String>,
        /// Replacement cover image (keeps the current one if omitted)
        #[arg(short, long)]
        image: Option<PathBuf>,
    },
    /// Delete a book
    #[command(alias = "rm")]
    Delete {
        /// Book ID
        id: i64,
    },
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
        /// Configuration key (api_url, timeout_secs, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.as_ref();
    let format = OutputFormat::from_flags(cli.json, cli.quiet);

    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;
    logging::init(&config, cli.verbose);

    let output = Output::new(format, config.api_url.clone());

    // Config commands don't need the catalog
    if let Commands::Config { command } = &cli.command {
        return handle_config_command(command.clone(), config_path, &output);
    }

    let client = HttpCatalogClient::from_config(&config)?;
    let mut catalog = Catalog::new(client);
    let registry = PreviewRegistry::new();

    let result = match cli.command {
        Commands::List { search } => commands::book::list(&mut catalog, search, &output).await,
        Commands::Search { query } => {
            commands::book::list(&mut catalog, Some(query), &output).await
        }
        Commands::Show { id } => commands::book::show(&catalog, id, &output).await,
        Commands::Add {
            title,
            author,
            year,
            description,
            image,
        } => {
            let input = BookInput {
                title: Some(title),
                author: Some(author),
                year: Some(year),
                description: Some(description),
                image: Some(image),
            };
            commands::book::add(&mut catalog, input, &registry, &output).await
        }
        Commands::Edit {
            id,
            title,
            author,
            year,
            description,
            image,
        } => {
            let input = BookInput {
                title,
                author,
                year,
                description,
                image,
            };
            commands::book::edit(&mut catalog, id, input, &registry, &output).await
        }
        Commands::Delete { id } => commands::book::delete(&mut catalog, id, &output).await,
        Commands::Config { .. } => unreachable!(), // Handled above
    };

    // Catalog failures become a notification rather than an error dump
    if let Err(e) = result {
        if let Some(err) = e.downcast_ref::<CatalogError>() {
            output.error(&err.notification());
            std::process::exit(1);
        }
        return Err(e);
    }

    Ok(())
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

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add() {
        let cli = Cli::try_parse_from([
            "bookshelf",
            "add",
            "--title",
            "T",
            "--author",
            "A",
            "--year",
            "2024",
            "--description",
            "D",
            "--image",
            "img.png",
        ])
        .unwrap();

        match cli.command {
            Commands::Add { title, year, image, .. } => {
                assert_eq!(title, "T");
                assert_eq!(year, 2024);
                assert_eq!(image, PathBuf::from("img.png"));
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn test_parse_edit_partial() {
        let cli = Cli::try_parse_from(["bookshelf", "edit", "3", "--title", "New"]).unwrap();
        match cli.command {
            Commands::Edit {
                id, title, image, ..
            } => {
                assert_eq!(id, 3);
                assert_eq!(title.as_deref(), Some("New"));
                assert!(image.is_none());
            }
            _ => panic!("expected edit"),
        }
    }

    #[test]
    fn test_aliases_and_global_flags() {
        let cli = Cli::try_parse_from(["bookshelf", "rm", "7", "--json"]).unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::Delete { id: 7 }));

        let cli = Cli::try_parse_from(["bookshelf", "ls", "-s", "dune"]).unwrap();
        assert!(matches!(cli.command, Commands::List { search: Some(ref q) } if q == "dune"));
    }

    #[test]
    fn test_add_requires_image() {
        let result = Cli::try_parse_from([
            "bookshelf",
            "add",
            "--title",
            "T",
            "--author",
            "A",
            "--year",
            "2024",
            "--description",
            "D",
        ]);
        assert!(result.is_err());
    }
}
