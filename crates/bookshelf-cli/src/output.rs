//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use serde::Serialize;

use bookshelf_core::{resolve_image_url, Book};

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

/// A book as rendered for display, with its cover URL resolved
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BookView<'a> {
    #[serde(flatten)]
    book: &'a Book,
    cover_url: Option<String>,
}

/// A filtered list plus the size of the cache it was drawn from
#[derive(Debug, Serialize)]
struct BookListView<'a> {
    total: usize,
    books: Vec<BookView<'a>>,
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
    /// API base URL used to resolve cover images
    base_url: String,
}

impl Output {
    pub fn new(format: OutputFormat, base_url: impl Into<String>) -> Self {
        Self {
            format,
            base_url: base_url.into(),
        }
    }

    fn view<'a>(&self, book: &'a Book) -> BookView<'a> {
        BookView {
            book,
            cover_url: resolve_image_url(&self.base_url, &book.image_url),
        }
    }

    /// Print a single book (the preview view)
    pub fn print_book(&self, book: &Book) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:          {}", book.id);
                println!("Title:       {}", book.title);
                println!("Author:      {}", book.author);
                println!("Published:   {}", book.year_published);
                if let Some(cover) = self.view(book).cover_url {
                    println!("Cover:       {}", cover);
                }
                if !book.description.is_empty() {
                    println!();
                    println!("{}", book.description);
                }
            }
            OutputFormat::Json => {
                print_json(&self.view(book));
            }
            OutputFormat::Quiet => {
                println!("{}", book.id);
            }
        }
    }

    /// Print the visible books out of `total` cached ones
    pub fn print_books(&self, books: &[&Book], total: usize) {
        match self.format {
            OutputFormat::Human => {
                if books.is_empty() {
                    println!("No books found.");
                    return;
                }
                for book in books {
                    println!(
                        "{:>5} | {} | {} | {}",
                        book.id,
                        truncate(&book.title, 35),
                        truncate(&book.author, 25),
                        book.year_published
                    );
                }
                println!("\n{}", count_summary(books.len(), total));
            }
            OutputFormat::Json => {
                print_json(&self.list_view(books, total));
            }
            OutputFormat::Quiet => {
                for book in books {
                    println!("{}", book.id);
                }
            }
        }
    }

    fn list_view<'a>(&self, books: &[&'a Book], total: usize) -> BookListView<'a> {
        BookListView {
            total,
            books: books.iter().map(|&b| self.view(b)).collect(),
        }
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

    /// Print an error notification (always to stderr)
    pub fn error(&self, message: &str) {
        match self.format {
            OutputFormat::Json => {
                eprintln!(
                    "{}",
                    serde_json::json!({"status": "error", "message": message})
                );
            }
            _ => eprintln!("✗ {}", message),
        }
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

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize output: {}", e),
    }
}

fn count_summary(shown: usize, total: usize) -> String {
    format!("Showing {} of {} book(s)", shown, total)
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
