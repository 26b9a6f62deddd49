//! Bookshelf Core Library
//!
//! This crate provides the client side of Bookshelf, a small library
//! catalog whose books, cover images and validation all live behind an
//! external HTTP API.
//!
//! # Architecture
//!
//! - **Remote client**: HTTP calls against the catalog API
//! - **Cache**: in-memory mirror of server-confirmed books
//! - **Catalog**: applies cache changes only after the server confirms
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let mut catalog = Catalog::open(HttpCatalogClient::from_config(&config)?).await;
//!
//! // Add a book
//! let registry = PreviewRegistry::new();
//! let mut form = BookForm::create(&registry);
//! *form.fields_mut() = BookFields::new("Dune", "Frank Herbert", 1965, "Spice");
//! form.select_image(ImageFile::load(Path::new("dune.png")).await?);
//! let book = form.submit(&mut catalog).await?;
//!
//! // Query books
//! let visible = catalog.search("herbert");
//! ```
//!
//! # Modules
//!
//! - `catalog`: Sync layer between the API and the cache (main entry point)
//! - `remote`: Catalog API trait and its HTTP implementation
//! - `cache`: Ordered in-memory book collection
//! - `filter`: Case-insensitive search
//! - `form`: Draft values and image previews
//! - `models`: Book records and upload types
//! - `config`: Application configuration

pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod filter;
pub mod form;
pub mod models;
pub mod remote;

#[cfg(test)]
mod testing;

pub use cache::BookCache;
pub use catalog::Catalog;
pub use config::Config;
pub use error::{CatalogError, CatalogResult};
pub use filter::filter;
pub use form::{BookForm, FormMode, Preview, PreviewRegistry};
pub use models::{Book, BookFields, ImageFile};
pub use remote::{resolve_image_url, CatalogApi, HttpCatalogClient};
