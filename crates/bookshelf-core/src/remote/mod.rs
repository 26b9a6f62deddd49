//! Remote catalog client
//!
//! Talks to the external catalog API that owns persistence, validation and
//! image storage.
//!
//! ## Endpoints
//!
//! | Call   | Request                          |
//! |--------|----------------------------------|
//! | list   | `GET /api/books`                 |
//! | fetch  | `GET /api/books/{id}`            |
//! | create | `POST /api/books/create` (multipart) |
//! | update | `PUT /api/books/update/{id}` (multipart, image optional) |
//! | delete | `DELETE /api/books/{id}`         |
//!
//! ## Usage
//!
//! ```ignore
//! let client = HttpCatalogClient::from_config(&config)?;
//! let books = client.list().await?;
//! ```

mod client;
mod response;

use async_trait::async_trait;
use reqwest::Url;
use tracing::debug;

use crate::error::CatalogResult;
use crate::models::{Book, BookFields, ImageFile};

pub use client::HttpCatalogClient;

/// The calls the catalog API supports
///
/// `Catalog` is generic over this so it can run against a fake.
#[async_trait]
pub trait CatalogApi {
    /// All books, in server order
    async fn list(&self) -> CatalogResult<Vec<Book>>;

    /// A single book by ID
    async fn fetch(&self, id: i64) -> CatalogResult<Book>;

    /// Create a book; the server assigns its ID and image URL
    async fn create(&self, fields: &BookFields, image: &ImageFile) -> CatalogResult<Book>;

    /// Update a book; `None` keeps the current image
    async fn update(
        &self,
        id: i64,
        fields: &BookFields,
        image: Option<&ImageFile>,
    ) -> CatalogResult<()>;

    /// Delete a book
    async fn delete(&self, id: i64) -> CatalogResult<()>;
}

/// Resolve a server-relative image path against the API origin
///
/// Absolute URLs are returned unchanged. Returns `None` for an empty path or
/// an unusable base URL.
pub fn resolve_image_url(base_url: &str, image_url: &str) -> Option<String> {
    let image_url = image_url.trim();
    if image_url.is_empty() {
        return None;
    }

    if let Ok(absolute) = Url::parse(image_url) {
        return Some(absolute.to_string());
    }

    match Url::parse(base_url).and_then(|base| base.join(image_url)) {
        Ok(url) => Some(url.to_string()),
        Err(e) => {
            debug!("Cannot resolve image {} against {}: {}", image_url, base_url, e);
            None
        }
    }
}
