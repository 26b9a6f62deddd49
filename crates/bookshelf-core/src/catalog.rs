//! Catalog: the client-side sync layer
//!
//! A `Catalog` pairs a `CatalogApi` with a `BookCache` and keeps the two
//! consistent:
//!
//! - the cache only changes after the server confirmed a write
//! - a failed write leaves the cache exactly as it was
//! - a failed list degrades to an empty collection instead of an error
//!
//! A catalog is owned by the view that uses it: open it when the view
//! mounts, drop it when the view goes away.
//!
//! ## Usage
//!
//! ```ignore
//! let mut catalog = Catalog::open(HttpCatalogClient::from_config(&config)?).await;
//!
//! let book = catalog.create(&fields, &image).await?;
//! let visible = catalog.search("herbert");
//! catalog.delete(book.id).await?;
//! ```

use tracing::{debug, info, warn};

use crate::cache::BookCache;
use crate::error::CatalogResult;
use crate::filter::filter;
use crate::models::{Book, BookFields, ImageFile};
use crate::remote::CatalogApi;

/// Book list kept in sync with the catalog API
///
/// Mutations take `&mut self`, so writes through one catalog never overlap.
pub struct Catalog<A> {
    api: A,
    cache: BookCache,
}

impl<A: CatalogApi> Catalog<A> {
    /// Create a catalog with an empty cache
    pub fn new(api: A) -> Self {
        Self {
            api,
            cache: BookCache::new(),
        }
    }

    /// Create a catalog and load the current book list
    pub async fn open(api: A) -> Self {
        let mut catalog = Self::new(api);
        catalog.refresh().await;
        catalog
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// All cached books, in cache order
    pub fn books(&self) -> &[Book] {
        self.cache.books()
    }

    pub fn get(&self, id: i64) -> Option<&Book> {
        self.cache.get(id)
    }

    /// Cached books matching `query`
    pub fn search(&self, query: &str) -> Vec<&Book> {
        filter(&self.cache, query)
    }

    // ==================== Remote Operations ====================

    /// Reload the book list from the server
    ///
    /// On failure the cache is emptied and the error is only logged, so a
    /// view always has something to render. Returns the number of books.
    pub async fn refresh(&mut self) -> usize {
        match self.api.list().await {
            Ok(books) => {
                debug!("Loaded {} books", books.len());
                self.cache.replace_all(books);
            }
            Err(e) => {
                warn!("Failed to load books, showing an empty list: {}", e);
                self.cache.replace_all(Vec::new());
            }
        }
        self.cache.len()
    }

    /// Fetch a single book from the server
    ///
    /// Does not touch the cache.
    pub async fn fetch(&self, id: i64) -> CatalogResult<Book> {
        self.api.fetch(id).await
    }

    /// Create a book and append the server's record to the cache
    pub async fn create(&mut self, fields: &BookFields, image: &ImageFile) -> CatalogResult<Book> {
        let book = self.api.create(fields, image).await?;
        info!("Created book {} ({})", book.id, book.title);
        self.cache.append(book.clone());
        Ok(book)
    }

    /// Update a book and replace its cache entry
    ///
    /// The update endpoint returns no body, so the confirmed record is
    /// fetched afterwards. If that fetch fails the submitted fields are
    /// cached together with the last known image URL.
    pub async fn update(
        &mut self,
        id: i64,
        fields: &BookFields,
        image: Option<&ImageFile>,
    ) -> CatalogResult<Book> {
        self.api.update(id, fields, image).await?;
        info!("Updated book {}", id);

        let book = match self.api.fetch(id).await {
            Ok(book) => book,
            Err(e) => {
                warn!("Could not reload book {} after update: {}", id, e);
                let image_url = self
                    .cache
                    .get(id)
                    .map(|b| b.image_url.clone())
                    .unwrap_or_default();
                Book::from_fields(id, fields.clone(), image_url)
            }
        };

        if !self.cache.replace_one(id, book.clone()) {
            debug!("Book {} not cached, nothing to replace", id);
        }
        Ok(book)
    }

    /// Delete a book and drop it from the cache
    pub async fn delete(&mut self, id: i64) -> CatalogResult<()> {
        self.api.delete(id).await?;
        info!("Deleted book {}", id);
        self.cache.remove_one(id);
        Ok(())
    }
}
