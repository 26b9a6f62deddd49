//! In-memory catalog API for tests

use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{Book, BookFields, ImageFile};
use crate::remote::CatalogApi;

/// How the next calls should fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// Transport failure on every call
    Network,
    /// Writes rejected with 400
    Reject,
    /// List answers with a JSON object instead of an array
    NotAnArray,
    /// Fetch fails, everything else succeeds
    FetchOnly,
}

#[derive(Debug, Default)]
struct State {
    books: Vec<Book>,
    next_id: i64,
    failure: Option<Failure>,
    calls: Vec<String>,
}

/// Fake server holding books in memory
#[derive(Debug, Default)]
pub struct FakeApi {
    state: Mutex<State>,
}

impl FakeApi {
    pub fn with_books(books: Vec<Book>) -> Self {
        let next_id = books.iter().map(|b| b.id).max().unwrap_or(0) + 1;
        Self {
            state: Mutex::new(State {
                books,
                next_id,
                ..State::default()
            }),
        }
    }

    pub fn fail_with(&self, failure: Failure) {
        self.state.lock().unwrap().failure = Some(failure);
    }

    pub fn recover(&self) {
        self.state.lock().unwrap().failure = None;
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn server_books(&self) -> Vec<Book> {
        self.state.lock().unwrap().books.clone()
    }

    fn record(&self, call: String) -> Option<Failure> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        state.failure
    }
}

fn network() -> CatalogError {
    CatalogError::Network {
        details: "connection refused".to_string(),
    }
}

fn rejected() -> CatalogError {
    CatalogError::Validation {
        status: Some(400),
        details: "Bad Request".to_string(),
    }
}

#[async_trait]
impl CatalogApi for FakeApi {
    async fn list(&self) -> CatalogResult<Vec<Book>> {
        match self.record("list".to_string()) {
            Some(Failure::Network) => Err(network()),
            Some(Failure::NotAnArray) => Err(CatalogError::Protocol {
                details: "expected a JSON array of books, got an object".to_string(),
            }),
            _ => Ok(self.server_books()),
        }
    }

    async fn fetch(&self, id: i64) -> CatalogResult<Book> {
        match self.record(format!("fetch {}", id)) {
            Some(Failure::Network) | Some(Failure::FetchOnly) => Err(network()),
            _ => self
                .server_books()
                .into_iter()
                .find(|b| b.id == id)
                .ok_or(CatalogError::NotFound { id }),
        }
    }

    async fn create(&self, fields: &BookFields, image: &ImageFile) -> CatalogResult<Book> {
        match self.record(format!("create {}", fields.title)) {
            Some(Failure::Network) => return Err(network()),
            Some(Failure::Reject) => return Err(rejected()),
            _ => {}
        }

        let mut state = self.state.lock().unwrap();
        let id = state.next_id.max(1);
        state.next_id = id + 1;
        let book = Book::from_fields(id, fields.clone(), format!("/uploads/{}", image.file_name));
        state.books.push(book.clone());
        Ok(book)
    }

    async fn update(
        &self,
        id: i64,
        fields: &BookFields,
        image: Option<&ImageFile>,
    ) -> CatalogResult<()> {
        match self.record(format!("update {}", id)) {
            Some(Failure::Network) => return Err(network()),
            Some(Failure::Reject) => return Err(rejected()),
            _ => {}
        }

        let mut state = self.state.lock().unwrap();
        let book = state
            .books
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(CatalogError::NotFound { id })?;
        let image_url = match image {
            Some(image) => format!("/uploads/{}", image.file_name),
            None => book.image_url.clone(),
        };
        *book = Book::from_fields(id, fields.clone(), image_url);
        Ok(())
    }

    async fn delete(&self, id: i64) -> CatalogResult<()> {
        match self.record(format!("delete {}", id)) {
            Some(Failure::Network) => return Err(network()),
            Some(Failure::Reject) => return Err(rejected()),
            _ => {}
        }

        let mut state = self.state.lock().unwrap();
        let before = state.books.len();
        state.books.retain(|b| b.id != id);
        if state.books.len() == before {
            return Err(CatalogError::NotFound { id });
        }
        Ok(())
    }
}

/// A book with predictable fields
pub fn sample_book(id: i64, title: &str) -> Book {
    Book::from_fields(
        id,
        BookFields::new(title, format!("Author {}", id), 2000 + id as i32, "Description"),
        format!("/uploads/{}.png", id),
    )
}
