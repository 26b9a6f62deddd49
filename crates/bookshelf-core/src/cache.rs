//! Local catalog cache
//!
//! In-memory mirror of the server's book list. Ordering is arrival order
//! from the last list fetch, followed by books appended after creation.
//! Only the `Catalog` mutates it, and only after the server confirmed.

use crate::models::Book;

/// Ordered collection of server-confirmed books, unique by ID
#[derive(Debug, Clone, Default)]
pub struct BookCache {
    books: Vec<Book>,
}

impl BookCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole collection after a list fetch
    ///
    /// Later duplicates of an ID are dropped so IDs stay unique.
    pub fn replace_all(&mut self, books: Vec<Book>) {
        self.books.clear();
        for book in books {
            if self.position(book.id).is_none() {
                self.books.push(book);
            }
        }
    }

    /// Add a newly created book at the end
    ///
    /// If the ID is already cached the existing entry is replaced in place.
    pub fn append(&mut self, book: Book) {
        match self.position(book.id) {
            Some(pos) => self.books[pos] = book,
            None => self.books.push(book),
        }
    }

    /// Replace the entry for `id`, keeping its position
    ///
    /// Returns false if no such entry is cached.
    pub fn replace_one(&mut self, id: i64, book: Book) -> bool {
        match self.position(id) {
            Some(pos) => {
                self.books[pos] = book;
                true
            }
            None => false,
        }
    }

    /// Remove the entry for `id`, returning it if it was cached
    pub fn remove_one(&mut self, id: i64) -> Option<Book> {
        self.position(id).map(|pos| self.books.remove(pos))
    }

    pub fn get(&self, id: i64) -> Option<&Book> {
        self.books.iter().find(|b| b.id == id)
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Book> {
        self.books.iter()
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    fn position(&self, id: i64) -> Option<usize> {
        self.books.iter().position(|b| b.id == id)
    }
}

impl<'a> IntoIterator for &'a BookCache {
    type Item = &'a Book;
    type IntoIter = std::slice::Iter<'a, Book>;

    fn into_iter(self) -> Self::IntoIter {
        self.books.iter()
    }
}
