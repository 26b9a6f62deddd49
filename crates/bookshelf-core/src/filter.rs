//! Search filter
//!
//! Case-insensitive substring search over title, author and publication
//! year. Cheap enough to recompute on every keystroke.

use crate::models::Book;

/// Books matching `query`, in their original order
///
/// A book matches if its title, author, or decimal year contains the query,
/// ignoring case. An empty query matches everything.
pub fn filter<'a, I>(books: I, query: &str) -> Vec<&'a Book>
where
    I: IntoIterator<Item = &'a Book>,
{
    let query = query.to_lowercase();
    books
        .into_iter()
        .filter(|book| matches(book, &query))
        .collect()
}

/// Check a single book against an already lowercased query
fn matches(book: &Book, query: &str) -> bool {
    query.is_empty()
        || book.title.to_lowercase().contains(query)
        || book.author.to_lowercase().contains(query)
        || book.year_published.to_string().contains(query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookFields;

    fn books() -> Vec<Book> {
        vec![
            Book::from_fields(1, BookFields::new("Dune", "Frank Herbert", 1965, "Spice and sandworms"), ""),
            Book::from_fields(2, BookFields::new("Neuromancer", "William Gibson", 1984, "n"), ""),
            Book::from_fields(3, BookFields::new("Nineteen Eighty-Four", "George Orwell", 1949, "o"), ""),
            Book::from_fields(4, BookFields::new("The Left Hand of Darkness", "Ursula K. Le Guin", 1969, "l"), ""),
        ]
    }

    fn ids(found: &[&Book]) -> Vec<i64> {
        found.iter().map(|b| b.id).collect()
    }

    #[test]
    fn test_empty_query_matches_all() {
        let books = books();
        let found = filter(&books, "");
        assert_eq!(found.len(), books.len());
        assert!(found.iter().zip(books.iter()).all(|(a, b)| *a == b));
    }

    #[test]
    fn test_title_case_insensitive() {
        let books = books();
        assert_eq!(ids(&filter(&books, "DUNE")), vec![1]);
        assert_eq!(ids(&filter(&books, "darkness")), vec![4]);
    }

    #[test]
    fn test_author_match() {
        let books = books();
        assert_eq!(ids(&filter(&books, "gibson")), vec![2]);
        assert_eq!(ids(&filter(&books, "le guin")), vec![4]);
    }

    #[test]
    fn test_year_match() {
        let books = books();
        assert_eq!(ids(&filter(&books, "1984")), vec![2]);
        assert_eq!(ids(&filter(&books, "196")), vec![1, 4]);
    }

    #[test]
    fn test_matches_any_field_preserving_order() {
        let books = books();
        // Herbert matches by author, Neuromancer by title
        let found = ids(&filter(&books, "er"));
        assert_eq!(found, vec![1, 2]);
    }

    #[test]
    fn test_no_match() {
        let books = books();
        assert!(filter(&books, "tolkien").is_empty());
    }

    #[test]
    fn test_description_is_not_searched() {
        let books = books();
        assert!(filter(&books, "spice").is_empty());
    }

    #[test]
    fn test_result_is_subset_satisfying_contract() {
        let books = books();
        for query in ["", "e", "OR", "19", "x", "frank herbert"] {
            let q = query.to_lowercase();
            for book in filter(&books, query) {
                assert!(books.contains(book));
                assert!(
                    book.title.to_lowercase().contains(&q)
                        || book.author.to_lowercase().contains(&q)
                        || book.year_published.to_string().contains(&q)
                );
            }
        }
    }
}
