//! Response classification and parsing
//!
//! Maps HTTP status codes onto the catalog error taxonomy and decodes
//! response bodies into books.

use std::fmt;

use reqwest::StatusCode;
use serde_json::Value;

use crate::error::{CatalogError, CatalogResult};
use crate::models::Book;

/// Longest server message carried into an error
const MAX_DETAIL_LEN: usize = 200;

/// A catalog API call, used for status classification and logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operation {
    List,
    Fetch(i64),
    Create,
    Update(i64),
    Delete(i64),
}

impl Operation {
    /// Whether this call changes server state
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            Operation::Create | Operation::Update(_) | Operation::Delete(_)
        )
    }

    fn target_id(&self) -> Option<i64> {
        match self {
            Operation::Fetch(id) | Operation::Update(id) | Operation::Delete(id) => Some(*id),
            Operation::List | Operation::Create => None,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::List => write!(f, "list books"),
            Operation::Fetch(id) => write!(f, "fetch book {}", id),
            Operation::Create => write!(f, "create book"),
            Operation::Update(id) => write!(f, "update book {}", id),
            Operation::Delete(id) => write!(f, "delete book {}", id),
        }
    }
}

/// Turn a non-2xx status into the matching error
///
/// - 404 on a call that names a book is `NotFound`
/// - other failures of writes are `Validation` (the server rejected them)
/// - other failures of reads are `Protocol`
pub(crate) fn check_status(op: Operation, status: StatusCode, body: &str) -> CatalogResult<()> {
    if status.is_success() {
        return Ok(());
    }

    if status == StatusCode::NOT_FOUND {
        if let Some(id) = op.target_id() {
            return Err(CatalogError::NotFound { id });
        }
    }

    let details = failure_details(status, body);
    if op.is_write() {
        Err(CatalogError::Validation {
            status: Some(status.as_u16()),
            details,
        })
    } else {
        Err(CatalogError::Protocol {
            details: format!("{} returned {}: {}", op, status.as_u16(), details),
        })
    }
}

/// Decode a list response
///
/// Anything other than a JSON array of books is a `Protocol` error.
pub(crate) fn parse_book_list(body: &str) -> CatalogResult<Vec<Book>> {
    let value: Value = serde_json::from_str(body).map_err(|e| CatalogError::Protocol {
        details: format!("book list is not valid JSON: {}", e),
    })?;

    if !value.is_array() {
        return Err(CatalogError::Protocol {
            details: format!("expected a JSON array of books, got {}", json_kind(&value)),
        });
    }

    serde_json::from_value(value).map_err(|e| CatalogError::Protocol {
        details: format!("malformed book in list: {}", e),
    })
}

/// Decode a single book
pub(crate) fn parse_book(body: &str) -> CatalogResult<Book> {
    serde_json::from_str(body).map_err(|e| CatalogError::Protocol {
        details: format!("malformed book: {}", e),
    })
}

/// Server message for an error, or the status reason if the body is empty
fn failure_details(status: StatusCode, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string();
    }

    if body.chars().count() > MAX_DETAIL_LEN {
        let truncated: String = body.chars().take(MAX_DETAIL_LEN).collect();
        format!("{}...", truncated)
    } else {
        body.to_string()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
