//! Catalog error handling
//!
//! Typed errors for talking to the catalog API, with user-facing
//! notification text for the failures a view has to surface.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during catalog operations
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Transport or connection failure
    #[error("Network error: {details}")]
    Network { details: String },

    /// The API answered with something we could not interpret
    #[error("Unexpected response from catalog API: {details}")]
    Protocol { details: String },

    /// The payload was rejected, either locally or by the server
    #[error("{}", validation_message(status, details))]
    Validation { status: Option<u16>, details: String },

    /// No book with this ID exists on the server
    #[error("Book {id} not found")]
    NotFound { id: i64 },

    /// Image file could not be read from disk
    #[error("Failed to read image '{path}': {source}")]
    ImageRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Base URL or image path could not be turned into a URL
    #[error("Invalid URL '{url}': {details}")]
    InvalidUrl { url: String, details: String },
}

fn validation_message(status: &Option<u16>, details: &str) -> String {
    match status {
        Some(code) => format!("Rejected by server ({}): {}", code, details),
        None => format!("Invalid book: {}", details),
    }
}

impl CatalogError {
    /// Build a validation error that never reached the server
    pub fn invalid(details: impl Into<String>) -> Self {
        CatalogError::Validation {
            status: None,
            details: details.into(),
        }
    }

    /// Classify a reqwest failure
    ///
    /// Decode failures mean the server spoke but said something unexpected;
    /// everything else is a transport problem.
    pub fn from_reqwest(error: reqwest::Error) -> Self {
        if error.is_decode() {
            CatalogError::Protocol {
                details: error.to_string(),
            }
        } else {
            CatalogError::Network {
                details: error.to_string(),
            }
        }
    }

    /// Check if retrying the same request could succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, CatalogError::Network { .. })
    }

    /// Short message suitable for a user notification
    pub fn notification(&self) -> String {
        match self {
            CatalogError::Network { .. } => {
                "Could not reach the catalog server. Please try again.".to_string()
            }
            CatalogError::Protocol { .. } => {
                "The catalog server sent an unexpected response.".to_string()
            }
            CatalogError::Validation { status: None, details } => details.clone(),
            CatalogError::Validation { .. } => {
                "The catalog server rejected the book. Check the fields and image.".to_string()
            }
            CatalogError::NotFound { id } => format!("Book {} no longer exists.", id),
            CatalogError::ImageRead { path, .. } => {
                format!("Could not read image {}.", path.display())
            }
            CatalogError::InvalidUrl { url, .. } => format!("Invalid URL: {}", url),
        }
    }
}

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;
