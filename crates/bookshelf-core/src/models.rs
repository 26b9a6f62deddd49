//! Data models for Bookshelf
//!
//! Defines the catalog record (`Book`), the editable fields submitted with
//! create/update (`BookFields`), and an image blob loaded from disk
//! (`ImageFile`). Field names follow the catalog API's camelCase JSON.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{CatalogError, CatalogResult};

/// A catalog record as confirmed by the server
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Server-assigned identifier
    pub id: i64,
    pub title: String,
    pub author: String,
    pub year_published: i32,
    #[serde(default)]
    pub description: String,
    /// Server-relative path to the cover image
    #[serde(default)]
    pub image_url: String,
}

impl Book {
    /// Build a book from its editable fields and server-owned attributes
    pub fn from_fields(id: i64, fields: BookFields, image_url: impl Into<String>) -> Self {
        Self {
            id,
            title: fields.title,
            author: fields.author,
            year_published: fields.year_published,
            description: fields.description,
            image_url: image_url.into(),
        }
    }

    /// The editable part of this book
    pub fn fields(&self) -> BookFields {
        BookFields {
            title: self.title.clone(),
            author: self.author.clone(),
            year_published: self.year_published,
            description: self.description.clone(),
        }
    }
}

/// Editable book fields, as submitted to the create and update endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BookFields {
    pub title: String,
    pub author: String,
    pub year_published: i32,
    pub description: String,
}

impl BookFields {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        year_published: i32,
        description: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            year_published,
            description: description.into(),
        }
    }

    /// Check that every required field is filled in
    pub fn validate(&self) -> CatalogResult<()> {
        if self.title.trim().is_empty() {
            return Err(CatalogError::invalid("Title is required"));
        }
        if self.author.trim().is_empty() {
            return Err(CatalogError::invalid("Author is required"));
        }
        if self.description.trim().is_empty() {
            return Err(CatalogError::invalid("Description is required"));
        }
        Ok(())
    }
}

/// An image blob selected for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = content_type_for(&file_name).to_string();
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    /// Read an image file from disk
    pub async fn load(path: &Path) -> CatalogResult<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| CatalogError::ImageRead {
                path: path.to_path_buf(),
                source,
            })?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());

        Ok(Self::new(file_name, bytes))
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Guess an image content type from a file name's extension
pub fn content_type_for(file_name: &str) -> &'static str {
    let ext = Path::new(file_name)
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}
