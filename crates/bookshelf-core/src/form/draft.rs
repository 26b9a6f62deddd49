//! Book form draft
//!
//! Holds the values a user is editing plus the chosen cover image, and
//! submits them through a `Catalog`. A failed submit keeps the draft so it
//! can be retried; a successful one clears it.

use tracing::warn;

use super::preview::{Preview, PreviewRegistry};
use crate::catalog::Catalog;
use crate::error::{CatalogError, CatalogResult};
use crate::models::{Book, BookFields, ImageFile};
use crate::remote::{resolve_image_url, CatalogApi};

/// What submitting the form does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    /// Create a new book; an image is required
    Create,
    /// Update an existing book; the image is optional
    Edit { id: i64, current_image_url: String },
}

/// Draft values and image selection for one book form
#[derive(Debug)]
pub struct BookForm {
    mode: FormMode,
    fields: BookFields,
    image: Option<ImageFile>,
    preview: Option<Preview>,
    registry: PreviewRegistry,
}

impl BookForm {
    /// Empty form for adding a book
    pub fn create(registry: &PreviewRegistry) -> Self {
        Self {
            mode: FormMode::Create,
            fields: BookFields::default(),
            image: None,
            preview: None,
            registry: registry.clone(),
        }
    }

    /// Form seeded from an existing book
    pub fn edit(book: &Book, registry: &PreviewRegistry) -> Self {
        Self {
            mode: FormMode::Edit {
                id: book.id,
                current_image_url: book.image_url.clone(),
            },
            fields: book.fields(),
            image: None,
            preview: None,
            registry: registry.clone(),
        }
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn fields(&self) -> &BookFields {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut BookFields {
        &mut self.fields
    }

    pub fn image(&self) -> Option<&ImageFile> {
        self.image.as_ref()
    }

    /// Choose a cover image
    ///
    /// Any previous selection and its preview are released.
    pub fn select_image(&mut self, image: ImageFile) {
        self.preview = Some(self.registry.create(&image));
        self.image = Some(image);
    }

    /// Drop the chosen image (an edit keeps the server's image)
    pub fn clear_image(&mut self) {
        self.preview = None;
        self.image = None;
    }

    /// The selected image's preview
    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    /// URI to show as the cover
    ///
    /// The local preview if an image was chosen, otherwise (when editing)
    /// the current server image resolved against `base_url`.
    pub fn preview_uri(&self, base_url: &str) -> Option<String> {
        if let Some(preview) = &self.preview {
            return Some(preview.uri().to_string());
        }
        match &self.mode {
            FormMode::Edit {
                current_image_url, ..
            } => resolve_image_url(base_url, current_image_url),
            FormMode::Create => None,
        }
    }

    /// Check the draft before anything is sent
    pub fn validate(&self) -> CatalogResult<()> {
        self.fields.validate()?;
        if self.mode == FormMode::Create && self.image.is_none() {
            return Err(CatalogError::invalid("Please select an image"));
        }
        Ok(())
    }

    /// Submit the draft through `catalog`
    ///
    /// On success the draft is cleared and the confirmed book returned; on
    /// failure the draft is left as it was.
    pub async fn submit<A: CatalogApi>(&mut self, catalog: &mut Catalog<A>) -> CatalogResult<Book> {
        self.validate()?;

        let result = match &self.mode {
            FormMode::Create => match &self.image {
                Some(image) => catalog.create(&self.fields, image).await,
                None => Err(CatalogError::invalid("Please select an image")),
            },
            FormMode::Edit { id, .. } => {
                catalog
                    .update(*id, &self.fields, self.image.as_ref())
                    .await
            }
        };

        match result {
            Ok(book) => {
                self.reset(&book);
                Ok(book)
            }
            Err(e) => {
                warn!("Submit failed, keeping draft: {}", e);
                Err(e)
            }
        }
    }

    /// Clear the draft after a successful submit
    fn reset(&mut self, saved: &Book) {
        self.fields = BookFields::default();
        self.clear_image();
        if let FormMode::Edit {
            current_image_url, ..
        } = &mut self.mode
        {
            *current_image_url = saved.image_url.clone();
        }
    }
}
