//! Book command handlers

use std::path::PathBuf;

use anyhow::Result;
use tracing::debug;

use bookshelf_core::{
    BookForm, Catalog, CatalogApi, HttpCatalogClient, ImageFile, PreviewRegistry,
};

use crate::output::Output;

/// Field values given on the command line
///
/// `None` leaves the draft's current value alone.
#[derive(Debug, Default)]
pub struct BookInput {
    pub title: Option<String>,
    pub author: Option<String>,
    pub year: Option<i32>,
    pub description: Option<String>,
    pub image: Option<PathBuf>,
}

impl BookInput {
    fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.year.is_none()
            && self.description.is_none()
            && self.image.is_none()
    }

    /// Copy the given values into the form, loading the image if any
    async fn apply(self, form: &mut BookForm) -> Result<()> {
        let fields = form.fields_mut();
        if let Some(title) = self.title {
            fields.title = title;
        }
        if let Some(author) = self.author {
            fields.author = author;
        }
        if let Some(year) = self.year {
            fields.year_published = year;
        }
        if let Some(description) = self.description {
            fields.description = description;
        }
        if let Some(path) = self.image {
            form.select_image(ImageFile::load(&path).await?);
        }
        Ok(())
    }
}

/// List books, optionally narrowed by a search query
pub async fn list<A: CatalogApi>(
    catalog: &mut Catalog<A>,
    query: Option<String>,
    output: &Output,
) -> Result<()> {
    catalog.refresh().await;
    let visible = catalog.search(query.as_deref().unwrap_or(""));
    output.print_books(&visible, catalog.books().len());
    Ok(())
}

/// Show a single book
pub async fn show(catalog: &Catalog<HttpCatalogClient>, id: i64, output: &Output) -> Result<()> {
    let book = catalog.fetch(id).await?;
    output.print_book(&book);
    Ok(())
}

/// Create a new book
pub async fn add(
    catalog: &mut Catalog<HttpCatalogClient>,
    input: BookInput,
    registry: &PreviewRegistry,
    output: &Output,
) -> Result<()> {
    let mut form = BookForm::create(registry);
    input.apply(&mut form).await?;
    log_preview(&form, catalog);

    let book = form.submit(catalog).await?;

    output.success(&format!("Created book: {}", book.id));
    output.print_book(&book);
    Ok(())
}

/// Edit an existing book
pub async fn edit(
    catalog: &mut Catalog<HttpCatalogClient>,
    id: i64,
    input: BookInput,
    registry: &PreviewRegistry,
    output: &Output,
) -> Result<()> {
    if input.is_empty() {
        output.message("Nothing to change.");
        return Ok(());
    }

    let current = catalog.fetch(id).await?;
    let mut form = BookForm::edit(&current, registry);
    input.apply(&mut form).await?;
    log_preview(&form, catalog);

    let book = form.submit(catalog).await?;

    output.success(&format!("Updated book: {}", book.id));
    output.print_book(&book);
    Ok(())
}

/// Delete a book
pub async fn delete<A: CatalogApi>(catalog: &mut Catalog<A>, id: i64, output: &Output) -> Result<()> {
    catalog.refresh().await;
    catalog.delete(id).await?;
    output.success(&format!("Deleted book: {}", id));
    Ok(())
}

fn log_preview(form: &BookForm, catalog: &Catalog<HttpCatalogClient>) {
    if let Some(uri) = form.preview_uri(catalog.api().base_url().as_str()) {
        debug!("Cover preview: {}", uri);
    }
}
