//! Form and preview binding
//!
//! Thin glue between user input and the `Catalog`: draft field values, the
//! selected cover image, and a scoped local preview of that image.

mod draft;
mod preview;

pub use draft::{BookForm, FormMode};
pub use preview::{Preview, PreviewRegistry};
