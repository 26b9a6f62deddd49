//! Local image previews
//!
//! Selecting an image mints a `blob:` style URI that a view can show before
//! anything is uploaded. Each URI is owned by a `Preview` handle; dropping
//! the handle releases the bytes held by the registry.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use tracing::debug;
use uuid::Uuid;

use crate::models::ImageFile;

const URI_PREFIX: &str = "blob:bookshelf/";

#[derive(Debug)]
struct Entry {
    content_type: String,
    bytes: Vec<u8>,
}

/// Registry of live preview URIs
///
/// Cheap to clone; clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct PreviewRegistry {
    entries: Arc<Mutex<HashMap<String, Entry>>>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an image and hand out the owning handle
    pub fn create(&self, image: &ImageFile) -> Preview {
        let uri = format!("{}{}", URI_PREFIX, Uuid::new_v4());
        self.lock().insert(
            uri.clone(),
            Entry {
                content_type: image.content_type.clone(),
                bytes: image.bytes.clone(),
            },
        );
        debug!("Created preview {} for {}", uri, image.file_name);

        Preview {
            uri,
            registry: self.clone(),
        }
    }

    /// Whether `uri` still refers to a live preview
    pub fn contains(&self, uri: &str) -> bool {
        self.lock().contains_key(uri)
    }

    /// Render a live preview as a `data:` URL
    pub fn data_url(&self, uri: &str) -> Option<String> {
        self.lock().get(uri).map(|entry| {
            format!(
                "data:{};base64,{}",
                entry.content_type,
                STANDARD.encode(&entry.bytes)
            )
        })
    }

    /// Number of previews not yet released
    pub fn live_count(&self) -> usize {
        self.lock().len()
    }

    fn release(&self, uri: &str) {
        if self.lock().remove(uri).is_some() {
            debug!("Released preview {}", uri);
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        // A panic while holding the lock cannot leave the map half-updated
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Owning handle for one preview URI
#[derive(Debug)]
pub struct Preview {
    uri: String,
    registry: PreviewRegistry,
}

impl Preview {
    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn data_url(&self) -> Option<String> {
        self.registry.data_url(&self.uri)
    }
}

impl Drop for Preview {
    fn drop(&mut self) {
        self.registry.release(&self.uri);
    }
}
