use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::content::item::{ContentItem, FALLBACK_ITEM_ID};
use crate::types::identifiers::ContentVersion;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Content list is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Duplicate item id: {0}")]
    DuplicateId(u32),
    #[error("Item id {0} is reserved for the fallback item")]
    ReservedId(u32),
    #[error("Item {0} has empty text")]
    EmptyText(u32),
    #[error("Item {id} has a zero division ({major}:{minor})")]
    InvalidDivision { id: u32, major: u32, minor: u32 },
}

/// The fixed, ordered content list plus its content hash.
///
/// Cloning is cheap; items are shared.
#[derive(Debug, Clone)]
pub struct ContentLibrary {
    items: Arc<[ContentItem]>,
    version: ContentVersion,
}

impl ContentLibrary {
    /// Build a library from an ordered item list.
    ///
    /// This is the only validating constructor; `from_json` and `load` go
    /// through it. Order is preserved since it decides selection.
    pub fn from_items(items: Vec<ContentItem>) -> Result<Self, ContentError> {
        let mut seen = BTreeSet::new();
        for item in &items {
            if item.id == FALLBACK_ITEM_ID {
                return Err(ContentError::ReservedId(item.id));
            }
            if !seen.insert(item.id) {
                return Err(ContentError::DuplicateId(item.id));
            }
            if item.text.trim().is_empty() {
                return Err(ContentError::EmptyText(item.id));
            }
            if item.major_division == 0 || item.minor_division == 0 {
                return Err(ContentError::InvalidDivision {
                    id: item.id,
                    major: item.major_division,
                    minor: item.minor_division,
                });
            }
        }

        // Version computed on the canonical serialization, not the input bytes
        let canonical = serde_json::to_vec(&items)?;
        let version = ContentVersion::from_content(&canonical);

        debug!(items = items.len(), version = version.as_str(), "content library built");

        Ok(ContentLibrary {
            items: items.into(),
            version,
        })
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, ContentError> {
        let items: Vec<ContentItem> = serde_json::from_slice(bytes)?;
        Self::from_items(items)
    }

    pub fn load(path: &Path) -> Result<Self, ContentError> {
        let bytes = std::fs::read(path)?;
        let library = Self::from_json(&bytes)?;
        info!(
            path = %path.display(),
            items = library.len(),
            version = library.version.as_str(),
            "content library loaded"
        );
        Ok(library)
    }

    /// A library with no items. Selection degrades to the fallback item.
    pub fn empty() -> Self {
        ContentLibrary {
            items: Vec::new().into(),
            version: ContentVersion::from_content(b"[]"),
        }
    }

    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn version(&self) -> &ContentVersion {
        &self.version
    }

    pub fn get(&self, id: u32) -> Option<&ContentItem> {
        self.items.iter().find(|item| item.id == id)
    }
}

impl Default for ContentLibrary {
    fn default() -> Self {
        Self::empty()
    }
}
