pub mod item;
pub mod library;

pub use crate::types::identifiers::ContentVersion;
pub use item::{ContentItem, FALLBACK_ITEM_ID};
pub use library::{ContentError, ContentLibrary};
