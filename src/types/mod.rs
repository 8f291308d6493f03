pub mod identifiers;

pub use identifiers::{ClientId, ContentVersion, GenerationName, RequestKey};
