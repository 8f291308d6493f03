use serde::{Deserialize, Serialize};

/// One selectable verse.
///
/// Items are immutable once loaded. `id` is stable across content releases,
/// the position in the list is not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub id: u32,
    pub text: String,
    pub collection_name: String,
    pub major_division: u32,
    pub minor_division: u32,
    pub category: String,
}

/// Id reserved for the embedded fallback item.
pub const FALLBACK_ITEM_ID: u32 = 0;

const FALLBACK_TEXT: &str = "Karena begitu besar kasih Allah akan dunia ini, sehingga Ia telah mengaruniakan Anak-Nya yang tunggal, supaya setiap orang yang percaya kepada-Nya tidak binasa, melainkan beroleh hidup yang kekal.";

impl ContentItem {
    /// The item served when no content list is available.
    pub fn fallback() -> Self {
        ContentItem {
            id: FALLBACK_ITEM_ID,
            text: FALLBACK_TEXT.to_string(),
            collection_name: "Yohanes".to_string(),
            major_division: 3,
            minor_division: 16,
            category: "love".to_string(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.id == FALLBACK_ITEM_ID
    }
}
