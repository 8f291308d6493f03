use crate::content::ContentItem;

/// `"<collection> <major>:<minor>"`, or an empty string when the item has
/// no collection name.
pub fn get_reference(item: &ContentItem) -> String {
    if item.collection_name.is_empty() {
        return String::new();
    }
    format!(
        "{} {}:{}",
        item.collection_name, item.major_division, item.minor_division
    )
}

/// Clipboard text: the quoted verse, a blank line, then `— <reference>`.
pub fn format_for_copy(item: &ContentItem) -> String {
    let reference = get_reference(item);
    format!("\"{}\"\n\n\u{2014} {}", item.text, reference)
}
