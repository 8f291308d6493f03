use tracing::info;

use crate::cache::storage::CacheStorage;
use crate::types::identifiers::GenerationName;

/// Delete every generation not named in `keep`.
///
/// Returns the deleted names in creation order. Runs to completion before
/// returning; the caller claims clients only afterwards.
pub fn purge_stale_generations(storage: &CacheStorage, keep: &[GenerationName]) -> Vec<GenerationName> {
    let mut deleted = Vec::new();
    for name in storage.keys() {
        if keep.contains(&name) {
            continue;
        }
        if storage.delete(&name) {
            info!(generation = %name, "deleted stale cache generation");
            deleted.push(name);
        }
    }
    deleted
}
