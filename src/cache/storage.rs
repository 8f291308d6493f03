use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use thiserror::Error;

use crate::cache::request::StoredResponse;
use crate::types::identifiers::{ContentVersion, GenerationName, RequestKey};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Quota exceeded: {requested} bytes requested, {available} available")]
    QuotaExceeded { requested: u64, available: u64 },
    #[error("Filename collision detected for hash fragment: {0}")]
    FilenameCollision(String),
    #[error("Entry digest mismatch for {key}: manifest says {expected}, body hashes to {actual}")]
    DigestMismatch {
        key: String,
        expected: String,
        actual: String,
    },
    #[error("Duplicate generation in manifest: {0}")]
    DuplicateGeneration(String),
}

/// One named, versioned set of request → response pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheGeneration {
    name: GenerationName,
    entries: BTreeMap<RequestKey, StoredResponse>,
}

impl CacheGeneration {
    pub fn new(name: GenerationName) -> Self {
        Self {
            name,
            entries: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &GenerationName {
        &self.name
    }

    pub fn get(&self, key: &RequestKey) -> Option<&StoredResponse> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RequestKey, &StoredResponse)> {
        self.entries.iter()
    }

    pub(crate) fn insert(&mut self, key: RequestKey, response: StoredResponse) {
        self.entries.insert(key, response);
    }

    fn size(&self) -> u64 {
        self.entries.values().map(StoredResponse::size).sum()
    }
}

/// Origin-wide store of cache generations.
///
/// Generations are kept in creation order; `match_any` searches them in that
/// order. Shared by every manager version through the registration.
#[derive(Debug, Default)]
pub struct CacheStorage {
    quota_bytes: Option<u64>,
    generations: Mutex<Vec<CacheGeneration>>,
}

impl CacheStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota_bytes: Option<u64>) -> Self {
        Self {
            quota_bytes,
            generations: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn from_generations(quota_bytes: Option<u64>, generations: Vec<CacheGeneration>) -> Self {
        Self {
            quota_bytes,
            generations: Mutex::new(generations),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<CacheGeneration>> {
        self.generations.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn quota_bytes(&self) -> Option<u64> {
        self.quota_bytes
    }

    /// Create the generation if it does not exist yet.
    pub fn open(&self, name: &GenerationName) {
        let mut generations = self.lock();
        if !generations.iter().any(|g| &g.name == name) {
            generations.push(CacheGeneration::new(name.clone()));
        }
    }

    pub fn has(&self, name: &GenerationName) -> bool {
        self.lock().iter().any(|g| &g.name == name)
    }

    /// Generation names in creation order.
    pub fn keys(&self) -> Vec<GenerationName> {
        self.lock().iter().map(|g| g.name.clone()).collect()
    }

    /// Returns whether a generation was removed.
    pub fn delete(&self, name: &GenerationName) -> bool {
        let mut generations = self.lock();
        let before = generations.len();
        generations.retain(|g| &g.name != name);
        generations.len() != before
    }

    /// Store one response, creating the generation when missing.
    pub fn put(
        &self,
        name: &GenerationName,
        key: RequestKey,
        response: StoredResponse,
    ) -> Result<(), StorageError> {
        self.put_all(name, vec![(key, response)])
    }

    /// Store every entry or none of them.
    pub fn put_all(
        &self,
        name: &GenerationName,
        entries: Vec<(RequestKey, StoredResponse)>,
    ) -> Result<(), StorageError> {
        let mut generations = self.lock();

        if let Some(quota) = self.quota_bytes {
            let used: u64 = generations.iter().map(CacheGeneration::size).sum();
            let existing = generations.iter().find(|g| &g.name == name);
            // Replaced entries free their old bytes
            let mut staged: BTreeMap<&RequestKey, u64> = BTreeMap::new();
            for (key, response) in &entries {
                staged.insert(key, response.size());
            }
            let freed: u64 = existing
                .map(|g| {
                    staged
                        .keys()
                        .filter_map(|key| g.get(key))
                        .map(StoredResponse::size)
                        .sum()
                })
                .unwrap_or(0);
            let requested: u64 = staged.values().sum();
            let available = quota.saturating_sub(used - freed);
            if requested > available {
                return Err(StorageError::QuotaExceeded {
                    requested,
                    available,
                });
            }
        }

        let index = match generations.iter().position(|g| &g.name == name) {
            Some(index) => index,
            None => {
                generations.push(CacheGeneration::new(name.clone()));
                generations.len() - 1
            }
        };
        for (key, response) in entries {
            generations[index].insert(key, response);
        }
        Ok(())
    }

    pub fn match_in(&self, name: &GenerationName, key: &RequestKey) -> Option<StoredResponse> {
        self.lock()
            .iter()
            .find(|g| &g.name == name)
            .and_then(|g| g.get(key).cloned())
    }

    /// First hit across all generations, oldest generation first.
    pub fn match_any(&self, key: &RequestKey) -> Option<StoredResponse> {
        self.lock().iter().find_map(|g| g.get(key).cloned())
    }

    pub fn entry_count(&self, name: &GenerationName) -> usize {
        self.lock()
            .iter()
            .find(|g| &g.name == name)
            .map(CacheGeneration::len)
            .unwrap_or(0)
    }

    pub fn used_bytes(&self) -> u64 {
        self.lock().iter().map(CacheGeneration::size).sum()
    }

    /// Copy of every generation, for persistence and inspection.
    pub fn snapshot(&self) -> Vec<CacheGeneration> {
        self.lock().clone()
    }
}

/// Digest recorded for a stored body.
pub(crate) fn body_digest(response: &StoredResponse) -> ContentVersion {
    ContentVersion::from_content(&response.body)
}
