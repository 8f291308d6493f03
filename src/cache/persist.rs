use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::cache::request::StoredResponse;
use crate::cache::storage::{body_digest, CacheGeneration, CacheStorage, StorageError};
use crate::types::identifiers::{ContentVersion, GenerationName, RequestKey};

pub const STORAGE_FORMAT_VERSION: &str = "1";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub key: RequestKey,
    pub digest: ContentVersion,
    pub file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestGeneration {
    pub name: GenerationName,
    pub entries: Vec<ManifestEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageManifest {
    pub format_version: String,
    pub created_at: DateTime<Utc>, // informational only
    pub generation_count: usize,
    /// Creation order, which is also lookup order.
    pub generations: Vec<ManifestGeneration>,
}

/// 12 hex chars of sha256(generation + "\n" + key).
fn entry_stem(name: &GenerationName, key: &RequestKey) -> String {
    let mut hasher = Sha256::new();
    hasher.update(name.as_str().as_bytes());
    hasher.update(b"\n");
    hasher.update(key.as_str().as_bytes());
    let hex = hex::encode(hasher.finalize());
    hex[..12].to_string()
}

/// `<dir>.<suffix>` next to `dir`, keeping any extension `dir` already has.
fn sibling_dir(dir: &Path, suffix: &str) -> Result<PathBuf, StorageError> {
    let name = dir.file_name().ok_or_else(|| {
        StorageError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("{} has no directory name", dir.display()),
        ))
    })?;
    let mut sibling = name.to_os_string();
    sibling.push(".");
    sibling.push(suffix);
    Ok(dir.with_file_name(sibling))
}

impl CacheStorage {
    /// Write every generation under `output_dir`, replacing what was there.
    ///
    /// Written to a sibling temp dir first, then renamed into place.
    pub fn persist(&self, output_dir: &Path) -> Result<StorageManifest, StorageError> {
        let generations = self.snapshot();

        let mut manifest_generations = Vec::with_capacity(generations.len());
        let mut staged: Vec<(String, &StoredResponse)> = Vec::new();
        let mut seen_stems = BTreeSet::new();

        for generation in &generations {
            let mut entries = Vec::with_capacity(generation.len());
            for (key, response) in generation.iter() {
                let stem = entry_stem(generation.name(), key);
                if !seen_stems.insert(stem.clone()) {
                    return Err(StorageError::FilenameCollision(stem));
                }
                let file = format!("entries/{stem}.json");
                entries.push(ManifestEntry {
                    key: key.clone(),
                    digest: body_digest(response),
                    file: file.clone(),
                });
                staged.push((file, response));
            }
            manifest_generations.push(ManifestGeneration {
                name: generation.name().clone(),
                entries,
            });
        }

        let manifest = StorageManifest {
            format_version: STORAGE_FORMAT_VERSION.to_string(),
            created_at: Utc::now(),
            generation_count: manifest_generations.len(),
            generations: manifest_generations,
        };

        let temp_dir = sibling_dir(output_dir, "tmp")?;
        if temp_dir.exists() {
            fs::remove_dir_all(&temp_dir)?;
        }
        fs::create_dir_all(temp_dir.join("entries"))?;

        for (file, response) in staged {
            let f = fs::File::create(temp_dir.join(&file))?;
            serde_json::to_writer(&f, response)?;
            f.sync_all()?;
        }

        let f_man = fs::File::create(temp_dir.join("manifest.json"))?;
        serde_json::to_writer_pretty(&f_man, &manifest)?;
        f_man.sync_all()?;

        // Keep the previous copy until the new one is in place
        let previous = sibling_dir(output_dir, "old")?;
        if output_dir.exists() {
            if previous.exists() {
                fs::remove_dir_all(&previous)?;
            }
            fs::rename(output_dir, &previous)?;
        }
        fs::rename(&temp_dir, output_dir)?;
        if previous.exists() {
            fs::remove_dir_all(&previous)?;
        }

        info!(
            dir = %output_dir.display(),
            generations = manifest.generation_count,
            "cache storage persisted"
        );
        Ok(manifest)
    }

    /// Restore storage written by `persist`, verifying every body digest.
    pub fn load(dir: &Path, quota_bytes: Option<u64>) -> Result<Self, StorageError> {
        let f = fs::File::open(dir.join("manifest.json"))?;
        let manifest: StorageManifest = serde_json::from_reader(f)?;

        let mut names = BTreeSet::new();
        let mut generations = Vec::with_capacity(manifest.generations.len());
        for entry_set in manifest.generations {
            if !names.insert(entry_set.name.clone()) {
                return Err(StorageError::DuplicateGeneration(entry_set.name.to_string()));
            }
            let mut generation = CacheGeneration::new(entry_set.name);
            for entry in entry_set.entries {
                let f = fs::File::open(dir.join(&entry.file))?;
                let response: StoredResponse = serde_json::from_reader(f)?;

                let actual = body_digest(&response);
                if actual != entry.digest {
                    return Err(StorageError::DigestMismatch {
                        key: entry.key.as_str().to_string(),
                        expected: entry.digest.as_str().to_string(),
                        actual: actual.as_str().to_string(),
                    });
                }
                generation.insert(entry.key, response);
            }
            debug!(generation = %generation.name(), entries = generation.len(), "generation restored");
            generations.push(generation);
        }

        Ok(CacheStorage::from_generations(quota_bytes, generations))
    }
}
