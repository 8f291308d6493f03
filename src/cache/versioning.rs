use serde::{Deserialize, Serialize};

use crate::types::identifiers::GenerationName;

/// Assets fetched and stored at install, relative to the origin.
pub const STATIC_ASSETS: &[&str] = &[
    "/",
    "/index.html",
    "/manifest.json",
    "/icon-72.svg",
    "/icon-96.svg",
    "/icon-128.svg",
    "/icon-144.svg",
    "/icon-152.svg",
    "/icon-192.svg",
    "/icon-384.svg",
    "/icon-512.svg",
];

/// Path served as the offline fallback for HTML navigations.
pub const DOCUMENT_ROOT: &str = "/";

// Key point:
// Serializable
// Comparable
// Explicit defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub prefix: String,
    pub version: String,
    pub static_assets: Vec<String>,
    /// Activate right after install instead of waiting for the old
    /// controller to go away.
    pub skip_waiting_on_install: bool,
    pub quota_bytes: Option<u64>,
}

impl CacheConfig {
    pub fn v1() -> Self {
        Self {
            prefix: "daily-bible-verse".into(),
            version: "v1".into(),
            static_assets: STATIC_ASSETS.iter().map(|s| s.to_string()).collect(),
            skip_waiting_on_install: true,
            quota_bytes: None,
        }
    }

    /// Same shape, different build version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Generation holding the install-time asset manifest.
    pub fn static_generation(&self) -> GenerationName {
        GenerationName::new(format!("{}-static-{}", self.prefix, self.version))
    }

    /// Generation filled on demand by network fetches.
    pub fn runtime_generation(&self) -> GenerationName {
        GenerationName::new(format!("{}-{}", self.prefix, self.version))
    }

    pub fn current_generations(&self) -> [GenerationName; 2] {
        [self.static_generation(), self.runtime_generation()]
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::v1()
    }
}
