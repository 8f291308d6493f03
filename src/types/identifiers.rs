use reqwest::Url;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Content hash version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentVersion(String);

impl ContentVersion {
    pub fn from_content(content: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(content);

        let hash = hasher.finalize();
        let hex = hex::encode(hash);

        ContentVersion(format!("sha256:{hex}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Hex digest without the algorithm prefix.
    pub fn digest(&self) -> &str {
        self.0.strip_prefix("sha256:").unwrap_or(&self.0)
    }
}

/// Cache lookup key for a request.
///
/// Two requests share a key when their URLs are equal once the fragment is
/// dropped. Query strings are significant.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestKey(String);

impl RequestKey {
    pub fn from_url(url: &Url) -> Self {
        let mut normalized = url.clone();
        normalized.set_fragment(None);
        RequestKey(normalized.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Name of one cache generation, e.g. `daily-bible-verse-static-v1`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GenerationName(String);

impl GenerationName {
    pub fn new(name: impl Into<String>) -> Self {
        GenerationName(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for GenerationName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of one open application instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(u64);

impl ClientId {
    pub fn new(raw: u64) -> Self {
        ClientId(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}
