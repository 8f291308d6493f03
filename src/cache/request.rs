use std::collections::BTreeMap;

use reqwest::{Method, Url};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::identifiers::RequestKey;

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Invalid request URL `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// An outbound request as seen by the cache manager.
///
/// Header names are stored lowercased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: Method,
    url: Url,
    headers: BTreeMap<String, String>,
}

impl Request {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: BTreeMap::new(),
        }
    }

    pub fn get(url: &str) -> Result<Self, RequestError> {
        let parsed = Url::parse(url).map_err(|e| RequestError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self::new(Method::GET, parsed))
    }

    /// A GET for `path` resolved against `origin`.
    pub fn get_path(origin: &Url, path: &str) -> Result<Self, RequestError> {
        let joined = origin.join(path).map_err(|e| RequestError::InvalidUrl {
            url: path.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self::new(Method::GET, joined))
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// True when the `Accept` header asks for an HTML document.
    pub fn accepts_html(&self) -> bool {
        self.header("accept")
            .map(|accept| accept.contains("text/html"))
            .unwrap_or(false)
    }

    pub fn is_same_origin(&self, origin: &Url) -> bool {
        self.url.origin() == origin.origin()
    }

    pub fn key(&self) -> RequestKey {
        RequestKey::from_url(&self.url)
    }
}

/// A response body plus the parts worth keeping in a cache generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    #[serde(with = "hex_body")]
    pub body: Vec<u8>,
}

impl StoredResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self::new(200, body)
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_ascii_lowercase(), value.into()));
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.headers
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }

    /// 2xx, like a fetch `Response.ok`.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Bytes counted against the storage quota.
    pub fn size(&self) -> u64 {
        let headers: usize = self.headers.iter().map(|(k, v)| k.len() + v.len()).sum();
        (self.body.len() + headers) as u64
    }
}

mod hex_body {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(body: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(body))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        hex::decode(encoded).map_err(serde::de::Error::custom)
    }
}
