use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use crate::cache::request::{Request, StoredResponse};

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Network unreachable: {0}")]
    Offline(String),
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Where cache misses go.
///
/// A non-2xx status is a successful fetch, not an error; only transport
/// failures are errors.
#[async_trait]
pub trait Network: Send + Sync {
    async fn fetch(&self, request: &Request) -> Result<StoredResponse, NetworkError>;
}

/// `Network` backed by a reqwest client.
/// Clone is cheap, the client pools connections internally.
#[derive(Clone)]
pub struct HttpNetwork {
    client: Client,
}

impl HttpNetwork {
    pub fn new() -> Result<Self, NetworkError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Network for HttpNetwork {
    async fn fetch(&self, request: &Request) -> Result<StoredResponse, NetworkError> {
        let mut builder = self
            .client
            .request(request.method().clone(), request.url().clone());
        for (name, value) in request.headers() {
            builder = builder.header(name, value);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                NetworkError::Offline(e.to_string())
            } else {
                NetworkError::Transport(e)
            }
        })?;

        let status = response.status().as_u16();
        let mut headers = Vec::with_capacity(response.headers().len());
        for (name, value) in response.headers() {
            let value = value.to_str().map_err(|_| {
                NetworkError::InvalidResponse(format!("non-ASCII value for header {name}"))
            })?;
            headers.push((name.as_str().to_string(), value.to_string()));
        }
        let body = response.bytes().await?.to_vec();

        debug!(url = %request.url(), status, bytes = body.len(), "network fetch complete");
        Ok(StoredResponse {
            status,
            headers,
            body,
        })
    }
}
