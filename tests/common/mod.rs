#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use daily_verse_core::cache::{CacheConfig, Network, NetworkError, Request, StoredResponse, STATIC_ASSETS};
use daily_verse_core::worker::{CacheManager, HostCapabilities, Registration};
use reqwest::Url;

pub const ORIGIN: &str = "https://verse.example";

pub fn origin() -> Url {
    Url::parse(ORIGIN).unwrap()
}

pub fn url(path: &str) -> String {
    format!("{ORIGIN}{path}")
}

/// In-memory network keyed by path. Unknown paths answer 404.
#[derive(Default)]
pub struct MockNetwork {
    online: AtomicBool,
    routes: Mutex<HashMap<String, StoredResponse>>,
    unreachable: Mutex<HashSet<String>>,
    calls: AtomicUsize,
    hits: Mutex<HashMap<String, usize>>,
}

impl MockNetwork {
    pub fn new() -> Self {
        let network = Self::default();
        network.online.store(true, Ordering::SeqCst);
        network
    }

    /// Serves every static asset with a body tagged by `build`.
    pub fn with_static_assets(build: &str) -> Self {
        let network = Self::new();
        for asset in STATIC_ASSETS {
            let content_type = if asset.ends_with(".svg") {
                "image/svg+xml"
            } else if asset.ends_with(".json") {
                "application/json"
            } else {
                "text/html"
            };
            network.route(
                asset,
                StoredResponse::ok(format!("{build} {asset}")).with_header("content-type", content_type),
            );
        }
        network
    }

    pub fn route(&self, path: &str, response: StoredResponse) {
        self.routes.lock().unwrap().insert(path.to_string(), response);
    }

    /// Fetches of `path` fail at the transport level.
    pub fn break_path(&self, path: &str) {
        self.unreachable.lock().unwrap().insert(path.to_string());
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn hits(&self, path: &str) -> usize {
        self.hits.lock().unwrap().get(path).copied().unwrap_or(0)
    }
}

#[async_trait]
impl Network for MockNetwork {
    async fn fetch(&self, request: &Request) -> Result<StoredResponse, NetworkError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let path = request.url().path().to_string();
        *self.hits.lock().unwrap().entry(path.clone()).or_insert(0) += 1;

        if !self.online.load(Ordering::SeqCst) {
            return Err(NetworkError::Offline("network disabled".into()));
        }
        if self.unreachable.lock().unwrap().contains(&path) {
            return Err(NetworkError::Offline(format!("{path} unreachable")));
        }
        Ok(self
            .routes
            .lock()
            .unwrap()
            .get(&path)
            .cloned()
            .unwrap_or_else(|| StoredResponse::new(404, "not found")))
    }
}

pub fn manager(
    config: CacheConfig,
    registration: &Arc<Registration>,
    network: &Arc<MockNetwork>,
) -> CacheManager {
    CacheManager::new(
        config,
        origin(),
        HostCapabilities::all(),
        Arc::clone(registration),
        network.clone(),
    )
}

pub fn get(path: &str) -> Request {
    Request::get(&url(path)).unwrap()
}

pub fn navigate(path: &str) -> Request {
    get(path).with_header("Accept", "text/html,application/xhtml+xml")
}
