//! The offline cache manager.
//!
//! A `CacheManager` is one deployed version. It moves through
//! `Pending → Installing → Waiting → Activating → Active`; a failed install
//! ends in `Redundant`. Only an `Active` manager intercepts fetches.
//! Managers of different versions share one `Registration`.

pub mod capability;
pub mod clients;
pub mod events;
pub mod runtime;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use futures::future::join_all;
use reqwest::{Method, Url};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::cache::invalidation::purge_stale_generations;
use crate::cache::network::{Network, NetworkError};
use crate::cache::request::{Request, RequestError, StoredResponse};
use crate::cache::storage::{CacheStorage, StorageError};
use crate::cache::versioning::{CacheConfig, DOCUMENT_ROOT};
use crate::types::identifiers::{ClientId, GenerationName, RequestKey};
pub use capability::HostCapabilities;
pub use clients::{Client, ClientRegistry, Notification, NotificationAction, NotificationTray, Registration};
pub use events::{
    ControlMessage, EventOutcome, FetchOutcome, ManagerEvent, ResponseSource, VersionReply, SYNC_TAG,
};
pub use runtime::{spawn, ManagerHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    Pending,
    Installing,
    /// Installed, not yet controlling clients.
    Waiting,
    Activating,
    Active,
    /// Install failed; this version never serves.
    Redundant,
}

#[derive(Debug, Error)]
pub enum InstallError {
    #[error("Invalid asset path: {0}")]
    InvalidAsset(#[from] RequestError),
    #[error("Failed to fetch static asset {asset}: {source}")]
    AssetFetch {
        asset: String,
        #[source]
        source: NetworkError,
    },
    #[error("Static asset {asset} returned status {status}")]
    AssetStatus { asset: String, status: u16 },
    #[error("Failed to store static assets: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network request for {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: NetworkError,
    },
}

#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("Cannot handle `{event}` while {state:?}")]
    InvalidTransition {
        event: &'static str,
        state: LifecycleState,
    },
    #[error("Install failed: {0}")]
    Install(#[from] InstallError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("Malformed control message: {0}")]
    InvalidMessage(#[from] serde_json::Error),
    #[error("Manager task is no longer running")]
    Closed,
    #[error("Unexpected outcome for `{0}`")]
    UnexpectedOutcome(&'static str),
}

pub struct CacheManager {
    config: CacheConfig,
    origin: Url,
    capabilities: HostCapabilities,
    registration: Arc<Registration>,
    network: Arc<dyn Network>,
    state: Mutex<LifecycleState>,
    skip_waiting: AtomicBool,
}

impl CacheManager {
    pub fn new(
        config: CacheConfig,
        origin: Url,
        capabilities: HostCapabilities,
        registration: Arc<Registration>,
        network: Arc<dyn Network>,
    ) -> Self {
        let skip_waiting = AtomicBool::new(config.skip_waiting_on_install);
        Self {
            config,
            origin,
            capabilities,
            registration,
            network,
            state: Mutex::new(LifecycleState::Pending),
            skip_waiting,
        }
    }

    /// Current state. An `Active` manager whose version no longer controls
    /// the registration is retired to `Redundant` here.
    pub fn state(&self) -> LifecycleState {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if *state == LifecycleState::Active && !self.is_controller() {
            *state = LifecycleState::Redundant;
            info!(
                version = %self.config.version,
                controller = ?self.registration.controller(),
                "superseded, no longer serving"
            );
        }
        *state
    }

    fn is_controller(&self) -> bool {
        self.registration.controller().as_deref() == Some(self.config.version.as_str())
    }

    fn set_state(&self, next: LifecycleState) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let previous = *state;
        *state = next;
        debug!(version = %self.config.version, from = ?previous, to = ?next, "lifecycle transition");
    }

    /// Move `from → to` atomically, or report the state that blocked it.
    fn transition(&self, event: &'static str, from: LifecycleState, to: LifecycleState) -> Result<(), ManagerError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if *state != from {
            return Err(ManagerError::InvalidTransition { event, state: *state });
        }
        *state = to;
        debug!(version = %self.config.version, ?from, ?to, "lifecycle transition");
        Ok(())
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn version(&self) -> &str {
        &self.config.version
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    pub fn capabilities(&self) -> HostCapabilities {
        self.capabilities
    }

    pub fn registration(&self) -> &Arc<Registration> {
        &self.registration
    }

    pub fn static_generation(&self) -> GenerationName {
        self.config.static_generation()
    }

    pub fn runtime_generation(&self) -> GenerationName {
        self.config.runtime_generation()
    }

    /// Fetch and store the static asset manifest, then wait or activate.
    ///
    /// Storage is only written when every asset fetched with a 2xx status.
    /// On failure the manager becomes `Redundant` and storage is untouched.
    pub async fn install(&self) -> Result<LifecycleState, ManagerError> {
        self.transition("install", LifecycleState::Pending, LifecycleState::Installing)?;
        info!(version = %self.config.version, assets = self.config.static_assets.len(), "installing");

        let entries = match self.fetch_static_assets().await {
            Ok(entries) => entries,
            Err(e) => {
                error!(version = %self.config.version, error = %e, "install failed");
                self.set_state(LifecycleState::Redundant);
                return Err(e.into());
            }
        };

        let generation = self.static_generation();
        if let Err(e) = self.registration.storage().put_all(&generation, entries) {
            error!(version = %self.config.version, error = %e, "install failed while storing assets");
            self.set_state(LifecycleState::Redundant);
            return Err(InstallError::Storage(e).into());
        }
        info!(generation = %generation, "static assets cached");

        self.set_state(LifecycleState::Waiting);

        let no_controller = self.registration.controller().is_none();
        if self.skip_waiting.load(Ordering::SeqCst) || no_controller {
            return self.activate().await;
        }
        info!(version = %self.config.version, "installed, waiting for the current controller");
        Ok(LifecycleState::Waiting)
    }

    async fn fetch_static_assets(&self) -> Result<Vec<(RequestKey, StoredResponse)>, InstallError> {
        let requests = self
            .config
            .static_assets
            .iter()
            .map(|asset| Request::get_path(&self.origin, asset).map(|req| (asset.as_str(), req)))
            .collect::<Result<Vec<_>, _>>()?;

        let fetches = requests.iter().map(|(asset, request)| async move {
            let response = self
                .network
                .fetch(request)
                .await
                .map_err(|source| InstallError::AssetFetch {
                    asset: asset.to_string(),
                    source,
                })?;
            if !response.is_success() {
                return Err(InstallError::AssetStatus {
                    asset: asset.to_string(),
                    status: response.status,
                });
            }
            Ok((request.key(), response))
        });

        join_all(fetches).await.into_iter().collect()
    }

    /// Delete stale generations, then take control of every open client.
    ///
    /// Idempotent once `Active`.
    pub async fn activate(&self) -> Result<LifecycleState, ManagerError> {
        if self.state() == LifecycleState::Active {
            return Ok(LifecycleState::Active);
        }
        self.transition("activate", LifecycleState::Waiting, LifecycleState::Activating)?;
        info!(version = %self.config.version, "activating");

        let keep = self.config.current_generations();
        let deleted = purge_stale_generations(self.registration.storage(), &keep);

        self.registration.set_controller(&self.config.version);
        let claimed = self.registration.clients().claim(&self.config.version);

        self.set_state(LifecycleState::Active);
        info!(
            version = %self.config.version,
            deleted = deleted.len(),
            claimed,
            "activated"
        );
        Ok(LifecycleState::Active)
    }

    /// `SKIP_WAITING`: activate now if waiting, otherwise activate as soon
    /// as the install finishes.
    pub async fn skip_waiting(&self) -> Result<LifecycleState, ManagerError> {
        self.skip_waiting.store(true, Ordering::SeqCst);
        match self.state() {
            LifecycleState::Waiting => self.activate().await,
            state => Ok(state),
        }
    }

    /// Cache-first handling of one request.
    pub async fn handle_fetch(&self, request: &Request) -> Result<FetchOutcome, FetchError> {
        if self.state() != LifecycleState::Active {
            return Ok(FetchOutcome::Bypassed);
        }
        if *request.method() != Method::GET || !request.is_same_origin(&self.origin) {
            return Ok(FetchOutcome::Bypassed);
        }

        let key = request.key();
        let storage = self.registration.storage();

        for generation in self.config.current_generations() {
            if let Some(response) = storage.match_in(&generation, &key) {
                debug!(url = %request.url(), generation = %generation, "serving from cache");
                return Ok(FetchOutcome::Served {
                    response,
                    source: ResponseSource::Cache,
                });
            }
        }

        debug!(url = %request.url(), "fetching from network");
        match self.network.fetch(request).await {
            Ok(response) => {
                // A newer version may have taken over while this fetch was in flight
                if response.is_success() && self.state() == LifecycleState::Active {
                    let generation = self.runtime_generation();
                    match storage.put(&generation, key, response.clone()) {
                        Ok(()) => debug!(url = %request.url(), "cached new resource"),
                        Err(e) => warn!(url = %request.url(), error = %e, "failed to cache response"),
                    }
                }
                Ok(FetchOutcome::Served {
                    response,
                    source: ResponseSource::Network,
                })
            }
            Err(source) => {
                warn!(url = %request.url(), error = %source, "network fetch failed");
                if request.accepts_html() {
                    if let Some(response) = self.cached_document_root(storage) {
                        return Ok(FetchOutcome::Served {
                            response,
                            source: ResponseSource::OfflineFallback,
                        });
                    }
                }
                Err(FetchError::Network {
                    url: request.url().to_string(),
                    source,
                })
            }
        }
    }

    fn cached_document_root(&self, storage: &CacheStorage) -> Option<StoredResponse> {
        let root = self.origin.join(DOCUMENT_ROOT).ok()?;
        let key = RequestKey::from_url(&root);
        self.config
            .current_generations()
            .iter()
            .find_map(|generation| storage.match_in(generation, &key))
    }

    /// `GET_VERSION` replies with the runtime generation of the controlling
    /// version, whichever manager receives it, and with nothing before any
    /// version has activated. `SKIP_WAITING` never replies.
    pub async fn handle_message(&self, message: ControlMessage) -> Result<Option<VersionReply>, ManagerError> {
        debug!(?message, "control message received");
        match message {
            ControlMessage::SkipWaiting => {
                self.skip_waiting().await?;
                Ok(None)
            }
            ControlMessage::GetVersion => Ok(self.registration.controller().map(|version| VersionReply {
                version: self.config.clone().with_version(version).runtime_generation().to_string(),
            })),
        }
    }

    /// Background sync. Accepted and ignored when unsupported or untagged.
    pub async fn handle_sync(&self, tag: &str) {
        if !self.capabilities.background_sync {
            debug!(tag, "background sync not supported by host, ignoring");
            return;
        }
        if tag != SYNC_TAG {
            debug!(tag, "unknown sync tag, ignoring");
            return;
        }
        self.sync_content().await;
    }

    async fn sync_content(&self) {
        // No remote source to reconcile with yet
        info!(version = %self.config.version, "content sync completed");
    }

    /// Show the daily notification. Payload text is not displayed.
    pub async fn handle_push(&self, payload: Option<&str>) -> Option<Notification> {
        if !self.capabilities.push_notifications {
            debug!("push notifications not supported by host, ignoring");
            return None;
        }
        debug!(has_payload = payload.is_some(), "push received");
        let notification = Notification::daily_verse();
        self.registration.notifications().show(notification.clone());
        Some(notification)
    }

    /// Close the clicked notification; `view` or a body click focuses or
    /// opens the document root.
    pub async fn handle_notification_click(&self, tag: &str, action: Option<&str>) -> Option<ClientId> {
        self.registration.notifications().close(tag);
        match action {
            None | Some("view") => {
                let controller = self.registration.controller();
                let (client, opened) = self
                    .registration
                    .clients()
                    .focus_or_open(DOCUMENT_ROOT, controller);
                info!(client = client.get(), opened, "notification click handled");
                Some(client)
            }
            Some(other) => {
                debug!(action = other, "unhandled notification action");
                None
            }
        }
    }

    /// Run one event to completion.
    pub async fn dispatch(&self, event: ManagerEvent) -> Result<EventOutcome, ManagerError> {
        match event {
            ManagerEvent::Install => self.install().await.map(EventOutcome::State),
            ManagerEvent::Activate => self.activate().await.map(EventOutcome::State),
            ManagerEvent::Fetch(request) => Ok(EventOutcome::Fetch(self.handle_fetch(&request).await?)),
            ManagerEvent::Message(message) => Ok(match self.handle_message(message).await? {
                Some(reply) => EventOutcome::Version(reply),
                None => EventOutcome::Ack,
            }),
            ManagerEvent::Sync { tag } => {
                self.handle_sync(&tag).await;
                Ok(EventOutcome::Ack)
            }
            ManagerEvent::Push { payload } => Ok(EventOutcome::Notification(
                self.handle_push(payload.as_deref()).await,
            )),
            ManagerEvent::NotificationClick { tag, action } => Ok(EventOutcome::Client(
                self.handle_notification_click(&tag, action.as_deref()).await,
            )),
        }
    }
}
