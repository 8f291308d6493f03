use serde::{Deserialize, Serialize};

use crate::cache::request::{Request, StoredResponse};
use crate::types::identifiers::ClientId;
use crate::worker::clients::Notification;
use crate::worker::LifecycleState;

/// Background-sync tag the manager acts on.
pub const SYNC_TAG: &str = "verse-sync";

/// Messages the application posts to the manager.
///
/// Wire form: `{"type":"SKIP_WAITING"}`, `{"type":"GET_VERSION"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ControlMessage {
    SkipWaiting,
    GetVersion,
}

/// Reply to `GET_VERSION`: `{"version":"daily-bible-verse-v1"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionReply {
    pub version: String,
}

/// Everything the host can deliver to a manager.
#[derive(Debug, Clone)]
pub enum ManagerEvent {
    Install,
    Activate,
    Fetch(Request),
    Message(ControlMessage),
    Sync { tag: String },
    Push { payload: Option<String> },
    NotificationClick { tag: String, action: Option<String> },
}

impl ManagerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ManagerEvent::Install => "install",
            ManagerEvent::Activate => "activate",
            ManagerEvent::Fetch(_) => "fetch",
            ManagerEvent::Message(_) => "message",
            ManagerEvent::Sync { .. } => "sync",
            ManagerEvent::Push { .. } => "push",
            ManagerEvent::NotificationClick { .. } => "notificationclick",
        }
    }
}

/// Where a served response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseSource {
    Cache,
    Network,
    /// Cached document root substituted for a failed HTML navigation.
    OfflineFallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Not intercepted; the host performs the request itself.
    Bypassed,
    Served {
        response: StoredResponse,
        source: ResponseSource,
    },
}

impl FetchOutcome {
    pub fn response(&self) -> Option<&StoredResponse> {
        match self {
            FetchOutcome::Bypassed => None,
            FetchOutcome::Served { response, .. } => Some(response),
        }
    }

    pub fn source(&self) -> Option<ResponseSource> {
        match self {
            FetchOutcome::Bypassed => None,
            FetchOutcome::Served { source, .. } => Some(*source),
        }
    }
}

/// Result of one dispatched event.
#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    State(LifecycleState),
    Fetch(FetchOutcome),
    Version(VersionReply),
    Notification(Option<Notification>),
    Client(Option<ClientId>),
    Ack,
}
