use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::cache::request::Request;
use crate::worker::events::{ControlMessage, EventOutcome, FetchOutcome, ManagerEvent, VersionReply};
use crate::worker::{CacheManager, LifecycleState, ManagerError};

/// Events queued before senders wait.
const EVENT_QUEUE_CAPACITY: usize = 64;

struct Envelope {
    event: ManagerEvent,
    reply: oneshot::Sender<Result<EventOutcome, ManagerError>>,
}

/// Application-side handle to a running manager.
///
/// Every call resolves only once the event has been fully handled. Clone to
/// share between tasks.
#[derive(Clone)]
pub struct ManagerHandle {
    tx: mpsc::Sender<Envelope>,
}

/// Run `manager` on its own task.
///
/// Lifecycle, message and notification events are handled one at a time in
/// arrival order. Fetches are spawned and may complete in any order. The
/// task ends when every handle is dropped.
pub fn spawn(manager: Arc<CacheManager>) -> (ManagerHandle, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::channel::<Envelope>(EVENT_QUEUE_CAPACITY);

    let task = tokio::spawn(async move {
        while let Some(Envelope { event, reply }) = rx.recv().await {
            debug!(event = event.name(), "event received");
            if let ManagerEvent::Fetch(_) = event {
                let manager = Arc::clone(&manager);
                tokio::spawn(async move {
                    let result = manager.dispatch(event).await;
                    if reply.send(result).is_err() {
                        warn!("fetch sender went away before the reply");
                    }
                });
                continue;
            }

            let result = manager.dispatch(event).await;
            if reply.send(result).is_err() {
                warn!("event sender went away before the reply");
            }
        }
        debug!("manager event queue closed");
    });

    (ManagerHandle { tx }, task)
}

impl ManagerHandle {
    pub async fn dispatch(&self, event: ManagerEvent) -> Result<EventOutcome, ManagerError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Envelope { event, reply })
            .await
            .map_err(|_| ManagerError::Closed)?;
        rx.await.map_err(|_| ManagerError::Closed)?
    }

    pub async fn install(&self) -> Result<LifecycleState, ManagerError> {
        match self.dispatch(ManagerEvent::Install).await? {
            EventOutcome::State(state) => Ok(state),
            other => unreachable_outcome("install", other),
        }
    }

    pub async fn activate(&self) -> Result<LifecycleState, ManagerError> {
        match self.dispatch(ManagerEvent::Activate).await? {
            EventOutcome::State(state) => Ok(state),
            other => unreachable_outcome("activate", other),
        }
    }

    pub async fn fetch(&self, request: Request) -> Result<FetchOutcome, ManagerError> {
        match self.dispatch(ManagerEvent::Fetch(request)).await? {
            EventOutcome::Fetch(outcome) => Ok(outcome),
            other => unreachable_outcome("fetch", other),
        }
    }

    /// Post a JSON control message such as `{"type":"GET_VERSION"}`.
    pub async fn post_message(&self, json: &str) -> Result<Option<VersionReply>, ManagerError> {
        let message: ControlMessage = serde_json::from_str(json)?;
        match self.dispatch(ManagerEvent::Message(message)).await? {
            EventOutcome::Version(reply) => Ok(Some(reply)),
            _ => Ok(None),
        }
    }

    pub async fn sync(&self, tag: &str) -> Result<(), ManagerError> {
        self.dispatch(ManagerEvent::Sync {
            tag: tag.to_string(),
        })
        .await
        .map(|_| ())
    }
}

fn unreachable_outcome<T>(event: &'static str, outcome: EventOutcome) -> Result<T, ManagerError> {
    warn!(event, ?outcome, "unexpected outcome for event");
    Err(ManagerError::UnexpectedOutcome(event))
}
