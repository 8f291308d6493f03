use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use crate::cache::storage::CacheStorage;
use crate::types::identifiers::ClientId;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One open application instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    /// Path of the page the client has open.
    pub url: String,
    /// Version of the manager serving this client, if any.
    pub controller: Option<String>,
    pub focused: bool,
}

#[derive(Debug, Default)]
pub struct ClientRegistry {
    next_id: AtomicU64,
    clients: Mutex<BTreeMap<ClientId, Client>>,
}

impl ClientRegistry {
    pub fn open(&self, url: &str, controller: Option<String>) -> ClientId {
        let id = ClientId::new(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        lock(&self.clients).insert(
            id,
            Client {
                id,
                url: url.to_string(),
                controller,
                focused: false,
            },
        );
        id
    }

    pub fn close(&self, id: ClientId) -> bool {
        lock(&self.clients).remove(&id).is_some()
    }

    pub fn get(&self, id: ClientId) -> Option<Client> {
        lock(&self.clients).get(&id).cloned()
    }

    pub fn list(&self) -> Vec<Client> {
        lock(&self.clients).values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        lock(&self.clients).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Make `version` the controller of every open client. Returns how many
    /// clients changed controller.
    pub fn claim(&self, version: &str) -> usize {
        let mut clients = lock(&self.clients);
        let mut claimed = 0;
        for client in clients.values_mut() {
            if client.controller.as_deref() != Some(version) {
                client.controller = Some(version.to_string());
                claimed += 1;
            }
        }
        claimed
    }

    /// Focus the first client showing `url`, or open a new focused one.
    /// The flag is true when a client was opened.
    pub fn focus_or_open(&self, url: &str, controller: Option<String>) -> (ClientId, bool) {
        let mut clients = lock(&self.clients);
        let existing = clients.values().find(|c| c.url == url).map(|c| c.id);

        let (target, opened) = match existing {
            Some(id) => (id, false),
            None => {
                let id = ClientId::new(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
                clients.insert(
                    id,
                    Client {
                        id,
                        url: url.to_string(),
                        controller,
                        focused: false,
                    },
                );
                (id, true)
            }
        };

        for client in clients.values_mut() {
            client.focused = client.id == target;
        }
        (target, opened)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationAction {
    pub action: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub icon: String,
    pub badge: String,
    pub tag: String,
    pub require_interaction: bool,
    pub actions: Vec<NotificationAction>,
}

impl Notification {
    /// The one notification the app shows.
    pub fn daily_verse() -> Self {
        Self {
            title: "Daily Bible Verse".into(),
            body: "Ayat harian baru tersedia!".into(),
            icon: "/icon-192.svg".into(),
            badge: "/icon-72.svg".into(),
            tag: "daily-verse".into(),
            require_interaction: false,
            actions: vec![NotificationAction {
                action: "view".into(),
                title: "Lihat Ayat".into(),
            }],
        }
    }
}

/// Notifications currently on screen. A new notification replaces any
/// shown one with the same tag.
#[derive(Debug, Default)]
pub struct NotificationTray {
    shown: Mutex<Vec<Notification>>,
}

impl NotificationTray {
    pub fn show(&self, notification: Notification) {
        let mut shown = lock(&self.shown);
        shown.retain(|n| n.tag != notification.tag);
        shown.push(notification);
    }

    pub fn close(&self, tag: &str) -> Option<Notification> {
        let mut shown = lock(&self.shown);
        let index = shown.iter().position(|n| n.tag == tag)?;
        Some(shown.remove(index))
    }

    pub fn shown(&self) -> Vec<Notification> {
        lock(&self.shown).clone()
    }
}

/// Everything shared between manager versions of one origin: cache storage,
/// open clients, shown notifications and the controlling version.
#[derive(Debug, Default)]
pub struct Registration {
    storage: CacheStorage,
    clients: ClientRegistry,
    notifications: NotificationTray,
    controller: Mutex<Option<String>>,
}

impl Registration {
    pub fn new(storage: CacheStorage) -> Self {
        Self {
            storage,
            ..Self::default()
        }
    }

    pub fn storage(&self) -> &CacheStorage {
        &self.storage
    }

    pub fn clients(&self) -> &ClientRegistry {
        &self.clients
    }

    pub fn notifications(&self) -> &NotificationTray {
        &self.notifications
    }

    /// Version of the manager currently controlling clients.
    pub fn controller(&self) -> Option<String> {
        lock(&self.controller).clone()
    }

    pub(crate) fn set_controller(&self, version: &str) {
        *lock(&self.controller) = Some(version.to_string());
    }

    /// A page load. The new client is controlled by the current controller.
    pub fn open_client(&self, url: &str) -> ClientId {
        self.clients.open(url, self.controller())
    }
}
