//! Host capabilities, decided once when the manager is built.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostCapabilities {
    /// Host delivers background-sync events when connectivity returns.
    pub background_sync: bool,
    /// Host can display notifications for push events.
    pub push_notifications: bool,
}

impl HostCapabilities {
    pub fn all() -> Self {
        Self {
            background_sync: true,
            push_notifications: true,
        }
    }

    pub fn none() -> Self {
        Self {
            background_sync: false,
            push_notifications: false,
        }
    }
}

impl Default for HostCapabilities {
    fn default() -> Self {
        Self::all()
    }
}
