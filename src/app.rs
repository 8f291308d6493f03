//! Wiring from an `AppConfig` to a running selector and cache manager.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::warn;

use crate::cache::network::Network;
use crate::cache::storage::CacheStorage;
use crate::config::{AppConfig, ConfigError};
use crate::content::ContentLibrary;
use crate::selection::{DailySelector, LocalClock};
use crate::worker::{runtime, CacheManager, ManagerHandle, Registration};

/// Selector over the configured content list.
///
/// A missing or invalid list is logged and replaced by an empty library, so
/// selection falls back instead of failing.
pub fn build_selector(config: &AppConfig) -> DailySelector<LocalClock> {
    let library = match &config.content_path {
        Some(path) => ContentLibrary::load(path).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "content list unavailable, using fallback item");
            ContentLibrary::empty()
        }),
        None => ContentLibrary::empty(),
    };
    DailySelector::with_clock(library, LocalClock, config.selector.memo_capacity)
}

/// Registration with the configured storage quota.
pub fn build_registration(config: &AppConfig) -> Arc<Registration> {
    Arc::new(Registration::new(CacheStorage::with_quota(config.cache.quota_bytes)))
}

pub fn build_manager(
    config: &AppConfig,
    registration: Arc<Registration>,
    network: Arc<dyn Network>,
) -> Result<CacheManager, ConfigError> {
    Ok(CacheManager::new(
        config.cache.clone(),
        config.origin_url()?,
        config.capabilities,
        registration,
        network,
    ))
}

/// Build the manager for this config and start its event task.
pub fn start_manager(
    config: &AppConfig,
    registration: Arc<Registration>,
    network: Arc<dyn Network>,
) -> Result<(ManagerHandle, JoinHandle<()>), ConfigError> {
    let manager = build_manager(config, registration, network)?;
    Ok(runtime::spawn(Arc::new(manager)))
}
