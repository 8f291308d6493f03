//! Offline cache storage: generations, request/response records, the
//! network seam and on-disk persistence.

pub mod invalidation;
pub mod network;
pub mod persist;
pub mod request;
pub mod storage;
pub mod versioning;

pub use invalidation::purge_stale_generations;
pub use network::{HttpNetwork, Network, NetworkError};
pub use persist::{ManifestEntry, ManifestGeneration, StorageManifest};
pub use request::{Request, RequestError, StoredResponse};
pub use storage::{CacheGeneration, CacheStorage, StorageError};
pub use versioning::{CacheConfig, DOCUMENT_ROOT, STATIC_ASSETS};
