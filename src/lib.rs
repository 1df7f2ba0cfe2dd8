//! DevHub cache - client-side data cache and mutation orchestration
//!
//! Sits between view-models and the DevHub RPC backend. Values are cached
//! under canonical paths with per-path lifecycle metadata, expire after a
//! fixed TTL, and are written only by the fetch and mutation orchestrators on
//! [`CachedDevHubClient`].
//!
//! ```ignore
//! let store = Arc::new(CacheStore::new(config.cache.ttl()));
//! let devhub = CachedDevHubClient::new(rpc_client, store.clone());
//!
//! devhub.fetch_all_dnas().await?;
//! let dnas = store.read_collection(&ResourcePath::Dnas(Scope::All).resolve());
//! ```

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod library;
pub mod logging;

pub use cache::{
    CachePath, CacheStore, CachedDevHubClient, Clock, ManualClock, Metadata, MetadataPatch,
    ResourcePath, Scope, StoredAt, SystemClock, TransientFlag,
};
pub use client::models::{AgentInfo, AgentPubKey, Entity, ParentRef, Resource, RpcResponse};
pub use client::{RpcCall, RpcClient};
pub use config::Config;
pub use error::{ApiError, ConfigError, Error, Result};
pub use library::EntityKind;
