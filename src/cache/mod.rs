//! Client-side cache for DevHub resources
//!
//! Values and per-path lifecycle metadata live in a [`CacheStore`] keyed by
//! [`CachePath`]. A [`CachedDevHubClient`] wraps an RPC client, loads values
//! into the store, and runs the mutation protocols against it.

mod authz;
pub mod client;
pub mod clock;
pub mod expiry;
mod fetch;
pub mod metadata;
mod mutate;
pub mod path;
pub mod storage;

use std::time::Duration;

/// Default time-to-live for cached values (10 min)
pub const DEFAULT_TTL: Duration = Duration::from_millis(600_000);

// Re-export main types
pub use authz::is_owned_by;
pub use client::CachedDevHubClient;
pub use clock::{Clock, ManualClock, SystemClock};
pub use expiry::{StoredAt, is_expired};
pub use metadata::{Metadata, MetadataPatch, TransientFlag};
pub use path::{CachePath, ResourcePath, Scope, resolve};
pub use storage::{CacheEntry, CacheStats, CacheStore};
