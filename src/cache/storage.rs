//! In-memory cache storage
//!
//! Holds the value table and the metadata table, both keyed by
//! [`CachePath`]. Reads never mutate; writes are reserved for the
//! orchestrators on [`CachedDevHubClient`](super::CachedDevHubClient), apart
//! from the explicit caller resets [`CacheStore::expire`] and
//! [`CacheStore::clear_loading`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};

use super::clock::{Clock, SystemClock};
use super::expiry::StoredAt;
use super::metadata::{Metadata, MetadataPatch};
use super::path::CachePath;
use crate::client::models::{Entity, Resource, RpcResponse};

/// A cached value
#[derive(Debug, Clone, PartialEq)]
pub enum CacheEntry {
    Entity(Entity),
    Collection(Vec<Entity>),
    Resource(Resource),
}

#[derive(Debug, Default)]
struct CacheState {
    values: HashMap<CachePath, CacheEntry>,
    metadata: HashMap<CachePath, Metadata>,
}

impl CacheState {
    /// Metadata record for `path`, materialising the default on first write
    fn metadata_mut(&mut self, path: &CachePath) -> &mut Metadata {
        self.metadata.entry(path.clone()).or_default()
    }
}

/// Cache of DevHub values with per-path lifecycle metadata.
///
/// Created once and shared by `Arc`. Every operation takes the internal lock
/// for its whole duration, so no read observes a half-applied write. The
/// lock is never held across an await point.
#[derive(Debug)]
pub struct CacheStore {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    state: Mutex<CacheState>,
}

impl CacheStore {
    /// Create a store using wall-clock time
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    /// Create a store reading time from `clock`
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            state: Mutex::new(CacheState::default()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    fn state(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stored value at `path` unless it is absent or stale
    fn fresh<'s>(&self, state: &'s CacheState, path: &CachePath) -> Option<&'s CacheEntry> {
        let now = self.now();
        if let Some(meta) = state.metadata.get(path)
            && meta.stored_at.is_expired(now, self.ttl)
        {
            return None;
        }
        state.values.get(path)
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// True when the value at `path` has outlived the TTL or was expired
    pub fn is_expired(&self, path: &CachePath) -> bool {
        let now = self.now();
        self.state()
            .metadata
            .get(path)
            .is_some_and(|meta| meta.stored_at.is_expired(now, self.ttl))
    }

    /// Entity at `path`, or `None` if absent, stale, or not an entity
    pub fn read_entity(&self, path: &CachePath) -> Option<Entity> {
        let state = self.state();
        match self.fresh(&state, path) {
            Some(CacheEntry::Entity(entity)) => Some(entity.clone()),
            _ => None,
        }
    }

    /// Collection at `path`, or empty if absent, stale, or not a collection
    pub fn read_collection(&self, path: &CachePath) -> Vec<Entity> {
        let state = self.state();
        match self.fresh(&state, path) {
            Some(CacheEntry::Collection(items)) => items.clone(),
            _ => Vec::new(),
        }
    }

    /// Opaque resource at `path`, or `None` if absent, stale, or not a resource
    pub fn read_resource(&self, path: &CachePath) -> Option<Resource> {
        let state = self.state();
        match self.fresh(&state, path) {
            Some(CacheEntry::Resource(resource)) => Some(resource.clone()),
            _ => None,
        }
    }

    /// Raw value at `path` whatever its shape, or `None` if absent or stale
    pub fn read_entry(&self, path: &CachePath) -> Option<CacheEntry> {
        let state = self.state();
        self.fresh(&state, path).cloned()
    }

    /// Metadata for `path`; the default record if nothing was ever written
    pub fn read_metadata(&self, path: &CachePath) -> Metadata {
        self.state().metadata.get(path).cloned().unwrap_or_default()
    }

    // ------------------------------------------------------------------
    // Writes
    // ------------------------------------------------------------------

    /// Replace the value at `path` and mark it freshly loaded
    pub(crate) fn commit(&self, path: &CachePath, entry: CacheEntry) {
        let now = self.now();
        let mut state = self.state();
        state.values.insert(path.clone(), entry);

        let meta = state.metadata_mut(path);
        meta.stored_at = StoredAt::At(now);
        meta.loaded = true;
        meta.current = true;
    }

    pub(crate) fn commit_entity(&self, path: &CachePath, entity: Entity) {
        self.commit(path, CacheEntry::Entity(entity));
    }

    pub(crate) fn commit_collection(&self, path: &CachePath, items: Vec<Entity>) {
        self.commit(path, CacheEntry::Collection(items));
    }

    pub(crate) fn commit_resource(&self, path: &CachePath, resource: Resource) {
        self.commit(path, CacheEntry::Resource(resource));
    }

    /// Commit a backend response under the slot matching its shape
    pub(crate) fn commit_response(&self, path: &CachePath, response: RpcResponse) {
        match response {
            RpcResponse::Entity(entity) => self.commit_entity(path, entity),
            RpcResponse::Collection(items) => self.commit_collection(path, items),
            RpcResponse::Bytes(bytes) => self.commit_resource(path, Resource::Bytes(bytes)),
            RpcResponse::Record(value) => self.commit_resource(path, Resource::Record(value)),
        }
    }

    /// Shallow-merge `patch` into the metadata at `path`
    pub(crate) fn merge_metadata(&self, path: &CachePath, patch: &MetadataPatch) {
        self.state().metadata_mut(path).merge(patch);
    }

    pub(crate) fn signal_loading(&self, path: &CachePath) {
        let mut state = self.state();
        let meta = state.metadata_mut(path);
        meta.loading = true;
        meta.current = false;
    }

    pub(crate) fn record_loaded(&self, path: &CachePath) {
        let mut state = self.state();
        let meta = state.metadata_mut(path);
        meta.loaded = true;
        meta.loading = false;
        meta.current = true;
    }

    /// Tombstone `path`: its value stays stored but reads treat it as stale
    /// until the next commit.
    pub fn expire(&self, path: &CachePath) {
        log::debug!("Expiring {}", path);
        let mut state = self.state();
        let meta = state.metadata_mut(path);
        meta.stored_at = StoredAt::Tombstone;
        meta.current = false;
    }

    /// Reset the in-flight flag left behind by a failed fetch, before retrying
    pub fn clear_loading(&self, path: &CachePath) {
        self.state().metadata_mut(path).loading = false;
    }

    // ------------------------------------------------------------------
    // Introspection
    // ------------------------------------------------------------------

    /// Snapshot of the cache contents
    pub fn stats(&self) -> CacheStats {
        let now = self.now();
        let state = self.state();

        let mut stats = CacheStats {
            tracked_paths: state.metadata.len(),
            stored_values: state.values.len(),
            ..CacheStats::default()
        };

        for (path, meta) in &state.metadata {
            if meta.loading {
                stats.loading += 1;
            }
            if meta.stored_at == StoredAt::Tombstone {
                stats.tombstones += 1;
            }
            if !state.values.contains_key(path) {
                continue;
            }
            if meta.stored_at.is_expired(now, self.ttl) {
                stats.expired_values += 1;
            } else {
                stats.fresh_values += 1;
            }
        }

        stats
    }
}

/// Statistics about cache state
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStats {
    /// Paths with a metadata record
    pub tracked_paths: usize,
    /// Paths holding a value
    pub stored_values: usize,
    /// Values still readable
    pub fresh_values: usize,
    /// Values past their TTL or tombstoned
    pub expired_values: usize,
    /// Paths explicitly expired
    pub tombstones: usize,
    /// Fetches marked in flight
    pub loading: usize,
}
