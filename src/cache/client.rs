//! Cached orchestrator over a DevHub RPC client
//!
//! [`CachedDevHubClient`] is the only writer of a [`CacheStore`]. The load
//! protocol lives in `fetch.rs`, the mutation protocols in `mutate.rs`, and
//! ownership derivation in `authz.rs`; the per-kind operations are in
//! [`crate::library`].

use std::sync::Arc;

use crate::cache::{CacheStore, Metadata, ResourcePath};
use crate::client::models::{Entity, Resource, RpcResponse};
use crate::client::{RpcCall, RpcClient};
use crate::config::{Config, RpcConfig};
use crate::error::Result;

/// Cached wrapper for any [`RpcClient`] implementation.
///
/// Several wrappers may share one store; each clone of the `Arc` sees the
/// same cached state.
pub struct CachedDevHubClient<C: RpcClient> {
    inner: Arc<C>,
    cache: Arc<CacheStore>,
    rpc: RpcConfig,
}

impl<C: RpcClient> CachedDevHubClient<C> {
    /// Create a new cached client writing into `cache`
    pub fn new(inner: C, cache: Arc<CacheStore>) -> Self {
        Self {
            inner: Arc::new(inner),
            cache,
            rpc: RpcConfig::default(),
        }
    }

    /// Create a cached client with a fresh store sized by `config`
    pub fn from_config(inner: C, config: &Config) -> Self {
        let cache = Arc::new(CacheStore::new(config.cache.ttl()));
        Self::new(inner, cache).with_rpc_config(config.rpc.clone())
    }

    /// Use `rpc` for call timeouts
    pub fn with_rpc_config(mut self, rpc: RpcConfig) -> Self {
        self.rpc = rpc;
        self
    }

    /// Get the inner client
    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// The store this client writes into
    pub fn cache(&self) -> &Arc<CacheStore> {
        &self.cache
    }

    pub(crate) fn rpc_config(&self) -> &RpcConfig {
        &self.rpc
    }

    /// Start an RPC call carrying the default timeout
    pub(crate) fn rpc_call(&self, dna: &str, zome: &str, function: &str) -> RpcCall {
        RpcCall::new(dna, zome, function).timeout(self.rpc.default_timeout())
    }

    /// Invoke the inner client, logging the call and any failure.
    ///
    /// Errors are returned unchanged.
    pub(crate) async fn call_client(&self, call: &RpcCall) -> Result<RpcResponse> {
        log::debug!("Calling {}", call);
        match self.inner.call(call).await {
            Ok(response) => {
                log::trace!("Received {} response for {}", response.shape(), call);
                Ok(response)
            }
            Err(err) => {
                log::error!("Client call {} raised: {}", call, err);
                Err(err)
            }
        }
    }

    // ------------------------------------------------------------------
    // Read accessors
    // ------------------------------------------------------------------

    /// Fresh entity for `resource`, if cached
    pub fn entity(&self, resource: &ResourcePath<'_>) -> Option<Entity> {
        self.cache.read_entity(&resource.resolve())
    }

    /// Fresh collection for `resource`; empty if not cached
    pub fn collection(&self, resource: &ResourcePath<'_>) -> Vec<Entity> {
        self.cache.read_collection(&resource.resolve())
    }

    /// Fresh opaque payload for `resource`, if cached
    pub fn resource(&self, resource: &ResourcePath<'_>) -> Option<Resource> {
        self.cache.read_resource(&resource.resolve())
    }

    /// Lifecycle metadata for `resource`
    pub fn metadata(&self, resource: &ResourcePath<'_>) -> Metadata {
        self.cache.read_metadata(&resource.resolve())
    }

    /// Tombstone `resource` so the next read misses
    pub fn expire(&self, resource: &ResourcePath<'_>) {
        self.cache.expire(&resource.resolve());
    }
}
