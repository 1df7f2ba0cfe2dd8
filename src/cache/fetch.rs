//! Fetch orchestration
//!
//! One template for every load: mark the path loading, call the backend,
//! warn if the response shape is not the expected one, commit whatever came
//! back, and mark the path loaded.
//!
//! A failed call commits nothing and leaves `loading` set. Concurrent
//! fetches of one path are not deduplicated; whichever resolves last wins.
//! Callers retrying after a failure reset the flag with
//! [`CacheStore::clear_loading`](super::CacheStore::clear_loading).

use super::client::CachedDevHubClient;
use super::path::CachePath;
use crate::client::models::{ResponseShape, RpcResponse};
use crate::client::{RpcCall, RpcClient};
use crate::error::Result;

impl<C: RpcClient> CachedDevHubClient<C> {
    async fn fetch_as(
        &self,
        path: &CachePath,
        call: &RpcCall,
        expected: Option<ResponseShape>,
    ) -> Result<RpcResponse> {
        self.cache().signal_loading(path);

        let response = self.call_client(call).await?;

        if let Some(expected) = expected
            && response.shape() != expected
        {
            log::warn!(
                "Expected {} for request {}; received {}",
                expected,
                call,
                response.shape()
            );
        }

        self.cache().commit_response(path, response.clone());
        self.cache().record_loaded(path);

        Ok(response)
    }

    /// Load a single entity into `path`
    pub async fn fetch_entity(&self, path: &CachePath, call: &RpcCall) -> Result<RpcResponse> {
        self.fetch_as(path, call, Some(ResponseShape::Entity)).await
    }

    /// Load a collection into `path`
    pub async fn fetch_collection(&self, path: &CachePath, call: &RpcCall) -> Result<RpcResponse> {
        self.fetch_as(path, call, Some(ResponseShape::Collection))
            .await
    }

    /// Load an opaque resource (bytes or record) into `path`
    pub async fn fetch_resource(&self, path: &CachePath, call: &RpcCall) -> Result<RpcResponse> {
        self.fetch_as(path, call, None).await
    }
}
