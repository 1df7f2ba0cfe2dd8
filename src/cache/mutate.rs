//! Mutation orchestration
//!
//! Update, deprecate, and unpublish raise a transient flag on the target
//! path for the length of the RPC call. The flag is held by a guard, so it
//! is lowered on success, on error, and when the operation's future is
//! dropped mid-call. A failed mutation leaves the cached value untouched.

use super::client::CachedDevHubClient;
use super::metadata::{MetadataPatch, TransientFlag};
use super::path::CachePath;
use super::storage::CacheStore;
use crate::client::models::{Entity, RpcResponse};
use crate::client::{RpcCall, RpcClient};
use crate::error::{ApiError, Result};

/// Raises a transient flag on creation and lowers it on drop
struct FlagGuard<'a> {
    cache: &'a CacheStore,
    path: &'a CachePath,
    flag: TransientFlag,
}

impl<'a> FlagGuard<'a> {
    fn raise(cache: &'a CacheStore, path: &'a CachePath, flag: TransientFlag) -> Self {
        cache.merge_metadata(path, &MetadataPatch::new().flag(flag, true));
        Self { cache, path, flag }
    }
}

impl Drop for FlagGuard<'_> {
    fn drop(&mut self) {
        self.cache
            .merge_metadata(self.path, &MetadataPatch::new().flag(self.flag, false));
    }
}

/// Entity out of a mutation response.
///
/// Any other shape is still committed to `path` before the error is
/// returned, matching what a fetch does with a mismatched response.
fn expect_entity(
    cache: &CacheStore,
    path: &CachePath,
    call: &RpcCall,
    response: RpcResponse,
) -> Result<Entity> {
    match response {
        RpcResponse::Entity(entity) => Ok(entity),
        other => {
            let shape = other.shape();
            log::warn!(
                "Expected Entity for request {}; received {}",
                call,
                shape
            );
            cache.commit_response(path, other);
            Err(ApiError::InvalidResponse(format!("{} returned {}", call.function, shape)).into())
        }
    }
}

impl<C: RpcClient> CachedDevHubClient<C> {
    /// Create an entity and cache it at the path of the id the backend assigned.
    ///
    /// The creator always owns what it created, so `writable` is set without
    /// consulting the agent.
    pub async fn create_entity<F>(&self, path_for: F, call: &RpcCall) -> Result<Entity>
    where
        F: FnOnce(&str) -> CachePath,
    {
        let entity = match self.call_client(call).await? {
            RpcResponse::Entity(entity) => entity,
            other => {
                return Err(ApiError::InvalidResponse(format!(
                    "{} returned {}; cannot place the created entity",
                    call.function,
                    other.shape()
                ))
                .into());
            }
        };
        log::debug!("Created Entity with ID: {}", entity.id);

        let path = path_for(&entity.id);
        self.cache().commit_entity(&path, entity.clone());
        self.cache()
            .merge_metadata(&path, &MetadataPatch::new().writable(true));

        Ok(entity)
    }

    /// Send an update and cache the revised entity at `path`
    pub async fn update_entity(&self, path: &CachePath, call: &RpcCall) -> Result<Entity> {
        self.transition(path, call, TransientFlag::Updating).await
    }

    /// Send a deprecation and cache the deprecated entity at `path`
    pub async fn deprecate_entity(&self, path: &CachePath, call: &RpcCall) -> Result<Entity> {
        self.transition(path, call, TransientFlag::Deprecating)
            .await
    }

    /// Delete the resource at `path` and tombstone its cache entry
    pub async fn unpublish_entity(&self, path: &CachePath, call: &RpcCall) -> Result<()> {
        let _guard = FlagGuard::raise(self.cache(), path, TransientFlag::Unpublishing);

        self.call_client(call).await?;
        self.cache().expire(path);

        Ok(())
    }

    async fn transition(
        &self,
        path: &CachePath,
        call: &RpcCall,
        flag: TransientFlag,
    ) -> Result<Entity> {
        let _guard = FlagGuard::raise(self.cache(), path, flag);

        let response = self.call_client(call).await?;
        let entity = expect_entity(self.cache(), path, call, response)?;
        self.cache().commit_entity(path, entity.clone());

        Ok(entity)
    }
}
