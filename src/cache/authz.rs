//! Ownership-derived write permission
//!
//! An entity is writable when its owner is the current agent's initial key.
//! The agent comes from the cached `me` record and is fetched through
//! `whoami` only when that record is missing or stale.

use super::client::CachedDevHubClient;
use super::metadata::MetadataPatch;
use super::path::{CachePath, ResourcePath};
use crate::client::models::{AgentInfo, AgentPubKey, Entity, Resource, RpcResponse};
use crate::client::RpcClient;
use crate::error::{ApiError, Result};

/// True when `owner` is the key `agent` was created with.
///
/// Compares the raw key bytes, so two separately decoded copies of one key
/// match.
pub fn is_owned_by(owner: &AgentPubKey, agent: &AgentInfo) -> bool {
    owner.as_bytes() == agent.initial.as_bytes()
}

impl<C: RpcClient> CachedDevHubClient<C> {
    /// Current agent identity, from cache when fresh
    pub async fn get_agent(&self) -> Result<AgentInfo> {
        let path = ResourcePath::Agent.resolve();

        if let Some(Resource::Record(record)) = self.cache().read_resource(&path)
            && let Ok(agent) = serde_json::from_value::<AgentInfo>(record)
        {
            log::debug!("Cache hit: {}", path);
            return Ok(agent);
        }

        self.fetch_agent().await
    }

    /// Load the current agent identity through `whoami`
    pub async fn fetch_agent(&self) -> Result<AgentInfo> {
        let path = ResourcePath::Agent.resolve();
        let call = self.rpc_call("dnarepo", "dna_library", "whoami");

        log::debug!("Getting agent info (whoami)");
        match self.fetch_resource(&path, &call).await? {
            RpcResponse::Record(record) => serde_json::from_value(record).map_err(|e| {
                ApiError::InvalidResponse(format!("Malformed agent info: {}", e)).into()
            }),
            other => Err(ApiError::InvalidResponse(format!(
                "Expected agent info record; received {}",
                other.shape()
            ))
            .into()),
        }
    }

    /// Record whether the current agent may write the entity cached at `path`.
    ///
    /// Entities without an owner are never writable.
    pub(crate) async fn derive_writable(&self, path: &CachePath, entity: &Entity) -> Result<bool> {
        let agent = self.get_agent().await?;
        let writable = entity
            .owner()
            .is_some_and(|owner| is_owned_by(owner, &agent));

        self.cache()
            .merge_metadata(path, &MetadataPatch::new().writable(writable));
        Ok(writable)
    }
}
