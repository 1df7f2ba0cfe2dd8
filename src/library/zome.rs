//! Zome and zome version operations

use serde_json::Value;

use super::EntityKind;
use crate::cache::{CachedDevHubClient, Scope};
use crate::client::RpcClient;
use crate::client::models::Entity;
use crate::error::Result;

impl<C: RpcClient> CachedDevHubClient<C> {
    pub async fn fetch_zome(&self, id: &str) -> Result<Entity> {
        self.fetch(EntityKind::Zome, id).await
    }

    /// Zomes published by `scope`
    pub async fn fetch_zomes(&self, scope: Scope) -> Result<Vec<Entity>> {
        self.fetch_list(EntityKind::Zome, scope).await
    }

    pub async fn fetch_all_zomes(&self) -> Result<Vec<Entity>> {
        self.fetch_zomes(Scope::All).await
    }

    pub async fn fetch_versions_for_zome(&self, zome_id: &str) -> Result<Vec<Entity>> {
        self.fetch_children(EntityKind::Zome, zome_id).await
    }

    pub async fn create_zome(&self, input: Value) -> Result<Entity> {
        self.create(EntityKind::Zome, input).await
    }

    pub async fn update_zome(&self, id: &str, properties: Value) -> Result<Entity> {
        self.update(EntityKind::Zome, id, properties).await
    }

    pub async fn deprecate_zome(&self, id: &str, message: &str) -> Result<Entity> {
        self.deprecate(EntityKind::Zome, id, message).await
    }

    pub async fn fetch_zome_version(&self, id: &str) -> Result<Entity> {
        self.fetch(EntityKind::ZomeVersion, id).await
    }

    pub async fn create_zome_version(&self, zome_id: &str, input: Value) -> Result<Entity> {
        self.create_version(EntityKind::ZomeVersion, zome_id, input)
            .await
    }

    pub async fn update_zome_version(&self, id: &str, properties: Value) -> Result<Entity> {
        self.update(EntityKind::ZomeVersion, id, properties).await
    }

    pub async fn unpublish_zome_version(&self, id: &str) -> Result<()> {
        self.unpublish(EntityKind::ZomeVersion, id).await
    }
}
