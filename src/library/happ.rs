//! hApp and hApp release operations

use serde_json::Value;

use super::EntityKind;
use crate::cache::{CachedDevHubClient, Scope};
use crate::client::RpcClient;
use crate::client::models::Entity;
use crate::error::Result;

impl<C: RpcClient> CachedDevHubClient<C> {
    pub async fn fetch_happ(&self, id: &str) -> Result<Entity> {
        self.fetch(EntityKind::Happ, id).await
    }

    /// hApps published by `scope`
    pub async fn fetch_happs(&self, scope: Scope) -> Result<Vec<Entity>> {
        self.fetch_list(EntityKind::Happ, scope).await
    }

    pub async fn fetch_all_happs(&self) -> Result<Vec<Entity>> {
        self.fetch_happs(Scope::All).await
    }

    pub async fn fetch_releases_for_happ(&self, happ_id: &str) -> Result<Vec<Entity>> {
        self.fetch_children(EntityKind::Happ, happ_id).await
    }

    pub async fn create_happ(&self, input: Value) -> Result<Entity> {
        self.create(EntityKind::Happ, input).await
    }

    pub async fn update_happ(&self, id: &str, properties: Value) -> Result<Entity> {
        self.update(EntityKind::Happ, id, properties).await
    }

    pub async fn deprecate_happ(&self, id: &str, message: &str) -> Result<Entity> {
        self.deprecate(EntityKind::Happ, id, message).await
    }

    pub async fn fetch_happ_release(&self, id: &str) -> Result<Entity> {
        self.fetch(EntityKind::HappRelease, id).await
    }

    pub async fn create_happ_release(&self, happ_id: &str, input: Value) -> Result<Entity> {
        self.create_version(EntityKind::HappRelease, happ_id, input)
            .await
    }

    pub async fn update_happ_release(&self, id: &str, properties: Value) -> Result<Entity> {
        self.update(EntityKind::HappRelease, id, properties).await
    }

    pub async fn unpublish_happ_release(&self, id: &str) -> Result<()> {
        self.unpublish(EntityKind::HappRelease, id).await
    }
}
