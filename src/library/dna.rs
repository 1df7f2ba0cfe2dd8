//! DNA and DNA version operations

use serde_json::Value;

use super::EntityKind;
use crate::cache::{CachedDevHubClient, Scope};
use crate::client::RpcClient;
use crate::client::models::Entity;
use crate::error::Result;

impl<C: RpcClient> CachedDevHubClient<C> {
    pub async fn fetch_dna(&self, id: &str) -> Result<Entity> {
        self.fetch(EntityKind::Dna, id).await
    }

    /// DNAs published by `scope`
    pub async fn fetch_dnas(&self, scope: Scope) -> Result<Vec<Entity>> {
        self.fetch_list(EntityKind::Dna, scope).await
    }

    pub async fn fetch_all_dnas(&self) -> Result<Vec<Entity>> {
        self.fetch_dnas(Scope::All).await
    }

    pub async fn fetch_versions_for_dna(&self, dna_id: &str) -> Result<Vec<Entity>> {
        self.fetch_children(EntityKind::Dna, dna_id).await
    }

    pub async fn create_dna(&self, input: Value) -> Result<Entity> {
        self.create(EntityKind::Dna, input).await
    }

    pub async fn update_dna(&self, id: &str, properties: Value) -> Result<Entity> {
        self.update(EntityKind::Dna, id, properties).await
    }

    pub async fn deprecate_dna(&self, id: &str, message: &str) -> Result<Entity> {
        self.deprecate(EntityKind::Dna, id, message).await
    }

    pub async fn fetch_dna_version(&self, id: &str) -> Result<Entity> {
        self.fetch(EntityKind::DnaVersion, id).await
    }

    pub async fn create_dna_version(&self, dna_id: &str, input: Value) -> Result<Entity> {
        self.create_version(EntityKind::DnaVersion, dna_id, input)
            .await
    }

    pub async fn update_dna_version(&self, id: &str, properties: Value) -> Result<Entity> {
        self.update(EntityKind::DnaVersion, id, properties).await
    }

    pub async fn unpublish_dna_version(&self, id: &str) -> Result<()> {
        self.unpublish(EntityKind::DnaVersion, id).await
    }
}
