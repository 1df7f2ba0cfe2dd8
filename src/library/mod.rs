//! DevHub resource kinds and their operations
//!
//! [`EntityKind`] records which DNA role, zome, and functions serve each
//! owner-attributed kind. The generic operations below drive the fetch and
//! mutation protocols from that table; `zome.rs`, `dna.rs`, and `happ.rs`
//! add the named operations, and `misc.rs` the opaque resources.

mod dna;
mod happ;
mod misc;
mod zome;

use std::fmt;

use serde_json::{Value, json};

use crate::cache::{CachePath, CachedDevHubClient, ResourcePath, Scope};
use crate::client::RpcClient;
use crate::client::models::{Entity, RpcResponse};
use crate::error::{ApiError, Error, Result};

/// Owner-attributed resource kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Zome,
    ZomeVersion,
    Dna,
    DnaVersion,
    Happ,
    HappRelease,
}

impl EntityKind {
    pub const ALL: [EntityKind; 6] = [
        EntityKind::Zome,
        EntityKind::ZomeVersion,
        EntityKind::Dna,
        EntityKind::DnaVersion,
        EntityKind::Happ,
        EntityKind::HappRelease,
    ];

    /// DNA role serving this kind
    pub fn dna(self) -> &'static str {
        match self {
            EntityKind::Happ | EntityKind::HappRelease => "happs",
            _ => "dnarepo",
        }
    }

    /// Zome serving this kind
    pub fn zome(self) -> &'static str {
        match self {
            EntityKind::Happ | EntityKind::HappRelease => "happ_library",
            _ => "dna_library",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EntityKind::Zome => "Zome",
            EntityKind::ZomeVersion => "Zome Version",
            EntityKind::Dna => "DNA",
            EntityKind::DnaVersion => "DNA Version",
            EntityKind::Happ => "hApp",
            EntityKind::HappRelease => "hApp Release",
        }
    }

    fn get_fn(self) -> &'static str {
        match self {
            EntityKind::Zome => "get_zome",
            EntityKind::ZomeVersion => "get_zome_version",
            EntityKind::Dna => "get_dna",
            EntityKind::DnaVersion => "get_dna_version",
            EntityKind::Happ => "get_happ",
            EntityKind::HappRelease => "get_happ_release",
        }
    }

    fn create_fn(self) -> &'static str {
        match self {
            EntityKind::Zome => "create_zome",
            EntityKind::ZomeVersion => "create_zome_version",
            EntityKind::Dna => "create_dna",
            EntityKind::DnaVersion => "create_dna_version",
            EntityKind::Happ => "create_happ",
            EntityKind::HappRelease => "create_happ_release",
        }
    }

    fn update_fn(self) -> &'static str {
        match self {
            EntityKind::Zome => "update_zome",
            EntityKind::ZomeVersion => "update_zome_version",
            EntityKind::Dna => "update_dna",
            EntityKind::DnaVersion => "update_dna_version",
            EntityKind::Happ => "update_happ",
            EntityKind::HappRelease => "update_happ_release",
        }
    }

    /// Only top-level kinds can be deprecated
    fn deprecate_fn(self) -> Option<&'static str> {
        match self {
            EntityKind::Zome => Some("deprecate_zome"),
            EntityKind::Dna => Some("deprecate_dna"),
            EntityKind::Happ => Some("deprecate_happ"),
            _ => None,
        }
    }

    /// Only versions and releases can be unpublished
    fn unpublish_fn(self) -> Option<&'static str> {
        match self {
            EntityKind::ZomeVersion => Some("delete_zome_version"),
            EntityKind::DnaVersion => Some("delete_dna_version"),
            EntityKind::HappRelease => Some("delete_happ_release"),
            _ => None,
        }
    }

    /// List function for `scope`; agent-scoped lists take an `agent` argument
    fn list_fn(self, scope: Scope) -> Option<&'static str> {
        let fns = match self {
            EntityKind::Zome => ["get_my_zomes", "get_zomes", "get_all_zomes"],
            EntityKind::Dna => ["get_my_dnas", "get_dnas", "get_all_dnas"],
            EntityKind::Happ => ["get_my_happs", "get_happs", "get_all_happs"],
            _ => return None,
        };
        Some(match scope {
            Scope::Mine => fns[0],
            Scope::Agent(_) => fns[1],
            Scope::All => fns[2],
        })
    }

    /// Function listing the versions or releases of one entity
    fn children_fn(self) -> Option<&'static str> {
        match self {
            EntityKind::Zome => Some("get_zome_versions"),
            EntityKind::Dna => Some("get_dna_versions"),
            EntityKind::Happ => Some("get_happ_releases"),
            _ => None,
        }
    }

    /// Argument naming the zome, DNA, or hApp a version or release belongs to
    fn parent_field(self) -> Option<&'static str> {
        match self {
            EntityKind::Zome | EntityKind::ZomeVersion => Some("for_zome"),
            EntityKind::Dna | EntityKind::DnaVersion => Some("for_dna"),
            EntityKind::Happ | EntityKind::HappRelease => Some("for_happ"),
        }
    }

    /// Versions and releases belong to a parent entity
    pub fn is_versioned(self) -> bool {
        matches!(
            self,
            EntityKind::ZomeVersion | EntityKind::DnaVersion | EntityKind::HappRelease
        )
    }

    /// Cache path of one entity of this kind
    pub fn path(self, id: &str) -> CachePath {
        match self {
            EntityKind::Zome => ResourcePath::Zome(id),
            EntityKind::ZomeVersion => ResourcePath::ZomeVersion(id),
            EntityKind::Dna => ResourcePath::Dna(id),
            EntityKind::DnaVersion => ResourcePath::DnaVersion(id),
            EntityKind::Happ => ResourcePath::Happ(id),
            EntityKind::HappRelease => ResourcePath::HappRelease(id),
        }
        .resolve()
    }

    /// Cache path of a scoped collection, for kinds that have one
    pub fn collection_path(self, scope: Scope) -> Option<CachePath> {
        let resource = match self {
            EntityKind::Zome => ResourcePath::Zomes(scope),
            EntityKind::Dna => ResourcePath::Dnas(scope),
            EntityKind::Happ => ResourcePath::Happs(scope),
            _ => return None,
        };
        Some(resource.resolve())
    }

    /// Cache path of the versions or releases of entity `id`
    pub fn children_path(self, id: &str) -> Option<CachePath> {
        let resource = match self {
            EntityKind::Zome => ResourcePath::ZomeVersions(id),
            EntityKind::Dna => ResourcePath::DnaVersions(id),
            EntityKind::Happ => ResourcePath::HappReleases(id),
            _ => return None,
        };
        Some(resource.resolve())
    }

    fn unsupported(self, operation: &'static str) -> Error {
        Error::Unsupported {
            kind: self.label(),
            operation,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Pull the entity out of a fetch response that has already been committed
fn entity_from(kind: EntityKind, response: RpcResponse) -> Result<Entity> {
    match response {
        RpcResponse::Entity(entity) => Ok(entity),
        other => Err(ApiError::InvalidResponse(format!(
            "Expected {} entity; received {}",
            kind,
            other.shape()
        ))
        .into()),
    }
}

fn collection_from(kind: EntityKind, response: RpcResponse) -> Result<Vec<Entity>> {
    match response {
        RpcResponse::Collection(items) => Ok(items),
        other => Err(ApiError::InvalidResponse(format!(
            "Expected {} collection; received {}",
            kind,
            other.shape()
        ))
        .into()),
    }
}

/// Add the parent reference to a create payload.
///
/// A `null` input becomes an object holding only the reference.
fn with_parent(input: Value, field: &str, parent_id: &str) -> Result<Value> {
    match input {
        Value::Object(mut map) => {
            map.insert(field.to_string(), Value::String(parent_id.to_string()));
            Ok(Value::Object(map))
        }
        Value::Null => Ok(json!({ field: parent_id })),
        _ => Err(Error::Input(format!(
            "create payload must be an object to carry `{}`",
            field
        ))),
    }
}

impl<C: RpcClient> CachedDevHubClient<C> {
    /// Load one entity and derive whether the current agent may write it
    pub async fn fetch(&self, kind: EntityKind, id: &str) -> Result<Entity> {
        let path = kind.path(id);
        let call = self
            .rpc_call(kind.dna(), kind.zome(), kind.get_fn())
            .args(json!({ "id": id }));

        log::debug!("Getting {} {}", kind, id);
        let entity = entity_from(kind, self.fetch_entity(&path, &call).await?)?;
        self.derive_writable(&path, &entity).await?;

        Ok(entity)
    }

    /// Load the `scope` collection of a top-level kind
    pub async fn fetch_list(&self, kind: EntityKind, scope: Scope) -> Result<Vec<Entity>> {
        let (Some(function), Some(path)) = (kind.list_fn(scope), kind.collection_path(scope))
        else {
            return Err(kind.unsupported("listing"));
        };

        let mut call = self.rpc_call(kind.dna(), kind.zome(), function);
        if let Scope::Agent(agent) = scope {
            call = call.args(json!({ "agent": agent }));
        }

        collection_from(kind, self.fetch_collection(&path, &call).await?)
    }

    /// Load the versions or releases of entity `id`
    pub async fn fetch_children(&self, kind: EntityKind, id: &str) -> Result<Vec<Entity>> {
        let (Some(function), Some(field), Some(path)) =
            (kind.children_fn(), kind.parent_field(), kind.children_path(id))
        else {
            return Err(kind.unsupported("version listing"));
        };

        let call = self
            .rpc_call(kind.dna(), kind.zome(), function)
            .args(json!({ field: id }));

        collection_from(kind, self.fetch_collection(&path, &call).await?)
    }

    /// Create a top-level entity from `input`
    pub async fn create(&self, kind: EntityKind, input: Value) -> Result<Entity> {
        if kind.is_versioned() {
            return Err(kind.unsupported("creation without a parent"));
        }
        self.create_in(kind, input).await
    }

    /// Create a version or release of `parent_id` from `input`
    pub async fn create_version(
        &self,
        kind: EntityKind,
        parent_id: &str,
        input: Value,
    ) -> Result<Entity> {
        let Some(field) = kind.parent_field().filter(|_| kind.is_versioned()) else {
            return Err(kind.unsupported("creation under a parent"));
        };
        let input = with_parent(input, field, parent_id)?;
        self.create_in(kind, input).await
    }

    async fn create_in(&self, kind: EntityKind, input: Value) -> Result<Entity> {
        let call = self
            .rpc_call(kind.dna(), kind.zome(), kind.create_fn())
            .args(input);

        log::info!("Creating {}", kind);
        self.create_entity(|id| kind.path(id), &call).await
    }

    /// Replace the properties of entity `id`
    pub async fn update(&self, kind: EntityKind, id: &str, properties: Value) -> Result<Entity> {
        let entity = self.current_entity(kind, id).await?;
        let call = self
            .rpc_call(kind.dna(), kind.zome(), kind.update_fn())
            .args(json!({
                "addr": entity.address,
                "properties": properties,
            }));

        log::info!("Updating {} ({})", kind, entity.address);
        self.update_entity(&kind.path(id), &call).await
    }

    /// Mark entity `id` deprecated with `message`
    pub async fn deprecate(&self, kind: EntityKind, id: &str, message: &str) -> Result<Entity> {
        let function = kind
            .deprecate_fn()
            .ok_or_else(|| kind.unsupported("deprecate"))?;
        let entity = self.current_entity(kind, id).await?;
        let call = self
            .rpc_call(kind.dna(), kind.zome(), function)
            .args(json!({
                "addr": entity.address,
                "message": message,
            }));

        log::info!(
            "Deprecating {} ({}) because: {}",
            kind,
            entity.address,
            message
        );
        self.deprecate_entity(&kind.path(id), &call).await
    }

    /// Delete version or release `id`
    pub async fn unpublish(&self, kind: EntityKind, id: &str) -> Result<()> {
        let function = kind
            .unpublish_fn()
            .ok_or_else(|| kind.unsupported("unpublish"))?;
        let call = self
            .rpc_call(kind.dna(), kind.zome(), function)
            .args(json!({ "id": id }));

        log::info!("Deleting {} ({})", kind, id);
        self.unpublish_entity(&kind.path(id), &call).await
    }

    /// Fresh cached entity, fetched first when missing or stale
    async fn current_entity(&self, kind: EntityKind, id: &str) -> Result<Entity> {
        let path = kind.path(id);
        match self.cache().read_entity(&path) {
            Some(entity) => {
                log::debug!("Cache hit: {}", path);
                Ok(entity)
            }
            None => self.fetch(kind, id).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::cache::{CacheStore, ManualClock, StoredAt};
    use crate::client::models::{AgentInfo, AgentPubKey, ParentRef};
    use crate::client::{MockRpcClient, RpcCall};

    fn key(seed: u8) -> AgentPubKey {
        AgentPubKey::from_parts([seed; 32], [seed; 4])
    }

    fn me() -> AgentInfo {
        AgentInfo {
            initial: key(1),
            current: key(1),
        }
    }

    fn devhub(mock: MockRpcClient) -> (CachedDevHubClient<MockRpcClient>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::default());
        let store = CacheStore::with_clock(Duration::from_secs(600), clock.clone());
        (CachedDevHubClient::new(mock, Arc::new(store)), clock)
    }

    async fn last_call(client: &CachedDevHubClient<MockRpcClient>) -> RpcCall {
        client
            .inner()
            .captured_calls()
            .await
            .pop()
            .expect("a call was made")
    }

    #[test]
    fn test_kind_table_is_consistent() {
        for kind in EntityKind::ALL {
            assert_eq!(kind.deprecate_fn().is_some(), !kind.is_versioned());
            assert_eq!(kind.unpublish_fn().is_some(), kind.is_versioned());
            assert_eq!(kind.children_fn().is_some(), !kind.is_versioned());
            assert_eq!(
                kind.collection_path(Scope::All).is_some(),
                !kind.is_versioned()
            );
            assert!(kind.parent_field().is_some());
        }
    }

    #[test]
    fn test_happ_kinds_use_happ_library() {
        for kind in [EntityKind::Happ, EntityKind::HappRelease] {
            assert_eq!((kind.dna(), kind.zome()), ("happs", "happ_library"));
        }
        assert_eq!(
            EntityKind::HappRelease.unpublish_fn(),
            Some("delete_happ_release")
        );
    }

    #[test]
    fn test_with_parent() {
        let input = with_parent(json!({ "version": 3 }), "for_zome", "z-1").unwrap();
        assert_eq!(input, json!({ "version": 3, "for_zome": "z-1" }));

        let input = with_parent(Value::Null, "for_dna", "d-1").unwrap();
        assert_eq!(input, json!({ "for_dna": "d-1" }));

        assert!(matches!(
            with_parent(json!([1]), "for_dna", "d-1"),
            Err(Error::Input(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_derives_writable() {
        let dna = Entity::new("id-1", "addr-1").with_author(key(1));
        let mock = MockRpcClient::new()
            .with_agent(me())
            .await
            .with_response("get_dna", RpcResponse::Entity(dna.clone()))
            .await;
        let (client, _clock) = devhub(mock);

        assert_eq!(client.fetch(EntityKind::Dna, "id-1").await.unwrap(), dna);

        let meta = client.cache().read_metadata(&EntityKind::Dna.path("id-1"));
        assert!(meta.writable && meta.loaded && meta.current);
    }

    #[tokio::test]
    async fn test_fetch_version_owned_through_parent() {
        let version = Entity::new("zv-1", "addr-zv")
            .with_parent(ParentRef::new("z-1", Some(key(2))))
            .with_version(1);
        let mock = MockRpcClient::new()
            .with_agent(me())
            .await
            .with_response("get_zome_version", RpcResponse::Entity(version))
            .await;
        let (client, _clock) = devhub(mock);

        client.fetch(EntityKind::ZomeVersion, "zv-1").await.unwrap();

        let path = EntityKind::ZomeVersion.path("zv-1");
        assert!(!client.cache().read_metadata(&path).writable);
    }

    #[tokio::test]
    async fn test_fetch_shape_mismatch_commits_then_errors() {
        let mock = MockRpcClient::new()
            .with_agent(me())
            .await
            .with_response("get_happ", RpcResponse::Collection(vec![]))
            .await;
        let (client, _clock) = devhub(mock);

        let err = client.fetch(EntityKind::Happ, "h").await.unwrap_err();

        assert!(matches!(err, Error::Api(ApiError::InvalidResponse(_))));
        assert!(client.cache().read_metadata(&EntityKind::Happ.path("h")).loaded);
        assert_eq!(client.inner().call_count("whoami").await, 0);
    }

    #[tokio::test]
    async fn test_fetch_list_agent_scope() {
        let mock = MockRpcClient::new()
            .with_response("get_zomes", RpcResponse::Collection(vec![]))
            .await;
        let (client, _clock) = devhub(mock);

        client
            .fetch_list(EntityKind::Zome, Scope::Agent(key(5)))
            .await
            .unwrap();

        let call = last_call(&client).await;
        assert_eq!(call.function, "get_zomes");
        assert_eq!(call.args, json!({ "agent": key(5).to_string() }));
        let path = EntityKind::Zome.collection_path(Scope::Agent(key(5))).unwrap();
        assert!(client.cache().read_metadata(&path).loaded);
    }

    #[tokio::test]
    async fn test_fetch_list_unsupported_for_versions() {
        let (client, _clock) = devhub(MockRpcClient::new());

        let err = client
            .fetch_list(EntityKind::DnaVersion, Scope::All)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Unsupported { .. }));
        assert_eq!(client.inner().total_calls().await, 0);
    }

    #[tokio::test]
    async fn test_fetch_children_uses_parent_field() {
        let versions = vec![Entity::new("v2", "a2"), Entity::new("v1", "a1")];
        let mock = MockRpcClient::new()
            .with_response("get_happ_releases", RpcResponse::Collection(versions.clone()))
            .await;
        let (client, _clock) = devhub(mock);

        let items = client.fetch_children(EntityKind::Happ, "h-1").await.unwrap();

        assert_eq!(items, versions);
        assert_eq!(last_call(&client).await.args, json!({ "for_happ": "h-1" }));
        assert_eq!(
            client
                .cache()
                .read_collection(&EntityKind::Happ.children_path("h-1").unwrap()),
            versions
        );
    }

    #[tokio::test]
    async fn test_create_version_sets_parent() {
        let created = Entity::new("dv-9", "addr-dv");
        let mock = MockRpcClient::new()
            .with_response("create_dna_version", RpcResponse::Entity(created.clone()))
            .await;
        let (client, _clock) = devhub(mock);

        client
            .create_version(EntityKind::DnaVersion, "d-1", json!({ "version": 2 }))
            .await
            .unwrap();

        assert_eq!(
            last_call(&client).await.args,
            json!({ "version": 2, "for_dna": "d-1" })
        );
        let path = EntityKind::DnaVersion.path("dv-9");
        assert_eq!(client.cache().read_entity(&path), Some(created));
        assert!(client.cache().read_metadata(&path).writable);
    }

    #[tokio::test]
    async fn test_create_rejects_wrong_entry_point() {
        let (client, _clock) = devhub(MockRpcClient::new());

        assert!(matches!(
            client.create(EntityKind::ZomeVersion, json!({})).await,
            Err(Error::Unsupported { .. })
        ));
        assert!(matches!(
            client.create_version(EntityKind::Zome, "z", json!({})).await,
            Err(Error::Unsupported { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_targets_cached_address() {
        let revised = Entity::new("z-1", "addr-2");
        let mock = MockRpcClient::new()
            .with_response("update_zome", RpcResponse::Entity(revised.clone()))
            .await;
        let (client, _clock) = devhub(mock);
        let path = EntityKind::Zome.path("z-1");
        client
            .cache()
            .commit_entity(&path, Entity::new("z-1", "addr-1"));

        let entity = client
            .update(EntityKind::Zome, "z-1", json!({ "name": "renamed" }))
            .await
            .unwrap();

        assert_eq!(entity, revised);
        assert_eq!(
            last_call(&client).await.args,
            json!({ "addr": "addr-1", "properties": { "name": "renamed" } })
        );
        assert_eq!(client.inner().call_count("get_zome").await, 0);
        assert!(!client.cache().read_metadata(&path).updating);
    }

    #[tokio::test]
    async fn test_update_fetches_when_not_cached() {
        let mock = MockRpcClient::new()
            .with_agent(me())
            .await
            .with_response("get_dna", RpcResponse::Entity(Entity::new("d", "addr-d")))
            .await
            .with_response("update_dna", RpcResponse::Entity(Entity::new("d", "addr-d2")))
            .await;
        let (client, clock) = devhub(mock);
        let path = EntityKind::Dna.path("d");
        client.cache().commit_entity(&path, Entity::new("d", "stale"));
        clock.advance(Duration::from_secs(601));

        client
            .update(EntityKind::Dna, "d", json!({}))
            .await
            .unwrap();

        assert_eq!(client.inner().call_count("get_dna").await, 1);
        assert_eq!(last_call(&client).await.args["addr"], "addr-d");
        assert_eq!(
            client.cache().read_entity(&path).map(|e| e.address),
            Some("addr-d2".to_string())
        );
    }

    #[tokio::test]
    async fn test_deprecate_sends_message() {
        let deprecated = Entity {
            deprecation: Some("superseded".to_string()),
            ..Entity::new("h-1", "addr-h2")
        };
        let mock = MockRpcClient::new()
            .with_response("deprecate_happ", RpcResponse::Entity(deprecated.clone()))
            .await;
        let (client, _clock) = devhub(mock);
        let path = EntityKind::Happ.path("h-1");
        client
            .cache()
            .commit_entity(&path, Entity::new("h-1", "addr-h1"));

        let entity = client
            .deprecate(EntityKind::Happ, "h-1", "superseded")
            .await
            .unwrap();

        assert!(entity.is_deprecated());
        let call = last_call(&client).await;
        assert_eq!((call.dna.as_str(), call.zome.as_str()), ("happs", "happ_library"));
        assert_eq!(call.args, json!({ "addr": "addr-h1", "message": "superseded" }));
        assert_eq!(client.cache().read_entity(&path), Some(deprecated));
        assert!(!client.cache().read_metadata(&path).deprecating);
    }

    #[tokio::test]
    async fn test_deprecate_unsupported_for_versions() {
        let (client, _clock) = devhub(MockRpcClient::new());

        let err = client
            .deprecate(EntityKind::DnaVersion, "dv", "old")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Unsupported { .. }));
    }

    #[tokio::test]
    async fn test_unpublish_release() {
        let mock = MockRpcClient::new()
            .with_response("delete_happ_release", RpcResponse::Record(Value::Null))
            .await;
        let (client, _clock) = devhub(mock);
        let path = EntityKind::HappRelease.path("r-1");
        client
            .cache()
            .commit_entity(&path, Entity::new("r-1", "addr-r"));

        client.unpublish(EntityKind::HappRelease, "r-1").await.unwrap();

        let call = last_call(&client).await;
        assert_eq!((call.dna.as_str(), call.zome.as_str()), ("happs", "happ_library"));
        assert_eq!(call.args, json!({ "id": "r-1" }));
        assert!(client.cache().read_entity(&path).is_none());
        assert_eq!(
            client.cache().read_metadata(&path).stored_at,
            StoredAt::Tombstone
        );
    }
}
