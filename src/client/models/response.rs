//! Tagged RPC responses

use std::fmt;

use serde::{Deserialize, Serialize};

use super::entity::Entity;

/// Result of an RPC call, tagged with its shape by the client boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum RpcResponse {
    Entity(Entity),
    Collection(Vec<Entity>),
    Bytes(Vec<u8>),
    Record(serde_json::Value),
}

/// Shape tag of an [`RpcResponse`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    Entity,
    Collection,
    Bytes,
    Record,
}

impl fmt::Display for ResponseShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResponseShape::Entity => "Entity",
            ResponseShape::Collection => "Collection",
            ResponseShape::Bytes => "Bytes",
            ResponseShape::Record => "Record",
        };
        f.write_str(name)
    }
}

impl RpcResponse {
    pub fn shape(&self) -> ResponseShape {
        match self {
            RpcResponse::Entity(_) => ResponseShape::Entity,
            RpcResponse::Collection(_) => ResponseShape::Collection,
            RpcResponse::Bytes(_) => ResponseShape::Bytes,
            RpcResponse::Record(_) => ResponseShape::Record,
        }
    }

    pub fn into_entity(self) -> Option<Entity> {
        match self {
            RpcResponse::Entity(entity) => Some(entity),
            _ => None,
        }
    }

    pub fn into_collection(self) -> Option<Vec<Entity>> {
        match self {
            RpcResponse::Collection(items) => Some(items),
            _ => None,
        }
    }

    pub fn into_resource(self) -> Option<Resource> {
        match self {
            RpcResponse::Bytes(bytes) => Some(Resource::Bytes(bytes)),
            RpcResponse::Record(value) => Some(Resource::Record(value)),
            _ => None,
        }
    }
}

/// Opaque non-entity payload (package bytes, agent info, version lists)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Resource {
    Bytes(Vec<u8>),
    Record(serde_json::Value),
}

impl Resource {
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Resource::Bytes(bytes) => Some(bytes),
            Resource::Record(_) => None,
        }
    }

    pub fn as_record(&self) -> Option<&serde_json::Value> {
        match self {
            Resource::Record(value) => Some(value),
            Resource::Bytes(_) => None,
        }
    }
}
