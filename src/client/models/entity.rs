//! Entity models
//!
//! Only the fields the cache layer inspects are typed; the rest of a
//! domain payload rides along untouched in `content`.

use serde::{Deserialize, Serialize};

use super::agent::AgentPubKey;

/// A single owner-attributed, identified record from the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Stable identifier (the original create action)
    pub id: String,

    /// Address of the latest revision; updates and deprecations target it
    #[serde(rename = "addr")]
    pub address: String,

    /// Developer or designer who published the record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<AgentPubKey>,

    /// Resource this one is a version or release of
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ParentRef>,

    /// Version number for versioned kinds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,

    /// Deprecation message, once deprecated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecation: Option<String>,

    /// Remaining domain fields
    #[serde(default)]
    pub content: serde_json::Value,
}

/// Reference from a version/release to the resource it belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentRef {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<AgentPubKey>,
}

impl Entity {
    pub fn new(id: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            address: address.into(),
            author: None,
            parent: None,
            version: None,
            deprecation: None,
            content: serde_json::Value::Null,
        }
    }

    pub fn with_author(mut self, author: AgentPubKey) -> Self {
        self.author = Some(author);
        self
    }

    pub fn with_parent(mut self, parent: ParentRef) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_version(mut self, version: u64) -> Self {
        self.version = Some(version);
        self
    }

    pub fn with_content(mut self, content: serde_json::Value) -> Self {
        self.content = content;
        self
    }

    /// Identity that owns this entity.
    ///
    /// Versions and releases carry no author of their own; they belong to
    /// whoever owns the parent.
    pub fn owner(&self) -> Option<&AgentPubKey> {
        self.author
            .as_ref()
            .or_else(|| self.parent.as_ref().and_then(|p| p.author.as_ref()))
    }

    pub fn is_deprecated(&self) -> bool {
        self.deprecation.is_some()
    }
}

impl ParentRef {
    pub fn new(id: impl Into<String>, author: Option<AgentPubKey>) -> Self {
        Self {
            id: id.into(),
            author,
        }
    }
}
