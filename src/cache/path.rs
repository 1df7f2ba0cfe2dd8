//! Cache path resolution
//!
//! Every cached value lives under a [`CachePath`] derived from the resource
//! kind and its identifier or scope. Each kind owns a distinct leading
//! segment and a fixed segment count, and caller-supplied segments are
//! escaped, so distinct inputs can never resolve to the same path.

use std::fmt;
use std::str::FromStr;

use crate::client::models::AgentPubKey;
use crate::error::ApiError;

/// Canonical key of one cached value and its metadata
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CachePath(String);

impl CachePath {
    fn join(segments: &[&str]) -> Self {
        Self(segments.join("/"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CachePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CachePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Whose resources a collection holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Published by the current agent
    Mine,
    /// Published by anyone
    All,
    /// Published by a specific agent
    Agent(AgentPubKey),
}

impl Scope {
    fn token(&self) -> String {
        match self {
            Scope::Mine => "me".to_string(),
            Scope::All => "all".to_string(),
            Scope::Agent(agent) => agent.to_string(),
        }
    }
}

/// Parses a list filter: empty or `me` for the current agent, `all` for
/// everyone, otherwise an agent key.
impl FromStr for Scope {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "me" => Ok(Scope::Mine),
            "all" => Ok(Scope::All),
            other => other.parse().map(Scope::Agent),
        }
    }
}

/// Addressable resource kinds, each with its id, address, or scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourcePath<'a> {
    /// The current agent's identity (`whoami`)
    Agent,

    Zomes(Scope),
    Zome(&'a str),
    ZomeVersions(&'a str),
    ZomeVersion(&'a str),
    ZomeVersionWasm(&'a str),

    Dnas(Scope),
    Dna(&'a str),
    DnaVersions(&'a str),
    DnaVersion(&'a str),
    DnaVersionPackage(&'a str),

    Happs(Scope),
    Happ(&'a str),
    HappReleases(&'a str),
    HappRelease(&'a str),
    HappReleasePackage(&'a str),
    WebhappReleasePackage(&'a str),

    HdkVersions,
    WebAsset(&'a str),
}

impl ResourcePath<'_> {
    /// Resolve to the canonical cache path
    pub fn resolve(&self) -> CachePath {
        resolve(self)
    }
}

/// Resolve a resource to its canonical cache path.
///
/// Pure and deterministic. Identifiers are used as given apart from
/// escaping `%` and `/`; no case or whitespace normalisation happens.
pub fn resolve(resource: &ResourcePath<'_>) -> CachePath {
    use ResourcePath::*;

    match *resource {
        Agent => CachePath::join(&["me"]),

        Zomes(scope) => CachePath::join(&["zomes", scope.token().as_str()]),
        Zome(id) => CachePath::join(&["zome", escape(id).as_str()]),
        ZomeVersions(id) => CachePath::join(&["zome", escape(id).as_str(), "versions"]),
        ZomeVersion(id) => CachePath::join(&["zome_version", escape(id).as_str()]),
        ZomeVersionWasm(addr) => {
            CachePath::join(&["zome_version", escape(addr).as_str(), "wasm_bytes"])
        }

        Dnas(scope) => CachePath::join(&["dnas", scope.token().as_str()]),
        Dna(id) => CachePath::join(&["dna", escape(id).as_str()]),
        DnaVersions(id) => CachePath::join(&["dna", escape(id).as_str(), "versions"]),
        DnaVersion(id) => CachePath::join(&["dna_version", escape(id).as_str()]),
        DnaVersionPackage(id) => {
            CachePath::join(&["dna_version", escape(id).as_str(), "package_bytes"])
        }

        Happs(scope) => CachePath::join(&["happs", scope.token().as_str()]),
        Happ(id) => CachePath::join(&["happ", escape(id).as_str()]),
        HappReleases(id) => CachePath::join(&["happ", escape(id).as_str(), "releases"]),
        HappRelease(id) => CachePath::join(&["happ_release", escape(id).as_str()]),
        HappReleasePackage(id) => {
            CachePath::join(&["happ_release", escape(id).as_str(), "package_bytes"])
        }
        WebhappReleasePackage(id) => {
            CachePath::join(&["happ_release", escape(id).as_str(), "webhapp_bytes"])
        }

        HdkVersions => CachePath::join(&["misc", "hdk_versions"]),
        WebAsset(id) => CachePath::join(&["web_asset", escape(id).as_str()]),
    }
}

/// Percent-escape the separator and the escape character itself
fn escape(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for c in segment.chars() {
        match c {
            '%' => out.push_str("%25"),
            '/' => out.push_str("%2F"),
            other => out.push(other),
        }
    }
    out
}
