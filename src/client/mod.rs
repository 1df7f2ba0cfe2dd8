//! DevHub RPC client boundary
//!
//! The transport is not part of this crate: applications provide an
//! [`RpcClient`] implementation that performs the call and tags the response
//! with its shape.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

#[cfg(test)]
pub mod mock;
pub mod models;

#[cfg(test)]
pub use mock::MockRpcClient;
pub use models::{AgentInfo, AgentPubKey, Entity, ParentRef, Resource, ResponseShape, RpcResponse};

/// DevHub RPC client trait
#[async_trait]
pub trait RpcClient: Send + Sync {
    /// Invoke `call.function` on the `call.dna` / `call.zome` module.
    ///
    /// Failures must carry their category (`ApiError::NotFound`,
    /// `ApiError::ServerError`, `ApiError::Network`, ...) so callers can
    /// branch on them.
    async fn call(&self, call: &RpcCall) -> Result<RpcResponse>;
}

/// A single RPC invocation
#[derive(Debug, Clone, PartialEq)]
pub struct RpcCall {
    /// DNA role name (e.g. `dnarepo`, `happs`)
    pub dna: String,
    /// Zome (module) name
    pub zome: String,
    /// Zome function name
    pub function: String,
    /// Argument payload
    pub args: serde_json::Value,
    /// Optional timeout the client should apply
    pub timeout: Option<Duration>,
}

impl RpcCall {
    pub fn new(dna: &str, zome: &str, function: &str) -> Self {
        Self {
            dna: dna.to_string(),
            zome: zome.to_string(),
            function: function.to_string(),
            args: serde_json::Value::Null,
            timeout: None,
        }
    }

    pub fn args(mut self, args: serde_json::Value) -> Self {
        self.args = args;
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Formats as `dna::zome->function( arg, names )`, listing argument keys only
impl fmt::Display for RpcCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.args.as_object() {
            Some(map) if !map.is_empty() => {
                let keys: Vec<&str> = map.keys().map(String::as_str).collect();
                write!(
                    f,
                    "{}::{}->{}( {} )",
                    self.dna,
                    self.zome,
                    self.function,
                    keys.join(", ")
                )
            }
            _ => write!(f, "{}::{}->{}()", self.dna, self.zome, self.function),
        }
    }
}
