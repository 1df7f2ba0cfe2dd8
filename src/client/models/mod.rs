//! Data models exchanged with the DevHub RPC backend

mod agent;
mod entity;
mod response;

pub use agent::{AgentInfo, AgentPubKey};
pub use entity::{Entity, ParentRef};
pub use response::{Resource, ResponseShape, RpcResponse};
