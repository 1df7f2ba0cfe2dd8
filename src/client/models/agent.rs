//! Agent identity models

use std::fmt;
use std::str::FromStr;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ApiError;

/// Type prefix of an agent public key hash
const AGENT_PREFIX: [u8; 3] = [0x84, 0x20, 0x24];

/// Prefix + 32-byte key + 4-byte DHT location
const AGENT_KEY_LEN: usize = 39;

/// Holochain agent public key.
///
/// Holds the raw 39-byte hash. Two keys are equal when their bytes are equal,
/// whatever instance or textual source they came from. The canonical string
/// form is `u` followed by unpadded URL-safe base64 (`uhCAk...`).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct AgentPubKey([u8; AGENT_KEY_LEN]);

impl AgentPubKey {
    /// Build a key from its raw 39-byte form.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ApiError> {
        let raw: [u8; AGENT_KEY_LEN] = bytes.try_into().map_err(|_| {
            ApiError::InvalidResponse(format!(
                "agent key must be {} bytes, got {}",
                AGENT_KEY_LEN,
                bytes.len()
            ))
        })?;
        if raw[..3] != AGENT_PREFIX {
            return Err(ApiError::InvalidResponse(
                "hash is not an agent public key".to_string(),
            ));
        }
        Ok(Self(raw))
    }

    /// Build a key from the 32 core key bytes and the 4 location bytes.
    pub fn from_parts(core: [u8; 32], location: [u8; 4]) -> Self {
        let mut raw = [0u8; AGENT_KEY_LEN];
        raw[..3].copy_from_slice(&AGENT_PREFIX);
        raw[3..35].copy_from_slice(&core);
        raw[35..].copy_from_slice(&location);
        Self(raw)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for AgentPubKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "u{}", URL_SAFE_NO_PAD.encode(self.0))
    }
}

impl fmt::Debug for AgentPubKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AgentPubKey({})", self)
    }
}

impl FromStr for AgentPubKey {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let encoded = s.strip_prefix('u').ok_or_else(|| {
            ApiError::InvalidResponse(format!("agent key '{}' is missing the 'u' prefix", s))
        })?;
        let bytes = URL_SAFE_NO_PAD
            .decode(encoded)
            .map_err(|e| ApiError::InvalidResponse(format!("agent key '{}': {}", s, e)))?;
        Self::from_bytes(&bytes)
    }
}

impl Serialize for AgentPubKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AgentPubKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Identity of the agent running this client, as returned by `whoami`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentInfo {
    /// Key the agent was created with; ownership is recorded against it
    #[serde(rename = "agent_initial_pubkey")]
    pub initial: AgentPubKey,

    /// Latest key after any key rotation
    #[serde(rename = "agent_latest_pubkey")]
    pub current: AgentPubKey,
}
