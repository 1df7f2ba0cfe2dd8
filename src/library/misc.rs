//! Opaque resources: package bytes, HDK versions, web assets

use serde_json::json;

use crate::cache::{CachePath, CachedDevHubClient, ResourcePath};
use crate::client::models::{Entity, RpcResponse};
use crate::client::{RpcCall, RpcClient};
use crate::error::{ApiError, Result};

impl<C: RpcClient> CachedDevHubClient<C> {
    /// Load a binary payload into `path`
    async fn fetch_bytes(&self, path: &CachePath, call: &RpcCall) -> Result<Vec<u8>> {
        match self.fetch_resource(path, call).await? {
            RpcResponse::Bytes(bytes) => Ok(bytes),
            other => Err(ApiError::InvalidResponse(format!(
                "Expected bytes for request {}; received {}",
                call,
                other.shape()
            ))
            .into()),
        }
    }

    /// Download the WASM of a zome version by its address
    pub async fn fetch_zome_version_wasm(&self, addr: &str) -> Result<Vec<u8>> {
        let path = ResourcePath::ZomeVersionWasm(addr).resolve();
        let call = self
            .rpc_call("dnarepo", "mere_memory", "retrieve_bytes")
            .args(json!(addr));

        log::debug!("Getting zome version wasm {}", addr);
        self.fetch_bytes(&path, &call).await
    }

    /// Download the packaged DNA of a DNA version
    pub async fn fetch_dna_version_package(&self, id: &str) -> Result<Vec<u8>> {
        let path = ResourcePath::DnaVersionPackage(id).resolve();
        let call = self
            .rpc_call("dnarepo", "dna_library", "get_dna_package")
            .args(json!({ "id": id }));

        log::debug!("Getting DNA package {}", id);
        self.fetch_bytes(&path, &call).await
    }

    /// Download the packaged hApp of a release
    pub async fn fetch_happ_release_package(&self, id: &str) -> Result<Vec<u8>> {
        let path = ResourcePath::HappReleasePackage(id).resolve();
        let call = RpcCall::new("happs", "happ_library", "get_release_package")
            .args(json!({ "id": id }))
            .timeout(Some(self.rpc_config().package_timeout()));

        log::debug!("Getting hApp package {}", id);
        self.fetch_bytes(&path, &call).await
    }

    /// Download a release bundled with its UI as a webhapp named `name`
    pub async fn fetch_webhapp_release_package(&self, name: &str, id: &str) -> Result<Vec<u8>> {
        let path = ResourcePath::WebhappReleasePackage(id).resolve();
        let call = RpcCall::new("happs", "happ_library", "get_webhapp_package")
            .args(json!({ "name": name, "id": id }))
            .timeout(Some(self.rpc_config().package_timeout()));

        log::debug!("Getting webhapp package {}", id);
        self.fetch_bytes(&path, &call).await
    }

    /// HDK versions used by previously published zomes
    pub async fn fetch_hdk_versions(&self) -> Result<Vec<String>> {
        let path = ResourcePath::HdkVersions.resolve();
        let call = self.rpc_call("happs", "happ_library", "get_hdk_versions");

        log::debug!("Getting previous HDK versions");
        match self.fetch_resource(&path, &call).await? {
            RpcResponse::Record(record) => serde_json::from_value(record).map_err(|e| {
                ApiError::InvalidResponse(format!("Malformed HDK version list: {}", e)).into()
            }),
            other => Err(ApiError::InvalidResponse(format!(
                "Expected HDK version list; received {}",
                other.shape()
            ))
            .into()),
        }
    }

    /// Upload a web asset; it is cached under the id the backend assigns
    pub async fn create_web_asset(&self, bytes: &[u8]) -> Result<Entity> {
        let call = self
            .rpc_call("webassets", "web_assets", "create_file")
            .args(json!({ "file_bytes": bytes }));

        log::info!("Creating Web Asset: {} bytes", bytes.len());
        self.create_entity(|id| ResourcePath::WebAsset(id).resolve(), &call)
            .await
    }
}
