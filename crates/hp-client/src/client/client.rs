use crate::client::wire::{AssetChangesReply, ErrorReply, PatchStatusReply};
use crate::{ClientError, ClientResult};

use hp_config::ServerConfig;
use hp_core::{CoreResult, LoginStatus, MethodPatchResponse, PatchServer, PatchStatus};

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client as ReqwestClient, Method};
use serde::de::DeserializeOwned;
use tracing::debug;

pub const HEALTH_PATH: &str = "/health";
pub const STATUS_PATH: &str = "/status";
pub const PATCHES_PATH: &str = "/patches";
pub const PATCH_STATUS_PATH: &str = "/patch-status";
pub const ASSET_CHANGES_PATH: &str = "/asset-changes";
pub const CLEAR_PATCHES_PATH: &str = "/patches/clear";
pub const COMPILE_PATH: &str = "/compile";
pub const BUILD_INFO_PATH: &str = "/build-info";

/// HTTP/JSON client for the patch-compilation server
pub struct PatchServerClient {
    pub base_url: String,
    client: ReqwestClient,
    health_client: ReqwestClient,
}

impl PatchServerClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `base_url` - Server URL (e.g., "http://127.0.0.1:33242")
    /// * `request_timeout` - Timeout for every regular request
    /// * `health_timeout` - Timeout for the cheap health check
    pub fn new(
        base_url: &str,
        request_timeout: Duration,
        health_timeout: Duration,
    ) -> ClientResult<Self> {
        let client = ReqwestClient::builder()
            .timeout(request_timeout)
            .pool_max_idle_per_host(2)
            .build()?;
        let health_client = ReqwestClient::builder()
            .timeout(health_timeout)
            .pool_max_idle_per_host(1)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            health_client,
        })
    }

    pub fn from_config(config: &ServerConfig) -> ClientResult<Self> {
        Self::new(
            &config.base_url(),
            config.request_timeout(),
            config.health_timeout(),
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        self.client.request(method, self.url(path))
    }

    /// Execute request and decode the JSON body.
    async fn execute<T: DeserializeOwned>(&self, req: reqwest::RequestBuilder) -> ClientResult<T> {
        let response = req.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorReply>(&body)
                .map(|reply| reply.error.message)
                .unwrap_or_else(|_| String::from_utf8_lossy(&body).into_owned());
            return Err(ClientError::api_error(status.as_u16(), message));
        }

        Ok(serde_json::from_slice(&body)?)
    }

    /// Execute request, ignoring any body on success.
    async fn execute_empty(&self, req: reqwest::RequestBuilder) -> ClientResult<()> {
        let response = req.send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::api_error(status.as_u16(), message));
        }

        Ok(())
    }

    // =========================================================================
    // Endpoints
    // =========================================================================

    pub async fn get_status(&self) -> ClientResult<LoginStatus> {
        self.execute(self.request(Method::GET, STATUS_PATH)).await
    }

    pub async fn get_patches(&self) -> ClientResult<MethodPatchResponse> {
        self.execute(self.request(Method::GET, PATCHES_PATH)).await
    }

    pub async fn get_patch_status(&self, current: PatchStatus) -> ClientResult<PatchStatus> {
        let path = format!("{}?current={}", PATCH_STATUS_PATH, current.as_str());
        let req = self.request(Method::GET, &path);
        let reply: PatchStatusReply = self.execute(req).await?;
        Ok(reply.status)
    }

    pub async fn get_asset_changes(&self) -> ClientResult<Vec<String>> {
        let reply: AssetChangesReply = self
            .execute(self.request(Method::GET, ASSET_CHANGES_PATH))
            .await?;
        Ok(reply.paths)
    }

    pub async fn post(&self, path: &str) -> ClientResult<()> {
        self.execute_empty(self.request(Method::POST, path)).await
    }
}

#[async_trait]
impl PatchServer for PatchServerClient {
    async fn check_health(&self) -> bool {
        match self.health_client.get(self.url(HEALTH_PATH)).send().await {
            Ok(resp) if resp.status().is_success() => true,
            Ok(resp) => {
                debug!("Health check returned HTTP {}", resp.status());
                false
            }
            Err(e) => {
                debug!("Health check failed: {}", e);
                false
            }
        }
    }

    async fn login_status(&self) -> CoreResult<LoginStatus> {
        Ok(self.get_status().await?)
    }

    async fn poll_method_patches(&self) -> CoreResult<MethodPatchResponse> {
        Ok(self.get_patches().await?)
    }

    async fn poll_patch_status(&self, current: PatchStatus) -> CoreResult<PatchStatus> {
        Ok(self.get_patch_status(current).await?)
    }

    async fn poll_asset_changes(&self) -> CoreResult<Vec<String>> {
        Ok(self.get_asset_changes().await?)
    }

    async fn clear_patches(&self) -> CoreResult<()> {
        Ok(self.post(CLEAR_PATCHES_PATH).await?)
    }

    async fn request_compile(&self) -> CoreResult<()> {
        Ok(self.post(COMPILE_PATH).await?)
    }

    async fn prepare_build_info(&self) -> CoreResult<()> {
        Ok(self.post(BUILD_INFO_PATH).await?)
    }
}
