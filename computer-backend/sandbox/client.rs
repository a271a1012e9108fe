//! HTTP client for the Daytona REST API.
//!
//! Covers the subset the computer adapter needs: sandbox create/delete,
//! process execution and the computer-use toolbox (mouse, keyboard,
//! screenshot).
//!
//! API: POST /sandbox, GET /sandbox/{id}, DELETE /sandbox/{id},
//! POST /toolbox/{id}/toolbox/process/execute,
//! POST|GET /toolbox/{id}/toolbox/computeruse/...

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::DaytonaConfig;
use crate::sandbox::error::SandboxError;
use crate::sandbox::toolbox::ToolboxApi;
use crate::sandbox::types::*;

/// Interval between sandbox state polls while waiting for `started`.
const STATE_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// HTTP client for the Daytona REST API.
#[derive(Debug, Clone)]
pub struct DaytonaClient {
    base_url: String,
    api_key: String,
    target: Option<String>,
    create_timeout: Duration,
    poll_interval: Duration,
    client: reqwest::Client,
}

impl DaytonaClient {
    pub fn new(config: DaytonaConfig) -> Result<Self, SandboxError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| SandboxError::Backend(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: config.api_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
            target: config.target,
            create_timeout: config.create_timeout,
            poll_interval: STATE_POLL_INTERVAL,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn sandbox_url(&self, sandbox_id: &str) -> String {
        format!("{}/sandbox/{}", self.base_url, sandbox_id)
    }

    fn toolbox_url(&self, sandbox_id: &str, path: &str) -> String {
        format!("{}/toolbox/{}/toolbox/{}", self.base_url, sandbox_id, path)
    }

    /// POST a JSON body and decode a JSON response.
    async fn post_json<B, T>(&self, url: &str, body: &B) -> Result<T, SandboxError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        tracing::debug!(url = %url, "POST");
        let resp = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;
        let resp = check_status(resp).await?;
        resp.json::<T>()
            .await
            .map_err(|e| SandboxError::Serde(format!("failed to parse response from {url}: {e}")))
    }

    /// POST a JSON body, ignoring any response body.
    async fn post_unit<B>(&self, url: &str, body: Option<&B>) -> Result<(), SandboxError>
    where
        B: Serialize + ?Sized + Sync,
    {
        tracing::debug!(url = %url, "POST");
        let mut req = self.client.post(url).bearer_auth(&self.api_key);
        if let Some(body) = body {
            req = req.json(body);
        }
        let resp = req.send().await?;
        check_status(resp).await?;
        Ok(())
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, SandboxError> {
        tracing::debug!(url = %url, "GET");
        let resp = self
            .client
            .get(url)
            .bearer_auth(&self.api_key)
            .query(query)
            .send()
            .await?;
        let resp = check_status(resp).await?;
        resp.json::<T>()
            .await
            .map_err(|e| SandboxError::Serde(format!("failed to parse response from {url}: {e}")))
    }

    /// Get a sandbox by id.
    pub async fn get_sandbox(&self, sandbox_id: &str) -> Result<Sandbox, SandboxError> {
        self.get_json(&self.sandbox_url(sandbox_id), &[]).await
    }

    /// Poll until the sandbox reports `started`, an error state, or the
    /// create timeout elapses.
    async fn wait_until_started(&self, sandbox: Sandbox) -> Result<Sandbox, SandboxError> {
        let start = Instant::now();
        let mut sandbox = sandbox;

        loop {
            match sandbox.state {
                Some(SandboxState::Started) => return Ok(sandbox),
                Some(SandboxState::Error) | Some(SandboxState::BuildFailed) => {
                    return Err(SandboxError::Provision(
                        sandbox
                            .error_reason
                            .unwrap_or_else(|| "sandbox entered error state".to_string()),
                    ));
                }
                _ => {}
            }

            if start.elapsed() > self.create_timeout {
                return Err(SandboxError::Timeout);
            }

            tokio::time::sleep(self.poll_interval).await;
            sandbox = self.get_sandbox(&sandbox.id).await?;
        }
    }
}

/// Map non-success statuses onto `SandboxError`.
async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, SandboxError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    match status.as_u16() {
        401 => Err(SandboxError::Unauthorized),
        404 => Err(SandboxError::NotFound(body)),
        code => {
            tracing::error!(status = code, body = %body, "Daytona API error");
            Err(SandboxError::Api {
                status: code,
                message: body,
            })
        }
    }
}

#[async_trait]
impl ToolboxApi for DaytonaClient {
    async fn create_sandbox(&self, req: &CreateSandboxRequest) -> Result<Sandbox, SandboxError> {
        let url = format!("{}/sandbox", self.base_url);

        let mut req = req.clone();
        if req.target.is_none() {
            req.target = self.target.clone();
        }

        tracing::info!(
            network_block_all = req.network_block_all,
            auto_stop_interval = req.auto_stop_interval,
            "creating Daytona sandbox"
        );

        let sandbox: Sandbox = self
            .post_json(&url, &req)
            .await
            .map_err(|e| match e {
                SandboxError::Api { status, message } => {
                    SandboxError::Provision(format!("create returned {status}: {message}"))
                }
                other => other,
            })?;

        // The sandbox exists from here on; delete it if it never starts.
        let sandbox_id = sandbox.id.clone();
        match self.wait_until_started(sandbox).await {
            Ok(sandbox) => Ok(sandbox),
            Err(e) => {
                tracing::warn!(
                    sandbox_id = %sandbox_id,
                    error = %e,
                    "sandbox did not start, deleting"
                );
                if let Err(cleanup) = self.delete_sandbox(&sandbox_id).await {
                    tracing::warn!(
                        sandbox_id = %sandbox_id,
                        error = %cleanup,
                        "sandbox cleanup failed"
                    );
                }
                Err(e)
            }
        }
    }

    async fn delete_sandbox(&self, sandbox_id: &str) -> Result<(), SandboxError> {
        let url = self.sandbox_url(sandbox_id);

        tracing::info!(sandbox_id = %sandbox_id, "deleting Daytona sandbox");

        let resp = self
            .client
            .delete(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        if resp.status().as_u16() == 404 {
            tracing::warn!(sandbox_id = %sandbox_id, "sandbox already deleted");
            return Ok(());
        }

        check_status(resp).await?;
        tracing::info!(sandbox_id = %sandbox_id, "sandbox deleted");
        Ok(())
    }

    async fn execute_command(
        &self,
        sandbox_id: &str,
        req: &ExecuteRequest,
    ) -> Result<(), SandboxError> {
        let url = self.toolbox_url(sandbox_id, "process/execute");
        self.post_unit(&url, Some(req)).await
    }

    async fn start_computer_use(&self, sandbox_id: &str) -> Result<(), SandboxError> {
        let url = self.toolbox_url(sandbox_id, "computeruse/start");
        self.post_unit::<()>(&url, None).await
    }

    async fn mouse_click(
        &self,
        sandbox_id: &str,
        req: &MouseClickRequest,
    ) -> Result<(), SandboxError> {
        let url = self.toolbox_url(sandbox_id, "computeruse/mouse/click");
        self.post_unit(&url, Some(req)).await
    }

    async fn mouse_move(
        &self,
        sandbox_id: &str,
        req: &MouseMoveRequest,
    ) -> Result<(), SandboxError> {
        let url = self.toolbox_url(sandbox_id, "computeruse/mouse/move");
        self.post_unit(&url, Some(req)).await
    }

    async fn mouse_drag(
        &self,
        sandbox_id: &str,
        req: &MouseDragRequest,
    ) -> Result<(), SandboxError> {
        let url = self.toolbox_url(sandbox_id, "computeruse/mouse/drag");
        self.post_unit(&url, Some(req)).await
    }

    async fn key_press(
        &self,
        sandbox_id: &str,
        req: &KeyPressRequest,
    ) -> Result<(), SandboxError> {
        let url = self.toolbox_url(sandbox_id, "computeruse/keyboard/key");
        self.post_unit(&url, Some(req)).await
    }

    async fn hotkey(&self, sandbox_id: &str, req: &HotkeyRequest) -> Result<(), SandboxError> {
        let url = self.toolbox_url(sandbox_id, "computeruse/keyboard/hotkey");
        self.post_unit(&url, Some(req)).await
    }

    async fn type_text(
        &self,
        sandbox_id: &str,
        req: &TypeTextRequest,
    ) -> Result<(), SandboxError> {
        let url = self.toolbox_url(sandbox_id, "computeruse/keyboard/type");
        self.post_unit(&url, Some(req)).await
    }

    async fn compressed_screenshot(
        &self,
        sandbox_id: &str,
    ) -> Result<CompressedScreenshot, SandboxError> {
        let url = self.toolbox_url(sandbox_id, "computeruse/screenshot/compressed");
        self.get_json(&url, &[("format", "png"), ("showCursor", "true")])
            .await
    }
}

// ── Tests ───────────────────────────────────────────────────────────
