//! Daytona computer-use backend.
//!
//! Drives a browser on a Daytona sandbox desktop. Each generic action maps
//! onto one or more toolbox calls followed by a fixed settle delay, then a
//! screenshot. Scrolling goes through the keyboard because the remote
//! mouse-scroll endpoint times out.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};

use crate::computer::keys::daytona_key;
use crate::computer::{Computer, ComputerError, EnvState, ScrollDirection};
use crate::config::{AdapterConfig, DaytonaConfig, SettleDelays};
use crate::sandbox::types::*;
use crate::sandbox::{DaytonaClient, ToolboxApi};

/// Per-keystroke delay when typing into a focused field.
const TYPE_DELAY_MS: u32 = 50;

/// Timeout for the detached `xdg-open` launch, in seconds.
const OPEN_BROWSER_TIMEOUT_SECS: u32 = 1;

/// The one live sandbox owned by a `DaytonaComputer`.
struct SandboxSession {
    id: SandboxId,
    api: Arc<dyn ToolboxApi>,
    created_at: DateTime<Utc>,
}

/// `Computer` backed by a Daytona sandbox.
pub struct DaytonaComputer {
    config: AdapterConfig,
    delays: SettleDelays,
    /// Injected API; when `None` a `DaytonaClient` is built from the
    /// environment on `start_session`.
    api: Option<Arc<dyn ToolboxApi>>,
    session: Option<SandboxSession>,
    current_url: String,
}

impl DaytonaComputer {
    pub fn new(config: AdapterConfig) -> Self {
        let current_url = config.initial_url.clone();
        Self {
            config,
            delays: SettleDelays::default(),
            api: None,
            session: None,
            current_url,
        }
    }

    /// Use a specific toolbox API instead of one built from `DAYTONA_*` env vars.
    pub fn with_api(config: AdapterConfig, api: Arc<dyn ToolboxApi>) -> Self {
        let mut computer = Self::new(config);
        computer.api = Some(api);
        computer
    }

    pub fn with_delays(mut self, delays: SettleDelays) -> Self {
        self.delays = delays;
        self
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn sandbox_id(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.id.as_str())
    }

    /// URL of the last navigation this computer issued.
    pub fn current_url(&self) -> &str {
        &self.current_url
    }

    fn session(&self) -> Result<&SandboxSession, ComputerError> {
        self.session.as_ref().ok_or(ComputerError::NoActiveSession)
    }

    async fn settle(&self, delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    // ── Toolbox helpers ─────────────────────────────────────────

    async fn left_click(&self, x: i32, y: i32) -> Result<(), ComputerError> {
        let s = self.session()?;
        let req = MouseClickRequest { x, y };
        s.api.mouse_click(&s.id, &req).await?;
        Ok(())
    }

    async fn press(&self, key: &str) -> Result<(), ComputerError> {
        let s = self.session()?;
        let req = KeyPressRequest {
            key: key.to_string(),
        };
        s.api.key_press(&s.id, &req).await?;
        Ok(())
    }

    async fn hotkey(&self, keys: &str) -> Result<(), ComputerError> {
        let s = self.session()?;
        let req = HotkeyRequest {
            keys: keys.to_string(),
        };
        s.api.hotkey(&s.id, &req).await?;
        Ok(())
    }

    async fn type_keys(&self, text: &str, delay: Option<u32>) -> Result<(), ComputerError> {
        let s = self.session()?;
        let req = TypeTextRequest {
            text: text.to_string(),
            delay,
        };
        s.api.type_text(&s.id, &req).await?;
        Ok(())
    }

    async fn create_session(
        &self,
        api: Arc<dyn ToolboxApi>,
    ) -> Result<SandboxSession, ComputerError> {
        let req = CreateSandboxRequest {
            network_block_all: self.config.network_block_all,
            network_allow_list: self.config.network_allow_list.clone(),
            auto_stop_interval: self.config.auto_stop_interval,
            target: None,
        };

        let sandbox = api.create_sandbox(&req).await.map_err(|e| {
            tracing::error!(error = %e, "failed to create sandbox");
            ComputerError::SessionCreation(e)
        })?;

        if let Err(e) = api.start_computer_use(&sandbox.id).await {
            tracing::error!(
                sandbox_id = %sandbox.id,
                error = %e,
                "failed to start computer use, deleting sandbox"
            );
            if let Err(cleanup) = api.delete_sandbox(&sandbox.id).await {
                tracing::warn!(
                    sandbox_id = %sandbox.id,
                    error = %cleanup,
                    "sandbox cleanup failed"
                );
            }
            return Err(ComputerError::SessionCreation(e));
        }

        Ok(SandboxSession {
            id: sandbox.id,
            api,
            created_at: Utc::now(),
        })
    }
}

/// Prefix `https://` unless the URL already names http or https.
pub fn normalize_url(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

#[async_trait]
impl Computer for DaytonaComputer {
    async fn start_session(&mut self) -> Result<(), ComputerError> {
        if self.session.is_some() {
            return Err(ComputerError::SessionAlreadyActive);
        }

        let api: Arc<dyn ToolboxApi> = match &self.api {
            Some(api) => api.clone(),
            None => Arc::new(
                DaytonaClient::new(DaytonaConfig::from_env())
                    .map_err(ComputerError::SessionCreation)?,
            ),
        };

        let session = self.create_session(api).await?;
        tracing::info!(sandbox_id = %session.id, "Daytona sandbox started");
        self.session = Some(session);
        Ok(())
    }

    async fn end_session(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };

        let lifetime = Utc::now() - session.created_at;
        match session.api.delete_sandbox(&session.id).await {
            Ok(()) => tracing::info!(
                sandbox_id = %session.id,
                lifetime_secs = lifetime.num_seconds(),
                "Daytona sandbox deleted"
            ),
            Err(e) => tracing::warn!(
                sandbox_id = %session.id,
                error = %e,
                "sandbox cleanup failed"
            ),
        }
    }

    fn screen_size(&self) -> (u32, u32) {
        self.config.screen_size()
    }

    async fn open_web_browser(&mut self) -> Result<EnvState, ComputerError> {
        let s = self.session()?;
        let req = ExecuteRequest {
            command: format!(
                "sh -c 'DISPLAY=:0 xdg-open \"{}\" > /dev/null 2>&1 &'",
                self.config.initial_url
            ),
            timeout: Some(OPEN_BROWSER_TIMEOUT_SECS),
        };
        s.api.execute_command(&s.id, &req).await?;

        self.settle(self.delays.navigation).await;
        self.current_url = self.config.initial_url.clone();
        self.current_state().await
    }

    async fn click_at(&mut self, x: i32, y: i32) -> Result<EnvState, ComputerError> {
        self.left_click(x, y).await?;
        self.settle(self.delays.action).await;
        self.current_state().await
    }

    async fn hover_at(&mut self, x: i32, y: i32) -> Result<EnvState, ComputerError> {
        let s = self.session()?;
        s.api.mouse_move(&s.id, &MouseMoveRequest { x, y }).await?;
        self.settle(self.delays.action).await;
        self.current_state().await
    }

    async fn type_text_at(
        &mut self,
        x: i32,
        y: i32,
        text: &str,
        press_enter: bool,
        clear_before_typing: bool,
    ) -> Result<EnvState, ComputerError> {
        self.left_click(x, y).await?;
        self.settle(self.delays.action).await;

        if clear_before_typing {
            self.hotkey("ctrl+a").await?;
            self.settle(self.delays.action).await;
        }

        self.type_keys(text, Some(TYPE_DELAY_MS)).await?;

        if press_enter {
            self.press("enter").await?;
            self.settle(self.delays.navigation).await;
        } else {
            self.settle(self.delays.action).await;
        }

        self.current_state().await
    }

    async fn scroll_document(
        &mut self,
        direction: ScrollDirection,
    ) -> Result<EnvState, ComputerError> {
        match direction {
            ScrollDirection::Down => self.press("pagedown").await?,
            ScrollDirection::Up => self.press("pageup").await?,
            ScrollDirection::Left | ScrollDirection::Right => {
                let (width, height) = self.screen_size();
                let center_x = (width / 2) as i32;
                let center_y = (height / 2) as i32;
                return self
                    .scroll_at(center_x, center_y, direction, width / 2)
                    .await;
            }
        }

        self.settle(self.delays.action).await;
        self.current_state().await
    }

    async fn scroll_at(
        &mut self,
        x: i32,
        y: i32,
        direction: ScrollDirection,
        magnitude: u32,
    ) -> Result<EnvState, ComputerError> {
        self.left_click(x, y).await?;
        self.settle(self.delays.action).await;

        // Keyboard scrolling moves a fixed page; magnitude is not applied.
        tracing::debug!(%direction, magnitude, "scrolling via keyboard");
        match direction {
            ScrollDirection::Down => self.press("pagedown").await?,
            ScrollDirection::Up => self.press("pageup").await?,
            ScrollDirection::Right => self.press("space").await?,
            ScrollDirection::Left => self.hotkey("shift+space").await?,
        }

        self.settle(self.delays.action).await;
        self.current_state().await
    }

    async fn wait_5_seconds(&mut self) -> Result<EnvState, ComputerError> {
        self.settle(self.delays.wait).await;
        self.current_state().await
    }

    async fn go_back(&mut self) -> Result<EnvState, ComputerError> {
        self.hotkey("alt+left").await?;
        self.settle(self.delays.navigation).await;
        // The resulting page URL cannot be observed from here.
        tracing::debug!(url = %self.current_url, "tracked URL left unchanged after back");
        self.current_state().await
    }

    async fn go_forward(&mut self) -> Result<EnvState, ComputerError> {
        self.hotkey("alt+right").await?;
        self.settle(self.delays.navigation).await;
        tracing::debug!(url = %self.current_url, "tracked URL left unchanged after forward");
        self.current_state().await
    }

    async fn search(&mut self) -> Result<EnvState, ComputerError> {
        let url = self.config.search_engine_url.clone();
        self.navigate(&url).await
    }

    async fn navigate(&mut self, url: &str) -> Result<EnvState, ComputerError> {
        self.session()?;
        let normalized = normalize_url(url);
        self.current_url = normalized.clone();

        // F6 focuses the address bar.
        self.press("f6").await?;
        self.settle(self.delays.action).await;

        self.type_keys(&normalized, None).await?;
        self.settle(self.delays.action).await;

        self.press("enter").await?;
        self.settle(self.delays.navigation).await;

        self.current_state().await
    }

    async fn key_combination(&mut self, keys: &[String]) -> Result<EnvState, ComputerError> {
        let normalized: Vec<String> = keys.iter().map(|k| daytona_key(k)).collect();

        match normalized.as_slice() {
            [] => {
                return Err(ComputerError::InvalidArgument(
                    "key combination needs at least one key".into(),
                ));
            }
            [key] => self.press(key).await?,
            _ => self.hotkey(&normalized.join("+")).await?,
        }

        self.settle(self.delays.action).await;
        self.current_state().await
    }

    async fn drag_and_drop(
        &mut self,
        x: i32,
        y: i32,
        destination_x: i32,
        destination_y: i32,
    ) -> Result<EnvState, ComputerError> {
        let s = self.session()?;
        let req = MouseDragRequest {
            start_x: x,
            start_y: y,
            end_x: destination_x,
            end_y: destination_y,
        };
        s.api.mouse_drag(&s.id, &req).await?;
        self.settle(self.delays.action).await;
        self.current_state().await
    }

    async fn current_state(&mut self) -> Result<EnvState, ComputerError> {
        let s = self.session()?;
        self.settle(self.delays.screenshot).await;

        let shot = s
            .api
            .compressed_screenshot(&s.id)
            .await
            .map_err(|e| {
                tracing::error!(sandbox_id = %s.id, error = %e, "screenshot failed");
                ComputerError::Screenshot(e.to_string())
            })?;

        let screenshot = STANDARD.decode(shot.screenshot.as_bytes()).map_err(|e| {
            tracing::error!(
                sandbox_id = %s.id,
                error = %e,
                "screenshot payload is not valid base64"
            );
            ComputerError::Screenshot(format!("invalid base64 payload: {e}"))
        })?;

        Ok(EnvState {
            screenshot,
            url: self.current_url.clone(),
        })
    }
}

impl Drop for DaytonaComputer {
    fn drop(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };

        tracing::warn!(
            sandbox_id = %session.id,
            "computer dropped with an active session, deleting sandbox"
        );

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(e) = session.api.delete_sandbox(&session.id).await {
                        tracing::warn!(
                            sandbox_id = %session.id,
                            error = %e,
                            "sandbox cleanup failed"
                        );
                    }
                });
            }
            Err(_) => tracing::warn!(
                sandbox_id = %session.id,
                "no async runtime available, sandbox left to auto-stop"
            ),
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────
