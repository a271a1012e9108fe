//! Recording `ToolboxApi` for unit tests.

use std::sync::Mutex as StdMutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use super::error::SandboxError;
use super::toolbox::ToolboxApi;
use super::types::*;

pub const MOCK_SANDBOX_ID: &str = "sbx-test";

/// One remote call as seen by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Create {
        network_block_all: bool,
        network_allow_list: Option<String>,
        auto_stop_interval: u32,
    },
    Delete(String),
    Exec { command: String, timeout: Option<u32> },
    StartComputerUse(String),
    Click { x: i32, y: i32 },
    Move { x: i32, y: i32 },
    Drag { from: (i32, i32), to: (i32, i32) },
    Press(String),
    Hotkey(String),
    Type { text: String, delay: Option<u32> },
    Screenshot,
}

#[derive(Default)]
pub struct MockToolbox {
    pub calls: StdMutex<Vec<Call>>,
    pub frames: AtomicUsize,
    pub fail_create: bool,
    pub fail_start: bool,
    pub fail_delete: bool,
    pub fail_screenshot: bool,
    /// Return a payload that is not valid base64.
    pub corrupt_screenshot: bool,
}

impl MockToolbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Return and clear the recorded calls.
    pub fn take_calls(&self) -> Vec<Call> {
        std::mem::take(&mut *self.calls.lock().unwrap())
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ToolboxApi for MockToolbox {
    async fn create_sandbox(&self, req: &CreateSandboxRequest) -> Result<Sandbox, SandboxError> {
        self.record(Call::Create {
            network_block_all: req.network_block_all,
            network_allow_list: req.network_allow_list.clone(),
            auto_stop_interval: req.auto_stop_interval,
        });
        if self.fail_create {
            return Err(SandboxError::Provision("quota exceeded".into()));
        }
        Ok(Sandbox {
            id: MOCK_SANDBOX_ID.into(),
            state: Some(SandboxState::Started),
            error_reason: None,
        })
    }

    async fn delete_sandbox(&self, sandbox_id: &str) -> Result<(), SandboxError> {
        self.record(Call::Delete(sandbox_id.into()));
        if self.fail_delete {
            return Err(SandboxError::Backend("connection reset".into()));
        }
        Ok(())
    }

    async fn execute_command(
        &self,
        _sandbox_id: &str,
        req: &ExecuteRequest,
    ) -> Result<(), SandboxError> {
        self.record(Call::Exec {
            command: req.command.clone(),
            timeout: req.timeout,
        });
        Ok(())
    }

    async fn start_computer_use(&self, sandbox_id: &str) -> Result<(), SandboxError> {
        self.record(Call::StartComputerUse(sandbox_id.into()));
        if self.fail_start {
            return Err(SandboxError::Api {
                status: 500,
                message: "xvfb failed".into(),
            });
        }
        Ok(())
    }

    async fn mouse_click(
        &self,
        _sandbox_id: &str,
        req: &MouseClickRequest,
    ) -> Result<(), SandboxError> {
        self.record(Call::Click { x: req.x, y: req.y });
        Ok(())
    }

    async fn mouse_move(
        &self,
        _sandbox_id: &str,
        req: &MouseMoveRequest,
    ) -> Result<(), SandboxError> {
        self.record(Call::Move { x: req.x, y: req.y });
        Ok(())
    }

    async fn mouse_drag(
        &self,
        _sandbox_id: &str,
        req: &MouseDragRequest,
    ) -> Result<(), SandboxError> {
        self.record(Call::Drag {
            from: (req.start_x, req.start_y),
            to: (req.end_x, req.end_y),
        });
        Ok(())
    }

    async fn key_press(
        &self,
        _sandbox_id: &str,
        req: &KeyPressRequest,
    ) -> Result<(), SandboxError> {
        self.record(Call::Press(req.key.clone()));
        Ok(())
    }

    async fn hotkey(&self, _sandbox_id: &str, req: &HotkeyRequest) -> Result<(), SandboxError> {
        self.record(Call::Hotkey(req.keys.clone()));
        Ok(())
    }

    async fn type_text(
        &self,
        _sandbox_id: &str,
        req: &TypeTextRequest,
    ) -> Result<(), SandboxError> {
        self.record(Call::Type {
            text: req.text.clone(),
            delay: req.delay,
        });
        Ok(())
    }

    async fn compressed_screenshot(
        &self,
        _sandbox_id: &str,
    ) -> Result<CompressedScreenshot, SandboxError> {
        self.record(Call::Screenshot);
        if self.fail_screenshot {
            return Err(SandboxError::Api {
                status: 503,
                message: "display unavailable".into(),
            });
        }
        let screenshot = if self.corrupt_screenshot {
            "not base64!".to_string()
        } else {
            let n = self.frames.fetch_add(1, Ordering::SeqCst);
            STANDARD.encode(format!("frame-{n}"))
        };
        Ok(CompressedScreenshot { screenshot })
    }
}
