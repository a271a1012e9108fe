use async_trait::async_trait;

use super::error::SandboxError;
use super::types::*;

/// Remote command surface of a Daytona sandbox.
///
/// `DaytonaClient` talks to the real REST API. The computer adapter only
/// sees this trait, so tests can substitute a recording implementation.
#[async_trait]
pub trait ToolboxApi: Send + Sync {
    // ── Lifecycle ───────────────────────────────────────────────

    /// Create a sandbox and return once it is running.
    async fn create_sandbox(&self, req: &CreateSandboxRequest) -> Result<Sandbox, SandboxError>;
    async fn delete_sandbox(&self, sandbox_id: &str) -> Result<(), SandboxError>;

    // ── Process ─────────────────────────────────────────────────

    /// Run a shell command; the output is not collected.
    async fn execute_command(
        &self,
        sandbox_id: &str,
        req: &ExecuteRequest,
    ) -> Result<(), SandboxError>;

    // ── Computer use ────────────────────────────────────────────

    /// Start the desktop input/capture processes inside the sandbox.
    async fn start_computer_use(&self, sandbox_id: &str) -> Result<(), SandboxError>;
    async fn mouse_click(
        &self,
        sandbox_id: &str,
        req: &MouseClickRequest,
    ) -> Result<(), SandboxError>;
    async fn mouse_move(
        &self,
        sandbox_id: &str,
        req: &MouseMoveRequest,
    ) -> Result<(), SandboxError>;
    async fn mouse_drag(
        &self,
        sandbox_id: &str,
        req: &MouseDragRequest,
    ) -> Result<(), SandboxError>;
    async fn key_press(
        &self,
        sandbox_id: &str,
        req: &KeyPressRequest,
    ) -> Result<(), SandboxError>;
    async fn hotkey(&self, sandbox_id: &str, req: &HotkeyRequest) -> Result<(), SandboxError>;
    async fn type_text(
        &self,
        sandbox_id: &str,
        req: &TypeTextRequest,
    ) -> Result<(), SandboxError>;
    /// PNG screenshot with the cursor drawn in.
    async fn compressed_screenshot(
        &self,
        sandbox_id: &str,
    ) -> Result<CompressedScreenshot, SandboxError>;
}
