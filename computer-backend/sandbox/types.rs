use serde::{Deserialize, Serialize};

// ── Sandbox lifecycle ───────────────────────────────────────────────

pub type SandboxId = String;

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSandboxRequest {
    pub network_block_all: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_allow_list: Option<String>,
    /// Minutes of inactivity before Daytona stops the sandbox.
    pub auto_stop_interval: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sandbox {
    pub id: SandboxId,
    #[serde(default)]
    pub state: Option<SandboxState>,
    #[serde(default)]
    pub error_reason: Option<String>,
}

/// Only the states the client acts on; everything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SandboxState {
    Started,
    Error,
    BuildFailed,
    #[serde(other)]
    Other,
}

// ── Process execution ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct ExecuteRequest {
    pub command: String,
    /// Seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
}

// ── Computer use ────────────────────────────────────────────────────
//
// Mouse requests omit `button`; Daytona defaults it to left.

#[derive(Debug, Clone, Serialize)]
pub struct MouseClickRequest {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct MouseMoveRequest {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MouseDragRequest {
    pub start_x: i32,
    pub start_y: i32,
    pub end_x: i32,
    pub end_y: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct KeyPressRequest {
    pub key: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HotkeyRequest {
    /// `+`-joined key tokens, e.g. `ctrl+a`.
    pub keys: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TypeTextRequest {
    pub text: String,
    /// Per-keystroke delay in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<u32>,
}

/// Screenshot payload; `screenshot` is base64 in transit. Dimensions and
/// size fields in the response are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct CompressedScreenshot {
    pub screenshot: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_serializes_camel_case() {
        let req = CreateSandboxRequest {
            network_block_all: false,
            network_allow_list: Some("0.0.0.0/0".into()),
            auto_stop_interval: 30,
            target: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["networkBlockAll"], false);
        assert_eq!(json["networkAllowList"], "0.0.0.0/0");
        assert_eq!(json["autoStopInterval"], 30);
        assert!(json.get("target").is_none());
    }

    #[test]
    fn sandbox_deserializes_state() {
        let json = r#"{"id":"sbx-1","state":"started","cpu":1}"#;
        let sandbox: Sandbox = serde_json::from_str(json).unwrap();
        assert_eq!(sandbox.id, "sbx-1");
        assert_eq!(sandbox.state, Some(SandboxState::Started));
    }

    #[test]
    fn unknown_state_maps_to_other() {
        let json = r#"{"id":"sbx-1","state":"resizing"}"#;
        let sandbox: Sandbox = serde_json::from_str(json).unwrap();
        assert_eq!(sandbox.state, Some(SandboxState::Other));
    }

    #[test]
    fn drag_request_serializes_camel_case() {
        let req = MouseDragRequest {
            start_x: 1,
            start_y: 2,
            end_x: 3,
            end_y: 4,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["startX"], 1);
        assert_eq!(json["endY"], 4);
        assert!(json.get("button").is_none());
    }

    #[test]
    fn type_request_omits_missing_delay() {
        let req = TypeTextRequest {
            text: "hi".into(),
            delay: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json, serde_json::json!({ "text": "hi" }));
    }

    #[test]
    fn compressed_screenshot_ignores_dimensions() {
        let json = r#"{"screenshot":"aGVsbG8=","width":1440,"height":900,"sizeBytes":5}"#;
        let shot: CompressedScreenshot = serde_json::from_str(json).unwrap();
        assert_eq!(shot.screenshot, "aGVsbG8=");
    }
}
