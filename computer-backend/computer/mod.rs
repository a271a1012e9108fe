pub mod actions;
pub mod daytona;
pub mod error;
pub mod keys;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;

pub use actions::Action;
pub use daytona::DaytonaComputer;
pub use error::ComputerError;

/// Scroll distance used when the caller does not give one.
pub const DEFAULT_SCROLL_MAGNITUDE: u32 = 800;

/// Snapshot returned after every action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvState {
    /// Raw image bytes (PNG).
    pub screenshot: Vec<u8>,
    /// Last URL the computer navigated to.
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
    Left,
    Right,
}

impl FromStr for ScrollDirection {
    type Err = ComputerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(ScrollDirection::Up),
            "down" => Ok(ScrollDirection::Down),
            "left" => Ok(ScrollDirection::Left),
            "right" => Ok(ScrollDirection::Right),
            other => Err(ComputerError::InvalidArgument(format!(
                "unsupported direction: {other}"
            ))),
        }
    }
}

impl fmt::Display for ScrollDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScrollDirection::Up => write!(f, "up"),
            ScrollDirection::Down => write!(f, "down"),
            ScrollDirection::Left => write!(f, "left"),
            ScrollDirection::Right => write!(f, "right"),
        }
    }
}

/// A browser-capable desktop an agent can drive.
///
/// Every action waits for the remote UI to settle and returns a fresh
/// `EnvState`. Calls must not overlap on one instance, which `&mut self`
/// enforces.
#[async_trait]
pub trait Computer: Send {
    // ── Session ─────────────────────────────────────────────────

    async fn start_session(&mut self) -> Result<(), ComputerError>;

    /// Release the session. Never fails; cleanup errors are logged.
    async fn end_session(&mut self);

    fn screen_size(&self) -> (u32, u32);

    // ── Actions ─────────────────────────────────────────────────

    async fn open_web_browser(&mut self) -> Result<EnvState, ComputerError>;
    async fn click_at(&mut self, x: i32, y: i32) -> Result<EnvState, ComputerError>;
    async fn hover_at(&mut self, x: i32, y: i32) -> Result<EnvState, ComputerError>;
    async fn type_text_at(
        &mut self,
        x: i32,
        y: i32,
        text: &str,
        press_enter: bool,
        clear_before_typing: bool,
    ) -> Result<EnvState, ComputerError>;
    async fn scroll_document(
        &mut self,
        direction: ScrollDirection,
    ) -> Result<EnvState, ComputerError>;
    async fn scroll_at(
        &mut self,
        x: i32,
        y: i32,
        direction: ScrollDirection,
        magnitude: u32,
    ) -> Result<EnvState, ComputerError>;
    async fn wait_5_seconds(&mut self) -> Result<EnvState, ComputerError>;
    async fn go_back(&mut self) -> Result<EnvState, ComputerError>;
    async fn go_forward(&mut self) -> Result<EnvState, ComputerError>;
    async fn search(&mut self) -> Result<EnvState, ComputerError>;
    async fn navigate(&mut self, url: &str) -> Result<EnvState, ComputerError>;
    async fn key_combination(&mut self, keys: &[String]) -> Result<EnvState, ComputerError>;
    async fn drag_and_drop(
        &mut self,
        x: i32,
        y: i32,
        destination_x: i32,
        destination_y: i32,
    ) -> Result<EnvState, ComputerError>;
    async fn current_state(&mut self) -> Result<EnvState, ComputerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_supported_directions() {
        assert_eq!("up".parse::<ScrollDirection>().unwrap(), ScrollDirection::Up);
        assert_eq!("down".parse::<ScrollDirection>().unwrap(), ScrollDirection::Down);
        assert_eq!("left".parse::<ScrollDirection>().unwrap(), ScrollDirection::Left);
        assert_eq!("right".parse::<ScrollDirection>().unwrap(), ScrollDirection::Right);
    }

    #[test]
    fn rejects_unsupported_direction() {
        let err = "diagonal".parse::<ScrollDirection>().unwrap_err();
        assert!(matches!(err, ComputerError::InvalidArgument(ref m) if m.contains("diagonal")));
    }

    #[test]
    fn direction_display_round_trips() {
        for dir in [
            ScrollDirection::Up,
            ScrollDirection::Down,
            ScrollDirection::Left,
            ScrollDirection::Right,
        ] {
            assert_eq!(dir.to_string().parse::<ScrollDirection>().unwrap(), dir);
        }
    }
}
