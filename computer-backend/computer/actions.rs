//! Serialized computer actions.
//!
//! Agents emit function calls such as `{"action": "click_at", "x": 10, "y": 20}`.
//! `Action` is the typed form of those calls, and `Action::apply` runs one
//! against any `Computer`.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use super::{Computer, ComputerError, DEFAULT_SCROLL_MAGNITUDE, EnvState, ScrollDirection};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    OpenWebBrowser,
    ClickAt {
        x: i32,
        y: i32,
    },
    HoverAt {
        x: i32,
        y: i32,
    },
    TypeTextAt {
        x: i32,
        y: i32,
        text: String,
        #[serde(default)]
        press_enter: bool,
        #[serde(default = "default_clear_before_typing")]
        clear_before_typing: bool,
    },
    /// Direction stays a string until `apply` so bad values surface as
    /// `InvalidArgument` rather than a parse failure of the whole script.
    ScrollDocument {
        direction: String,
    },
    ScrollAt {
        x: i32,
        y: i32,
        direction: String,
        #[serde(default = "default_magnitude")]
        magnitude: u32,
    },
    #[serde(rename = "wait_5_seconds")]
    Wait5Seconds,
    GoBack,
    GoForward,
    Search,
    Navigate {
        url: String,
    },
    KeyCombination {
        keys: Vec<String>,
    },
    DragAndDrop {
        x: i32,
        y: i32,
        destination_x: i32,
        destination_y: i32,
    },
    CurrentState,
}

fn default_clear_before_typing() -> bool {
    true
}

fn default_magnitude() -> u32 {
    DEFAULT_SCROLL_MAGNITUDE
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::OpenWebBrowser => "open_web_browser",
            Action::ClickAt { .. } => "click_at",
            Action::HoverAt { .. } => "hover_at",
            Action::TypeTextAt { .. } => "type_text_at",
            Action::ScrollDocument { .. } => "scroll_document",
            Action::ScrollAt { .. } => "scroll_at",
            Action::Wait5Seconds => "wait_5_seconds",
            Action::GoBack => "go_back",
            Action::GoForward => "go_forward",
            Action::Search => "search",
            Action::Navigate { .. } => "navigate",
            Action::KeyCombination { .. } => "key_combination",
            Action::DragAndDrop { .. } => "drag_and_drop",
            Action::CurrentState => "current_state",
        }
    }

    /// Run this action. Arguments are validated before any remote call.
    pub async fn apply(&self, computer: &mut dyn Computer) -> Result<EnvState, ComputerError> {
        tracing::debug!(action = self.name(), "applying action");

        match self {
            Action::OpenWebBrowser => computer.open_web_browser().await,
            Action::ClickAt { x, y } => computer.click_at(*x, *y).await,
            Action::HoverAt { x, y } => computer.hover_at(*x, *y).await,
            Action::TypeTextAt {
                x,
                y,
                text,
                press_enter,
                clear_before_typing,
            } => {
                computer
                    .type_text_at(*x, *y, text, *press_enter, *clear_before_typing)
                    .await
            }
            Action::ScrollDocument { direction } => {
                let direction: ScrollDirection = direction.parse()?;
                computer.scroll_document(direction).await
            }
            Action::ScrollAt {
                x,
                y,
                direction,
                magnitude,
            } => {
                let direction: ScrollDirection = direction.parse()?;
                computer.scroll_at(*x, *y, direction, *magnitude).await
            }
            Action::Wait5Seconds => computer.wait_5_seconds().await,
            Action::GoBack => computer.go_back().await,
            Action::GoForward => computer.go_forward().await,
            Action::Search => computer.search().await,
            Action::Navigate { url } => computer.navigate(url).await,
            Action::KeyCombination { keys } => computer.key_combination(keys).await,
            Action::DragAndDrop {
                x,
                y,
                destination_x,
                destination_y,
            } => {
                computer
                    .drag_and_drop(*x, *y, *destination_x, *destination_y)
                    .await
            }
            Action::CurrentState => computer.current_state().await,
        }
    }
}

/// Load a YAML list of actions.
pub fn load_script(path: &Path) -> Result<Vec<Action>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read action script: {}", path.display()))?;
    serde_yaml::from_str(&content)
        .with_context(|| format!("failed to parse action script: {}", path.display()))
}
