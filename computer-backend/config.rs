use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://app.daytona.io/api";
pub const DEFAULT_INITIAL_URL: &str = "https://www.duckduckgo.com/";
pub const DEFAULT_SEARCH_ENGINE_URL: &str = "https://duckduckgo.com/";

/// Pause after a mouse or keyboard action.
pub const SLEEP_ACTION: Duration = Duration::from_millis(100);
/// Pause before every screenshot so prior actions render.
pub const SLEEP_SCREENSHOT: Duration = Duration::from_millis(500);
/// Pause after anything that loads a page.
pub const SLEEP_NAVIGATION: Duration = Duration::from_secs(1);
/// Length of the explicit `wait_5_seconds` action.
pub const SLEEP_WAIT: Duration = Duration::from_secs(5);

/// Daytona API connection settings loaded from environment variables.
#[derive(Debug, Clone)]
pub struct DaytonaConfig {
    pub api_key: String,
    pub api_url: String,
    pub target: Option<String>,
    pub request_timeout: Duration,
    /// How long sandbox creation may take to reach `started`.
    pub create_timeout: Duration,
}

impl DaytonaConfig {
    pub fn from_env() -> Self {
        Self::from_raw_values(
            std::env::var("DAYTONA_API_KEY").ok().as_deref(),
            std::env::var("DAYTONA_API_URL").ok().as_deref(),
            std::env::var("DAYTONA_TARGET").ok().as_deref(),
        )
    }

    /// Build a DaytonaConfig from raw string values (as they would come from env vars).
    /// Used directly in tests to avoid mutating process-global environment.
    pub fn from_raw_values(
        api_key: Option<&str>,
        api_url: Option<&str>,
        target: Option<&str>,
    ) -> Self {
        // A missing key is passed through; the API rejects it with 401.
        let api_key = api_key.unwrap_or_default().to_string();

        let api_url = api_url
            .filter(|s| !s.is_empty())
            .map(String::from)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let target = target.filter(|s| !s.is_empty()).map(String::from);

        DaytonaConfig {
            api_key,
            api_url,
            target,
            request_timeout: Duration::from_secs(60),
            create_timeout: Duration::from_secs(60),
        }
    }
}

/// Fixed settle delays inserted around remote actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettleDelays {
    pub action: Duration,
    pub screenshot: Duration,
    pub navigation: Duration,
    pub wait: Duration,
}

impl Default for SettleDelays {
    fn default() -> Self {
        Self {
            action: SLEEP_ACTION,
            screenshot: SLEEP_SCREENSHOT,
            navigation: SLEEP_NAVIGATION,
            wait: SLEEP_WAIT,
        }
    }
}

impl SettleDelays {
    pub fn zero() -> Self {
        Self {
            action: Duration::ZERO,
            screenshot: Duration::ZERO,
            navigation: Duration::ZERO,
            wait: Duration::ZERO,
        }
    }
}

/// Settings for one computer-use session.
#[derive(Debug, Clone, Deserialize)]
pub struct AdapterConfig {
    #[serde(default = "default_screen_width")]
    pub screen_width: u32,
    #[serde(default = "default_screen_height")]
    pub screen_height: u32,
    #[serde(default = "default_initial_url")]
    pub initial_url: String,
    #[serde(default = "default_search_engine_url")]
    pub search_engine_url: String,
    #[serde(default)]
    pub network_block_all: bool,
    #[serde(default = "default_network_allow_list")]
    pub network_allow_list: Option<String>,
    /// Idle time before Daytona stops the sandbox, in the provider's unit (minutes).
    #[serde(default = "default_auto_stop_interval")]
    pub auto_stop_interval: u32,
}

fn default_screen_width() -> u32 {
    1440
}

fn default_screen_height() -> u32 {
    900
}

fn default_initial_url() -> String {
    DEFAULT_INITIAL_URL.to_string()
}

fn default_search_engine_url() -> String {
    DEFAULT_SEARCH_ENGINE_URL.to_string()
}

fn default_network_allow_list() -> Option<String> {
    Some("0.0.0.0/0".to_string())
}

fn default_auto_stop_interval() -> u32 {
    30
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            screen_width: default_screen_width(),
            screen_height: default_screen_height(),
            initial_url: default_initial_url(),
            search_engine_url: default_search_engine_url(),
            network_block_all: false,
            network_allow_list: default_network_allow_list(),
            auto_stop_interval: default_auto_stop_interval(),
        }
    }
}

impl AdapterConfig {
    pub fn with_screen_size(width: u32, height: u32) -> Self {
        Self {
            screen_width: width,
            screen_height: height,
            ..Default::default()
        }
    }

    pub fn screen_size(&self) -> (u32, u32) {
        (self.screen_width, self.screen_height)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }
}
