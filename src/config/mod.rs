//! Application Configuration
//!
//! Startup defaults stored in TOML format. Edits made in the dashboard
//! live only for the session; this file seeds them.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// General settings
    pub general: GeneralConfig,
    /// Initial automation parameters
    pub automation: AutomationDefaults,
    /// Hunger bar pixel classification
    pub detection: DetectionConfig,
    /// Worker loop pacing
    pub timing: TimingConfig,
    /// Global hotkeys
    pub hotkeys: HotkeyConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Default tracing filter when RUST_LOG is unset
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// How the feed worker decides when to feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedMode {
    /// Feed every fixed number of minutes
    #[default]
    Timer,
    /// Feed when the hunger bar drops to the threshold
    MonitorBar,
}

impl FeedMode {
    pub fn label(&self) -> &'static str {
        match self {
            FeedMode::Timer => "Timer",
            FeedMode::MonitorBar => "Monitor Bar",
        }
    }
}

/// Values the automation record starts with
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AutomationDefaults {
    /// Feed when hunger is at or below this percentage
    pub hunger_threshold: f32,
    pub feed_mode: FeedMode,
    pub timer_interval_minutes: f32,
    /// Clicks per second
    pub chop_click_rate: f32,
    pub chop_duration_secs: f32,
}

impl Default for AutomationDefaults {
    fn default() -> Self {
        Self {
            hunger_threshold: 10.0,
            feed_mode: FeedMode::Timer,
            timer_interval_minutes: 5.0,
            chop_click_rate: 1.0,
            chop_duration_secs: 20.0,
        }
    }
}

/// Color heuristic used to decide whether a pixel belongs to the filled bar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Mean channel value below which a pixel is background
    pub brightness_floor: f32,
    /// Red must exceed green times this factor
    pub green_ratio: f32,
    /// Red must exceed blue times this factor
    pub red_dominance: f32,
    /// Sample every Nth pixel along both axes
    pub sample_stride: u32,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            brightness_floor: 40.0,
            green_ratio: 0.9,
            red_dominance: 1.1,
            sample_stride: 2,
        }
    }
}

/// Sleep lengths used by the worker loops, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Timer-feed wait increment between stop checks
    pub timer_poll_ms: u64,
    /// Pause between timer-feed cycles
    pub feed_cycle_pause_ms: u64,
    /// Monitor resample delay while hunger is above threshold
    pub monitor_interval_ms: u64,
    /// Monitor cool-down after a feed
    pub feed_cooldown_ms: u64,
    /// Monitor delay after a failed cycle
    pub error_backoff_ms: u64,
    /// Bound on each join during stop-all
    pub join_timeout_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            timer_poll_ms: 1000,
            feed_cycle_pause_ms: 500,
            monitor_interval_ms: 1500,
            feed_cooldown_ms: 2000,
            error_backoff_ms: 2000,
            join_timeout_ms: 2000,
        }
    }
}

impl TimingConfig {
    pub fn timer_poll(&self) -> Duration {
        Duration::from_millis(self.timer_poll_ms)
    }

    pub fn feed_cycle_pause(&self) -> Duration {
        Duration::from_millis(self.feed_cycle_pause_ms)
    }

    pub fn monitor_interval(&self) -> Duration {
        Duration::from_millis(self.monitor_interval_ms)
    }

    pub fn feed_cooldown(&self) -> Duration {
        Duration::from_millis(self.feed_cooldown_ms)
    }

    pub fn error_backoff(&self) -> Duration {
        Duration::from_millis(self.error_backoff_ms)
    }

    pub fn join_timeout(&self) -> Duration {
        Duration::from_millis(self.join_timeout_ms)
    }
}

/// Global hotkey bindings ("F12", "Ctrl+Shift+S", ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HotkeyConfig {
    pub stop_all: Option<String>,
    pub toggle_chop: Option<String>,
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        Self {
            stop_all: Some("F12".to_string()),
            toggle_chop: Some("F10".to_string()),
        }
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &AppConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}
