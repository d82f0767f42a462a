//! Settings view - read-only display of the startup configuration

use egui::RichText;
use std::path::Path;

use super::{section, value_row, view_header};
use crate::config::AppConfig;
use crate::dashboard::theme::ThemeColors;

/// Render the settings view
pub fn render_settings_view(
    ui: &mut egui::Ui,
    config: &AppConfig,
    config_path: Option<&Path>,
    hotkeys: &[String],
) {
    view_header(
        ui,
        "Settings",
        "Loaded at startup; edit config.toml and restart to change",
    );

    section(ui, "General", |ui| {
        value_row(
            ui,
            "Config file:",
            config_path
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(defaults, not saved)".to_string()),
        );
        value_row(ui, "Log level:", config.general.log_level.as_str());
    });

    section(ui, "Detection", |ui| {
        let d = &config.detection;
        value_row(ui, "Brightness floor:", format!("{}", d.brightness_floor));
        value_row(ui, "Red vs green ratio:", format!("r > g x {}", d.green_ratio));
        value_row(ui, "Red vs blue ratio:", format!("r > b x {}", d.red_dominance));
        value_row(ui, "Sample stride:", format!("every {} px", d.sample_stride));
    });

    section(ui, "Timing", |ui| {
        let t = &config.timing;
        value_row(ui, "Timer poll:", format!("{} ms", t.timer_poll_ms));
        value_row(ui, "Pause between feeds:", format!("{} ms", t.feed_cycle_pause_ms));
        value_row(ui, "Monitor interval:", format!("{} ms", t.monitor_interval_ms));
        value_row(ui, "Cool-down after feeding:", format!("{} ms", t.feed_cooldown_ms));
        value_row(ui, "Back-off after errors:", format!("{} ms", t.error_backoff_ms));
        value_row(ui, "Stop join timeout:", format!("{} ms", t.join_timeout_ms));
    });

    section(ui, "Hotkeys", |ui| {
        if hotkeys.is_empty() {
            ui.label(RichText::new("No global hotkeys registered").color(ThemeColors::TEXT_MUTED));
        }
        for line in hotkeys {
            ui.label(line);
        }
    });
}
