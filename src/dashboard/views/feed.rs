//! Feed view - timer or hunger-bar driven feeding

use egui::RichText;

use super::{numeric_field, section, value_row, view_header};
use crate::app::{AutomationCoordinator, AutomationError};
use crate::config::FeedMode;
use crate::dashboard::state::{parse_number, FeedViewState, ModalNotice, UiRequest};
use crate::dashboard::theme::{primary_button, ThemeColors};
use crate::overlay::SelectionTarget;
use crate::shared::HungerDisplay;

/// Render the feed view
pub fn render_feed_view(
    ui: &mut egui::Ui,
    state: &mut FeedViewState,
    coordinator: &mut AutomationCoordinator,
) -> Option<UiRequest> {
    let mut request = None;
    let config = coordinator.config();
    let running = coordinator.is_feed_running();

    view_header(
        ui,
        "Auto-Feed",
        "Feed on a fixed timer or whenever the hunger bar runs low",
    );

    section(ui, "Feed Mode", |ui| {
        ui.add_enabled_ui(!running, |ui| {
            let mut mode = config.feed_mode;
            ui.horizontal(|ui| {
                ui.radio_value(&mut mode, FeedMode::Timer, FeedMode::Timer.label());
                ui.radio_value(&mut mode, FeedMode::MonitorBar, FeedMode::MonitorBar.label());
            });
            if mode != config.feed_mode {
                // Rejections are already on the status bar
                let _ = coordinator.set_feed_mode(mode);
            }
        });
        if running {
            ui.label(
                RichText::new("Mode is locked while the feed worker runs")
                    .size(12.0)
                    .color(ThemeColors::TEXT_MUTED),
            );
        }

        ui.add_space(8.0);
        if numeric_field(ui, "Timer interval:", &mut state.interval_text, "minutes") {
            match parse_number(&state.interval_text) {
                Some(v) if v == config.timer_interval_minutes => {}
                Some(v) => {
                    let _ = coordinator.set_timer_interval(v);
                }
                None => coordinator.set_error_status("Invalid timer interval value"),
            }
            state.interval_text = coordinator.config().timer_interval_minutes.to_string();
        }
    });

    section(ui, "Hunger Bar", |ui| {
        value_row(
            ui,
            "Hunger region:",
            config
                .hunger_region
                .map(|r| r.to_string())
                .unwrap_or_else(|| "Not Set".to_string()),
        );
        if ui.button("Record Hunger Region").clicked() {
            request = Some(UiRequest::Select(SelectionTarget::HungerRegion));
        }

        ui.add_space(8.0);
        if numeric_field(ui, "Hunger threshold:", &mut state.threshold_text, "%") {
            match parse_number(&state.threshold_text) {
                Some(v) if v == config.hunger_threshold => {}
                Some(v) => {
                    let _ = coordinator.set_hunger_threshold(v);
                }
                None => coordinator.set_error_status("Invalid hunger threshold value"),
            }
            state.threshold_text = coordinator.config().hunger_threshold.to_string();
        }

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if ui.button("Test Hunger Bar").clicked() {
                if let Err(e @ AutomationError::HungerRegionMissing) = coordinator.test_hunger_bar() {
                    request = Some(UiRequest::Notice(ModalNotice::new(
                        "No Hunger Region",
                        e.to_string(),
                    )));
                }
            }
            let mut debug = coordinator.debug_mode();
            if ui.checkbox(&mut debug, "Debug mode").changed() {
                coordinator.set_debug_mode(debug);
            }
        });

        let hunger = coordinator.runtime().current_hunger;
        let color = match hunger {
            HungerDisplay::Error => ThemeColors::ACCENT_ERROR,
            _ => ThemeColors::TEXT_PRIMARY,
        };
        ui.label(
            RichText::new(format!("Current Hunger: {}", hunger.label()))
                .size(16.0)
                .color(color),
        );
    });

    section(ui, "Feed Trigger", |ui| {
        value_row(
            ui,
            "Feed trigger:",
            config
                .feed_trigger
                .map(|p| p.to_string())
                .unwrap_or_else(|| "Not Set".to_string()),
        );
        if ui.button("Record Feed Trigger").clicked() {
            request = Some(UiRequest::Select(SelectionTarget::FeedTrigger));
        }
    });

    ui.horizontal(|ui| {
        if ui.add(primary_button("Start Auto-Feed")).clicked() {
            if let Err(e) = coordinator.start_feed() {
                request = Some(UiRequest::Notice(ModalNotice::from(&e)));
            }
        }
        if running {
            ui.label(
                RichText::new(format!("{} worker running", config.feed_mode.label()))
                    .color(ThemeColors::STATUS_RUNNING),
            );
        }
    });

    request
}
