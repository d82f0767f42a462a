//! Chop view - bounded auto-clicking at a fixed point

use egui::RichText;

use super::{numeric_field, section, value_row, view_header};
use crate::app::AutomationCoordinator;
use crate::dashboard::state::{parse_number, ChopViewState, ModalNotice, UiRequest};
use crate::dashboard::theme::{danger_button, primary_button, ThemeColors};
use crate::overlay::SelectionTarget;

/// Render the chop view
pub fn render_chop_view(
    ui: &mut egui::Ui,
    state: &mut ChopViewState,
    coordinator: &mut AutomationCoordinator,
) -> Option<UiRequest> {
    let mut request = None;
    let config = coordinator.config();

    view_header(
        ui,
        "Auto-Chop",
        "Click a fixed point at a steady rate for a limited time",
    );

    section(ui, "Clicking", |ui| {
        if numeric_field(ui, "Click rate:", &mut state.rate_text, "clicks/sec") {
            match parse_number(&state.rate_text) {
                Some(v) if v == config.chop_click_rate => {}
                Some(v) => {
                    if let Err(e) = coordinator.set_chop_click_rate(v) {
                        request = Some(UiRequest::Notice(ModalNotice::new("Invalid Value", e.to_string())));
                    }
                }
                None => {
                    request = Some(UiRequest::Notice(ModalNotice::new(
                        "Invalid Value",
                        "Chop click rate must be a number.",
                    )));
                }
            }
            state.rate_text = coordinator.config().chop_click_rate.to_string();
        }

        if numeric_field(ui, "Duration:", &mut state.duration_text, "seconds") {
            match parse_number(&state.duration_text) {
                Some(v) if v == config.chop_duration_secs => {}
                Some(v) => {
                    if let Err(e) = coordinator.set_chop_duration(v) {
                        request = Some(UiRequest::Notice(ModalNotice::new("Invalid Value", e.to_string())));
                    }
                }
                None => {
                    request = Some(UiRequest::Notice(ModalNotice::new(
                        "Invalid Value",
                        "Chop duration must be a number.",
                    )));
                }
            }
            state.duration_text = coordinator.config().chop_duration_secs.to_string();
        }
    });

    section(ui, "Chop Trigger", |ui| {
        value_row(
            ui,
            "Chop trigger:",
            config
                .chop_trigger
                .map(|p| p.to_string())
                .unwrap_or_else(|| "Not Set".to_string()),
        );
        if ui.button("Record Chop Trigger").clicked() {
            request = Some(UiRequest::Select(SelectionTarget::ChopTrigger));
        }
    });

    let active = coordinator.runtime().chop_button_active;
    let button = if active {
        danger_button("Stop Auto-Chop")
    } else {
        primary_button("Start Auto-Chop")
    };
    ui.horizontal(|ui| {
        if ui.add(button).clicked() {
            if let Err(e) = coordinator.toggle_chop() {
                request = Some(UiRequest::Notice(ModalNotice::from(&e)));
            }
        }
        if coordinator.is_chop_running() {
            ui.label(
                RichText::new(format!(
                    "{} clicks/sec for {}s",
                    config.chop_click_rate, config.chop_duration_secs
                ))
                .color(ThemeColors::STATUS_RUNNING),
            );
        }
    });

    request
}
