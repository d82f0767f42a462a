//! Dashboard views

pub mod chop;
pub mod feed;
pub mod settings;

pub use chop::render_chop_view;
pub use feed::render_feed_view;
pub use settings::render_settings_view;

use egui::RichText;

use crate::dashboard::theme::ThemeColors;

/// View heading with a secondary line underneath
fn view_header(ui: &mut egui::Ui, title: &str, subtitle: &str) {
    ui.heading(RichText::new(title).size(24.0).strong());
    ui.add_space(8.0);
    ui.label(
        RichText::new(subtitle)
            .size(14.0)
            .color(ThemeColors::TEXT_SECONDARY),
    );
    ui.add_space(20.0);
}

/// Framed section with a heading
fn section(ui: &mut egui::Ui, title: &str, add_contents: impl FnOnce(&mut egui::Ui)) {
    egui::Frame::none()
        .fill(ThemeColors::BG_MEDIUM)
        .rounding(egui::Rounding::same(8.0))
        .inner_margin(16.0)
        .show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.label(RichText::new(title).size(16.0).strong());
            ui.add_space(10.0);
            add_contents(ui);
        });
    ui.add_space(12.0);
}

/// Single-line numeric entry; returns true when the edit is committed
///
/// An edit commits when the field loses focus, which includes Enter.
fn numeric_field(ui: &mut egui::Ui, label: &str, text: &mut String, suffix: &str) -> bool {
    ui.horizontal(|ui| {
        ui.label(label);
        let response = ui.add(egui::TextEdit::singleline(text).desired_width(80.0));
        ui.label(RichText::new(suffix).color(ThemeColors::TEXT_MUTED));
        response.lost_focus()
    })
    .inner
}

/// Key/value row for read-only displays
fn value_row(ui: &mut egui::Ui, label: &str, value: impl Into<String>) {
    ui.horizontal(|ui| {
        ui.label(RichText::new(label).color(ThemeColors::TEXT_SECONDARY));
        ui.add_space(8.0);
        ui.label(value.into());
    });
}
