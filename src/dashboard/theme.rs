//! Dashboard theme and styling
//!
//! Dark theme with a warm accent matching the hunger bar colors.

use egui::{Color32, FontFamily, FontId, Rounding, Stroke, TextStyle, Visuals};

/// Dark color palette
pub struct ThemeColors;

impl ThemeColors {
    // Background colors
    pub const BG_DARK: Color32 = Color32::from_rgb(20, 19, 24);
    pub const BG_MEDIUM: Color32 = Color32::from_rgb(30, 29, 36);
    pub const BG_LIGHT: Color32 = Color32::from_rgb(42, 40, 50);
    pub const BG_HOVER: Color32 = Color32::from_rgb(54, 51, 62);

    // Accent colors
    pub const ACCENT_PRIMARY: Color32 = Color32::from_rgb(240, 146, 56);
    pub const ACCENT_ERROR: Color32 = Color32::from_rgb(231, 76, 60);

    // Text colors
    pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(240, 238, 242);
    pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(165, 160, 172);
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(105, 100, 115);

    pub const BORDER: Color32 = Color32::from_rgb(56, 52, 66);

    // Status colors
    pub const STATUS_RUNNING: Color32 = Color32::from_rgb(46, 204, 113);
    pub const STATUS_STOPPED: Color32 = Color32::from_rgb(165, 160, 172);
    pub const STATUS_ERROR: Color32 = Color32::from_rgb(231, 76, 60);
}

/// Apply the dashboard theme to egui
pub fn apply_theme(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();
    let mut visuals = Visuals::dark();

    visuals.window_fill = ThemeColors::BG_MEDIUM;
    visuals.panel_fill = ThemeColors::BG_DARK;
    visuals.faint_bg_color = ThemeColors::BG_LIGHT;
    visuals.extreme_bg_color = ThemeColors::BG_DARK;

    let rounding = Rounding::same(6.0);
    for (widget, fill) in [
        (&mut visuals.widgets.noninteractive, ThemeColors::BG_MEDIUM),
        (&mut visuals.widgets.inactive, ThemeColors::BG_LIGHT),
        (&mut visuals.widgets.hovered, ThemeColors::BG_HOVER),
        (&mut visuals.widgets.active, ThemeColors::ACCENT_PRIMARY),
        (&mut visuals.widgets.open, ThemeColors::BG_HOVER),
    ] {
        widget.bg_fill = fill;
        widget.fg_stroke = Stroke::new(1.0, ThemeColors::TEXT_PRIMARY);
        widget.rounding = rounding;
    }
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, ThemeColors::TEXT_SECONDARY);

    visuals.selection.bg_fill = color_with_alpha(ThemeColors::ACCENT_PRIMARY, 77);
    visuals.selection.stroke = Stroke::new(1.0, ThemeColors::ACCENT_PRIMARY);

    visuals.window_rounding = Rounding::same(8.0);
    visuals.window_shadow.blur = 8.0;
    visuals.window_stroke = Stroke::new(1.0, ThemeColors::BORDER);

    style.visuals = visuals;

    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.button_padding = egui::vec2(12.0, 6.0);
    style.spacing.window_margin = egui::Margin::same(16.0);

    style.text_styles = [
        (TextStyle::Small, FontId::new(12.0, FontFamily::Proportional)),
        (TextStyle::Body, FontId::new(15.0, FontFamily::Proportional)),
        (TextStyle::Monospace, FontId::new(14.0, FontFamily::Monospace)),
        (TextStyle::Button, FontId::new(15.0, FontFamily::Proportional)),
        (TextStyle::Heading, FontId::new(22.0, FontFamily::Proportional)),
    ]
    .into();

    ctx.set_style(style);
}

/// Helper to create a color with modified alpha
pub fn color_with_alpha(color: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

/// Filled button in the danger color
pub fn danger_button(text: &str) -> egui::Button<'static> {
    egui::Button::new(
        egui::RichText::new(text.to_string())
            .color(Color32::WHITE)
            .strong(),
    )
    .fill(ThemeColors::ACCENT_ERROR)
}

/// Filled button in the accent color
pub fn primary_button(text: &str) -> egui::Button<'static> {
    egui::Button::new(
        egui::RichText::new(text.to_string())
            .color(Color32::BLACK)
            .strong(),
    )
    .fill(ThemeColors::ACCENT_PRIMARY)
}
