//! Sidebar navigation component

use egui::{Color32, RichText, Rounding, Sense, Vec2};

use crate::dashboard::state::DashboardView;
use crate::dashboard::theme::{color_with_alpha, danger_button, ThemeColors};

/// Render the sidebar navigation; returns true when STOP ALL was clicked
pub fn render_sidebar(
    ui: &mut egui::Ui,
    current_view: &mut DashboardView,
    feed_running: bool,
    chop_running: bool,
) -> bool {
    let mut stop_all = false;

    ui.vertical(|ui| {
        ui.add_space(16.0);
        ui.horizontal(|ui| {
            ui.add_space(12.0);
            ui.label(
                RichText::new("AFK")
                    .size(24.0)
                    .color(ThemeColors::ACCENT_PRIMARY)
                    .strong(),
            );
        });
        ui.horizontal(|ui| {
            ui.add_space(12.0);
            ui.label(
                RichText::new("Auto-Help")
                    .size(11.0)
                    .color(ThemeColors::TEXT_MUTED),
            );
        });

        ui.add_space(20.0);
        ui.separator();
        ui.add_space(12.0);

        for view in DashboardView::ALL {
            let running = match view {
                DashboardView::Feed => feed_running,
                DashboardView::Chop => chop_running,
                DashboardView::Settings => false,
            };
            if nav_button(ui, view, *current_view == view, running) {
                *current_view = view;
            }
            ui.add_space(4.0);
        }

        ui.with_layout(egui::Layout::bottom_up(egui::Align::Center), |ui| {
            ui.add_space(12.0);
            ui.label(
                RichText::new(concat!("v", env!("CARGO_PKG_VERSION")))
                    .size(10.0)
                    .color(ThemeColors::TEXT_MUTED),
            );
            ui.add_space(8.0);
            let button = danger_button("STOP ALL").min_size(Vec2::new(ui.available_width() - 24.0, 40.0));
            if ui.add(button).clicked() {
                stop_all = true;
            }
        });
    });

    stop_all
}

/// Render a navigation button with a running indicator
fn nav_button(ui: &mut egui::Ui, view: DashboardView, is_selected: bool, running: bool) -> bool {
    let desired_size = Vec2::new(ui.available_width() - 16.0, 36.0);
    let (rect, response) = ui.allocate_exact_size(desired_size, Sense::click());

    if ui.is_rect_visible(rect) {
        let bg_color = if is_selected {
            color_with_alpha(ThemeColors::ACCENT_PRIMARY, 51)
        } else if response.hovered() {
            ThemeColors::BG_HOVER
        } else {
            Color32::TRANSPARENT
        };
        let text_color = if is_selected {
            ThemeColors::ACCENT_PRIMARY
        } else if response.hovered() {
            ThemeColors::TEXT_PRIMARY
        } else {
            ThemeColors::TEXT_SECONDARY
        };

        let painter = ui.painter();
        painter.rect_filled(rect.shrink2(Vec2::new(8.0, 0.0)), Rounding::same(6.0), bg_color);

        let font = egui::FontId::proportional(14.0);
        painter.text(
            rect.left_center() + Vec2::new(24.0, 0.0),
            egui::Align2::LEFT_CENTER,
            view.icon(),
            font.clone(),
            text_color,
        );
        painter.text(
            rect.left_center() + Vec2::new(48.0, 0.0),
            egui::Align2::LEFT_CENTER,
            view.name(),
            font,
            text_color,
        );

        if running {
            painter.circle_filled(
                rect.right_center() - Vec2::new(20.0, 0.0),
                4.0,
                ThemeColors::STATUS_RUNNING,
            );
        }
    }

    response.clicked()
}
