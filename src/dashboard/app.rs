//! Dashboard application entry point

use eframe::egui;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

use crate::app::AutomationCoordinator;
use crate::config::AppConfig;
use crate::dashboard::components::{render_sidebar, CardStatus, StatusCard};
use crate::dashboard::state::{DashboardState, DashboardView, ModalNotice};
use crate::dashboard::theme::{self, ThemeColors};
use crate::dashboard::views::{render_chop_view, render_feed_view, render_settings_view};
use crate::hotkey::{HotkeyAction, HotkeyManager};
use crate::overlay::{SelectionResult, SelectionTarget};
use crate::shared::HungerDisplay;

/// Hotkey presses don't wake egui; poll at this rate instead
const HOTKEY_POLL: Duration = Duration::from_millis(100);

/// The main dashboard application
pub struct DashboardApp {
    coordinator: AutomationCoordinator,
    dashboard_state: DashboardState,
    hotkeys: Option<HotkeyManager>,
    /// Display lines for the settings view
    hotkey_lines: Vec<String>,
    app_config: AppConfig,
    config_path: Option<PathBuf>,
    /// Theme and repaint hook are installed on the first frame
    initialized: bool,
}

impl DashboardApp {
    pub fn new(
        coordinator: AutomationCoordinator,
        hotkeys: Option<HotkeyManager>,
        app_config: AppConfig,
        config_path: Option<PathBuf>,
    ) -> Self {
        let dashboard_state = DashboardState::new(&coordinator.config());
        let hotkey_lines = hotkeys
            .iter()
            .flat_map(|h| h.registered())
            .map(|(key, action)| format!("{}: {}", key, action.label()))
            .collect();

        Self {
            coordinator,
            dashboard_state,
            hotkeys,
            hotkey_lines,
            app_config,
            config_path,
            initialized: false,
        }
    }

    /// Create eframe options for the dashboard window
    pub fn options() -> eframe::NativeOptions {
        eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([900.0, 640.0])
                .with_min_inner_size([720.0, 520.0])
                .with_title("AFK Auto-Help"),
            ..Default::default()
        }
    }

    fn handle_hotkeys(&mut self) {
        let Some(hotkeys) = &self.hotkeys else {
            return;
        };
        for action in hotkeys.poll() {
            match action {
                HotkeyAction::StopAll => {
                    self.coordinator.stop_all_workers();
                }
                HotkeyAction::ToggleChop => {
                    if let Err(e) = self.coordinator.toggle_chop() {
                        self.dashboard_state.notice = Some(ModalNotice::from(&e));
                    }
                }
            }
        }
    }

    fn apply_selection(&mut self, target: SelectionTarget, result: SelectionResult) {
        match (target, result) {
            (_, SelectionResult::Cancelled) => self.coordinator.selection_cancelled(target.label()),
            (SelectionTarget::HungerRegion, SelectionResult::Region(region)) => {
                // Too-small regions never leave the overlay; this only logs
                let _ = self.coordinator.set_hunger_region(region);
            }
            (SelectionTarget::FeedTrigger, SelectionResult::Point(point)) => {
                self.coordinator.set_feed_trigger(point)
            }
            (SelectionTarget::ChopTrigger, SelectionResult::Point(point)) => {
                self.coordinator.set_chop_trigger(point)
            }
            (target, result) => warn!("Ignoring {:?} for {:?} selection", result, target),
        }
    }

    fn show_selection(&mut self, ctx: &egui::Context) {
        let Some(overlay) = self.dashboard_state.selection.as_mut() else {
            return;
        };
        let target = overlay.target();
        if let Some(result) = overlay.show(ctx) {
            info!("{} selection finished: {:?}", target.label(), result);
            self.dashboard_state.selection = None;
            self.apply_selection(target, result);
        }
    }

    fn show_notice(&mut self, ctx: &egui::Context) {
        let Some(notice) = &self.dashboard_state.notice else {
            return;
        };
        let mut dismissed = false;
        egui::Window::new(notice.title.as_str())
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.set_max_width(360.0);
                ui.label(notice.message.as_str());
                ui.add_space(12.0);
                ui.vertical_centered(|ui| {
                    if ui.button("  OK  ").clicked() {
                        dismissed = true;
                    }
                });
            });
        if dismissed || ctx.input(|i| i.key_pressed(egui::Key::Enter)) {
            self.dashboard_state.notice = None;
        }
    }

    fn status_cards(&self, ui: &mut egui::Ui) {
        let config = self.coordinator.config();
        let runtime = self.coordinator.runtime();

        ui.horizontal_wrapped(|ui| {
            let (status, value) = if self.coordinator.is_feed_running() {
                (CardStatus::Active, "Running")
            } else {
                (CardStatus::Inactive, "Stopped")
            };
            StatusCard::new("Feed Worker", value, status)
                .with_detail(format!(
                    "{} mode, {} feeds",
                    config.feed_mode.label(),
                    runtime.feeds_performed
                ))
                .show(ui);

            let (status, value) = if self.coordinator.is_chop_running() {
                (CardStatus::Active, "Running")
            } else {
                (CardStatus::Inactive, "Idle")
            };
            StatusCard::new("Chop Worker", value, status).show(ui);

            let status = match runtime.current_hunger {
                HungerDisplay::Error => CardStatus::Error,
                HungerDisplay::Percent(p) if p <= config.hunger_threshold => CardStatus::Error,
                HungerDisplay::Percent(_) => CardStatus::Active,
                HungerDisplay::Unknown => CardStatus::Inactive,
            };
            StatusCard::new("Hunger", runtime.current_hunger.label(), status)
                .with_detail(format!("threshold {}%", config.hunger_threshold))
                .show(ui);
        });
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.initialized {
            theme::apply_theme(ctx);
            self.coordinator.dispatcher().attach_repaint(ctx);
            self.initialized = true;
        }

        self.coordinator.pump_events();
        self.handle_hotkeys();
        if self.hotkeys.is_some() {
            ctx.request_repaint_after(HOTKEY_POLL);
        }

        self.show_selection(ctx);

        let interactive = self.dashboard_state.is_interactive();
        let mut stop_all = false;

        egui::SidePanel::left("sidebar")
            .resizable(false)
            .default_width(170.0)
            .show(ctx, |ui| {
                ui.add_enabled_ui(interactive, |ui| {
                    stop_all = render_sidebar(
                        ui,
                        &mut self.dashboard_state.current_view,
                        self.coordinator.is_feed_running(),
                        self.coordinator.is_chop_running(),
                    );
                });
            });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.label(
                egui::RichText::new(&self.coordinator.runtime().status_message)
                    .color(ThemeColors::TEXT_SECONDARY),
            );
            ui.add_space(4.0);
        });

        let mut request = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_enabled_ui(interactive, |ui| {
                egui::Frame::none().inner_margin(20.0).show(ui, |ui| {
                    self.status_cards(ui);
                    ui.add_space(16.0);

                    egui::ScrollArea::vertical().show(ui, |ui| {
                        request = match self.dashboard_state.current_view {
                            DashboardView::Feed => render_feed_view(
                                ui,
                                &mut self.dashboard_state.feed,
                                &mut self.coordinator,
                            ),
                            DashboardView::Chop => render_chop_view(
                                ui,
                                &mut self.dashboard_state.chop,
                                &mut self.coordinator,
                            ),
                            DashboardView::Settings => {
                                render_settings_view(
                                    ui,
                                    &self.app_config,
                                    self.config_path.as_deref(),
                                    &self.hotkey_lines,
                                );
                                None
                            }
                        };
                    });
                });
            });
        });

        if stop_all {
            self.coordinator.stop_all_workers();
        }
        if let Some(request) = request {
            self.dashboard_state.handle(request);
        }

        self.show_notice(ctx);
    }
}

/// Run the dashboard application
pub fn run_dashboard(app: DashboardApp) -> Result<(), eframe::Error> {
    eframe::run_native(
        "AFK Auto-Help",
        DashboardApp::options(),
        Box::new(|_cc| Ok(Box::new(app))),
    )
}
