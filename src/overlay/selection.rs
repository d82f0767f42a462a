//! Fullscreen selection overlay for recording a point or a region
//!
//! Shown as an immediate viewport over the desktop. Pointer positions are
//! reported in egui points relative to the viewport, so results are
//! converted to physical desktop pixels before they leave this module.

use egui::{Color32, FontId, Key, Pos2, Rect, Rounding, Stroke, ViewportBuilder, ViewportId};

use crate::capture::ScreenRegion;
use crate::input::ScreenPoint;

/// Drags whose width or height is at or below this are discarded as accidental
pub const MIN_REGION_SIZE: i32 = 5;

/// What the user is asked to pick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionTarget {
    HungerRegion,
    FeedTrigger,
    ChopTrigger,
}

impl SelectionTarget {
    pub fn is_region(&self) -> bool {
        matches!(self, SelectionTarget::HungerRegion)
    }

    pub fn label(&self) -> &'static str {
        match self {
            SelectionTarget::HungerRegion => "Hunger region",
            SelectionTarget::FeedTrigger => "Feed trigger",
            SelectionTarget::ChopTrigger => "Chop trigger",
        }
    }

    fn instructions(&self) -> &'static str {
        if self.is_region() {
            "Click and drag over the hunger bar. Press ESC to cancel."
        } else {
            "Click the point to record. Press ESC to cancel."
        }
    }
}

/// Outcome of a selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionResult {
    Region(ScreenRegion),
    Point(ScreenPoint),
    Cancelled,
}

/// Map a viewport-local position to physical desktop pixels
pub fn to_physical(pos: Pos2, origin: Pos2, pixels_per_point: f32) -> ScreenPoint {
    let x = (origin.x + pos.x) * pixels_per_point;
    let y = (origin.y + pos.y) * pixels_per_point;
    ScreenPoint::new(x.round() as i32, y.round() as i32)
}

/// Region spanned by a drag, or None if it is too small in either axis
pub fn region_from_drag(
    start: Pos2,
    end: Pos2,
    origin: Pos2,
    pixels_per_point: f32,
) -> Option<ScreenRegion> {
    let a = to_physical(start, origin, pixels_per_point);
    let b = to_physical(end, origin, pixels_per_point);

    let x = a.x.min(b.x);
    let y = a.y.min(b.y);
    let width = a.x.max(b.x) - x;
    let height = a.y.max(b.y) - y;

    if width > MIN_REGION_SIZE && height > MIN_REGION_SIZE {
        Some(ScreenRegion::new(x, y, width, height))
    } else {
        None
    }
}

/// In-progress selection; drop it to close the overlay
#[derive(Debug, Clone)]
pub struct SelectionOverlay {
    target: SelectionTarget,
    drag_start: Option<Pos2>,
    drag_current: Option<Pos2>,
}

impl SelectionOverlay {
    pub fn new(target: SelectionTarget) -> Self {
        Self {
            target,
            drag_start: None,
            drag_current: None,
        }
    }

    pub fn target(&self) -> SelectionTarget {
        self.target
    }

    /// Render the overlay for this frame; Some once the user is done
    pub fn show(&mut self, ctx: &egui::Context) -> Option<SelectionResult> {
        let builder = ViewportBuilder::default()
            .with_title("Select")
            .with_fullscreen(true)
            .with_decorations(false)
            .with_transparent(true)
            .with_always_on_top();

        ctx.show_viewport_immediate(
            ViewportId::from_hash_of("selection_overlay"),
            builder,
            |ctx, _class| self.ui(ctx),
        )
    }

    fn ui(&mut self, ctx: &egui::Context) -> Option<SelectionResult> {
        let (escape, close_requested) =
            ctx.input(|i| (i.key_pressed(Key::Escape), i.viewport().close_requested()));
        if escape || close_requested {
            return Some(SelectionResult::Cancelled);
        }

        let pixels_per_point = ctx.pixels_per_point();
        let origin = ctx
            .input(|i| i.viewport().inner_rect)
            .map(|r| r.min)
            .unwrap_or(Pos2::ZERO);
        let screen_rect = ctx.screen_rect();

        let mut result = None;
        egui::Area::new(egui::Id::new("selection_overlay_area"))
            .fixed_pos(Pos2::ZERO)
            .show(ctx, |ui| {
                let response = ui.allocate_rect(screen_rect, egui::Sense::click_and_drag());
                let painter = ui.painter();

                painter.rect_filled(
                    screen_rect,
                    Rounding::ZERO,
                    Color32::from_rgba_unmultiplied(0, 0, 0, 90),
                );

                let pointer = response.interact_pointer_pos();
                if self.target.is_region() {
                    if response.drag_started() {
                        self.drag_start = pointer;
                        self.drag_current = pointer;
                    }
                    if response.dragged() && pointer.is_some() {
                        self.drag_current = pointer;
                    }
                    if response.drag_stopped() {
                        if let (Some(start), Some(end)) = (self.drag_start, self.drag_current) {
                            result = region_from_drag(start, end, origin, pixels_per_point)
                                .map(SelectionResult::Region);
                        }
                        self.drag_start = None;
                        self.drag_current = None;
                    }
                } else if response.clicked() {
                    result = pointer
                        .map(|pos| SelectionResult::Point(to_physical(pos, origin, pixels_per_point)));
                }

                if let (Some(start), Some(current)) = (self.drag_start, self.drag_current) {
                    let rect = Rect::from_two_pos(start, current);
                    painter.rect_filled(
                        rect,
                        Rounding::ZERO,
                        Color32::from_rgba_unmultiplied(255, 140, 0, 50),
                    );
                    painter.rect_stroke(rect, Rounding::ZERO, Stroke::new(2.0, Color32::RED));
                    painter.text(
                        rect.center(),
                        egui::Align2::CENTER_CENTER,
                        format!(
                            "{:.0} x {:.0}",
                            rect.width() * pixels_per_point,
                            rect.height() * pixels_per_point
                        ),
                        FontId::proportional(16.0),
                        Color32::WHITE,
                    );
                }

                let instruction_pos = Pos2::new(screen_rect.center().x, 30.0);
                let galley = painter.layout_no_wrap(
                    self.target.instructions().to_string(),
                    FontId::proportional(16.0),
                    Color32::WHITE,
                );
                painter.rect_filled(
                    Rect::from_center_size(instruction_pos, galley.size() + egui::vec2(20.0, 10.0)),
                    Rounding::same(4.0),
                    Color32::from_rgba_unmultiplied(0, 0, 0, 200),
                );
                painter.text(
                    instruction_pos,
                    egui::Align2::CENTER_CENTER,
                    self.target.instructions(),
                    FontId::proportional(16.0),
                    Color32::WHITE,
                );
            });

        if self.target.is_region() {
            ctx.set_cursor_icon(egui::CursorIcon::Crosshair);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_from_drag_normalizes_direction() {
        let forward = region_from_drag(
            Pos2::new(100.0, 200.0),
            Pos2::new(300.0, 240.0),
            Pos2::ZERO,
            1.0,
        );
        let backward = region_from_drag(
            Pos2::new(300.0, 240.0),
            Pos2::new(100.0, 200.0),
            Pos2::ZERO,
            1.0,
        );
        assert_eq!(forward, Some(ScreenRegion::new(100, 200, 200, 40)));
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_small_drags_are_discarded() {
        let origin = Pos2::ZERO;
        // 5 px is not enough; strictly more is required
        assert_eq!(
            region_from_drag(Pos2::new(0.0, 0.0), Pos2::new(5.0, 50.0), origin, 1.0),
            None
        );
        assert_eq!(
            region_from_drag(Pos2::new(0.0, 0.0), Pos2::new(50.0, 5.0), origin, 1.0),
            None
        );
        assert_eq!(
            region_from_drag(Pos2::new(0.0, 0.0), Pos2::new(6.0, 6.0), origin, 1.0),
            Some(ScreenRegion::new(0, 0, 6, 6))
        );
    }

    #[test]
    fn test_scaling_and_viewport_origin() {
        // 150% scaling on a monitor to the right of the primary one
        let origin = Pos2::new(1280.0, 0.0);
        assert_eq!(
            to_physical(Pos2::new(10.0, 20.0), origin, 1.5),
            ScreenPoint::new(1935, 30)
        );

        // 4 points at 2x is 8 physical pixels, enough to keep
        assert_eq!(
            region_from_drag(Pos2::new(0.0, 0.0), Pos2::new(4.0, 4.0), Pos2::ZERO, 2.0),
            Some(ScreenRegion::new(0, 0, 8, 8))
        );
    }

    #[test]
    fn test_target_kinds() {
        assert!(SelectionTarget::HungerRegion.is_region());
        assert!(!SelectionTarget::FeedTrigger.is_region());
        assert_eq!(SelectionTarget::ChopTrigger.label(), "Chop trigger");
    }
}
