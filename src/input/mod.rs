//! Pointer Input Layer
//!
//! Simulated left clicks at absolute desktop coordinates. Clicks are
//! fire-and-forget: callers log failures and carry on.

use enigo::{Button, Coordinate, Direction, Enigo, Mouse, Settings};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Desktop pixel coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
}

impl ScreenPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for ScreenPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(x={}, y={})", self.x, self.y)
    }
}

/// Errors raised by the input backend
#[derive(Debug, Error)]
pub enum ClickError {
    #[error("input backend unavailable: {0}")]
    Unavailable(String),
    #[error("click at {point} failed: {reason}")]
    Failed { point: ScreenPoint, reason: String },
}

/// Click primitive consumed by the worker routines
pub trait PointerClicker: Send + Sync {
    fn click(&self, point: ScreenPoint) -> Result<(), ClickError>;
}

/// Clicker backed by enigo
///
/// A connection is opened per click; enigo handles are not shareable across
/// threads on every platform and clicks are infrequent.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnigoClicker;

impl EnigoClicker {
    pub fn new() -> Self {
        Self
    }
}

impl PointerClicker for EnigoClicker {
    fn click(&self, point: ScreenPoint) -> Result<(), ClickError> {
        let mut enigo =
            Enigo::new(&Settings::default()).map_err(|e| ClickError::Unavailable(e.to_string()))?;

        let failed = |e: enigo::InputError| ClickError::Failed {
            point,
            reason: e.to_string(),
        };
        enigo.move_mouse(point.x, point.y, Coordinate::Abs).map_err(&failed)?;
        enigo.button(Button::Left, Direction::Click).map_err(&failed)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_display() {
        assert_eq!(ScreenPoint::new(100, 200).to_string(), "(x=100, y=200)");
    }

    #[test]
    fn test_click_error_message_names_point() {
        let err = ClickError::Failed {
            point: ScreenPoint::new(5, 6),
            reason: "denied".into(),
        };
        assert_eq!(err.to_string(), "click at (x=5, y=6) failed: denied");
    }
}
