//! Selection Overlay
//!
//! Modal fullscreen input capture used to record the hunger region and the
//! feed and chop trigger points.

pub mod selection;

pub use selection::{SelectionOverlay, SelectionResult, SelectionTarget};
