//! Vision Layer
//!
//! Turns a captured screen region into a hunger bar fill fraction.

pub mod detection;

use std::sync::Arc;

use crate::capture::{ScreenCapturer, ScreenRegion};
use crate::config::DetectionConfig;

pub use detection::{
    classify_pixel, fill_fraction, read_hunger_fraction, try_read_hunger_fraction, DetectionError,
};

/// Source of hunger readings for the monitoring worker
pub trait HungerSensor: Send + Sync {
    /// Fill fraction of the bar in [0.0, 1.0]
    fn sample(&self, region: &ScreenRegion) -> Result<f32, DetectionError>;
}

/// Sensor that captures the screen and classifies pixels
pub struct PixelHungerSensor {
    capturer: Arc<dyn ScreenCapturer>,
    config: DetectionConfig,
}

impl PixelHungerSensor {
    pub fn new(capturer: Arc<dyn ScreenCapturer>, config: DetectionConfig) -> Self {
        Self { capturer, config }
    }
}

impl HungerSensor for PixelHungerSensor {
    fn sample(&self, region: &ScreenRegion) -> Result<f32, DetectionError> {
        try_read_hunger_fraction(self.capturer.as_ref(), Some(region), &self.config)
    }
}
