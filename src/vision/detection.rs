//! Hunger bar fill detection
//!
//! Classifies sampled pixels of a captured region as "filled bar" or
//! "background" with a color heuristic and reports the filled fraction.
//! Orange/red bar pixels are bright with red dominating green and blue;
//! the empty part of the bar is dark.

use thiserror::Error;
use tracing::debug;

use crate::capture::{CaptureError, CapturedFrame, ScreenCapturer, ScreenRegion};
use crate::config::DetectionConfig;

/// Why a hunger reading could not be taken
#[derive(Debug, Error)]
pub enum DetectionError {
    #[error("no hunger region set")]
    MissingRegion,
    #[error("hunger region {0} has a non-positive size")]
    InvalidRegion(ScreenRegion),
    #[error(transparent)]
    Capture(#[from] CaptureError),
}

/// Whether a pixel belongs to the filled part of the bar
pub fn classify_pixel(config: &DetectionConfig, r: u8, g: u8, b: u8) -> bool {
    let (r, g, b) = (r as f32, g as f32, b as f32);

    let brightness = (r + g + b) / 3.0;
    if brightness < config.brightness_floor {
        return false;
    }

    r > g * config.green_ratio && r > b * config.red_dominance
}

/// Fraction of sampled pixels classified as filled, in [0.0, 1.0]
///
/// Every `sample_stride`-th pixel is visited along both axes. An empty
/// frame yields 0.0.
pub fn fill_fraction(frame: &CapturedFrame, config: &DetectionConfig) -> f32 {
    let stride = config.sample_stride.max(1) as usize;
    let (width, height) = frame.dimensions();

    let mut filled = 0u32;
    let mut total = 0u32;
    for y in (0..height).step_by(stride) {
        for x in (0..width).step_by(stride) {
            let [r, g, b] = frame.rgb_at(x, y);
            if classify_pixel(config, r, g, b) {
                filled += 1;
            }
            total += 1;
        }
    }

    if total == 0 {
        return 0.0;
    }
    (filled as f32 / total as f32).clamp(0.0, 1.0)
}

/// Capture `region` and measure its fill, reporting failures
pub fn try_read_hunger_fraction(
    capturer: &dyn ScreenCapturer,
    region: Option<&ScreenRegion>,
    config: &DetectionConfig,
) -> Result<f32, DetectionError> {
    let region = region.ok_or(DetectionError::MissingRegion)?;
    if !region.is_valid() {
        return Err(DetectionError::InvalidRegion(*region));
    }

    let frame = capturer.capture(region)?;
    let fraction = fill_fraction(&frame, config);
    debug!("Hunger region {} reads {:.3}", region, fraction);
    Ok(fraction)
}

/// Fail-soft reading: 0.0 whenever the region is unusable or capture fails
///
/// A 0.0 from here is ambiguous; use [`try_read_hunger_fraction`] when a
/// capture failure must not look like an empty bar.
pub fn read_hunger_fraction(
    capturer: &dyn ScreenCapturer,
    region: Option<&ScreenRegion>,
    config: &DetectionConfig,
) -> f32 {
    try_read_hunger_fraction(capturer, region, config).unwrap_or_else(|e| {
        debug!("Hunger reading failed, reporting empty bar: {}", e);
        0.0
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const BAR: [u8; 3] = [220, 120, 30];
    const BACKGROUND: [u8; 3] = [12, 12, 12];

    /// Serves a fixed frame and counts calls
    struct StaticCapturer {
        frame: Option<CapturedFrame>,
        calls: AtomicUsize,
    }

    impl StaticCapturer {
        fn new(frame: Option<CapturedFrame>) -> Self {
            Self { frame, calls: AtomicUsize::new(0) }
        }
    }

    impl ScreenCapturer for StaticCapturer {
        fn capture(&self, region: &ScreenRegion) -> Result<CapturedFrame, CaptureError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.frame.clone().ok_or(CaptureError::OutOfBounds(*region))
        }
    }

    /// Bar filled from the left for `filled_columns` columns
    fn bar_frame(width: u32, height: u32, filled_columns: u32) -> CapturedFrame {
        let mut data = Vec::with_capacity((width * height * 4) as usize);
        for _y in 0..height {
            for x in 0..width {
                let [r, g, b] = if x < filled_columns { BAR } else { BACKGROUND };
                data.extend_from_slice(&[r, g, b, 255]);
            }
        }
        CapturedFrame::from_rgba(data, width, height).unwrap()
    }

    fn region() -> ScreenRegion {
        ScreenRegion::new(10, 10, 40, 6)
    }

    #[test]
    fn test_dark_pixels_never_filled() {
        let config = DetectionConfig::default();
        // Strongly red but mean brightness below 40
        assert!(!classify_pixel(&config, 100, 5, 5));
        assert!(!classify_pixel(&config, 10, 10, 10));
        assert!(!classify_pixel(&config, 119, 0, 0));
    }

    #[test]
    fn test_color_ratio_examples() {
        let config = DetectionConfig::default();
        assert!(classify_pixel(&config, 200, 50, 10));
        assert!(classify_pixel(&config, 200, 190, 10));
        assert!(!classify_pixel(&config, 50, 50, 50));
        assert!(!classify_pixel(&config, 60, 200, 60));
        assert!(!classify_pixel(&config, 120, 40, 200));
    }

    #[test]
    fn test_brightness_floor_is_inclusive() {
        let config = DetectionConfig::default();
        // Mean exactly 40 passes the floor; ratios decide
        assert!(classify_pixel(&config, 120, 0, 0));
    }

    #[test]
    fn test_fill_fraction_extremes() {
        let config = DetectionConfig::default();
        assert_eq!(fill_fraction(&bar_frame(20, 4, 20), &config), 1.0);
        assert_eq!(fill_fraction(&bar_frame(20, 4, 0), &config), 0.0);
    }

    #[test]
    fn test_fill_fraction_samples_with_stride() {
        let config = DetectionConfig::default();
        // Stride 2 visits columns 0,2,..,18; columns 0..10 filled -> 5 of 10
        let fraction = fill_fraction(&bar_frame(20, 4, 10), &config);
        assert!((fraction - 0.5).abs() < 1e-6);

        // Columns 0 and 1 filled; sampling only sees column 0
        let fraction = fill_fraction(&bar_frame(20, 4, 2), &config);
        assert!((fraction - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_fill_fraction_is_deterministic() {
        let config = DetectionConfig::default();
        let frame = bar_frame(33, 7, 13);
        assert_eq!(fill_fraction(&frame, &config), fill_fraction(&frame, &config));
    }

    #[test]
    fn test_read_full_and_empty_regions() {
        let config = DetectionConfig::default();
        let full = StaticCapturer::new(Some(bar_frame(40, 6, 40)));
        let empty = StaticCapturer::new(Some(bar_frame(40, 6, 0)));

        assert_eq!(read_hunger_fraction(&full, Some(&region()), &config), 1.0);
        assert_eq!(read_hunger_fraction(&empty, Some(&region()), &config), 0.0);
    }

    #[test]
    fn test_unusable_region_skips_capture() {
        let config = DetectionConfig::default();
        let capturer = StaticCapturer::new(Some(bar_frame(4, 4, 4)));

        assert_eq!(read_hunger_fraction(&capturer, None, &config), 0.0);
        assert_eq!(
            read_hunger_fraction(&capturer, Some(&ScreenRegion::new(0, 0, 0, 5)), &config),
            0.0
        );
        assert_eq!(
            read_hunger_fraction(&capturer, Some(&ScreenRegion::new(0, 0, 5, -2)), &config),
            0.0
        );
        assert_eq!(capturer.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_capture_failure_is_soft_but_distinguishable() {
        let config = DetectionConfig::default();
        let failing = StaticCapturer::new(None);

        assert_eq!(read_hunger_fraction(&failing, Some(&region()), &config), 0.0);
        assert!(matches!(
            try_read_hunger_fraction(&failing, Some(&region()), &config),
            Err(DetectionError::Capture(CaptureError::OutOfBounds(_)))
        ));
        assert!(matches!(
            try_read_hunger_fraction(&failing, None, &config),
            Err(DetectionError::MissingRegion)
        ));
    }
}
