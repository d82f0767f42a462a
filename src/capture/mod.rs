//! Screen Capture Layer
//!
//! Grabs rectangular regions of the desktop as RGBA pixel grids. The
//! monitoring worker calls this every couple of seconds, so each call
//! captures, crops and drops its buffers without holding any state.

pub mod frame;

use image::imageops;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub use frame::CapturedFrame;

/// Screen rectangle in desktop pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenRegion {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl ScreenRegion {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Both dimensions strictly positive
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Parse "x,y,w,h" as accepted by `--probe`
    pub fn parse(text: &str) -> Option<Self> {
        let parts: Vec<i32> = text
            .split(',')
            .map(|p| p.trim().parse::<i32>())
            .collect::<Result<_, _>>()
            .ok()?;
        match parts.as_slice() {
            [x, y, w, h] => Some(Self::new(*x, *y, *w, *h)),
            _ => None,
        }
    }

    /// Whether this region lies entirely inside `outer`
    pub fn fits_within(&self, outer: &ScreenRegion) -> bool {
        // Far edges in i64 so regions near i32::MAX cannot overflow
        let right = |r: &ScreenRegion| i64::from(r.x) + i64::from(r.width);
        let bottom = |r: &ScreenRegion| i64::from(r.y) + i64::from(r.height);
        self.x >= outer.x
            && self.y >= outer.y
            && right(self) <= right(outer)
            && bottom(self) <= bottom(outer)
    }
}

impl std::fmt::Display for ScreenRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(x={}, y={}, w={}, h={})", self.x, self.y, self.width, self.height)
    }
}

/// Errors raised by the capture backend
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("region {0} has a non-positive size")]
    InvalidRegion(ScreenRegion),
    #[error("region {0} is not inside any monitor")]
    OutOfBounds(ScreenRegion),
    #[error("no monitors detected")]
    NoMonitor,
    #[error("capture backend failed: {0}")]
    Backend(String),
}

/// Capture primitive consumed by the detection engine
pub trait ScreenCapturer: Send + Sync {
    fn capture(&self, region: &ScreenRegion) -> Result<CapturedFrame, CaptureError>;
}

/// Description of a connected monitor
#[derive(Debug, Clone)]
pub struct MonitorInfo {
    pub index: usize,
    pub name: String,
    pub bounds: ScreenRegion,
    pub is_primary: bool,
}

/// Enumerate connected monitors
pub fn list_monitors() -> Result<Vec<MonitorInfo>, CaptureError> {
    let monitors = xcap::Monitor::all().map_err(|e| CaptureError::Backend(e.to_string()))?;
    Ok(monitors
        .iter()
        .enumerate()
        .map(|(index, m)| MonitorInfo {
            index,
            name: m.name().to_string(),
            bounds: monitor_bounds(m),
            is_primary: m.is_primary(),
        })
        .collect())
}

fn monitor_bounds(monitor: &xcap::Monitor) -> ScreenRegion {
    ScreenRegion::new(
        monitor.x(),
        monitor.y(),
        monitor.width() as i32,
        monitor.height() as i32,
    )
}

/// Capturer backed by xcap monitor screenshots
#[derive(Debug, Default, Clone, Copy)]
pub struct XcapCapturer;

impl XcapCapturer {
    pub fn new() -> Self {
        Self
    }
}

impl ScreenCapturer for XcapCapturer {
    fn capture(&self, region: &ScreenRegion) -> Result<CapturedFrame, CaptureError> {
        if !region.is_valid() {
            return Err(CaptureError::InvalidRegion(*region));
        }

        let monitors = xcap::Monitor::all().map_err(|e| CaptureError::Backend(e.to_string()))?;
        if monitors.is_empty() {
            return Err(CaptureError::NoMonitor);
        }

        let monitor = monitors
            .into_iter()
            .find(|m| region.fits_within(&monitor_bounds(m)))
            .ok_or(CaptureError::OutOfBounds(*region))?;
        let bounds = monitor_bounds(&monitor);

        let full = monitor
            .capture_image()
            .map_err(|e| CaptureError::Backend(e.to_string()))?;
        if full.width() == 0 || full.height() == 0 {
            return Err(CaptureError::Backend("monitor returned an empty image".into()));
        }

        // Monitor geometry may be reported in logical units while the image is physical
        let scale = full.width() as f64 / bounds.width.max(1) as f64;
        let (x, y, w, h) = crop_rect(region, &bounds, scale, full.dimensions());
        debug!("Capturing {} as {}x{} at ({}, {}) scale {:.2}", region, w, h, x, y, scale);

        let cropped = imageops::crop_imm(&full, x, y, w, h).to_image();
        Ok(CapturedFrame::new(cropped))
    }
}

/// Map a desktop region onto pixel coordinates of a monitor image, clamped to the image
fn crop_rect(
    region: &ScreenRegion,
    monitor: &ScreenRegion,
    scale: f64,
    image_size: (u32, u32),
) -> (u32, u32, u32, u32) {
    let x = (((region.x - monitor.x) as f64) * scale).round() as u32;
    let y = (((region.y - monitor.y) as f64) * scale).round() as u32;
    let x = x.min(image_size.0.saturating_sub(1));
    let y = y.min(image_size.1.saturating_sub(1));
    let w = ((region.width as f64 * scale).round() as u32).clamp(1, image_size.0 - x);
    let h = ((region.height as f64 * scale).round() as u32).clamp(1, image_size.1 - y);
    (x, y, w, h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_validity() {
        assert!(ScreenRegion::new(0, 0, 10, 4).is_valid());
        assert!(!ScreenRegion::new(0, 0, 0, 4).is_valid());
        assert!(!ScreenRegion::new(0, 0, 10, -1).is_valid());
    }

    #[test]
    fn test_parse_region() {
        assert_eq!(ScreenRegion::parse("10, 20,30,40"), Some(ScreenRegion::new(10, 20, 30, 40)));
        assert_eq!(ScreenRegion::parse("10,20,30"), None);
        assert_eq!(ScreenRegion::parse("a,b,c,d"), None);
    }

    #[test]
    fn test_fits_within() {
        let monitor = ScreenRegion::new(1920, 0, 1920, 1080);
        assert!(ScreenRegion::new(2000, 100, 200, 20).fits_within(&monitor));
        assert!(!ScreenRegion::new(1900, 100, 200, 20).fits_within(&monitor));
        assert!(!ScreenRegion::new(3800, 100, 200, 20).fits_within(&monitor));
    }

    #[test]
    fn test_fits_within_near_i32_max() {
        let monitor = ScreenRegion::new(0, 0, 1920, 1080);
        let far = ScreenRegion::new(2_147_483_000, 0, 1000, 10);
        assert!(!far.fits_within(&monitor));

        let edge = ScreenRegion::new(i32::MAX - 10, 0, 10, 10);
        assert!(edge.fits_within(&ScreenRegion::new(i32::MAX - 100, 0, 100, 10)));
    }

    #[test]
    fn test_crop_rect_offsets_into_secondary_monitor() {
        let monitor = ScreenRegion::new(1920, 0, 1920, 1080);
        let region = ScreenRegion::new(2000, 100, 200, 20);
        assert_eq!(crop_rect(&region, &monitor, 1.0, (1920, 1080)), (80, 100, 200, 20));
    }

    #[test]
    fn test_crop_rect_applies_hidpi_scale() {
        let monitor = ScreenRegion::new(0, 0, 1440, 900);
        let region = ScreenRegion::new(100, 50, 40, 10);
        assert_eq!(crop_rect(&region, &monitor, 2.0, (2880, 1800)), (200, 100, 80, 20));
    }
}
