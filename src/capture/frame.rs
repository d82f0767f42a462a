//! Frame data structures for captured screen content

use image::RgbaImage;
use std::time::Instant;

/// A captured region of the screen
#[derive(Debug, Clone)]
pub struct CapturedFrame {
    /// RGBA pixel grid
    image: RgbaImage,
    /// Timestamp when frame was captured
    pub timestamp: Instant,
}

impl CapturedFrame {
    /// Wrap an already captured image
    pub fn new(image: RgbaImage) -> Self {
        Self {
            image,
            timestamp: Instant::now(),
        }
    }

    /// Build a frame from raw RGBA bytes, `None` if the buffer is too small
    pub fn from_rgba(data: Vec<u8>, width: u32, height: u32) -> Option<Self> {
        RgbaImage::from_raw(width, height, data).map(Self::new)
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Get frame dimensions as (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Red, green and blue channels of the pixel at (x, y); alpha is ignored
    pub fn rgb_at(&self, x: u32, y: u32) -> [u8; 3] {
        let [r, g, b, _] = self.image.get_pixel(x, y).0;
        [r, g, b]
    }

    /// Underlying image, used for previews
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }
}
