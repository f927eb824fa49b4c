use image::{DynamicImage, RgbaImage};
use std::sync::Arc;

/// A decoded frame of the screen recording together with its playback offset.
#[derive(Clone, Debug)]
pub struct RawFrame {
    image: Arc<RgbaImage>,
    timestamp: f64,
}

impl RawFrame {
    pub fn new(image: RgbaImage, timestamp: f64) -> Self {
        Self {
            image: Arc::new(image),
            timestamp,
        }
    }

    pub fn from_dynamic(image: DynamicImage, timestamp: f64) -> Self {
        Self::new(image.to_rgba8(), timestamp)
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Seconds since the start of the recording.
    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}
