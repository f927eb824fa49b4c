use image::RgbaImage;
use std::sync::Arc;

/// Both clock crops of one decoded frame, produced by the cropping phase.
#[derive(Debug, Clone)]
pub struct FrameExtractionRecord {
    pub capture_image: Arc<RgbaImage>,
    pub viewer_image: Arc<RgbaImage>,
    pub index: usize,
    pub timestamp: f64,
}
