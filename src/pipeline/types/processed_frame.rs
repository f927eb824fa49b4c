use crate::common::{ClockRegion, ParsedTime};
use image::RgbaImage;
use std::sync::Arc;

/// A record with a playback offset that the millisecond interpolator can walk.
pub trait TimestampData {
    /// Seconds since the start of the recording.
    fn timestamp(&self) -> f64;
}

/// Accessor for one clock field of a `TimestampData` record.
pub type ClockField<T> = fn(&mut T) -> &mut ParsedTime;

#[derive(Debug, Clone)]
pub struct ProcessedFrame {
    pub index: usize,
    pub timestamp: f64,
    pub capture_image: Arc<RgbaImage>,
    pub capture_ocr_text: String,
    pub capture_parsed: ParsedTime,
    pub viewer_image: Arc<RgbaImage>,
    pub viewer_ocr_text: String,
    pub viewer_parsed: ParsedTime,
}

impl ProcessedFrame {
    pub fn parsed(&self, region: ClockRegion) -> &ParsedTime {
        match region {
            ClockRegion::Capture => &self.capture_parsed,
            ClockRegion::Viewer => &self.viewer_parsed,
        }
    }

    pub fn parsed_field(region: ClockRegion) -> ClockField<ProcessedFrame> {
        match region {
            ClockRegion::Capture => capture_field,
            ClockRegion::Viewer => viewer_field,
        }
    }
}

fn capture_field(frame: &mut ProcessedFrame) -> &mut ParsedTime {
    &mut frame.capture_parsed
}

fn viewer_field(frame: &mut ProcessedFrame) -> &mut ParsedTime {
    &mut frame.viewer_parsed
}

impl TimestampData for ProcessedFrame {
    fn timestamp(&self) -> f64 {
        self.timestamp
    }
}
