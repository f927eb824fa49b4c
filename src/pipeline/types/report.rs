use crate::common::ParsedTime;
use crate::error::AppError;
use crate::pipeline::orchestration::PhaseTimings;
use crate::pipeline::services::aggregator::{self, LatencySummary};
use crate::pipeline::types::ProcessedFrame;
use image::RgbaImage;
use std::sync::Arc;
use uuid::Uuid;

/// A finished, display-ready frame of the report.
#[derive(Debug, Clone)]
pub struct Frame {
    pub index: usize,
    pub screen_recording_offset_seconds: f64,
    pub capture_image: Arc<RgbaImage>,
    pub capture_ocr_text: String,
    pub capture_parsed: ParsedTime,
    pub viewer_image: Arc<RgbaImage>,
    pub viewer_ocr_text: String,
    pub viewer_parsed: ParsedTime,
}

impl Frame {
    /// Viewer time minus capture time, when both clocks were readable.
    pub fn latency_ms(&self) -> Option<i64> {
        aggregator::frame_latency_ms(&self.capture_parsed, &self.viewer_parsed)
    }
}

impl From<ProcessedFrame> for Frame {
    fn from(frame: ProcessedFrame) -> Self {
        Self {
            index: frame.index,
            screen_recording_offset_seconds: frame.timestamp,
            capture_image: frame.capture_image,
            capture_ocr_text: frame.capture_ocr_text,
            capture_parsed: frame.capture_parsed,
            viewer_image: frame.viewer_image,
            viewer_ocr_text: frame.viewer_ocr_text,
            viewer_parsed: frame.viewer_parsed,
        }
    }
}

/// Terminal output of one analysis run.
///
/// Either `error` is `None` and every field was computed, or `error` is set
/// and nothing in `frames` should be trusted.
#[derive(Debug)]
pub struct LatencyReport {
    pub run_id: Uuid,
    pub frames: Vec<Frame>,
    pub summary: Option<LatencySummary>,
    pub phase_timings: PhaseTimings,
    pub error: Option<AppError>,
}

impl LatencyReport {
    pub fn completed(
        run_id: Uuid,
        frames: Vec<Frame>,
        trim_fraction: f64,
        phase_timings: PhaseTimings,
    ) -> Self {
        let summary = aggregator::summarize(&frames, trim_fraction);
        Self {
            run_id,
            frames,
            summary,
            phase_timings,
            error: None,
        }
    }

    pub fn failed(run_id: Uuid, error: AppError) -> Self {
        Self {
            run_id,
            frames: Vec::new(),
            summary: None,
            phase_timings: PhaseTimings::default(),
            error: Some(error),
        }
    }

    pub fn from_result(run_id: Uuid, result: Result<LatencyReport, AppError>) -> Self {
        result.unwrap_or_else(|error| Self::failed(run_id, error))
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn average_latency_ms(&self) -> Option<f64> {
        self.summary.as_ref().map(|summary| summary.average_ms)
    }

    /// One line per frame in the layout of the report table.
    pub fn rows(&self) -> Vec<String> {
        self.frames
            .iter()
            .map(|frame| {
                let latency = frame
                    .latency_ms()
                    .map(|ms| ms.to_string())
                    .unwrap_or_else(|| "N/A".to_string());
                format!(
                    "{}\t{:.3}\t{}\t{}\t{}\t{}\t{}",
                    frame.index + 1,
                    frame.screen_recording_offset_seconds,
                    frame.capture_ocr_text,
                    frame.capture_parsed,
                    frame.viewer_ocr_text,
                    frame.viewer_parsed,
                    latency
                )
            })
            .collect()
    }
}
