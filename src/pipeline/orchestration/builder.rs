use crate::common::{BoundBox, ClockRegion};
use crate::config::{AnchorPolicy, BoxPolicy, Configuration};
use crate::error::AppError;
use crate::pipeline::orchestration::analyzer::Analyzer;
use crate::pipeline::services::ocr::OcrEngine;
use crate::pipeline::source::FrameSource;
use std::sync::Arc;
use std::time::Duration;

/// Collects the inputs of an analysis run.
///
/// The recording, the OCR engine and both region boxes are required.
pub struct AnalyzerBuilder {
    configuration: Configuration,
    source: Option<Arc<dyn FrameSource>>,
    engine: Option<Arc<dyn OcrEngine>>,
    capture_box: Option<BoundBox>,
    viewer_box: Option<BoundBox>,
}

impl AnalyzerBuilder {
    pub fn new(configuration: Configuration) -> Self {
        Self {
            configuration,
            source: None,
            engine: None,
            capture_box: None,
            viewer_box: None,
        }
    }

    pub fn frame_source(mut self, source: Arc<dyn FrameSource>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn ocr_engine(mut self, engine: Arc<dyn OcrEngine>) -> Self {
        self.engine = Some(engine);
        self
    }

    /// The region showing the capture-side clock.
    pub fn capture_box(mut self, bound_box: BoundBox) -> Self {
        self.capture_box = Some(bound_box);
        self
    }

    /// The region showing the viewer-side clock.
    pub fn viewer_box(mut self, bound_box: BoundBox) -> Self {
        self.viewer_box = Some(bound_box);
        self
    }

    /// Overrides the configured worker count.
    pub fn worker_count(mut self, worker_count: usize) -> Self {
        self.configuration.worker_count = worker_count;
        self
    }

    /// Overrides the configured per-job OCR deadline.
    pub fn ocr_timeout(mut self, timeout: Duration) -> Self {
        self.configuration.ocr_timeout_ms = Some(timeout.as_millis() as u64);
        self
    }

    pub fn box_policy(mut self, policy: BoxPolicy) -> Self {
        self.configuration.box_policy = policy;
        self
    }

    pub fn anchor_policy(mut self, policy: AnchorPolicy) -> Self {
        self.configuration.anchor_policy = policy;
        self
    }

    pub fn build(self) -> Result<Analyzer, AppError> {
        let source = self.source.ok_or(AppError::MissingInput("screen recording"))?;
        let engine = self.engine.ok_or(AppError::MissingInput("OCR engine"))?;
        let capture_box = self.capture_box.ok_or(AppError::MissingInput("capture box"))?;
        let viewer_box = self.viewer_box.ok_or(AppError::MissingInput("viewer box"))?;

        capture_box.validate(ClockRegion::Capture)?;
        viewer_box.validate(ClockRegion::Viewer)?;
        self.configuration.validate()?;

        Ok(Analyzer::new(
            source,
            engine,
            capture_box,
            viewer_box,
            self.configuration,
        ))
    }
}
