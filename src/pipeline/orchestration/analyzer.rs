use crate::common::{BoundBox, ClockRegion, ParsedTime};
use crate::config::Configuration;
use crate::error::AppError;
use crate::pipeline::orchestration::builder::AnalyzerBuilder;
use crate::pipeline::orchestration::phase_timings::{AnalysisPhase, PhaseTimings};
use crate::pipeline::orchestration::progress::{
    AnalyzerState, AtomicAnalyzerState, Progress, ProgressSnapshot,
};
use crate::pipeline::services::interpolator::MillisecondInterpolator;
use crate::pipeline::services::ocr::{OcrEngine, OcrWorkerPool};
use crate::pipeline::services::region_extractor::RegionExtractor;
use crate::pipeline::services::timestamp_parser::TimestampParser;
use crate::pipeline::source::FrameSource;
use crate::pipeline::types::{Frame, FrameExtractionRecord, LatencyReport, ProcessedFrame};
use futures::StreamExt;
use futures::stream::FuturesUnordered;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Runs one glass-to-glass latency analysis over a screen recording.
///
/// An analyzer is single-use: [`Analyzer::run`] moves it from `Initial` to
/// `Running`, and a second call fails with [`AppError::AlreadyStarted`]. It
/// reaches `Finished` only when every phase succeeded; a failed run stays in
/// `Running`.
pub struct Analyzer {
    id: Uuid,
    source: Arc<dyn FrameSource>,
    engine: Arc<dyn OcrEngine>,
    capture_box: BoundBox,
    viewer_box: BoundBox,
    configuration: Configuration,
    extractor: RegionExtractor,
    parser: TimestampParser,
    interpolator: MillisecondInterpolator,
    state: AtomicAnalyzerState,
    progress: Progress,
}

impl Analyzer {
    pub fn builder(configuration: Configuration) -> AnalyzerBuilder {
        AnalyzerBuilder::new(configuration)
    }

    pub(crate) fn new(
        source: Arc<dyn FrameSource>,
        engine: Arc<dyn OcrEngine>,
        capture_box: BoundBox,
        viewer_box: BoundBox,
        configuration: Configuration,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            source,
            engine,
            capture_box,
            viewer_box,
            extractor: RegionExtractor::new(configuration.box_policy),
            parser: TimestampParser::new(),
            interpolator: MillisecondInterpolator::new(configuration.anchor_policy),
            configuration,
            state: AtomicAnalyzerState::new(),
            progress: Progress::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> AnalyzerState {
        self.state.load()
    }

    /// Safe to call from any task while [`Analyzer::run`] is in progress.
    pub fn progress(&self) -> ProgressSnapshot {
        self.progress.snapshot()
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    /// Runs the analysis and folds any failure into the report.
    pub async fn report(&self) -> LatencyReport {
        LatencyReport::from_result(self.id, self.run().await)
    }

    #[instrument(skip(self), fields(run_id = %self.id))]
    pub async fn run(&self) -> Result<LatencyReport, AppError> {
        if !self
            .state
            .transition(AnalyzerState::Initial, AnalyzerState::Running)
        {
            return Err(AppError::AlreadyStarted);
        }
        info!("Starting latency analysis");

        let mut timings = PhaseTimings::new();
        timings.entry_phase(AnalysisPhase::Initializing);
        let pool = OcrWorkerPool::initialize(
            self.engine.clone(),
            self.configuration.worker_count,
            self.configuration.ocr_timeout(),
            |fraction| self.progress.set_initializing(fraction),
        )
        .await?;
        timings.exit_phase(AnalysisPhase::Initializing);

        let outcome = self.run_phases(&pool, &mut timings).await;
        let released = pool.shutdown().await;
        let frames = outcome?;
        released?;

        self.state
            .transition(AnalyzerState::Running, AnalyzerState::Finished);
        self.progress.complete();

        let report = LatencyReport::completed(
            self.id,
            frames,
            self.configuration.trim_fraction,
            timings,
        );
        match &report.summary {
            Some(summary) => info!(
                "Analysis finished: {} ({} of {} frames readable) in {:?}",
                summary,
                summary.valid_frames,
                summary.total_frames,
                report.phase_timings.total()
            ),
            None => info!(
                "Analysis finished without a readable frame pair ({} frames)",
                report.frames.len()
            ),
        }
        Ok(report)
    }

    async fn run_phases(
        &self,
        pool: &OcrWorkerPool,
        timings: &mut PhaseTimings,
    ) -> Result<Vec<Frame>, AppError> {
        timings.entry_phase(AnalysisPhase::Cropping);
        let records = self.crop_frames().await?;
        timings.exit_phase(AnalysisPhase::Cropping);

        timings.entry_phase(AnalysisPhase::Ocr);
        let mut processed = self.recognize_frames(pool, records).await?;
        timings.exit_phase(AnalysisPhase::Ocr);

        timings.entry_phase(AnalysisPhase::Interpolation);
        processed.sort_by_key(|frame| frame.index);
        debug_assert!(processed.iter().enumerate().all(|(i, f)| f.index == i));
        for region in [ClockRegion::Capture, ClockRegion::Viewer] {
            self.interpolator
                .interpolate(&mut processed, ProcessedFrame::parsed_field(region));
        }
        timings.exit_phase(AnalysisPhase::Interpolation);

        Ok(processed.into_iter().map(Frame::from).collect())
    }

    /// Decodes the recording once, cropping both clock regions of every frame.
    async fn crop_frames(&self) -> Result<Vec<FrameExtractionRecord>, AppError> {
        let frame_count = self.source.frame_count().await?;
        let mut stream = self.source.frames().await?;
        info!("Cropping clock regions from ~{} frames", frame_count);

        let mut records = Vec::new();
        while let Some(frame) = stream.next_frame().await? {
            let capture_image =
                self.extractor
                    .extract(frame.image(), &self.capture_box, ClockRegion::Capture)?;
            let viewer_image =
                self.extractor
                    .extract(frame.image(), &self.viewer_box, ClockRegion::Viewer)?;

            records.push(FrameExtractionRecord {
                capture_image: Arc::new(capture_image),
                viewer_image: Arc::new(viewer_image),
                index: records.len(),
                timestamp: frame.timestamp(),
            });
            self.progress
                .set_cropping(Progress::fraction(records.len() as u64, frame_count));
        }

        self.progress.set_cropping(1.0);
        debug!("Cropped {} frames", records.len());
        Ok(records)
    }

    /// Submits every crop to the pool at once and parses results as they
    /// arrive. Completion order is arbitrary; callers sort by index.
    async fn recognize_frames(
        &self,
        pool: &OcrWorkerPool,
        records: Vec<FrameExtractionRecord>,
    ) -> Result<Vec<ProcessedFrame>, AppError> {
        let total = records.len() as u64;
        if total == 0 {
            self.progress.set_ocr(1.0);
            return Ok(Vec::new());
        }

        let completed = AtomicU64::new(0);
        let completed = &completed;
        let mut pending: FuturesUnordered<_> = records
            .into_iter()
            .map(move |record| async move {
                let (capture, viewer) = futures::join!(
                    pool.submit(record.capture_image.clone()),
                    pool.submit(record.viewer_image.clone())
                );
                let capture_ocr_text = soften(capture, record.index, ClockRegion::Capture)?;
                let viewer_ocr_text = soften(viewer, record.index, ClockRegion::Viewer)?;

                let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                self.progress.set_ocr(Progress::fraction(done, total));

                Ok::<_, AppError>(ProcessedFrame {
                    index: record.index,
                    timestamp: record.timestamp,
                    capture_parsed: self.parse(&capture_ocr_text),
                    capture_image: record.capture_image,
                    capture_ocr_text,
                    viewer_parsed: self.parse(&viewer_ocr_text),
                    viewer_image: record.viewer_image,
                    viewer_ocr_text,
                })
            })
            .collect();

        let mut processed = Vec::with_capacity(total as usize);
        while let Some(frame) = pending.next().await {
            processed.push(frame?);
        }
        debug!("Recognized {} frames", processed.len());
        Ok(processed)
    }

    fn parse(&self, ocr_text: &str) -> ParsedTime {
        self.parser.parse(ocr_text)
    }
}

/// A timed-out job leaves the frame unreadable instead of failing the run.
fn soften(
    result: Result<String, AppError>,
    index: usize,
    region: ClockRegion,
) -> Result<String, AppError> {
    match result {
        Err(e) if e.is_soft() => {
            warn!("{} clock of frame {} not recognized: {}", region.as_str(), index, e);
            Ok(String::new())
        }
        other => other,
    }
}
