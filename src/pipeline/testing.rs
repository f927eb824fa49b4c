//! Test doubles for the frame source and OCR engine seams.

use crate::common::{BoundBox, RawFrame};
use crate::error::AppError;
use crate::pipeline::services::ocr::{OcrEngine, OcrWorker};
use crate::pipeline::source::{FrameSource, FrameStream};
use async_trait::async_trait;
use image::{Rgba, RgbaImage};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub const TILE: u32 = 4;
pub const CAPTURE_BOX: BoundBox = BoundBox { x: 0, y: 0, width: TILE, height: TILE };
pub const VIEWER_BOX: BoundBox = BoundBox { x: 8, y: 0, width: TILE, height: TILE };

pub const CAPTURE_SIDE: u8 = 0;
pub const VIEWER_SIDE: u8 = 1;

/// A 16x4 frame whose two clock regions are solid tiles identifying
/// `(index, side)`, so the scripted engine can tell which crop it was given.
pub fn clock_frame(index: u8, offset: f64) -> RawFrame {
    let mut image = RgbaImage::from_pixel(16, TILE, Rgba([0, 0, 0, 255]));
    for (bound_box, side) in [(CAPTURE_BOX, CAPTURE_SIDE), (VIEWER_BOX, VIEWER_SIDE)] {
        for y in 0..bound_box.height {
            for x in 0..bound_box.width {
                image.put_pixel(bound_box.x + x, bound_box.y + y, Rgba([index, side, 0, 255]));
            }
        }
    }
    RawFrame::new(image, offset)
}

#[derive(Default)]
struct EngineState {
    scripts: HashMap<(u8, u8), (String, Duration)>,
    fail_recognition: Option<(u8, u8)>,
    workers_created: AtomicUsize,
    workers_terminated: AtomicUsize,
    engine_terminations: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

/// Answers each tile with scripted text after a scripted delay.
#[derive(Default)]
pub struct ScriptedOcrEngine {
    state: Arc<EngineState>,
    fail_worker_at: Option<usize>,
}

impl ScriptedOcrEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tile(index: u8, side: u8) -> RgbaImage {
        RgbaImage::from_pixel(TILE, TILE, Rgba([index, side, 0, 255]))
    }

    pub fn with_text(self, index: u8, side: u8, text: &str) -> Self {
        self.with_text_delayed(index, side, text, Duration::ZERO)
    }

    pub fn with_text_delayed(mut self, index: u8, side: u8, text: &str, delay: Duration) -> Self {
        self.state_mut()
            .scripts
            .insert((index, side), (text.to_string(), delay));
        self
    }

    pub fn fail_recognition_of(mut self, index: u8, side: u8) -> Self {
        self.state_mut().fail_recognition = Some((index, side));
        self
    }

    pub fn fail_worker_creation_at(mut self, worker_id: usize) -> Self {
        self.fail_worker_at = Some(worker_id);
        self
    }

    pub fn workers_created(&self) -> usize {
        self.state.workers_created.load(Ordering::SeqCst)
    }

    pub fn workers_terminated(&self) -> usize {
        self.state.workers_terminated.load(Ordering::SeqCst)
    }

    pub fn engine_terminations(&self) -> usize {
        self.state.engine_terminations.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.state.max_in_flight.load(Ordering::SeqCst)
    }

    fn state_mut(&mut self) -> &mut EngineState {
        Arc::get_mut(&mut self.state).expect("scripts are set before the engine is shared")
    }
}

#[async_trait]
impl OcrEngine for ScriptedOcrEngine {
    async fn create_worker(&self, worker_id: usize) -> Result<Box<dyn OcrWorker>, AppError> {
        if self.fail_worker_at == Some(worker_id) {
            return Err(AppError::Ocr("model failed to load".to_string()));
        }
        self.state.workers_created.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(ScriptedWorker {
            state: self.state.clone(),
        }))
    }

    async fn terminate(&self) -> Result<(), AppError> {
        self.state.engine_terminations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct ScriptedWorker {
    state: Arc<EngineState>,
}

#[async_trait]
impl OcrWorker for ScriptedWorker {
    async fn recognize(&mut self, image: &RgbaImage) -> Result<String, AppError> {
        let Rgba([index, side, _, _]) = *image.get_pixel(0, 0);
        if self.state.fail_recognition == Some((index, side)) {
            return Err(AppError::Ocr(format!("engine crashed on tile {}/{}", index, side)));
        }

        let in_flight = self.state.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.max_in_flight.fetch_max(in_flight, Ordering::SeqCst);

        let (text, delay) = self
            .state
            .scripts
            .get(&(index, side))
            .cloned()
            .unwrap_or_default();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        self.state.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(text)
    }

    async fn terminate(self: Box<Self>) -> Result<(), AppError> {
        self.state.workers_terminated.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Yields `frames` and then fails, like a decoder hitting a corrupt packet.
pub struct FailingFrameSource {
    frames: Vec<RawFrame>,
}

impl FailingFrameSource {
    pub fn after(frames: Vec<RawFrame>) -> Self {
        Self { frames }
    }
}

#[async_trait]
impl FrameSource for FailingFrameSource {
    async fn frame_count(&self) -> Result<u64, AppError> {
        Ok(self.frames.len() as u64 + 1)
    }

    async fn frames(&self) -> Result<Box<dyn FrameStream>, AppError> {
        Ok(Box::new(FailingFrameStream {
            remaining: self.frames.clone().into_iter(),
        }))
    }
}

struct FailingFrameStream {
    remaining: std::vec::IntoIter<RawFrame>,
}

#[async_trait]
impl FrameStream for FailingFrameStream {
    async fn next_frame(&mut self) -> Result<Option<RawFrame>, AppError> {
        match self.remaining.next() {
            Some(frame) => Ok(Some(frame)),
            None => Err(AppError::FrameSource("corrupt packet".to_string())),
        }
    }
}

/// A container without a video track.
pub struct TracklessSource;

#[async_trait]
impl FrameSource for TracklessSource {
    async fn frame_count(&self) -> Result<u64, AppError> {
        Err(AppError::NoVideoTrack)
    }

    async fn frames(&self) -> Result<Box<dyn FrameStream>, AppError> {
        Err(AppError::NoVideoTrack)
    }
}
