use std::sync::atomic::{AtomicU32, AtomicU8, Ordering};

/// Per-phase completion fractions, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProgressSnapshot {
    pub initializing: f32,
    pub cropping: f32,
    pub ocr: f32,
}

/// Progress shared between a running analysis and its observers.
///
/// Fractions are stored as `f32` bits. Non-negative floats order the same
/// way as their bit patterns, so `fetch_max` keeps each value monotonic
/// without a lock.
#[derive(Debug, Default)]
pub struct Progress {
    initializing: AtomicU32,
    cropping: AtomicU32,
    ocr: AtomicU32,
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_initializing(&self, fraction: f32) {
        Self::advance(&self.initializing, fraction);
    }

    pub fn set_cropping(&self, fraction: f32) {
        Self::advance(&self.cropping, fraction);
    }

    pub fn set_ocr(&self, fraction: f32) {
        Self::advance(&self.ocr, fraction);
    }

    pub fn complete(&self) {
        self.set_initializing(1.0);
        self.set_cropping(1.0);
        self.set_ocr(1.0);
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            initializing: f32::from_bits(self.initializing.load(Ordering::Relaxed)),
            cropping: f32::from_bits(self.cropping.load(Ordering::Relaxed)),
            ocr: f32::from_bits(self.ocr.load(Ordering::Relaxed)),
        }
    }

    /// `done / total`, or complete when there is nothing to do.
    pub fn fraction(done: u64, total: u64) -> f32 {
        if total == 0 {
            1.0
        } else {
            (done as f64 / total as f64).min(1.0) as f32
        }
    }

    fn advance(slot: &AtomicU32, fraction: f32) {
        let clamped = if fraction.is_nan() || fraction <= 0.0 { 0.0 } else { fraction.min(1.0) };
        slot.fetch_max(clamped.to_bits(), Ordering::Relaxed);
    }
}

/// Lifecycle of an [`Analyzer`](super::Analyzer). Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AnalyzerState {
    Initial = 1,
    Running = 2,
    Finished = 3,
}

#[derive(Debug)]
pub(crate) struct AtomicAnalyzerState(AtomicU8);

impl AtomicAnalyzerState {
    pub(crate) fn new() -> Self {
        Self(AtomicU8::new(AnalyzerState::Initial as u8))
    }

    pub(crate) fn load(&self) -> AnalyzerState {
        match self.0.load(Ordering::Acquire) {
            1 => AnalyzerState::Initial,
            2 => AnalyzerState::Running,
            _ => AnalyzerState::Finished,
        }
    }

    /// Moves `from -> to`, failing if the current state is not `from`.
    pub(crate) fn transition(&self, from: AnalyzerState, to: AnalyzerState) -> bool {
        self.0
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}
