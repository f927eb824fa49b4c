use indexmap::IndexMap;
use std::time::{Duration, Instant};

/// The phases of one analysis run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalysisPhase {
    Initializing,
    Cropping,
    Ocr,
    Interpolation,
}

impl AnalysisPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisPhase::Initializing => "Initializing",
            AnalysisPhase::Cropping => "Cropping",
            AnalysisPhase::Ocr => "Ocr",
            AnalysisPhase::Interpolation => "Interpolation",
        }
    }
}

/// Tracks wall-clock time spent in each phase of a run
#[derive(Debug, Clone, Default)]
pub struct PhaseTimings {
    /// Total duration per phase
    phase_durations: IndexMap<AnalysisPhase, Duration>,
    /// Current phase entry times (for ongoing tracking)
    current_phase_starts: IndexMap<AnalysisPhase, Instant>,
}

impl PhaseTimings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record entry into a phase
    pub fn entry_phase(&mut self, phase: AnalysisPhase) {
        self.current_phase_starts.insert(phase, Instant::now());
    }

    /// Record exit from a phase and accumulate its duration
    pub fn exit_phase(&mut self, phase: AnalysisPhase) {
        if let Some(started) = self.current_phase_starts.shift_remove(&phase) {
            *self.phase_durations.entry(phase).or_default() += started.elapsed();
        }
    }

    /// Get total duration for a phase
    pub fn get_phase_duration(&self, phase: &AnalysisPhase) -> Duration {
        self.phase_durations.get(phase).copied().unwrap_or_default()
    }

    /// Get all phase durations
    pub fn get_all_phase_durations(&self) -> &IndexMap<AnalysisPhase, Duration> {
        &self.phase_durations
    }

    pub fn total(&self) -> Duration {
        self.phase_durations.values().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_keep_execution_order() {
        let mut timings = PhaseTimings::new();
        for phase in [AnalysisPhase::Initializing, AnalysisPhase::Cropping, AnalysisPhase::Ocr] {
            timings.entry_phase(phase);
            timings.exit_phase(phase);
        }
        let order: Vec<_> = timings.get_all_phase_durations().keys().copied().collect();
        assert_eq!(
            order,
            vec![AnalysisPhase::Initializing, AnalysisPhase::Cropping, AnalysisPhase::Ocr]
        );
    }

    #[test]
    fn exit_without_entry_is_ignored() {
        let mut timings = PhaseTimings::new();
        timings.exit_phase(AnalysisPhase::Ocr);
        assert_eq!(timings.get_phase_duration(&AnalysisPhase::Ocr), Duration::ZERO);
        assert!(timings.get_all_phase_durations().is_empty());
    }

    #[test]
    fn repeated_phases_accumulate() {
        let mut timings = PhaseTimings::new();
        timings.entry_phase(AnalysisPhase::Cropping);
        std::thread::sleep(Duration::from_millis(2));
        timings.exit_phase(AnalysisPhase::Cropping);
        let first = timings.get_phase_duration(&AnalysisPhase::Cropping);
        timings.entry_phase(AnalysisPhase::Cropping);
        std::thread::sleep(Duration::from_millis(2));
        timings.exit_phase(AnalysisPhase::Cropping);
        assert!(timings.get_phase_duration(&AnalysisPhase::Cropping) > first);
        assert_eq!(timings.total(), timings.get_phase_duration(&AnalysisPhase::Cropping));
    }
}
