pub mod analyzer;
pub mod builder;
pub mod phase_timings;
pub mod progress;

pub use analyzer::Analyzer;
pub use builder::AnalyzerBuilder;
pub use phase_timings::{AnalysisPhase, PhaseTimings};
pub use progress::{AnalyzerState, Progress, ProgressSnapshot};
