pub mod orchestration;
pub mod services;
pub mod source;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use orchestration::{Analyzer, AnalyzerBuilder, AnalyzerState, ProgressSnapshot};
pub use source::{FrameSource, FrameStream, VecFrameSource};
pub use types::{Frame, LatencyReport};
