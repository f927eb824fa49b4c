pub mod common;
pub mod config;
pub mod error;
pub mod pipeline;

pub use crate::common::{BoundBox, ClockRegion, ParsedTime, RawFrame};
pub use crate::config::{AnchorPolicy, BoxPolicy, Configuration};
pub use crate::error::AppError;
pub use crate::pipeline::{Analyzer, AnalyzerBuilder, AnalyzerState, LatencyReport};

use tracing::Level;

/// Installs the global `fmt` subscriber. Repeated calls are ignored.
pub fn init_logging(level: Level) {
    if tracing_subscriber::fmt().with_max_level(level).try_init().is_err() {
        tracing::debug!("Logging already initialized");
    }
}

/// Installs the global subscriber at the configuration's `log_level`.
pub fn init_logging_from(configuration: &Configuration) {
    init_logging(configuration.max_log_level());
}
