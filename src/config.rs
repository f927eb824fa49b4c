use crate::error::AppError;
use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::Level;

const ENV_PREFIX: &str = "G2G";

/// How a region box that extends past the frame edge is cropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoxPolicy {
    /// Keep the box size, fill the uncovered area with transparent pixels.
    Pad,
    /// Refuse to crop outside the frame.
    Strict,
}

/// Where sub-second interpolation takes its first reference point from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorPolicy {
    /// Only an observed change of second anchors the baseline.
    SecondBoundary,
    /// The first readable frame also anchors the baseline, though it is
    /// itself still discarded.
    FirstObservation,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub worker_count: usize,
    pub ocr_timeout_ms: Option<u64>,
    pub trim_fraction: f64,
    pub box_policy: BoxPolicy,
    pub anchor_policy: AnchorPolicy,
    pub log_level: String,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            worker_count: 4,
            ocr_timeout_ms: None,
            trim_fraction: 0.05,
            box_policy: BoxPolicy::Pad,
            anchor_policy: AnchorPolicy::SecondBoundary,
            log_level: "info".to_string(),
        }
    }
}

impl Configuration {
    /// Loads defaults, then the optional TOML file, then `G2G_*` environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(false));
        }
        Self::finish(builder)
    }

    pub fn from_toml(contents: &str) -> Result<Self, AppError> {
        Self::finish(Config::builder().add_source(File::from_str(contents, FileFormat::Toml)))
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Self, AppError> {
        let configuration: Configuration = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;
        configuration.validate()?;
        Ok(configuration)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.worker_count == 0 {
            return Err(AppError::InvalidConfiguration(
                "worker_count must be at least 1".to_string(),
            ));
        }
        if !(0.0..0.5).contains(&self.trim_fraction) {
            return Err(AppError::InvalidConfiguration(format!(
                "trim_fraction {} is outside [0, 0.5)",
                self.trim_fraction
            )));
        }
        Ok(())
    }

    pub fn ocr_timeout(&self) -> Option<Duration> {
        self.ocr_timeout_ms.map(Duration::from_millis)
    }

    pub fn max_log_level(&self) -> Level {
        self.log_level.parse().unwrap_or(Level::INFO)
    }
}
