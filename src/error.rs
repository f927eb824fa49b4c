use std::time::Duration;
use thiserror::Error;

// Main Application Error Type

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Failed to acquire a drawing surface: {0}")]
    DrawingSurface(String),
    #[error("Region {region} at ({x}, {y}) {width}x{height} lies outside the {frame_width}x{frame_height} frame")]
    RegionOutOfBounds {
        region: &'static str,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        frame_width: u32,
        frame_height: u32,
    },
    #[error("Invalid {0} box: width and height must be greater than zero")]
    InvalidBox(&'static str),
    #[error("The recording has no video track")]
    NoVideoTrack,
    #[error("Frame source error: {0}")]
    FrameSource(String),
    #[error("Failed to initialize OCR worker {0}: {1}")]
    OcrInit(usize, String),
    #[error("OCR error: {0}")]
    Ocr(String),
    #[error("OCR job exceeded its {0:?} deadline")]
    OcrTimeout(Duration),
    #[error("The OCR worker pool is closed")]
    PoolClosed,
    #[error("The analyzer has already been started.")]
    AlreadyStarted,
    #[error("Missing analyzer input: {0}")]
    MissingInput(&'static str),
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Configuration Error: {0}")]
    Config(#[from] config::ConfigError),
}

impl AppError {
    /// Recovers an `AppError` from the boxed error a tower stack hands back.
    pub(crate) fn from_service_error(err: tower::BoxError) -> Self {
        match err.downcast::<AppError>() {
            Ok(app_error) => *app_error,
            Err(other) => AppError::Ocr(other.to_string()),
        }
    }

    /// Soft failures leave a frame in the report instead of aborting the run.
    pub fn is_soft(&self) -> bool {
        matches!(self, AppError::OcrTimeout(_))
    }
}
