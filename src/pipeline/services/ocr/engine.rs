use crate::error::AppError;
use async_trait::async_trait;
use image::RgbaImage;

/// The text recognition backend the worker pool drives.
///
/// Creating a worker is expected to be slow (model loading), so the pool
/// creates them once per analysis run and reuses them for every job.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    async fn create_worker(&self, worker_id: usize) -> Result<Box<dyn OcrWorker>, AppError>;

    /// Releases engine-wide resources once every worker has terminated.
    async fn terminate(&self) -> Result<(), AppError>;
}

/// A single recognition worker. Jobs are handed to it one at a time.
///
/// Implementations doing CPU-heavy recognition should move that work off the
/// async executor (e.g. `tokio::task::spawn_blocking`).
#[async_trait]
pub trait OcrWorker: Send {
    async fn recognize(&mut self, image: &RgbaImage) -> Result<String, AppError>;

    async fn terminate(self: Box<Self>) -> Result<(), AppError>;
}
