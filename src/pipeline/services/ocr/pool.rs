use crate::error::AppError;
use crate::pipeline::services::ocr::engine::{OcrEngine, OcrWorker};
use crate::pipeline::services::ocr::service::{OcrService, RecognitionJob};
use image::RgbaImage;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tower::ServiceExt;
use tracing::{debug, error, info, warn};

type JobQueue = Arc<Mutex<mpsc::Receiver<RecognitionJob>>>;

/// A fixed set of OCR workers sharing one job queue.
///
/// The optional job deadline starts when a worker takes the job, so time
/// spent waiting in the queue never counts against it.
///
/// Must be released with [`OcrWorkerPool::shutdown`]. A pool dropped without
/// shutting down aborts its worker tasks but cannot terminate the engine.
pub struct OcrWorkerPool {
    engine: Arc<dyn OcrEngine>,
    service: Option<OcrService>,
    workers: Vec<JoinHandle<Box<dyn OcrWorker>>>,
}

impl OcrWorkerPool {
    /// Creates `worker_count` workers one after another, reporting
    /// `(i + 1) / worker_count` to `on_progress` as each one becomes ready.
    pub async fn initialize<F>(
        engine: Arc<dyn OcrEngine>,
        worker_count: usize,
        job_timeout: Option<Duration>,
        on_progress: F,
    ) -> Result<Self, AppError>
    where
        F: Fn(f32),
    {
        let worker_count = worker_count.max(1);
        info!("Initializing OCR worker pool with {} workers", worker_count);

        let (jobs_tx, jobs_rx) = mpsc::channel(worker_count * 2);
        let queue: JobQueue = Arc::new(Mutex::new(jobs_rx));

        let mut pool = Self {
            engine: engine.clone(),
            service: Some(OcrService::new(jobs_tx)),
            workers: Vec::with_capacity(worker_count),
        };

        for worker_id in 0..worker_count {
            match engine.create_worker(worker_id).await {
                Ok(worker) => {
                    pool.workers.push(tokio::spawn(run_worker(
                        worker_id,
                        worker,
                        queue.clone(),
                        job_timeout,
                    )));
                    debug!("OCR worker {} ready", worker_id);
                    on_progress((worker_id + 1) as f32 / worker_count as f32);
                }
                Err(e) => {
                    error!("Failed to create OCR worker {}: {}", worker_id, e);
                    if let Err(shutdown_error) = pool.shutdown().await {
                        warn!("Pool teardown after failed init also failed: {}", shutdown_error);
                    }
                    return Err(match e {
                        AppError::OcrInit(..) => e,
                        other => AppError::OcrInit(worker_id, other.to_string()),
                    });
                }
            }
        }

        Ok(pool)
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Recognizes `image` on the next free worker and returns the trimmed text.
    pub async fn submit(&self, image: Arc<RgbaImage>) -> Result<String, AppError> {
        let service = self.service.clone().ok_or(AppError::PoolClosed)?;
        service
            .oneshot(image)
            .await
            .map_err(AppError::from_service_error)
    }

    /// Closes the queue, waits for every worker to drain, terminates each
    /// worker and finally the engine.
    pub async fn shutdown(mut self) -> Result<(), AppError> {
        info!("Shutting down OCR worker pool");
        self.service.take();

        let mut first_error = None;
        for handle in std::mem::take(&mut self.workers) {
            match handle.await {
                Ok(worker) => {
                    if let Err(e) = worker.terminate().await {
                        warn!("Failed to terminate OCR worker: {}", e);
                        first_error.get_or_insert(e);
                    }
                }
                Err(e) => {
                    error!("OCR worker task failed: {}", e);
                    first_error.get_or_insert(AppError::Ocr(e.to_string()));
                }
            }
        }

        if let Err(e) = self.engine.terminate().await {
            warn!("Failed to terminate OCR engine: {}", e);
            first_error.get_or_insert(e);
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Drop for OcrWorkerPool {
    fn drop(&mut self) {
        if !self.workers.is_empty() {
            warn!(
                "OCR worker pool dropped without shutdown, aborting {} workers",
                self.workers.len()
            );
            for handle in &self.workers {
                handle.abort();
            }
        }
    }
}

async fn run_worker(
    worker_id: usize,
    mut worker: Box<dyn OcrWorker>,
    queue: JobQueue,
    job_timeout: Option<Duration>,
) -> Box<dyn OcrWorker> {
    loop {
        let job = {
            let mut jobs = queue.lock().await;
            jobs.recv().await
        };
        let Some(job) = job else {
            break;
        };
        if job.responder.is_closed() {
            debug!("OCR worker {} skipping abandoned job", worker_id);
            continue;
        }

        let result = match job_timeout {
            Some(deadline) => tokio::time::timeout(deadline, worker.recognize(&job.image))
                .await
                .unwrap_or_else(|_| {
                    warn!("OCR worker {} gave up on a job after {:?}", worker_id, deadline);
                    Err(AppError::OcrTimeout(deadline))
                }),
            None => worker.recognize(&job.image).await,
        };
        if job.responder.send(result).is_err() {
            debug!("OCR worker {} finished a job nobody is waiting for", worker_id);
        }
    }
    debug!("OCR worker {} drained", worker_id);
    worker
}
