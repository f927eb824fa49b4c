use crate::error::AppError;
use futures::Future;
use futures::task::{Context, Poll};
use image::RgbaImage;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tower::Service;

/// A queued recognition request and where to send its answer.
pub struct RecognitionJob {
    pub image: Arc<RgbaImage>,
    pub responder: oneshot::Sender<Result<String, AppError>>,
}

/// Submits images to the worker pool's shared job queue.
#[derive(Clone)]
pub struct OcrService {
    jobs: mpsc::Sender<RecognitionJob>,
}

impl OcrService {
    pub fn new(jobs: mpsc::Sender<RecognitionJob>) -> Self {
        Self { jobs }
    }
}

impl Service<Arc<RgbaImage>> for OcrService {
    type Response = String;
    type Error = Box<dyn std::error::Error + Send + Sync + 'static>;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, image: Arc<RgbaImage>) -> Self::Future {
        let jobs = self.jobs.clone();

        Box::pin(async move {
            let (responder, response) = oneshot::channel();
            jobs.send(RecognitionJob { image, responder })
                .await
                .map_err(|_| AppError::PoolClosed)?;
            let text = response.await.map_err(|_| AppError::PoolClosed)??;
            Ok(text.trim().to_string())
        })
    }
}
