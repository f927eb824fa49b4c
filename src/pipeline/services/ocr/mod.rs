pub mod engine;
pub mod pool;
pub mod service;

pub use engine::{OcrEngine, OcrWorker};
pub use pool::OcrWorkerPool;
pub use service::{OcrService, RecognitionJob};
