pub mod aggregator;
pub mod interpolator;
pub mod ocr;
pub mod region_extractor;
pub mod timestamp_parser;

pub use aggregator::LatencySummary;
pub use interpolator::MillisecondInterpolator;
pub use ocr::{OcrEngine, OcrWorker, OcrWorkerPool};
pub use region_extractor::RegionExtractor;
pub use timestamp_parser::TimestampParser;
