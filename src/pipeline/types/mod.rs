mod extraction_record;
mod processed_frame;
mod report;

pub use extraction_record::FrameExtractionRecord;
pub use processed_frame::{ClockField, ProcessedFrame, TimestampData};
pub use report::{Frame, LatencyReport};
