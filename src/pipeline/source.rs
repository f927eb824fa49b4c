use crate::common::RawFrame;
use crate::error::AppError;
use async_trait::async_trait;
use std::collections::VecDeque;

/// A decoded screen recording.
///
/// Each call to [`FrameSource::frames`] starts a fresh forward-only pass.
/// Closing the underlying decoder when a stream is exhausted or dropped is
/// the source's own responsibility.
#[async_trait]
pub trait FrameSource: Send + Sync {
    /// Best-effort total frame count, used as a progress denominator.
    async fn frame_count(&self) -> Result<u64, AppError>;

    async fn frames(&self) -> Result<Box<dyn FrameStream>, AppError>;

    /// The first decodable frame, used to draw the region boxes on.
    async fn first_frame(&self) -> Result<RawFrame, AppError> {
        let mut stream = self.frames().await?;
        stream
            .next_frame()
            .await?
            .ok_or_else(|| AppError::FrameSource("no video frames".to_string()))
    }
}

/// Pull-based iteration over decoded frames in presentation order.
#[async_trait]
pub trait FrameStream: Send {
    /// Decodes the next frame, or `None` once the recording is exhausted.
    async fn next_frame(&mut self) -> Result<Option<RawFrame>, AppError>;
}

/// A recording that is already decoded into memory.
#[derive(Debug, Clone, Default)]
pub struct VecFrameSource {
    frames: Vec<RawFrame>,
}

impl VecFrameSource {
    pub fn new(frames: Vec<RawFrame>) -> Self {
        Self { frames }
    }
}

#[async_trait]
impl FrameSource for VecFrameSource {
    async fn frame_count(&self) -> Result<u64, AppError> {
        Ok(self.frames.len() as u64)
    }

    async fn frames(&self) -> Result<Box<dyn FrameStream>, AppError> {
        Ok(Box::new(VecFrameStream {
            remaining: self.frames.iter().cloned().collect(),
        }))
    }
}

struct VecFrameStream {
    remaining: VecDeque<RawFrame>,
}

#[async_trait]
impl FrameStream for VecFrameStream {
    async fn next_frame(&mut self) -> Result<Option<RawFrame>, AppError> {
        Ok(self.remaining.pop_front())
    }
}
