use crate::error::AppError;

/// Which of the two clocks a region belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClockRegion {
    Capture,
    Viewer,
}

impl ClockRegion {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClockRegion::Capture => "capture",
            ClockRegion::Viewer => "viewer",
        }
    }
}

/// A rectangle in source-frame pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundBox {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn validate(&self, region: ClockRegion) -> Result<(), AppError> {
        if self.width == 0 || self.height == 0 {
            return Err(AppError::InvalidBox(region.as_str()));
        }
        Ok(())
    }

    pub fn fits_within(&self, frame_width: u32, frame_height: u32) -> bool {
        u64::from(self.x) + u64::from(self.width) <= u64::from(frame_width)
            && u64::from(self.y) + u64::from(self.height) <= u64::from(frame_height)
    }

    /// The part of this box covered by a `frame_width` x `frame_height` frame,
    /// or `None` when they do not overlap.
    pub fn intersect(&self, frame_width: u32, frame_height: u32) -> Option<BoundBox> {
        if self.x >= frame_width || self.y >= frame_height {
            return None;
        }
        let width = self.width.min(frame_width - self.x);
        let height = self.height.min(frame_height - self.y);
        if width == 0 || height == 0 {
            return None;
        }
        Some(BoundBox::new(self.x, self.y, width, height))
    }
}
