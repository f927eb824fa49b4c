use crate::common::{BoundBox, ClockRegion};
use crate::config::BoxPolicy;
use crate::error::AppError;
use image::{RgbaImage, imageops};

/// Crops clock regions out of decoded frames.
#[derive(Debug, Clone, Copy)]
pub struct RegionExtractor {
    policy: BoxPolicy,
}

impl RegionExtractor {
    pub fn new(policy: BoxPolicy) -> Self {
        Self { policy }
    }

    /// Copies `bound_box` out of `frame` into a new `width` x `height` image.
    ///
    /// With `BoxPolicy::Pad` any part of the box outside the frame stays
    /// transparent. With `BoxPolicy::Strict` such a box is an error.
    pub fn extract(
        &self,
        frame: &RgbaImage,
        bound_box: &BoundBox,
        region: ClockRegion,
    ) -> Result<RgbaImage, AppError> {
        if bound_box.width == 0 || bound_box.height == 0 {
            return Err(AppError::DrawingSurface(format!(
                "cannot allocate a {}x{} surface for the {} region",
                bound_box.width,
                bound_box.height,
                region.as_str()
            )));
        }

        let (frame_width, frame_height) = frame.dimensions();
        if bound_box.fits_within(frame_width, frame_height) {
            return Ok(imageops::crop_imm(
                frame,
                bound_box.x,
                bound_box.y,
                bound_box.width,
                bound_box.height,
            )
            .to_image());
        }

        if self.policy == BoxPolicy::Strict {
            return Err(AppError::RegionOutOfBounds {
                region: region.as_str(),
                x: bound_box.x,
                y: bound_box.y,
                width: bound_box.width,
                height: bound_box.height,
                frame_width,
                frame_height,
            });
        }

        let mut surface = RgbaImage::new(bound_box.width, bound_box.height);
        if let Some(visible) = bound_box.intersect(frame_width, frame_height) {
            let visible_pixels =
                imageops::crop_imm(frame, visible.x, visible.y, visible.width, visible.height)
                    .to_image();
            imageops::replace(&mut surface, &visible_pixels, 0, 0);
        }
        Ok(surface)
    }
}

impl Default for RegionExtractor {
    fn default() -> Self {
        Self::new(BoxPolicy::Pad)
    }
}
