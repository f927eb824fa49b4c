use crate::common::ParsedTime;
use crate::config::AnchorPolicy;
use crate::pipeline::types::{ClockField, TimestampData};
use tracing::debug;

/// Recovers sub-second precision for clocks that OCR only reads to the second.
///
/// Walks the frames in recording order. The frame on which a clock's second
/// value first increases becomes the baseline for that second, and every
/// later frame showing the same second gets its millisecond from the
/// playback offset elapsed since the baseline. Frames with no baseline yet
/// are marked `Invalid`.
#[derive(Debug, Clone, Copy)]
pub struct MillisecondInterpolator {
    policy: AnchorPolicy,
}

impl MillisecondInterpolator {
    pub fn new(policy: AnchorPolicy) -> Self {
        Self { policy }
    }

    pub fn interpolate<T: TimestampData>(&self, frames: &mut [T], field: ClockField<T>) {
        let mut baseline_offset: Option<f64> = None;
        let mut last_valid_seconds: Option<u32> = None;
        let mut discarded = 0usize;

        for frame in frames.iter_mut() {
            let timestamp = frame.timestamp();
            let parsed = field(frame);
            let Some(current_seconds) = parsed.seconds_of_day() else {
                continue;
            };

            match (last_valid_seconds, baseline_offset) {
                (Some(last), _) if current_seconds > last => {
                    baseline_offset = Some(timestamp);
                    *parsed = parsed.with_millisecond(0);
                    last_valid_seconds = Some(current_seconds);
                }
                (Some(last), Some(baseline)) if current_seconds == last => {
                    let elapsed = (timestamp - baseline) % 1.0;
                    let millis = (elapsed * 1000.0).round().max(0.0) as u32;
                    *parsed = parsed.with_millisecond(millis);
                }
                _ => {
                    if self.policy == AnchorPolicy::FirstObservation && baseline_offset.is_none() {
                        baseline_offset = Some(timestamp);
                    }
                    *parsed = ParsedTime::Invalid;
                    last_valid_seconds = Some(current_seconds);
                    discarded += 1;
                }
            }
        }

        debug!(
            "Interpolated {} frames, {} discarded without a baseline",
            frames.len(),
            discarded
        );
    }
}

impl Default for MillisecondInterpolator {
    fn default() -> Self {
        Self::new(AnchorPolicy::SecondBoundary)
    }
}
