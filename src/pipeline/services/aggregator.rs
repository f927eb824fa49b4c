use crate::common::ParsedTime;
use crate::pipeline::types::Frame;
use std::fmt;

/// Aggregate latency over the frames where both clocks were readable.
#[derive(Debug, Clone, PartialEq)]
pub struct LatencySummary {
    pub average_ms: f64,
    pub min_ms: i64,
    pub max_ms: i64,
    pub valid_frames: usize,
    pub total_frames: usize,
}

impl fmt::Display for LatencySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Average Latency: {:.2} ms", self.average_ms)
    }
}

pub fn frame_latency_ms(capture: &ParsedTime, viewer: &ParsedTime) -> Option<i64> {
    viewer.millis_since(capture)
}

/// Mean after dropping `ceil(len * trim_fraction)` values from each end of
/// the sorted input. Falls back to the plain mean when trimming would leave
/// nothing.
pub fn trimmed_mean(latencies: &[i64], trim_fraction: f64) -> Option<f64> {
    if latencies.is_empty() {
        return None;
    }

    let mut sorted = latencies.to_vec();
    sorted.sort_unstable();

    let trim = (sorted.len() as f64 * trim_fraction).ceil() as usize;
    let kept = if trim * 2 < sorted.len() {
        &sorted[trim..sorted.len() - trim]
    } else {
        &sorted[..]
    };

    Some(kept.iter().sum::<i64>() as f64 / kept.len() as f64)
}

pub fn summarize(frames: &[Frame], trim_fraction: f64) -> Option<LatencySummary> {
    let latencies: Vec<i64> = frames.iter().filter_map(Frame::latency_ms).collect();
    let average_ms = trimmed_mean(&latencies, trim_fraction)?;

    Some(LatencySummary {
        average_ms,
        min_ms: latencies.iter().copied().min()?,
        max_ms: latencies.iter().copied().max()?,
        valid_frames: latencies.len(),
        total_frames: frames.len(),
    })
}
