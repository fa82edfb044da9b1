//! Fast-forward tier scheduling

use crate::error::{PrepError, PrepResult};
use crate::planner::SegmentSpec;

/// Compute the exponential tier schedule for a source duration.
///
/// Starting at 1x, the rate doubles per tier. Every tier is emitted with a
/// padded duration of `ceil(duration) + padding_offset` so the client can
/// seek to exact second offsets; the schedule ends with the first tier whose
/// actual duration drops below `threshold`. The 1x tier is always emitted,
/// even for sub-second sources, so the result is never empty. Rate growth is
/// exponential, so the tier count is O(log duration).
pub fn plan_segments(
    duration: f64,
    threshold: f64,
    padding_offset: u32,
) -> PrepResult<Vec<SegmentSpec>> {
    if !duration.is_finite() || duration <= 0.0 {
        return Err(PrepError::InvalidDuration { seconds: duration });
    }
    if !threshold.is_finite() || threshold <= 0.0 {
        return Err(PrepError::InvalidThreshold { seconds: threshold });
    }

    let mut segments = Vec::new();
    let mut rate: u64 = 1;
    loop {
        let actual = duration / rate as f64;
        let padded = actual.ceil() as u64 + u64::from(padding_offset);
        segments.push(SegmentSpec {
            rate,
            duration: actual,
            padded_duration: padded,
        });
        if actual < threshold {
            break;
        }
        // A u64 rate covers 2^63 doublings' worth of real durations; running
        // out means the duration/threshold pair is beyond any actual video.
        rate = rate
            .checked_mul(2)
            .ok_or(PrepError::InvalidDuration { seconds: duration })?;
    }
    Ok(segments)
}
