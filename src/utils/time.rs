//! Timestamp parsing and formatting utilities

use chrono::{NaiveTime, Timelike};

use crate::error::{PrepError, PrepResult};

/// Parse an `HH:MM:SS.ffffff` timestamp into seconds.
///
/// The fractional part is optional; up to nanosecond precision is accepted.
pub fn parse_timestamp(value: &str) -> PrepResult<f64> {
    let time = NaiveTime::parse_from_str(value.trim(), "%H:%M:%S%.f").map_err(|_| {
        PrepError::InvalidTimestamp {
            value: value.to_string(),
        }
    })?;
    Ok(f64::from(time.num_seconds_from_midnight()) + f64::from(time.nanosecond()) / 1e9)
}

/// Format seconds as an `HH:MM:SS.ffffff` timestamp with microsecond precision.
///
/// Inverse of [`parse_timestamp`] for values carrying at most microseconds.
pub fn format_timestamp(seconds: f64) -> String {
    let total_micros = (seconds * 1e6).round() as u64;
    let micros = total_micros % 1_000_000;
    let total_seconds = total_micros / 1_000_000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}.{micros:06}")
}

/// Format whole seconds as `HH:MM:SS` for ffmpeg `-ss` seeking.
pub fn seconds_to_timecode(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}
