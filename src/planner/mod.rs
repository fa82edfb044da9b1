//! Planning module: pure, deterministic decisions from probe facts
//!
//! The planners never touch the filesystem or spawn processes; they turn an
//! immutable [`ProbeInfo`](crate::probe::ProbeInfo) plus configuration into
//! concrete work plans the orchestrator executes.

use serde::{Deserialize, Serialize};

pub mod ffwd;
pub mod montage;
pub mod normalize;

pub use ffwd::plan_segments;
pub use montage::plan_montage;
pub use normalize::plan_normalization;

/// Web normalization decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NormalizationPlan {
    /// Container rewrite with stream copy; the source is already web-compatible
    Remux,
    /// Full re-encode to the web profile
    Transcode {
        /// Target video encoder
        video_codec: String,
        /// Encoder preset
        preset: String,
        /// Constant Rate Factor
        crf: u8,
        /// Target pixel format
        pixel_format: String,
        /// Target audio encoder
        audio_codec: String,
        /// Target audio bitrate
        audio_bitrate: String,
    },
}

/// One fast-forward tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentSpec {
    /// Playback rate multiplier (1, 2, 4, 8, ...)
    pub rate: u64,
    /// Actual duration of this tier in seconds (source duration / rate)
    pub duration: f64,
    /// Integer-second padded duration (ceil(duration) + padding offset)
    pub padded_duration: u64,
}

/// Thumbnail grid geometry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MontageGridPlan {
    /// Width of each thumbnail cell, px
    pub thumb_width: u32,
    /// Height of each thumbnail cell, px
    pub thumb_height: u32,
    /// Grid column count
    pub columns: u32,
    /// Grid row count (ceil(thumb_count / columns))
    pub rows: u32,
    /// Total thumbnail count, one per whole source second
    pub thumb_count: u32,
}

impl MontageGridPlan {
    /// Composite canvas width in pixels
    pub fn canvas_width(&self) -> u32 {
        self.columns * self.thumb_width
    }

    /// Composite canvas height in pixels
    pub fn canvas_height(&self) -> u32 {
        self.rows * self.thumb_height
    }
}

/// Column-count tie-break applied after minimizing last-row waste
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MontageTieBreak {
    /// Minimize |columns * cell width - rows * cell height|
    NearSquarePixels,
    /// Minimize |columns - rows|, matching the historical sqrt layout
    SquareGrid,
}
