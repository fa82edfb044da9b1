//! Pipeline configuration
//!
//! Every tuning constant lives here as an explicit immutable value threaded
//! into the planner and renderer calls, so the planning components stay pure
//! and independently testable. Defaults can be overridden from a TOML file
//! and individual CLI flags.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PrepError, PrepResult};
use crate::planner::MontageTieBreak;

/// Immutable configuration for one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PrepConfig {
    /// Video codec considered web-compatible when probed
    pub web_video_codec: String,
    /// Audio codec considered web-compatible when probed
    pub web_audio_codec: String,
    /// Pixel format considered web-compatible when probed
    pub web_pixel_format: String,
    /// Encoder used when a normalization transcode is required
    pub transcode_video_codec: String,
    /// Encoder preset for the normalization transcode
    pub transcode_preset: String,
    /// Constant Rate Factor for the normalization transcode (0 = lossless, 51 = worst)
    pub web_crf: u8,
    /// Audio bitrate for the normalization transcode
    pub audio_bitrate: String,

    /// Width of each montage thumbnail cell, px
    pub thumb_width: u32,
    /// JPEG quality for the montage image (1-100)
    pub jpeg_quality: u8,
    /// Gaussian blur sigma applied to each thumbnail; 0 disables
    pub blur_sigma: f32,
    /// Maximum width or height of the montage image (JPEG spec ceiling)
    pub max_jpeg_dimension: u32,
    /// Column-count tie-break policy for the montage grid
    pub montage_tie_break: MontageTieBreak,

    /// Length of the silent audio clip used for padding, seconds
    pub blank_audio_duration: f64,
    /// Extra seconds added when ceiling each tier's duration
    pub padding_offset: u32,
    /// Tier schedule stops after the first tier shorter than this, seconds
    pub min_segment_duration: f64,
}

impl Default for PrepConfig {
    fn default() -> Self {
        Self {
            web_video_codec: "h264".to_string(),
            web_audio_codec: "aac".to_string(),
            web_pixel_format: "yuv420p".to_string(),
            transcode_video_codec: "libx264".to_string(),
            transcode_preset: "medium".to_string(),
            web_crf: 18,
            audio_bitrate: "128k".to_string(),
            thumb_width: 30,
            jpeg_quality: 85,
            blur_sigma: 0.5,
            max_jpeg_dimension: 65500,
            montage_tie_break: MontageTieBreak::NearSquarePixels,
            blank_audio_duration: 5.0,
            padding_offset: 1,
            min_segment_duration: 1.0,
        }
    }
}

impl PrepConfig {
    /// Load configuration from a TOML file, filling unset keys with defaults
    pub fn from_file(path: &Path) -> PrepResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| PrepError::ConfigError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        toml::from_str(&text).map_err(|e| PrepError::ConfigError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}
