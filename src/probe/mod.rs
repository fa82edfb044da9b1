//! Media probing module

use serde::{Deserialize, Serialize};

pub mod ffprobe;

pub use ffprobe::probe_video;

/// Probe facts for a source video
///
/// Produced once per file by ffprobe and consumed read-only by every planner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeInfo {
    /// Duration in seconds
    pub duration: f64,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Video track timescale (e.g. 90000)
    pub time_base: i64,
    /// Audio sample rate (e.g. "48000")
    pub audio_sample_rate: String,
    /// Audio channel layout (e.g. "stereo")
    pub audio_channel_layout: String,
    /// Video codec name (e.g. "h264", "hevc")
    pub video_codec: String,
    /// Audio codec name, or "none" when the file has no audio track
    pub audio_codec: String,
    /// Pixel format (e.g. "yuv420p")
    pub pixel_format: String,
    /// Container format name; ffprobe reports compound names
    /// like "mov,mp4,m4a,3gp,3g2,mj2"
    pub container_format: String,
}

impl ProbeInfo {
    /// Whether the source carries an audio track
    pub fn has_audio(&self) -> bool {
        self.audio_codec != "none"
    }
}
