//! avdprep library
//!
//! Plans and renders a multi-resolution fast-forward representation of a
//! source video, a per-second thumbnail montage, and a chapter index, then
//! serializes everything into a compact metadata document the client player
//! seeks against. The planners are pure functions over probe facts; media
//! work is delegated to ffmpeg/ffprobe and image compositing happens
//! in-process.

pub mod chapters;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod planner;
pub mod probe;
pub mod render;
pub mod utils;

// Re-export commonly used types
pub use chapters::{encode_chapters, parse_chapters, Chapter};
pub use config::PrepConfig;
pub use error::{PrepError, PrepResult};
pub use output::metadata::MetadataDocument;
pub use pipeline::{LogStatusSink, PipelineOrchestrator, PipelineRequest};
pub use planner::{
    plan_montage, plan_normalization, plan_segments, MontageGridPlan, MontageTieBreak,
    NormalizationPlan, SegmentSpec,
};
pub use probe::{probe_video, ProbeInfo};

/// Verify that the external media tools are available
pub fn init() -> PrepResult<()> {
    for tool in ["ffmpeg", "ffprobe"] {
        which::which(tool).map_err(|_| PrepError::ToolNotFound {
            tool: tool.to_string(),
        })?;
    }
    Ok(())
}
