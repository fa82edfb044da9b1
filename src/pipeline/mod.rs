//! Pipeline orchestration
//!
//! Sequences the fixed stage order: probe, normalize, re-probe, fast-forward
//! render, montage, chapters, metadata encoding, artifact export. All
//! intermediates live in one scoped working directory that is removed on
//! every exit path; any stage failure aborts the remaining stages and
//! nothing partial is ever exported.

use std::path::PathBuf;

use tempfile::Builder as TempDirBuilder;
use tracing::{info, warn};

use crate::config::PrepConfig;
use crate::engine::{FfmpegEngine, MediaOperation};
use crate::error::{PrepError, PrepResult};
use crate::output::metadata::MetadataDocument;
use crate::output::writer::export_artifacts;
use crate::planner::{plan_montage, plan_normalization, plan_segments, NormalizationPlan};
use crate::probe::{probe_video, ProbeInfo};
use crate::render::{render_fast_forward, render_montage};

pub mod status;

pub use status::{LogStatusSink, RunStatus, StatusSink};

/// One pipeline invocation
#[derive(Debug, Clone)]
pub struct PipelineRequest {
    /// Source video file
    pub video_file: PathBuf,
    /// Caller-supplied document id keying all output artifacts
    pub document_id: String,
    /// Directory receiving the final artifacts
    pub export_dir: PathBuf,
    /// Optional chapter text file
    pub chapter_file: Option<PathBuf>,
}

/// Sequences the planners, renderers and export for single runs
///
/// Runs are independent: each owns its working directory and shares no
/// mutable state, so callers may process different videos concurrently with
/// separate orchestrator instances.
pub struct PipelineOrchestrator<'a> {
    config: &'a PrepConfig,
    status: &'a dyn StatusSink,
}

impl<'a> PipelineOrchestrator<'a> {
    /// Create an orchestrator over a configuration and a status sink
    pub fn new(config: &'a PrepConfig, status: &'a dyn StatusSink) -> Self {
        Self { config, status }
    }

    /// Run the full pipeline for one source video.
    ///
    /// The outcome is published through the status sink either way; a sink
    /// failure is logged and never masks the primary result.
    pub fn run(&self, request: &PipelineRequest) -> PrepResult<MetadataDocument> {
        let result = self.run_stages(request);

        let status = match &result {
            Ok(_) => RunStatus::published(&request.document_id, "video/video.mp4"),
            Err(e) => RunStatus::failed(&request.document_id, &e.to_string()),
        };
        if let Err(notify_err) = self.status.publish(&status) {
            warn!("Status notification failed (best-effort): {notify_err}");
        }

        result
    }

    fn run_stages(&self, request: &PipelineRequest) -> PrepResult<MetadataDocument> {
        if !request.video_file.exists() {
            return Err(PrepError::InputNotFound {
                path: request.video_file.clone(),
            });
        }
        // A requested chapter file must exist; a missing one is an input
        // error, not an empty chapter list.
        if let Some(chapter_file) = &request.chapter_file {
            if !chapter_file.exists() {
                return Err(PrepError::InputNotFound {
                    path: chapter_file.clone(),
                });
            }
        }
        std::fs::create_dir_all(&request.export_dir)?;

        // Probe once; the probe rejects unreadable sources and non-positive
        // durations before any planning proceeds.
        let probe = probe_video(&request.video_file)?;
        info!(
            "Source {}: {:.1}s, {}x{}, video={}, audio={}, pix={}",
            request.video_file.display(),
            probe.duration,
            probe.width,
            probe.height,
            probe.video_codec,
            probe.audio_codec,
            probe.pixel_format,
        );

        // Scoped working directory, removed on every exit path below.
        let work_dir = TempDirBuilder::new().prefix("avdprep-").tempdir()?;
        let work = work_dir.path();
        let engine = FfmpegEngine::new(work);

        // Normalize for web playback, then re-probe so downstream stages see
        // the normalized codec, duration and timescale.
        let normalized = work.join("normalized.mp4");
        match plan_normalization(&probe, self.config) {
            NormalizationPlan::Remux => engine.run(&MediaOperation::Remux {
                input: request.video_file.clone(),
                output: normalized.clone(),
            })?,
            NormalizationPlan::Transcode {
                video_codec,
                preset,
                crf,
                pixel_format,
                audio_codec,
                audio_bitrate,
            } => engine.run(&MediaOperation::Transcode {
                input: request.video_file.clone(),
                output: normalized.clone(),
                video_codec,
                preset,
                crf,
                pixel_format,
                audio_codec,
                audio_bitrate,
            })?,
        }
        let probe = probe_video(&normalized)?;

        // Fast-forward tiers
        let segments = plan_segments(
            probe.duration,
            self.config.min_segment_duration,
            self.config.padding_offset,
        )?;
        let video_path = render_fast_forward(
            &engine,
            &normalized,
            work,
            "video.mp4",
            &probe,
            &segments,
            self.config,
        )?;

        // Montage
        let grid = plan_montage(
            probe.duration,
            self.config.thumb_width,
            thumb_height_for(&probe, self.config.thumb_width),
            self.config.max_jpeg_dimension,
            self.config.montage_tie_break,
        )?;
        let montage_path = render_montage(&engine, &normalized, work, &grid, self.config)?;

        // Chapters (optional input)
        let chapters = match &request.chapter_file {
            Some(path) => {
                let text = std::fs::read_to_string(path)?;
                crate::chapters::parse_chapters(&text)?
            }
            None => Vec::new(),
        };

        // Assemble and export; the working directory (and every
        // intermediate) is discarded when `work_dir` drops.
        let document = MetadataDocument::new(&request.document_id, &segments, &grid, &chapters);
        export_artifacts(&request.export_dir, &document, &video_path, &montage_path)?;

        info!("Pipeline complete for document {}", request.document_id);
        Ok(document)
    }
}

/// Cell height preserving the probed aspect ratio at the configured width
fn thumb_height_for(probe: &ProbeInfo, thumb_width: u32) -> u32 {
    let aspect = f64::from(probe.height) / f64::from(probe.width);
    ((f64::from(thumb_width) * aspect).round() as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn probe_with_size(width: u32, height: u32) -> ProbeInfo {
        ProbeInfo {
            duration: 60.0,
            width,
            height,
            time_base: 90000,
            audio_sample_rate: "48000".to_string(),
            audio_channel_layout: "stereo".to_string(),
            video_codec: "h264".to_string(),
            audio_codec: "aac".to_string(),
            pixel_format: "yuv420p".to_string(),
            container_format: "mov,mp4,m4a,3gp,3g2,mj2".to_string(),
        }
    }

    #[test]
    fn test_thumb_height_follows_aspect_ratio() {
        assert_eq!(thumb_height_for(&probe_with_size(1920, 1080), 30), 17);
        assert_eq!(thumb_height_for(&probe_with_size(1080, 1920), 30), 53);
        assert_eq!(thumb_height_for(&probe_with_size(640, 480), 30), 23);
    }

    #[test]
    fn test_thumb_height_never_zero() {
        // Extremely wide sources still get a one-pixel-tall cell
        assert_eq!(thumb_height_for(&probe_with_size(10000, 10), 30), 1);
    }

    #[test]
    fn test_missing_source_rejected_before_probing() {
        let config = PrepConfig::default();
        let sink = LogStatusSink;
        let orchestrator = PipelineOrchestrator::new(&config, &sink);
        let request = PipelineRequest {
            video_file: PathBuf::from("definitely/not/here.mp4"),
            document_id: "doc".to_string(),
            export_dir: std::env::temp_dir().join("avdprep-test-export"),
            chapter_file: None,
        };
        assert!(matches!(
            orchestrator.run(&request),
            Err(PrepError::InputNotFound { .. })
        ));
    }
}
