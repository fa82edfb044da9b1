//! Fast-forward tier rendering
//!
//! Executes a planned tier schedule: each tier becomes a sped-up copy of the
//! source padded to its planned integer duration (last frame frozen on the
//! video side, silence on the audio side), and all tiers are concatenated
//! into a single file with synchronized audio.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::PrepConfig;
use crate::engine::{FfmpegEngine, MediaOperation};
use crate::error::{PrepError, PrepResult};
use crate::planner::SegmentSpec;
use crate::probe::ProbeInfo;

/// Render the concatenated fast-forward video into `work_dir/output_name`.
///
/// The planner's padded durations are authoritative: every tier is padded to
/// its planned integer length, so the metadata document and the rendered
/// file agree on seek offsets by construction.
pub fn render_fast_forward(
    engine: &FfmpegEngine,
    source: &Path,
    work_dir: &Path,
    output_name: &str,
    probe: &ProbeInfo,
    segments: &[SegmentSpec],
    config: &PrepConfig,
) -> PrepResult<PathBuf> {
    // The planner always emits the 1x tier
    let (first, rest) = segments
        .split_first()
        .ok_or(PrepError::InvalidDuration { seconds: 0.0 })?;

    // Shared silent clip appended after every tier's audio
    let blank_audio = work_dir.join("blank_audio.mp4");
    engine.run(&MediaOperation::BlankAudio {
        output: blank_audio.clone(),
        duration: config.blank_audio_duration,
        channel_layout: probe.audio_channel_layout.clone(),
        sample_rate: probe.audio_sample_rate.clone(),
    })?;

    let mut video_files: Vec<PathBuf> = Vec::with_capacity(segments.len());
    let mut audio_files: Vec<PathBuf> = Vec::with_capacity(segments.len());

    // 1x tier: the source itself, padded to the planned duration
    let fit_video = work_dir.join("src_fit.mp4");
    engine.run(&MediaOperation::TimePad {
        input: source.to_path_buf(),
        output: fit_video.clone(),
        duration: first.padded_duration,
        include_audio: false,
    })?;
    video_files.push(fit_video);

    // Raw audio track feeds both the 1x tier and the atempo renders
    let raw_audio = if probe.has_audio() {
        let raw = work_dir.join("src_audio.mp4");
        engine.run(&MediaOperation::ExtractAudio {
            input: source.to_path_buf(),
            output: raw.clone(),
        })?;
        Some(raw)
    } else {
        None
    };

    let src_audio_padded = work_dir.join("src_audio_pad.mp4");
    match &raw_audio {
        Some(raw) => engine.run(&MediaOperation::Concat {
            inputs: vec![raw.clone(), blank_audio.clone()],
            output: src_audio_padded.clone(),
            outpoints: None,
        })?,
        None => engine.run(&MediaOperation::BlankAudio {
            output: src_audio_padded.clone(),
            duration: first.padded_duration as f64,
            channel_layout: probe.audio_channel_layout.clone(),
            sample_rate: probe.audio_sample_rate.clone(),
        })?,
    }
    audio_files.push(src_audio_padded);

    // Sped-up tiers (2x, 4x, 8x, ...)
    for (index, spec) in rest.iter().enumerate() {
        info!("Rendering {}x tier ({}s padded)", spec.rate, spec.padded_duration);
        let doublings = index as u32 + 1;

        let ffwd_video = work_dir.join(format!("ffwd_video_{}.mp4", spec.rate));
        engine.run(&MediaOperation::SpeedChange {
            input: source.to_path_buf(),
            output: ffwd_video.clone(),
            rate: spec.rate,
            time_base: probe.time_base,
        })?;

        let fit = work_dir.join(format!("ffwd_video_fit_{}.mp4", spec.rate));
        engine.run(&MediaOperation::TimePad {
            input: ffwd_video,
            output: fit.clone(),
            duration: spec.padded_duration,
            include_audio: false,
        })?;
        video_files.push(fit);

        let audio_padded = work_dir.join(format!("ffwd_audio_pad_{}.mp4", spec.rate));
        match &raw_audio {
            Some(raw) => {
                let ffwd_audio = work_dir.join(format!("ffwd_audio_{}.mp4", spec.rate));
                engine.run(&MediaOperation::FastForwardAudio {
                    input: raw.clone(),
                    output: ffwd_audio.clone(),
                    doublings,
                })?;
                engine.run(&MediaOperation::Concat {
                    inputs: vec![ffwd_audio, blank_audio.clone()],
                    output: audio_padded.clone(),
                    outpoints: None,
                })?;
            }
            None => engine.run(&MediaOperation::BlankAudio {
                output: audio_padded.clone(),
                duration: spec.padded_duration as f64,
                channel_layout: probe.audio_channel_layout.clone(),
                sample_rate: probe.audio_sample_rate.clone(),
            })?,
        }
        audio_files.push(audio_padded);
    }

    // Concatenate every tier; the audio side is trimmed to the planned
    // padded durations so both tracks line up second for second.
    let concat_video = work_dir.join("final_video.mp4");
    engine.run(&MediaOperation::Concat {
        inputs: video_files,
        output: concat_video.clone(),
        outpoints: None,
    })?;

    let padded_durations: Vec<u64> = segments.iter().map(|s| s.padded_duration).collect();
    let concat_audio = work_dir.join("final_audio.mp4");
    engine.run(&MediaOperation::Concat {
        inputs: audio_files,
        output: concat_audio.clone(),
        outpoints: Some(padded_durations.clone()),
    })?;

    // Mux with stream copy; no re-encode at this point
    let joined = work_dir.join("final_join.mp4");
    engine.run(&MediaOperation::Mux {
        video: concat_video,
        audio: concat_audio,
        output: joined.clone(),
    })?;

    // Final pad stamps the total duration with audio included
    let total: u64 = padded_durations.iter().sum();
    let dest = work_dir.join(output_name);
    engine.run(&MediaOperation::TimePad {
        input: joined,
        output: dest.clone(),
        duration: total,
        include_audio: true,
    })?;

    info!(
        "Fast-forward render complete: {} tiers, padded durations {:?} (total {}s)",
        segments.len(),
        padded_durations,
        total
    );
    Ok(dest)
}
