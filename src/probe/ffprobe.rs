//! ffprobe-based media probing

use std::path::Path;
use std::process::Command;

use serde::Deserialize;
use tracing::debug;

use crate::error::{PrepError, PrepResult};
use crate::probe::ProbeInfo;

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    format: FfprobeFormat,
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Default, Deserialize)]
struct FfprobeFormat {
    format_name: Option<String>,
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: String,
    codec_name: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    pix_fmt: Option<String>,
    time_base: Option<String>,
    duration: Option<String>,
    sample_rate: Option<String>,
    channel_layout: Option<String>,
}

/// Probe a video file and return the facts every planner consumes.
///
/// Fails with a diagnosable error when the file is unreadable, carries no
/// video stream, or reports a non-positive duration.
pub fn probe_video(path: &Path) -> PrepResult<ProbeInfo> {
    if !path.exists() {
        return Err(PrepError::InputNotFound {
            path: path.to_path_buf(),
        });
    }

    let output = Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .output()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PrepError::ToolNotFound {
                    tool: "ffprobe".to_string(),
                }
            } else {
                PrepError::IoError(e)
            }
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(PrepError::ToolFailed {
            tool: "ffprobe".to_string(),
            message: stderr.trim().to_string(),
        });
    }

    let parsed: FfprobeOutput =
        serde_json::from_slice(&output.stdout).map_err(|e| PrepError::ProbeFailed {
            path: path.to_path_buf(),
            message: format!("unparseable ffprobe output: {e}"),
        })?;

    let info = parse_probe_output(path, parsed)?;
    debug!(
        "Probed {}: {:.3}s {}x{} video={} audio={} pix={} container={}",
        path.display(),
        info.duration,
        info.width,
        info.height,
        info.video_codec,
        info.audio_codec,
        info.pixel_format,
        info.container_format,
    );
    Ok(info)
}

fn parse_probe_output(path: &Path, output: FfprobeOutput) -> PrepResult<ProbeInfo> {
    // Pick the video stream with the largest frame area; attached cover art
    // and other oddities show up as tiny extra video streams.
    let video = output
        .streams
        .iter()
        .filter(|s| s.codec_type == "video")
        .max_by_key(|s| u64::from(s.width.unwrap_or(0)) * u64::from(s.height.unwrap_or(0)))
        .ok_or_else(|| PrepError::ProbeFailed {
            path: path.to_path_buf(),
            message: "no video stream found".to_string(),
        })?;

    let width = video.width.ok_or_else(|| PrepError::ProbeFailed {
        path: path.to_path_buf(),
        message: "video stream has no width".to_string(),
    })?;
    let height = video.height.ok_or_else(|| PrepError::ProbeFailed {
        path: path.to_path_buf(),
        message: "video stream has no height".to_string(),
    })?;

    let duration = video
        .duration
        .as_deref()
        .or(output.format.duration.as_deref())
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| PrepError::ProbeFailed {
            path: path.to_path_buf(),
            message: "no usable duration reported".to_string(),
        })?;
    if !duration.is_finite() || duration <= 0.0 {
        return Err(PrepError::InvalidDuration { seconds: duration });
    }

    // time_base is a fraction like "1/90000"; the denominator is the track
    // timescale the fast-forward renders must preserve.
    let time_base = video
        .time_base
        .as_deref()
        .and_then(|s| s.split('/').nth(1))
        .and_then(|s| s.parse::<i64>().ok())
        .unwrap_or(90000);

    let audio = output.streams.iter().find(|s| s.codec_type == "audio");
    let (audio_codec, audio_sample_rate, audio_channel_layout) = match audio {
        Some(stream) => (
            stream
                .codec_name
                .clone()
                .unwrap_or_else(|| "unknown".to_string()),
            stream
                .sample_rate
                .clone()
                .unwrap_or_else(|| "48000".to_string()),
            stream
                .channel_layout
                .clone()
                .unwrap_or_else(|| "stereo".to_string()),
        ),
        None => (
            "none".to_string(),
            "48000".to_string(),
            "stereo".to_string(),
        ),
    };

    Ok(ProbeInfo {
        duration,
        width,
        height,
        time_base,
        audio_sample_rate,
        audio_channel_layout,
        video_codec: video
            .codec_name
            .clone()
            .unwrap_or_else(|| "unknown".to_string()),
        audio_codec,
        pixel_format: video
            .pix_fmt
            .clone()
            .unwrap_or_else(|| "unknown".to_string()),
        container_format: output
            .format
            .format_name
            .unwrap_or_else(|| "unknown".to_string()),
    })
}
