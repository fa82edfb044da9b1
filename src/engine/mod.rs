//! Declarative media operations executed through the ffmpeg CLI
//!
//! The orchestrator and renderers describe work as [`MediaOperation`] values;
//! [`FfmpegEngine`] turns each into one or two ffmpeg invocations. Every
//! failure surfaces the tool name and its captured stderr.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::error::{PrepError, PrepResult};
use crate::utils::time::seconds_to_timecode;

/// One declarative media operation
#[derive(Debug, Clone)]
pub enum MediaOperation {
    /// Container rewrite with stream copy
    Remux { input: PathBuf, output: PathBuf },
    /// Full re-encode to the web profile
    Transcode {
        input: PathBuf,
        output: PathBuf,
        video_codec: String,
        preset: String,
        crf: u8,
        pixel_format: String,
        audio_codec: String,
        audio_bitrate: String,
    },
    /// Extract the audio track with stream copy
    ExtractAudio { input: PathBuf, output: PathBuf },
    /// Generate a silent audio clip
    BlankAudio {
        output: PathBuf,
        duration: f64,
        channel_layout: String,
        sample_rate: String,
    },
    /// Speed up audio by chained atempo doublings
    FastForwardAudio {
        input: PathBuf,
        output: PathBuf,
        doublings: u32,
    },
    /// Speed up video via the setpts filter; drops the audio track
    SpeedChange {
        input: PathBuf,
        output: PathBuf,
        rate: u64,
        time_base: i64,
    },
    /// Pad or trim to an exact integer-second container duration
    TimePad {
        input: PathBuf,
        output: PathBuf,
        duration: u64,
        include_audio: bool,
    },
    /// Concatenate files without re-encoding, optionally trimming each
    /// entry to an outpoint
    Concat {
        inputs: Vec<PathBuf>,
        output: PathBuf,
        outpoints: Option<Vec<u64>>,
    },
    /// Mux one video and one audio stream with stream copy
    Mux {
        video: PathBuf,
        audio: PathBuf,
        output: PathBuf,
    },
    /// Extract a single frame at a whole-second offset
    ExtractFrame {
        input: PathBuf,
        output: PathBuf,
        second: u32,
    },
}

impl MediaOperation {
    /// Short label used in logs and failure messages
    pub fn describe(&self) -> &'static str {
        match self {
            MediaOperation::Remux { .. } => "remux",
            MediaOperation::Transcode { .. } => "transcode",
            MediaOperation::ExtractAudio { .. } => "extract audio",
            MediaOperation::BlankAudio { .. } => "blank audio",
            MediaOperation::FastForwardAudio { .. } => "fast-forward audio",
            MediaOperation::SpeedChange { .. } => "speed change",
            MediaOperation::TimePad { .. } => "time pad",
            MediaOperation::Concat { .. } => "concat",
            MediaOperation::Mux { .. } => "mux",
            MediaOperation::ExtractFrame { .. } => "extract frame",
        }
    }
}

/// Executes [`MediaOperation`]s as ffmpeg subprocesses
pub struct FfmpegEngine {
    /// Directory for list files and stripped intermediates
    scratch: PathBuf,
}

impl FfmpegEngine {
    /// Create an engine writing its scratch files under `scratch`
    pub fn new(scratch: impl Into<PathBuf>) -> Self {
        Self {
            scratch: scratch.into(),
        }
    }

    /// Execute one operation to completion
    pub fn run(&self, op: &MediaOperation) -> PrepResult<()> {
        match op {
            MediaOperation::Remux { input, output } => {
                let mut cmd = base_command(input);
                cmd.args(["-c:v", "copy", "-c:a", "copy", "-movflags", "+faststart"]);
                cmd.arg(output);
                execute(cmd, op.describe())
            }
            MediaOperation::Transcode {
                input,
                output,
                video_codec,
                preset,
                crf,
                pixel_format,
                audio_codec,
                audio_bitrate,
            } => {
                let mut cmd = base_command(input);
                cmd.arg("-c:v")
                    .arg(video_codec)
                    .arg("-preset")
                    .arg(preset)
                    .arg("-crf")
                    .arg(crf.to_string())
                    .arg("-pix_fmt")
                    .arg(pixel_format)
                    .arg("-c:a")
                    .arg(audio_codec)
                    .arg("-b:a")
                    .arg(audio_bitrate)
                    .args(["-movflags", "+faststart"])
                    .arg(output);
                execute(cmd, op.describe())
            }
            MediaOperation::ExtractAudio { input, output } => {
                let mut cmd = base_command(input);
                cmd.args(["-vn", "-acodec", "copy"]).arg(output);
                execute(cmd, op.describe())
            }
            MediaOperation::BlankAudio {
                output,
                duration,
                channel_layout,
                sample_rate,
            } => {
                let mut cmd = Command::new("ffmpeg");
                cmd.args(["-y", "-f", "lavfi", "-i"])
                    .arg(format!(
                        "anullsrc=channel_layout={channel_layout}:sample_rate={sample_rate}"
                    ))
                    .arg("-t")
                    .arg(duration.to_string())
                    .arg(output);
                execute(cmd, op.describe())
            }
            MediaOperation::FastForwardAudio {
                input,
                output,
                doublings,
            } => {
                let mut cmd = base_command(input);
                cmd.args(["-vn", "-filter:a"])
                    .arg(atempo_chain(*doublings))
                    .args(["-map_chapters", "-1"])
                    .arg(output);
                execute(cmd, op.describe())
            }
            MediaOperation::SpeedChange {
                input,
                output,
                rate,
                time_base,
            } => {
                let mut cmd = base_command(input);
                cmd.args(["-an", "-vf"])
                    .arg(format!("setpts=PTS/{rate}"))
                    .arg("-video_track_timescale")
                    .arg(time_base.to_string())
                    .arg(output);
                execute(cmd, op.describe())
            }
            MediaOperation::TimePad {
                input,
                output,
                duration,
                include_audio,
            } => self.time_pad(input, output, *duration, *include_audio),
            MediaOperation::Concat {
                inputs,
                output,
                outpoints,
            } => self.concat(inputs, output, outpoints.as_deref()),
            MediaOperation::Mux {
                video,
                audio,
                output,
            } => {
                let mut cmd = Command::new("ffmpeg");
                cmd.arg("-y")
                    .arg("-i")
                    .arg(video)
                    .arg("-i")
                    .arg(audio)
                    .args(["-c:v", "copy", "-c:a", "copy"])
                    .args(["-map", "0:v:0", "-map", "1:a:0", "-shortest"])
                    .arg(output);
                execute(cmd, op.describe())
            }
            MediaOperation::ExtractFrame {
                input,
                output,
                second,
            } => {
                // -ss before -i seeks by keyframe, which is what makes
                // per-second extraction affordable on long sources.
                let mut cmd = Command::new("ffmpeg");
                cmd.arg("-y")
                    .arg("-ss")
                    .arg(seconds_to_timecode(u64::from(*second)))
                    .arg("-i")
                    .arg(input)
                    .args(["-frames:v", "1", "-vf", "scale=iw*sar:ih"])
                    .arg(output);
                execute(cmd, op.describe())
            }
        }
    }

    /// Pad (or trim) a file to an exact integer-second container duration.
    ///
    /// ffmpeg stamps the container duration from chapter metadata, so the
    /// existing chapters are stripped and replaced by a single chapter
    /// spanning 0 -> duration.
    fn time_pad(
        &self,
        input: &Path,
        output: &Path,
        duration: u64,
        include_audio: bool,
    ) -> PrepResult<()> {
        let stem = output
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("pad")
            .to_string();

        let stripped = self.scratch.join(format!("{stem}_stripped.mp4"));
        let mut cmd = base_command(input);
        cmd.args(["-codec", "copy", "-map_chapters", "-1"])
            .arg(&stripped);
        execute(cmd, "strip chapters")?;

        let meta_path = self.scratch.join(format!("{stem}_meta.txt"));
        std::fs::write(&meta_path, ffmetadata_for(duration))?;

        let mut cmd = Command::new("ffmpeg");
        cmd.arg("-y")
            .arg("-i")
            .arg(&stripped)
            .arg("-i")
            .arg(&meta_path)
            .args(["-map_metadata", "1"]);
        if !include_audio {
            cmd.arg("-an");
        }
        cmd.args(["-codec", "copy"]).arg(output);
        let result = execute(cmd, "time pad");

        let _ = std::fs::remove_file(&stripped);
        let _ = std::fs::remove_file(&meta_path);
        result
    }

    /// Concatenate via the concat demuxer with stream copy
    fn concat(&self, inputs: &[PathBuf], output: &Path, outpoints: Option<&[u64]>) -> PrepResult<()> {
        debug_assert!(outpoints.map(|p| p.len() == inputs.len()).unwrap_or(true));
        let stem = output
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("concat")
            .to_string();
        let list_path = self.scratch.join(format!("{stem}_list.txt"));
        std::fs::write(&list_path, concat_manifest(inputs, outpoints))?;

        let mut cmd = Command::new("ffmpeg");
        cmd.args(["-y", "-safe", "0", "-f", "concat", "-i"])
            .arg(&list_path)
            .args(["-c", "copy"])
            .arg(output);
        let result = execute(cmd, "concat");

        let _ = std::fs::remove_file(&list_path);
        result
    }
}

/// `ffmpeg -y -i <input>`, the common prefix of single-input operations
fn base_command(input: &Path) -> Command {
    let mut cmd = Command::new("ffmpeg");
    cmd.arg("-y").arg("-i").arg(input);
    cmd
}

fn execute(mut cmd: Command, description: &str) -> PrepResult<()> {
    debug!("Running ffmpeg [{description}]: {cmd:?}");
    let output = cmd.output().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            PrepError::ToolNotFound {
                tool: "ffmpeg".to_string(),
            }
        } else {
            PrepError::IoError(e)
        }
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(PrepError::ToolFailed {
            tool: format!("ffmpeg ({description})"),
            message: stderr.trim().to_string(),
        });
    }
    Ok(())
}

/// atempo only supports factors up to 2.0 per stage, so higher rates chain
/// one doubling per stage
fn atempo_chain(doublings: u32) -> String {
    vec!["atempo=2.0"; doublings.max(1) as usize].join(",")
}

/// FFMETADATA document declaring a single chapter spanning 0 -> duration
fn ffmetadata_for(duration: u64) -> String {
    let end_ms = duration * 1000;
    format!(";FFMETADATA1\ntitle=x\n\n[CHAPTER]\nTIMEBASE=1/1000\nSTART=0\nEND={end_ms}\nTITLE=x\n")
}

/// Concat demuxer list file, one `file` directive per input with an
/// optional `outpoint` trim
fn concat_manifest(inputs: &[PathBuf], outpoints: Option<&[u64]>) -> String {
    let mut lines = Vec::new();
    for (index, input) in inputs.iter().enumerate() {
        lines.push(format!("file '{}'", input.display()));
        if let Some(points) = outpoints {
            if let Some(point) = points.get(index) {
                lines.push(format!("outpoint {point}"));
            }
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atempo_chain_one_per_doubling() {
        assert_eq!(atempo_chain(1), "atempo=2.0");
        assert_eq!(atempo_chain(3), "atempo=2.0,atempo=2.0,atempo=2.0");
        // Degenerate input still yields a valid filter
        assert_eq!(atempo_chain(0), "atempo=2.0");
    }

    #[test]
    fn test_ffmetadata_stamps_duration_in_ms() {
        let doc = ffmetadata_for(126);
        assert!(doc.starts_with(";FFMETADATA1"));
        assert!(doc.contains("TIMEBASE=1/1000"));
        assert!(doc.contains("END=126000"));
    }

    #[test]
    fn test_concat_manifest_plain() {
        let inputs = vec![PathBuf::from("/tmp/a.mp4"), PathBuf::from("/tmp/b.mp4")];
        let manifest = concat_manifest(&inputs, None);
        assert_eq!(manifest, "file '/tmp/a.mp4'\nfile '/tmp/b.mp4'");
    }

    #[test]
    fn test_concat_manifest_with_outpoints() {
        let inputs = vec![PathBuf::from("a.mp4"), PathBuf::from("b.mp4")];
        let manifest = concat_manifest(&inputs, Some(&[126, 64]));
        assert_eq!(
            manifest,
            "file 'a.mp4'\noutpoint 126\nfile 'b.mp4'\noutpoint 64"
        );
    }

    #[test]
    fn test_operation_labels() {
        let op = MediaOperation::Remux {
            input: PathBuf::from("in.mp4"),
            output: PathBuf::from("out.mp4"),
        };
        assert_eq!(op.describe(), "remux");
    }
}
