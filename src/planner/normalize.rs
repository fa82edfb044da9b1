//! Web normalization planning

use tracing::info;

use crate::config::PrepConfig;
use crate::planner::NormalizationPlan;
use crate::probe::ProbeInfo;

/// Container name fragments accepted as the web container family.
/// ffprobe reports compound names like "mov,mp4,m4a,3gp,3g2,mj2".
const WEB_CONTAINER_TAGS: [&str; 3] = ["mp4", "mov", "m4a"];

/// Decide between a stream-copy remux and a full transcode.
///
/// Remux requires the probed video codec, audio codec, pixel format and
/// container to all match the web profile; any single mismatch forces a full
/// transcode. A source with no audio track ("none") stays remuxable. Partial
/// transcodes (say, audio only) are deliberately not distinguished.
pub fn plan_normalization(probe: &ProbeInfo, config: &PrepConfig) -> NormalizationPlan {
    let video_ok = probe.video_codec == config.web_video_codec;
    let audio_ok = probe.audio_codec == config.web_audio_codec || !probe.has_audio();
    let pixel_ok = probe.pixel_format == config.web_pixel_format;
    let container_ok = probe
        .container_format
        .split(',')
        .any(|name| WEB_CONTAINER_TAGS.contains(&name));

    if video_ok && audio_ok && pixel_ok && container_ok {
        info!(
            "Source is web-compatible ({}/{}/{}), remuxing only",
            probe.video_codec, probe.audio_codec, probe.pixel_format
        );
        NormalizationPlan::Remux
    } else {
        info!(
            "Source needs normalization (video={}, audio={}, pix={}, container={}), transcoding",
            probe.video_codec, probe.audio_codec, probe.pixel_format, probe.container_format
        );
        NormalizationPlan::Transcode {
            video_codec: config.transcode_video_codec.clone(),
            preset: config.transcode_preset.clone(),
            crf: config.web_crf,
            pixel_format: config.web_pixel_format.clone(),
            audio_codec: config.web_audio_codec.clone(),
            audio_bitrate: config.audio_bitrate.clone(),
        }
    }
}
