//! Thumbnail montage compositing
//!
//! Extracts one frame per whole second of video and assembles them into a
//! single JPEG grid. Frame extraction goes through the media engine; the
//! resize, blur and compositing happen in-process.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::RgbImage;
use tracing::{info, warn};

use crate::config::PrepConfig;
use crate::engine::{FfmpegEngine, MediaOperation};
use crate::error::{PrepError, PrepResult};
use crate::planner::MontageGridPlan;

/// Composite the thumbnail montage into `work_dir/montage.jpg`.
///
/// Cell `i` holds the frame at second `i`. A frame that cannot be extracted
/// is retried one second earlier and otherwise skipped, leaving its cell
/// blank, the same contract as the partially filled last row.
pub fn render_montage(
    engine: &FfmpegEngine,
    video: &Path,
    work_dir: &Path,
    grid: &MontageGridPlan,
    config: &PrepConfig,
) -> PrepResult<PathBuf> {
    let canvas_width = grid.canvas_width();
    let canvas_height = grid.canvas_height();
    if canvas_width > config.max_jpeg_dimension || canvas_height > config.max_jpeg_dimension {
        return Err(PrepError::CompositeGeometry {
            width: canvas_width,
            height: canvas_height,
            max_dimension: config.max_jpeg_dimension,
        });
    }

    info!(
        "Montage: {} thumbs ({}x{}), grid {}x{} ({}x{}px)",
        grid.thumb_count,
        grid.thumb_width,
        grid.thumb_height,
        grid.columns,
        grid.rows,
        canvas_width,
        canvas_height,
    );

    let frame_dir = work_dir.join("frames");
    std::fs::create_dir_all(&frame_dir)?;

    let mut canvas = RgbImage::new(canvas_width, canvas_height);
    for index in 0..grid.thumb_count {
        let frame_path = frame_dir.join(format!("{index}.png"));
        engine.run(&MediaOperation::ExtractFrame {
            input: video.to_path_buf(),
            output: frame_path.clone(),
            second: index,
        })?;

        // Seeking right at the end of the file can come back empty; one
        // second earlier recovers the final cell.
        if !frame_path.exists() && index > 0 {
            warn!("Frame at {index}s missing, retrying at {}s", index - 1);
            engine.run(&MediaOperation::ExtractFrame {
                input: video.to_path_buf(),
                output: frame_path.clone(),
                second: index - 1,
            })?;
        }
        if !frame_path.exists() {
            warn!("Skipping missing frame at {index}s");
            continue;
        }

        let frame = image::open(&frame_path)?.to_rgb8();
        let mut thumb = imageops::resize(
            &frame,
            grid.thumb_width,
            grid.thumb_height,
            FilterType::Lanczos3,
        );
        if config.blur_sigma > 0.0 {
            thumb = imageops::blur(&thumb, config.blur_sigma);
        }

        let x = (index % grid.columns) * grid.thumb_width;
        let y = (index / grid.columns) * grid.thumb_height;
        imageops::replace(&mut canvas, &thumb, i64::from(x), i64::from(y));

        // Full-size frames add up fast on long sources; drop each one as
        // soon as its thumbnail is pasted.
        let _ = std::fs::remove_file(&frame_path);
    }

    let montage_path = work_dir.join("montage.jpg");
    let writer = BufWriter::new(File::create(&montage_path)?);
    let encoder = JpegEncoder::new_with_quality(writer, config.jpeg_quality);
    canvas.write_with_encoder(encoder)?;

    info!(
        "Montage saved: {} ({}x{})",
        montage_path.display(),
        canvas_width,
        canvas_height
    );
    Ok(montage_path)
}
