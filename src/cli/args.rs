//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

/// Arguments for the process command
#[derive(Args, Debug)]
pub struct ProcessArgs {
    /// Source video file path
    #[arg(short, long)]
    pub input: PathBuf,

    /// Document id keying the output artifacts
    #[arg(short = 'd', long)]
    pub id: String,

    /// Export directory for the final artifacts
    #[arg(short, long)]
    pub export_dir: PathBuf,

    /// Chapter text file
    #[arg(long)]
    pub chapters: Option<PathBuf>,

    /// Configuration file (TOML)
    #[arg(long, env = "AVDPREP_CONFIG")]
    pub config: Option<PathBuf>,

    /// CRF for the normalization transcode (0-51)
    #[arg(long, value_parser = crf_in_range)]
    pub crf: Option<u8>,

    /// Thumbnail cell width in pixels
    #[arg(long)]
    pub thumb_width: Option<u32>,

    /// JPEG quality for the montage (1-100)
    #[arg(long, value_parser = quality_in_range)]
    pub jpeg_quality: Option<u8>,

    /// Extra seconds added when padding each tier
    #[arg(long)]
    pub padding_offset: Option<u32>,
}

/// Arguments for the chapters command
#[derive(Args, Debug)]
pub struct ChaptersArgs {
    /// Chapter text file path
    #[arg(short, long)]
    pub input: PathBuf,

    /// Document id keying the output metadata file
    #[arg(short = 'd', long)]
    pub id: String,

    /// Export directory for the metadata document
    #[arg(short, long)]
    pub export_dir: PathBuf,
}

/// Arguments for the inspect command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

fn crf_in_range(s: &str) -> Result<u8, String> {
    clap_num::number_range(s, 0, 51)
}

fn quality_in_range(s: &str) -> Result<u8, String> {
    clap_num::number_range(s, 1, 100)
}
