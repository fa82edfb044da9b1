//! avdprep CLI
//!
//! Prepares a source video for the client player: a concatenated
//! fast-forward video at exponentially increasing playback rates, a
//! per-second thumbnail montage, an optional chapter index, and the compact
//! metadata document tying them together.
//!
//! # Usage
//!
//! ```bash
//! avdprep process --input movie.mkv --id abc123 --export-dir ./out --chapters chapters.txt
//! avdprep chapters --input chapters.txt --id abc123 --export-dir ./out
//! avdprep inspect --input movie.mkv --json
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use avdprep::cli::{ChaptersArgs, Cli, Commands, InspectArgs, ProcessArgs};
use avdprep::output::writer::write_metadata;
use avdprep::{
    parse_chapters, probe_video, LogStatusSink, MetadataDocument, PipelineOrchestrator,
    PipelineRequest, PrepConfig,
};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Process(args) => run_process(args),
        Commands::Chapters(args) => run_chapters(args),
        Commands::Inspect(args) => run_inspect(args),
    }
}

fn run_process(args: ProcessArgs) -> Result<()> {
    avdprep::init().context("external media tools unavailable")?;

    let mut config = match &args.config {
        Some(path) => PrepConfig::from_file(path)?,
        None => PrepConfig::default(),
    };
    if let Some(crf) = args.crf {
        config.web_crf = crf;
    }
    if let Some(width) = args.thumb_width {
        config.thumb_width = width;
    }
    if let Some(quality) = args.jpeg_quality {
        config.jpeg_quality = quality;
    }
    if let Some(offset) = args.padding_offset {
        config.padding_offset = offset;
    }

    let request = PipelineRequest {
        video_file: args.input,
        document_id: args.id,
        export_dir: args.export_dir,
        chapter_file: args.chapters,
    };

    let sink = LogStatusSink;
    let orchestrator = PipelineOrchestrator::new(&config, &sink);
    let document = orchestrator
        .run(&request)
        .context("video preparation pipeline failed")?;

    info!("Prepared document {}", document.id);
    Ok(())
}

fn run_chapters(args: ChaptersArgs) -> Result<()> {
    let text = std::fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read chapter file {}", args.input.display()))?;
    let chapters = parse_chapters(&text)?;
    let document = MetadataDocument::chapters_only(&args.id, &chapters);
    let path = write_metadata(&args.export_dir, &document)?;
    info!(
        "Wrote chapters-only metadata ({} chapters): {}",
        chapters.len(),
        path.display()
    );
    Ok(())
}

fn run_inspect(args: InspectArgs) -> Result<()> {
    avdprep::init().context("external media tools unavailable")?;
    let probe = probe_video(&args.input)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&probe)?);
    } else {
        println!("File:       {}", args.input.display());
        println!("Duration:   {:.3}s", probe.duration);
        println!("Resolution: {}x{}", probe.width, probe.height);
        println!("Video:      {} ({})", probe.video_codec, probe.pixel_format);
        println!(
            "Audio:      {} ({} Hz, {})",
            probe.audio_codec, probe.audio_sample_rate, probe.audio_channel_layout
        );
        println!("Container:  {}", probe.container_format);
    }
    Ok(())
}
