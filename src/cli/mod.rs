//! Command-line interface definitions

use clap::{Parser, Subcommand};

pub mod args;

pub use args::{ChaptersArgs, InspectArgs, ProcessArgs};

/// Fast-forward video preparation pipeline
#[derive(Parser, Debug)]
#[command(name = "avdprep", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full preparation pipeline on one source video
    Process(ProcessArgs),
    /// Parse a chapter file and write a chapters-only metadata document
    Chapters(ChaptersArgs),
    /// Probe a video file and print its facts
    Inspect(InspectArgs),
}
