//! Error handling module for avdprep

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for avdprep operations
#[derive(Error, Debug)]
pub enum PrepError {
    /// Input file not found or inaccessible
    #[error("Input file not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    /// Required external tool missing from PATH
    #[error("External tool not found: {tool}. Ensure ffmpeg/ffprobe are installed")]
    ToolNotFound { tool: String },

    /// External tool exited with a failure status
    #[error("{tool} failed: {message}")]
    ToolFailed { tool: String, message: String },

    /// Media probe produced unusable facts
    #[error("Failed to probe {}: {message}", path.display())]
    ProbeFailed { path: PathBuf, message: String },

    /// Source duration is not a positive finite number
    #[error("Invalid source duration: {seconds}s (must be positive)")]
    InvalidDuration { seconds: f64 },

    /// Minimum-segment threshold would never terminate the tier schedule
    #[error("Invalid minimum segment duration: {seconds}s (must be positive)")]
    InvalidThreshold { seconds: f64 },

    /// Chapter timestamp not in HH:MM:SS.ffffff format
    #[error("Invalid chapter timestamp: {value}. Expected HH:MM:SS.ffffff")]
    InvalidTimestamp { value: String },

    /// Unrecognized line in a chapter file
    #[error("Unrecognized chapter line {line}: {content}")]
    ChapterSyntax { line: usize, content: String },

    /// Chapter record missing a required field
    #[error("Chapter record near {near:?} is missing its {field} line")]
    ChapterFieldMissing { field: &'static str, near: String },

    /// Chapter start times must be non-decreasing
    #[error("Chapter {title:?} starts at {start}s, before the previous chapter at {previous}s")]
    ChapterOrder {
        title: String,
        start: f64,
        previous: f64,
    },

    /// Thumbnail cell cannot fit inside the output format ceiling
    #[error("Thumbnail cell {cell_width}x{cell_height} exceeds the maximum image dimension {max_dimension}")]
    MontageCellTooLarge {
        cell_width: u32,
        cell_height: u32,
        max_dimension: u32,
    },

    /// No grid layout satisfies the pixel ceiling for this thumbnail count
    #[error("No montage layout fits {thumb_count} thumbnails within {max_dimension}px (source too long for this cell size)")]
    MontageInfeasible {
        thumb_count: u32,
        max_dimension: u32,
    },

    /// Composite canvas would exceed the output format ceiling
    #[error("Montage canvas {width}x{height} exceeds the maximum image dimension {max_dimension}")]
    CompositeGeometry {
        width: u32,
        height: u32,
        max_dimension: u32,
    },

    /// Configuration file rejected
    #[error("Failed to load config {}: {message}", path.display())]
    ConfigError { path: PathBuf, message: String },

    /// Image decode/encode error
    #[error("Image processing error: {0}")]
    ImageError(#[from] image::ImageError),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for avdprep operations
pub type PrepResult<T> = std::result::Result<T, PrepError>;
