//! Chapter index parsing and encoding
//!
//! The chapter text format is line-oriented: each record carries a
//! `START=HH:MM:SS.ffffff` line and a `TITLE=free text` line, in either
//! order. Records may sit back to back (the historical file layout) or be
//! separated by blank lines or a `---` delimiter line.

use serde::{Deserialize, Serialize};

use crate::error::{PrepError, PrepResult};
use crate::utils::time::{format_timestamp, parse_timestamp};

/// Delimiter line accepted between chapter records
const DELIMITER: &str = "---";

/// A single chapter marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    /// Free-text chapter title
    pub title: String,
    /// Start offset in seconds from the beginning of the video
    pub start_seconds: f64,
}

/// Parse chapter text into an ordered chapter list.
///
/// Chapters keep their input order; start times must be non-decreasing
/// (equal timestamps are allowed). Every malformed input is rejected rather
/// than dropped: bad timestamps, records missing either field, unrecognized
/// lines, and out-of-order start times are all errors.
pub fn parse_chapters(text: &str) -> PrepResult<Vec<Chapter>> {
    let mut chapters: Vec<Chapter> = Vec::new();
    let mut pending_start: Option<f64> = None;
    let mut pending_title: Option<String> = None;

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line == DELIMITER {
            check_complete(&pending_start, &pending_title)?;
            continue;
        }

        if let Some(value) = line.strip_prefix("START=") {
            if pending_start.is_some() {
                // Two START lines in a row: the first record never got a title
                return Err(missing_field(&pending_start, &pending_title));
            }
            pending_start = Some(parse_timestamp(value)?);
        } else if let Some(value) = line.strip_prefix("TITLE=") {
            if pending_title.is_some() {
                return Err(missing_field(&pending_start, &pending_title));
            }
            pending_title = Some(value.to_string());
        } else {
            return Err(PrepError::ChapterSyntax {
                line: index + 1,
                content: line.to_string(),
            });
        }

        if let (Some(start), Some(title)) = (pending_start, pending_title.clone()) {
            if let Some(previous) = chapters.last() {
                if start < previous.start_seconds {
                    return Err(PrepError::ChapterOrder {
                        title,
                        start,
                        previous: previous.start_seconds,
                    });
                }
            }
            chapters.push(Chapter {
                title,
                start_seconds: start,
            });
            pending_start = None;
            pending_title = None;
        }
    }

    check_complete(&pending_start, &pending_title)?;
    Ok(chapters)
}

/// Encode a chapter list back into the text format.
///
/// Inverse of [`parse_chapters`]: records are written as contiguous
/// START/TITLE pairs with microsecond timestamps.
pub fn encode_chapters(chapters: &[Chapter]) -> String {
    let mut out = String::new();
    for chapter in chapters {
        out.push_str("START=");
        out.push_str(&format_timestamp(chapter.start_seconds));
        out.push('\n');
        out.push_str("TITLE=");
        out.push_str(&chapter.title);
        out.push('\n');
    }
    out
}

fn check_complete(pending_start: &Option<f64>, pending_title: &Option<String>) -> PrepResult<()> {
    if pending_start.is_some() || pending_title.is_some() {
        return Err(missing_field(pending_start, pending_title));
    }
    Ok(())
}

fn missing_field(pending_start: &Option<f64>, pending_title: &Option<String>) -> PrepError {
    match (pending_start, pending_title) {
        (Some(start), _) => PrepError::ChapterFieldMissing {
            field: "TITLE",
            near: format_timestamp(*start),
        },
        (_, Some(title)) => PrepError::ChapterFieldMissing {
            field: "START",
            near: title.clone(),
        },
        // Unreachable: callers only report a missing field with one pending
        (None, None) => PrepError::ChapterFieldMissing {
            field: "START",
            near: String::new(),
        },
    }
}
