//! Best-effort run status reporting
//!
//! The orchestrator publishes every run's outcome through a [`StatusSink`].
//! Publication is strictly best-effort: a sink failure is observed and
//! logged by the orchestrator but never propagated, so it can never mask
//! the primary result of a run.

use serde::Serialize;
use tracing::info;

use crate::error::PrepResult;

/// Outcome of one pipeline run
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RunOutcome {
    /// All stages completed and artifacts were exported
    Published {
        /// Exported fast-forward video, relative to the export directory
        video: String,
    },
    /// The run aborted; no artifacts were exported
    Failed {
        /// Primary error, truncated for transport
        error: String,
    },
}

/// One run's status report
#[derive(Debug, Clone, Serialize)]
pub struct RunStatus {
    /// Caller-supplied document id
    pub document_id: String,
    /// Terminal outcome
    #[serde(flatten)]
    pub outcome: RunOutcome,
}

impl RunStatus {
    /// Report a completed run
    pub fn published(document_id: &str, video: &str) -> Self {
        Self {
            document_id: document_id.to_string(),
            outcome: RunOutcome::Published {
                video: video.to_string(),
            },
        }
    }

    /// Report an aborted run. The error text is capped so an enormous
    /// ffmpeg stderr dump cannot bloat the notification.
    pub fn failed(document_id: &str, error: &str) -> Self {
        let mut message = error.to_string();
        if message.len() > 1000 {
            let mut end = 1000;
            while !message.is_char_boundary(end) {
                end -= 1;
            }
            message.truncate(end);
        }
        Self {
            document_id: document_id.to_string(),
            outcome: RunOutcome::Failed { error: message },
        }
    }
}

/// Downstream status notification seam
pub trait StatusSink {
    /// Publish a run outcome. Callers treat a returned error as observable
    /// but non-fatal.
    fn publish(&self, status: &RunStatus) -> PrepResult<()>;
}

/// Sink that records outcomes in the log stream
#[derive(Debug, Default)]
pub struct LogStatusSink;

impl StatusSink for LogStatusSink {
    fn publish(&self, status: &RunStatus) -> PrepResult<()> {
        info!(
            "Run status for {}: {}",
            status.document_id,
            serde_json::to_string(status)?
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_status_truncates_error_text() {
        let long = "x".repeat(5000);
        let status = RunStatus::failed("doc", &long);
        match status.outcome {
            RunOutcome::Failed { error } => assert_eq!(error.len(), 1000),
            RunOutcome::Published { .. } => panic!("expected failed outcome"),
        }
    }

    #[test]
    fn test_status_serializes_with_flattened_outcome() {
        let status = RunStatus::published("doc", "video/video.mp4");
        let json = serde_json::to_string(&status).unwrap();
        assert!(json.contains(r#""document_id":"doc""#));
        assert!(json.contains(r#""status":"published""#));
        assert!(json.contains(r#""video":"video/video.mp4""#));
    }
}
