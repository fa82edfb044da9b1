//! Compact metadata document encoding
//!
//! The single-letter key schema is a compatibility contract with the client
//! player; key names, numeric representations and array orderings must
//! survive byte-for-byte. Serialization is pure assembly; all decisions
//! happened in the planners.

use serde::{Deserialize, Serialize};

use crate::chapters::Chapter;
use crate::error::PrepResult;
use crate::planner::{MontageGridPlan, SegmentSpec};

/// Parallel per-tier arrays for the fast-forward video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentTable {
    /// Playback rate per tier, ascending powers of two starting at 1
    #[serde(rename = "R")]
    pub rates: Vec<u64>,
    /// Actual duration per tier, seconds
    #[serde(rename = "D")]
    pub durations: Vec<f64>,
    /// Padded duration per tier, integer seconds
    #[serde(rename = "X")]
    pub padded_durations: Vec<u64>,
}

impl SegmentTable {
    fn from_specs(specs: &[SegmentSpec]) -> Self {
        Self {
            rates: specs.iter().map(|s| s.rate).collect(),
            durations: specs.iter().map(|s| s.duration).collect(),
            padded_durations: specs.iter().map(|s| s.padded_duration).collect(),
        }
    }

    /// Reassemble the typed tier list from the parallel arrays
    pub fn to_specs(&self) -> Vec<SegmentSpec> {
        self.rates
            .iter()
            .zip(&self.durations)
            .zip(&self.padded_durations)
            .map(|((&rate, &duration), &padded_duration)| SegmentSpec {
                rate,
                duration,
                padded_duration,
            })
            .collect()
    }
}

/// Montage grid facts for the client player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MontageTable {
    /// Thumbnail cell width, px
    #[serde(rename = "W")]
    pub thumb_width: u32,
    /// Thumbnail cell height, px
    #[serde(rename = "H")]
    pub thumb_height: u32,
    /// Grid column count
    #[serde(rename = "B")]
    pub columns: u32,
    /// Total thumbnail count
    #[serde(rename = "N")]
    pub thumb_count: u32,
}

impl MontageTable {
    fn from_plan(plan: &MontageGridPlan) -> Self {
        Self {
            thumb_width: plan.thumb_width,
            thumb_height: plan.thumb_height,
            columns: plan.columns,
            thumb_count: plan.thumb_count,
        }
    }

    /// Reassemble the grid plan; the row count is derived, not stored
    pub fn to_plan(&self) -> MontageGridPlan {
        MontageGridPlan {
            thumb_width: self.thumb_width,
            thumb_height: self.thumb_height,
            columns: self.columns,
            rows: self.thumb_count.div_ceil(self.columns.max(1)),
            thumb_count: self.thumb_count,
        }
    }
}

/// The root metadata document
///
/// Assembled once per run after all planners complete and never mutated
/// again. `C` is always present, empty when no chapter input was given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataDocument {
    /// Document id
    #[serde(rename = "I")]
    pub id: String,
    /// Fast-forward tier tables
    #[serde(rename = "V", default, skip_serializing_if = "Option::is_none")]
    pub video: Option<SegmentTable>,
    /// Montage grid facts
    #[serde(rename = "M", default, skip_serializing_if = "Option::is_none")]
    pub montage: Option<MontageTable>,
    /// Chapters as [title, start_seconds] pairs, in input order
    #[serde(rename = "C", default)]
    pub chapters: Vec<(String, f64)>,
}

impl MetadataDocument {
    /// Assemble the full pipeline document
    pub fn new(
        id: &str,
        segments: &[SegmentSpec],
        grid: &MontageGridPlan,
        chapters: &[Chapter],
    ) -> Self {
        Self {
            id: id.to_string(),
            video: Some(SegmentTable::from_specs(segments)),
            montage: Some(MontageTable::from_plan(grid)),
            chapters: chapters
                .iter()
                .map(|c| (c.title.clone(), c.start_seconds))
                .collect(),
        }
    }

    /// Assemble a chapters-only document (no video/montage tables)
    pub fn chapters_only(id: &str, chapters: &[Chapter]) -> Self {
        Self {
            id: id.to_string(),
            video: None,
            montage: None,
            chapters: chapters
                .iter()
                .map(|c| (c.title.clone(), c.start_seconds))
                .collect(),
        }
    }

    /// Serialize to the compact JSON representation
    pub fn to_json(&self) -> PrepResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a previously serialized document
    pub fn from_json(text: &str) -> PrepResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Typed chapter records recovered from the pair encoding
    pub fn chapter_records(&self) -> Vec<Chapter> {
        self.chapters
            .iter()
            .map(|(title, start_seconds)| Chapter {
                title: title.clone(),
                start_seconds: *start_seconds,
            })
            .collect()
    }
}
