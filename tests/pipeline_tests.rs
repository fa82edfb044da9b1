//! Round-trip, chapter, and end-to-end pipeline tests

use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

use avdprep::{
    encode_chapters, parse_chapters, Chapter, LogStatusSink, MetadataDocument, MontageGridPlan,
    PipelineOrchestrator, PipelineRequest, PrepConfig, SegmentSpec,
};

/// Test utilities for pipeline runs
mod test_utils {
    use super::*;

    /// Whether ffmpeg/ffprobe are available on this machine
    pub fn media_tools_available() -> bool {
        avdprep::init().is_ok()
    }

    /// Create a short test video (with audio) using ffmpeg's lavfi sources
    pub fn create_test_video(output_path: &Path, duration: f64) {
        let output = Command::new("ffmpeg")
            .args([
                "-f",
                "lavfi",
                "-i",
                &format!("testsrc=duration={duration}:size=320x240:rate=30"),
                "-f",
                "lavfi",
                "-i",
                &format!("sine=frequency=1000:duration={duration}"),
                "-c:v",
                "libx264",
                "-pix_fmt",
                "yuv420p",
                "-c:a",
                "aac",
                "-y",
            ])
            .arg(output_path)
            .output()
            .expect("failed to run ffmpeg");
        assert!(
            output.status.success(),
            "ffmpeg failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

// ============================================================================
// Chapter parsing
// ============================================================================

#[test]
fn test_single_chapter_block_parses_to_seconds() {
    let chapters = parse_chapters("START=00:09:00.368000\nTITLE=Chapter One\n").unwrap();
    assert_eq!(chapters.len(), 1);
    assert_eq!(chapters[0].title, "Chapter One");
    assert!((chapters[0].start_seconds - 540.368).abs() < 1e-9);
}

#[test]
fn test_chapter_text_round_trip() {
    let chapters = vec![
        Chapter {
            title: "Sycamore Grove".to_string(),
            start_seconds: 540.368,
        },
        Chapter {
            title: "Bachelor of the Year".to_string(),
            start_seconds: 780.15,
        },
        Chapter {
            title: "Bachelor of the Year (again)".to_string(),
            start_seconds: 780.15,
        },
    ];
    let text = encode_chapters(&chapters);
    assert_eq!(parse_chapters(&text).unwrap(), chapters);
}

#[test]
fn test_chapter_errors_are_rejections_not_drops() {
    // Decreasing time
    assert!(parse_chapters(
        "START=00:10:00.000000\nTITLE=Late\nSTART=00:05:00.000000\nTITLE=Early\n"
    )
    .is_err());
    // Missing title
    assert!(parse_chapters("START=00:01:00.000000\n").is_err());
    // Bad timestamp
    assert!(parse_chapters("START=around noon\nTITLE=Lunch\n").is_err());
}

// ============================================================================
// Metadata document round trip
// ============================================================================

#[test]
fn test_metadata_document_round_trip() {
    let segments = vec![
        SegmentSpec {
            rate: 1,
            duration: 125.0,
            padded_duration: 126,
        },
        SegmentSpec {
            rate: 2,
            duration: 62.5,
            padded_duration: 64,
        },
        SegmentSpec {
            rate: 4,
            duration: 31.25,
            padded_duration: 33,
        },
    ];
    let grid = MontageGridPlan {
        thumb_width: 30,
        thumb_height: 17,
        columns: 11,
        rows: 12,
        thumb_count: 125,
    };
    let chapters = vec![Chapter {
        title: "Chapter One".to_string(),
        start_seconds: 540.368,
    }];

    let document = MetadataDocument::new("vid-42", &segments, &grid, &chapters);
    let json = document.to_json().unwrap();

    // Parallel arrays stay parallel and typed values survive the trip
    let parsed = MetadataDocument::from_json(&json).unwrap();
    let table = parsed.video.as_ref().unwrap();
    assert_eq!(table.rates.len(), table.durations.len());
    assert_eq!(table.rates.len(), table.padded_durations.len());
    assert_eq!(table.to_specs(), segments);
    assert_eq!(parsed.montage.as_ref().unwrap().to_plan(), grid);
    assert_eq!(parsed.chapter_records(), chapters);
    assert_eq!(parsed.id, "vid-42");
}

#[test]
fn test_metadata_chapters_array_present_when_empty() {
    let document = MetadataDocument::new(
        "vid-7",
        &[SegmentSpec {
            rate: 1,
            duration: 2.0,
            padded_duration: 3,
        }],
        &MontageGridPlan {
            thumb_width: 30,
            thumb_height: 17,
            columns: 2,
            rows: 1,
            thumb_count: 2,
        },
        &[],
    );
    let json = document.to_json().unwrap();
    assert!(json.contains("\"C\":[]"));
}

// ============================================================================
// CLI
// ============================================================================

#[test]
fn test_cli_chapters_only_mode() {
    let dir = TempDir::new().unwrap();
    let chapter_file = dir.path().join("chapters.txt");
    std::fs::write(
        &chapter_file,
        "START=00:00:00.000000\nTITLE=Opening\nSTART=00:09:00.368000\nTITLE=Chapter One\n",
    )
    .unwrap();

    Command::cargo_bin("avdprep")
        .unwrap()
        .arg("chapters")
        .arg("--input")
        .arg(&chapter_file)
        .arg("--id")
        .arg("doc-chapters")
        .arg("--export-dir")
        .arg(dir.path())
        .assert()
        .success();

    let avd = dir.path().join("doc-chapters.avd");
    let parsed = MetadataDocument::from_json(&std::fs::read_to_string(&avd).unwrap()).unwrap();
    assert_eq!(parsed.id, "doc-chapters");
    assert_eq!(parsed.chapters.len(), 2);
    assert_eq!(parsed.chapters[1].0, "Chapter One");
    assert!(parsed.video.is_none());
}

#[test]
fn test_cli_chapters_rejects_malformed_input() {
    let dir = TempDir::new().unwrap();
    let chapter_file = dir.path().join("chapters.txt");
    std::fs::write(&chapter_file, "START=nonsense\nTITLE=Broken\n").unwrap();

    Command::cargo_bin("avdprep")
        .unwrap()
        .arg("chapters")
        .arg("--input")
        .arg(&chapter_file)
        .arg("--id")
        .arg("doc-bad")
        .arg("--export-dir")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("timestamp"));

    assert!(!dir.path().join("doc-bad.avd").exists());
}

// ============================================================================
// End-to-end pipeline (requires ffmpeg)
// ============================================================================

#[test]
fn test_full_pipeline_on_synthesized_video() {
    if !test_utils::media_tools_available() {
        println!("Skipping end-to-end test - ffmpeg/ffprobe not found");
        return;
    }

    let dir = TempDir::new().unwrap();
    let source = dir.path().join("source.mp4");
    test_utils::create_test_video(&source, 3.0);

    let chapter_file = dir.path().join("chapters.txt");
    std::fs::write(&chapter_file, "START=00:00:01.000000\nTITLE=Second One\n").unwrap();

    let export_dir = dir.path().join("export");
    let config = PrepConfig::default();
    let sink = LogStatusSink;
    let orchestrator = PipelineOrchestrator::new(&config, &sink);
    let request = PipelineRequest {
        video_file: source,
        document_id: "e2e-doc".to_string(),
        export_dir: export_dir.clone(),
        chapter_file: Some(chapter_file),
    };

    let document = orchestrator.run(&request).expect("pipeline failed");

    // Exported artifacts exist and are non-trivial
    let video = export_dir.join("video").join("video.mp4");
    let montage = export_dir.join("montage.jpg");
    let metadata = export_dir.join("e2e-doc.avd");
    assert!(video.exists());
    assert!(montage.exists());
    assert!(metadata.exists());
    assert!(std::fs::metadata(&video).unwrap().len() > 1000);

    // The written document matches the returned one
    let parsed = MetadataDocument::from_json(&std::fs::read_to_string(&metadata).unwrap()).unwrap();
    assert_eq!(parsed, document);

    // A ~3s source plans 1x/2x/4x tiers and one thumbnail per whole second
    let table = parsed.video.as_ref().unwrap();
    assert_eq!(table.rates.first(), Some(&1));
    assert!(table.rates.len() >= 2);
    assert_eq!(table.rates.len(), table.durations.len());
    assert_eq!(table.rates.len(), table.padded_durations.len());

    let montage_table = parsed.montage.as_ref().unwrap();
    assert!(montage_table.thumb_count >= 2);
    assert_eq!(montage_table.thumb_width, 30);

    assert_eq!(parsed.chapters.len(), 1);
    assert_eq!(parsed.chapters[0].0, "Second One");
}

#[test]
fn test_pipeline_aborts_cleanly_on_unreadable_source() {
    if !test_utils::media_tools_available() {
        println!("Skipping end-to-end test - ffmpeg/ffprobe not found");
        return;
    }

    let dir = TempDir::new().unwrap();
    let source = dir.path().join("not_a_video.mp4");
    std::fs::write(&source, b"this is not media data").unwrap();

    let export_dir = dir.path().join("export");
    let config = PrepConfig::default();
    let sink = LogStatusSink;
    let orchestrator = PipelineOrchestrator::new(&config, &sink);
    let request = PipelineRequest {
        video_file: source,
        document_id: "broken-doc".to_string(),
        export_dir: export_dir.clone(),
        chapter_file: None,
    };

    assert!(orchestrator.run(&request).is_err());
    // No partial artifacts were exported
    assert!(!export_dir.join("video").join("video.mp4").exists());
    assert!(!export_dir.join("montage.jpg").exists());
    assert!(!export_dir.join("broken-doc.avd").exists());
}
