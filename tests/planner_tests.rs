//! Planner behavior against the documented scenarios

use avdprep::{
    plan_montage, plan_normalization, plan_segments, MontageTieBreak, NormalizationPlan,
    PrepConfig, PrepError, ProbeInfo,
};

fn web_probe() -> ProbeInfo {
    ProbeInfo {
        duration: 125.0,
        width: 1920,
        height: 1080,
        time_base: 90000,
        audio_sample_rate: "48000".to_string(),
        audio_channel_layout: "stereo".to_string(),
        video_codec: "h264".to_string(),
        audio_codec: "aac".to_string(),
        pixel_format: "yuv420p".to_string(),
        container_format: "mov,mp4,m4a,3gp,3g2,mj2".to_string(),
    }
}

// ============================================================================
// Fast-forward tier schedule
// ============================================================================

#[test]
fn test_tier_schedule_for_125_seconds() {
    let segments = plan_segments(125.0, 1.0, 1).unwrap();

    let rates: Vec<u64> = segments.iter().map(|s| s.rate).collect();
    assert_eq!(rates, vec![1, 2, 4, 8, 16, 32, 64, 128]);

    let durations: Vec<f64> = segments.iter().map(|s| s.duration).collect();
    assert_eq!(
        durations,
        vec![125.0, 62.5, 31.25, 15.625, 7.8125, 3.90625, 1.953125, 0.9765625]
    );

    let padded: Vec<u64> = segments.iter().map(|s| s.padded_duration).collect();
    assert_eq!(padded, vec![126, 64, 33, 17, 9, 5, 3, 2]);

    // The 128x tier terminates the schedule: its duration is the first
    // below the threshold.
    assert!(segments.last().unwrap().duration < 1.0);
    assert!(segments[segments.len() - 2].duration >= 1.0);
}

#[test]
fn test_tier_schedule_properties_hold_for_many_durations() {
    for duration in [0.4, 1.0, 2.5, 9.99, 125.0, 3600.0, 86_400.5] {
        for threshold in [0.5, 1.0, 2.0] {
            let segments = plan_segments(duration, threshold, 1).unwrap();
            assert!(!segments.is_empty());
            assert_eq!(segments[0].rate, 1);

            for (index, spec) in segments.iter().enumerate() {
                assert_eq!(spec.rate, 1u64 << index);
                assert_eq!(spec.duration, duration / spec.rate as f64);
                assert_eq!(spec.padded_duration, spec.duration.ceil() as u64 + 1);
                assert!(spec.padded_duration > 0);

                let is_last = index == segments.len() - 1;
                if is_last {
                    assert!(spec.duration < threshold);
                } else {
                    assert!(spec.duration >= threshold);
                }
            }
        }
    }
}

#[test]
fn test_subsecond_source_still_gets_the_1x_tier() {
    let segments = plan_segments(0.3, 1.0, 1).unwrap();
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].rate, 1);
}

#[test]
fn test_nonpositive_duration_is_a_precondition_error() {
    assert!(matches!(
        plan_segments(0.0, 1.0, 1),
        Err(PrepError::InvalidDuration { .. })
    ));
    assert!(matches!(
        plan_segments(-1.0, 1.0, 1),
        Err(PrepError::InvalidDuration { .. })
    ));
}

// ============================================================================
// Montage grid layout
// ============================================================================

#[test]
fn test_montage_invariants_for_valid_inputs() {
    for duration in [1.0, 7.9, 59.0, 120.0, 901.5, 5400.0] {
        let plan = plan_montage(duration, 300, 170, 65500, MontageTieBreak::NearSquarePixels)
            .unwrap();
        let n = (duration.floor() as u32).max(1);
        assert_eq!(plan.thumb_count, n);
        assert!(plan.columns >= 1);
        assert!(plan.columns <= n);
        assert_eq!(plan.rows, n.div_ceil(plan.columns));
        assert!(plan.columns * 300 <= 65500);
        assert!(plan.rows * 170 <= 65500);
    }
}

#[test]
fn test_montage_near_square_tie_break_for_120_thumbs() {
    // 120 thumbnails at 300x170 cells: every column count up to 120 is
    // feasible under the 65500px ceiling, so the tie-break decides. The
    // zero-waste layout closest to square in pixels is 8x15.
    let plan = plan_montage(120.0, 300, 170, 65500, MontageTieBreak::NearSquarePixels).unwrap();
    assert_eq!(plan.columns, 8);
    assert_eq!(plan.rows, 15);
    // No empty cells in the last row
    assert_eq!(plan.columns * plan.rows, plan.thumb_count);
    // The selected grid satisfies B*cellWidth ~= R*cellHeight
    let width = i64::from(plan.canvas_width());
    let height = i64::from(plan.canvas_height());
    assert!((width - height).abs() <= 300);
}

#[test]
fn test_montage_legacy_square_grid_selects_30_columns_for_900_thumbs() {
    // The historical layout documented B=30 for a 900-thumbnail source.
    let plan = plan_montage(900.0, 30, 17, 65500, MontageTieBreak::SquareGrid).unwrap();
    assert_eq!(plan.columns, 30);
    assert_eq!(plan.rows, 30);
}

#[test]
fn test_montage_oversized_input_rejected_not_truncated() {
    // 100 thumbnails of 50x50 cells under a 300px ceiling: capacity is
    // 6x6 = 36 cells, so the layout must be rejected.
    let result = plan_montage(100.0, 50, 50, 300, MontageTieBreak::NearSquarePixels);
    assert!(matches!(result, Err(PrepError::MontageInfeasible { .. })));
}

#[test]
fn test_montage_cell_wider_than_ceiling_rejected() {
    let result = plan_montage(10.0, 66000, 17, 65500, MontageTieBreak::NearSquarePixels);
    assert!(matches!(result, Err(PrepError::MontageCellTooLarge { .. })));
}

// ============================================================================
// Normalization decision
// ============================================================================

#[test]
fn test_fully_compatible_source_remuxes() {
    let plan = plan_normalization(&web_probe(), &PrepConfig::default());
    assert_eq!(plan, NormalizationPlan::Remux);
}

#[test]
fn test_single_pixel_format_mismatch_forces_transcode() {
    let mut probe = web_probe();
    probe.pixel_format = "yuv422p".to_string();
    match plan_normalization(&probe, &PrepConfig::default()) {
        NormalizationPlan::Transcode {
            video_codec,
            crf,
            audio_codec,
            audio_bitrate,
            ..
        } => {
            assert_eq!(video_codec, "libx264");
            assert_eq!(crf, 18);
            assert_eq!(audio_codec, "aac");
            assert_eq!(audio_bitrate, "128k");
        }
        NormalizationPlan::Remux => panic!("pixel format mismatch must force a transcode"),
    }
}

#[test]
fn test_each_mismatch_dimension_forces_transcode() {
    let config = PrepConfig::default();

    let mut hevc = web_probe();
    hevc.video_codec = "hevc".to_string();
    assert!(matches!(
        plan_normalization(&hevc, &config),
        NormalizationPlan::Transcode { .. }
    ));

    let mut opus = web_probe();
    opus.audio_codec = "opus".to_string();
    assert!(matches!(
        plan_normalization(&opus, &config),
        NormalizationPlan::Transcode { .. }
    ));

    let mut mkv = web_probe();
    mkv.container_format = "matroska,webm".to_string();
    assert!(matches!(
        plan_normalization(&mkv, &config),
        NormalizationPlan::Transcode { .. }
    ));
}
