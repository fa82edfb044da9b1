//! Montage grid layout planning

use tracing::debug;

use crate::error::{PrepError, PrepResult};
use crate::planner::{MontageGridPlan, MontageTieBreak};

/// Compute the thumbnail grid geometry for a source duration.
///
/// One thumbnail per whole second of source (minimum 1). The column count is
/// searched over every value that keeps both canvas dimensions within
/// `max_dimension`; among feasible layouts the planner first minimizes empty
/// cells in the last row, then applies the configured tie-break, then prefers
/// fewer columns for determinism. A duration too long to fit at all is
/// rejected outright rather than truncated.
pub fn plan_montage(
    duration: f64,
    thumb_width: u32,
    thumb_height: u32,
    max_dimension: u32,
    tie_break: MontageTieBreak,
) -> PrepResult<MontageGridPlan> {
    if !duration.is_finite() || duration <= 0.0 {
        return Err(PrepError::InvalidDuration { seconds: duration });
    }
    if thumb_width == 0
        || thumb_height == 0
        || thumb_width > max_dimension
        || thumb_height > max_dimension
    {
        return Err(PrepError::MontageCellTooLarge {
            cell_width: thumb_width,
            cell_height: thumb_height,
            max_dimension,
        });
    }

    let thumb_count = (duration.floor() as u32).max(1);
    let max_columns = (max_dimension / thumb_width).min(thumb_count);

    let mut best: Option<Candidate> = None;
    for columns in 1..=max_columns {
        let rows = thumb_count.div_ceil(columns);
        if u64::from(rows) * u64::from(thumb_height) > u64::from(max_dimension) {
            continue;
        }
        let candidate = Candidate {
            waste: u64::from(columns) * u64::from(rows) - u64::from(thumb_count),
            score: tie_break_score(tie_break, columns, rows, thumb_width, thumb_height),
            columns,
            rows,
        };
        // Strict comparison keeps the smallest feasible column count on ties.
        if best
            .as_ref()
            .map(|b| (candidate.waste, candidate.score) < (b.waste, b.score))
            .unwrap_or(true)
        {
            best = Some(candidate);
        }
    }

    let chosen = best.ok_or(PrepError::MontageInfeasible {
        thumb_count,
        max_dimension,
    })?;
    debug!(
        "Montage layout: {} thumbs ({}x{}), grid {}x{}, {} empty cells",
        thumb_count, thumb_width, thumb_height, chosen.columns, chosen.rows, chosen.waste
    );
    Ok(MontageGridPlan {
        thumb_width,
        thumb_height,
        columns: chosen.columns,
        rows: chosen.rows,
        thumb_count,
    })
}

struct Candidate {
    waste: u64,
    score: u64,
    columns: u32,
    rows: u32,
}

fn tie_break_score(
    tie_break: MontageTieBreak,
    columns: u32,
    rows: u32,
    thumb_width: u32,
    thumb_height: u32,
) -> u64 {
    match tie_break {
        MontageTieBreak::NearSquarePixels => (i64::from(columns) * i64::from(thumb_width)
            - i64::from(rows) * i64::from(thumb_height))
        .unsigned_abs(),
        MontageTieBreak::SquareGrid => (i64::from(columns) - i64::from(rows)).unsigned_abs(),
    }
}
