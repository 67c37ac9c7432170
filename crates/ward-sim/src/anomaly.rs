//! Top-N congestion hotspot extraction.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::CongestionGrid;

/// Hotspots reported per scenario.
pub const MAX_REPORTED: usize = 10;

/// One congested cell.
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct AnomalyPoint {
    pub row:        u16,
    pub col:        u16,
    pub congestion: f64,
}

/// The most congested cells of a run, strictly descending by value.
///
/// Ties break by row then column so the report is deterministic, and a
/// position never appears twice.  At most [`MAX_REPORTED`] entries.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnomalyReport {
    pub points: Vec<AnomalyPoint>,
}

impl AnomalyReport {
    /// Extract the `n` most congested non-zero cells from a heatmap.
    pub fn top_n(grid: &CongestionGrid, n: usize) -> AnomalyReport {
        let mut points: Vec<AnomalyPoint> = grid
            .cells()
            .filter(|&(_, _, v)| v > 0.0)
            .map(|(row, col, congestion)| AnomalyPoint { row, col, congestion })
            .collect();
        sort_descending(&mut points);
        points.truncate(n);
        AnomalyReport { points }
    }

    /// Tag cells whose congestion is an interquartile-range outlier.
    ///
    /// Quartiles are linear-interpolated over every cell of the heatmap,
    /// walls and dead zones included; a cell is tagged when its value
    /// exceeds `Q3 + 1.5 * IQR`.  A near-uniform heatmap tags nothing, in
    /// which case callers fall back to [`top_n`][Self::top_n].
    pub fn tag_outliers(grid: &CongestionGrid) -> Vec<AnomalyPoint> {
        if grid.values.is_empty() {
            return Vec::new();
        }
        let mut sorted = grid.values.clone();
        sorted.sort_by(f64::total_cmp);
        let q1 = percentile(&sorted, 0.25);
        let q3 = percentile(&sorted, 0.75);
        let upper = q3 + 1.5 * (q3 - q1);
        grid.cells()
            .filter(|&(_, _, v)| v > upper)
            .map(|(row, col, congestion)| AnomalyPoint { row, col, congestion })
            .collect()
    }

    /// Build a report from upstream-tagged points (which take precedence
    /// over heatmap extraction when present).
    ///
    /// Duplicated positions collapse to their highest value, and the same
    /// ordering and size cap as [`top_n`][Self::top_n] apply.
    pub fn from_tagged(tagged: Vec<AnomalyPoint>, n: usize) -> AnomalyReport {
        let mut best: FxHashMap<(u16, u16), f64> = FxHashMap::default();
        for p in tagged {
            best.entry((p.row, p.col))
                .and_modify(|v| *v = v.max(p.congestion))
                .or_insert(p.congestion);
        }
        let mut points: Vec<AnomalyPoint> = best
            .into_iter()
            .map(|((row, col), congestion)| AnomalyPoint { row, col, congestion })
            .collect();
        sort_descending(&mut points);
        points.truncate(n);
        AnomalyReport { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnomalyPoint> {
        self.points.iter()
    }
}

/// Linear-interpolated percentile of an ascending-sorted slice.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let rank = p * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let frac = rank - lo as f64;
    match sorted.get(lo + 1) {
        Some(&hi) => sorted[lo] + frac * (hi - sorted[lo]),
        None => sorted[lo],
    }
}

fn sort_descending(points: &mut [AnomalyPoint]) {
    points.sort_by(|a, b| {
        b.congestion
            .total_cmp(&a.congestion)
            .then(a.row.cmp(&b.row))
            .then(a.col.cmp(&b.col))
    });
}
