//! Per-tick congestion accumulation and the normalized heatmap.
//!
//! Each tick contributes `+1` to every cell holding at least one agent —
//! one increment per cell, however many agents share it.  Sums only ever
//! grow; normalization happens once, at [`CongestionAccumulator::finish`],
//! dividing by the total number of sampled ticks across all accumulated
//! runs.  Values therefore land in `[0, 1]`: the fraction of sampled ticks
//! the cell was occupied.

use serde::{Deserialize, Serialize};
use ward_core::CellPos;

// ── CongestionAccumulator ─────────────────────────────────────────────────────

/// Running occupancy sums for one floor plan, across any number of runs.
#[derive(Clone, Debug)]
pub struct CongestionAccumulator {
    rows:    u16,
    cols:    u16,
    sums:    Vec<f64>,
    /// Ticks sampled so far.  One `sample` call per tick; merged
    /// accumulators add their counts, so this is `ticks × runs` overall.
    samples: u64,
}

impl CongestionAccumulator {
    pub fn new(rows: u16, cols: u16) -> Self {
        Self {
            rows,
            cols,
            sums: vec![0.0; rows as usize * cols as usize],
            samples: 0,
        }
    }

    /// Record one tick's occupied cells.  Callers pass each occupied cell
    /// at most once (the scheduler collects them into a set first).
    pub fn sample<I>(&mut self, occupied: I)
    where
        I: IntoIterator<Item = CellPos>,
    {
        for pos in occupied {
            self.sums[pos.index(self.cols)] += 1.0;
        }
        self.samples += 1;
    }

    /// Fold another run's sums into this accumulator.
    ///
    /// Aborted runs are simply never merged, which is how partial
    /// accumulation gets discarded.
    pub fn merge(&mut self, other: CongestionAccumulator) {
        debug_assert_eq!((self.rows, self.cols), (other.rows, other.cols));
        for (sum, o) in self.sums.iter_mut().zip(other.sums) {
            *sum += o;
        }
        self.samples += other.samples;
    }

    pub fn samples(&self) -> u64 {
        self.samples
    }

    /// Normalize into a [`CongestionGrid`].  With zero sampled ticks the
    /// grid is all zeros.
    pub fn finish(self) -> CongestionGrid {
        let divisor = if self.samples == 0 { 1.0 } else { self.samples as f64 };
        CongestionGrid {
            rows:   self.rows,
            cols:   self.cols,
            values: self.sums.into_iter().map(|s| s / divisor).collect(),
        }
    }
}

// ── CongestionGrid ────────────────────────────────────────────────────────────

/// A time-averaged occupancy heatmap with the floor plan's shape.
///
/// `values[row * cols + col]` ∈ `[0, 1]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CongestionGrid {
    pub rows:   u16,
    pub cols:   u16,
    /// Row-major.  Length = `rows * cols`.
    pub values: Vec<f64>,
}

impl CongestionGrid {
    #[inline]
    pub fn value(&self, row: u16, col: u16) -> f64 {
        self.values[row as usize * self.cols as usize + col as usize]
    }

    /// Mean over all cells (walls included, as zeros).
    pub fn mean(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }

    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }

    /// All cells as `(row, col, value)` in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (u16, u16, f64)> + '_ {
        let cols = self.cols;
        self.values.iter().enumerate().map(move |(i, &v)| {
            ((i / cols as usize) as u16, (i % cols as usize) as u16, v)
        })
    }
}
