//! Grid coordinates.
//!
//! A floor plan is a dense `rows × cols` matrix, so a cell position is just a
//! `(row, col)` pair of `u16`s.  `CellPos` is 4 bytes, `Copy`, and orders
//! row-major, which gives every "sort by position" tie-break in the engine a
//! single canonical answer.

use std::fmt;

/// One grid coordinate on the floor plan.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellPos {
    pub row: u16,
    pub col: u16,
}

impl CellPos {
    pub fn new(row: u16, col: u16) -> Self {
        Self { row, col }
    }

    /// Flat index into a row-major `rows × cols` matrix.
    #[inline(always)]
    pub fn index(self, cols: u16) -> usize {
        self.row as usize * cols as usize + self.col as usize
    }

    /// Manhattan (L1) distance to `other` — the pathfinder's heuristic and
    /// the lower bound on any 4-directional path length.
    #[inline]
    pub fn manhattan(self, other: CellPos) -> u32 {
        self.row.abs_diff(other.row) as u32 + self.col.abs_diff(other.col) as u32
    }

    /// The in-bounds 4-neighborhood of this cell, in the engine's fixed
    /// visitation order: up, down, left, right.
    ///
    /// The order is a contract, not a convenience — equal-length paths are
    /// tie-broken by which neighbor is explored first, so changing it
    /// changes pathfinder output.
    pub fn neighbors4(self, rows: u16, cols: u16) -> impl Iterator<Item = CellPos> {
        let CellPos { row, col } = self;
        [
            (row.checked_sub(1), Some(col)),
            (row.checked_add(1), Some(col)),
            (Some(row), col.checked_sub(1)),
            (Some(row), col.checked_add(1)),
        ]
        .into_iter()
        .filter_map(move |(r, c)| match (r, c) {
            (Some(r), Some(c)) if r < rows && c < cols => Some(CellPos::new(r, c)),
            _ => None,
        })
    }
}

impl From<(u16, u16)> for CellPos {
    fn from((row, col): (u16, u16)) -> Self {
        CellPos::new(row, col)
    }
}

impl fmt::Display for CellPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
