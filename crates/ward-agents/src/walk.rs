//! Shared one-cell-per-tick movement scaffolding.
//!
//! Patients and staff both carry a `PathWalk`: the ordered cells still to be
//! traversed toward the current destination.  Movement granularity is one
//! grid step per tick; agents sharing a cell is permitted (congestion is a
//! statistical signal, not a physical constraint).

use std::collections::VecDeque;

use ward_core::CellPos;

/// The remaining cells of an agent's current path, front = next step.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathWalk {
    remaining: VecDeque<CellPos>,
}

impl PathWalk {
    /// An empty walk: the agent is already where it needs to be.
    pub fn idle() -> Self {
        Self::default()
    }

    /// Adopt a pathfinder result.  Pathfinder paths include the start cell;
    /// a leading cell equal to `current` is dropped so the first `step`
    /// actually moves.
    pub fn follow(path: Vec<CellPos>, current: CellPos) -> Self {
        let mut remaining: VecDeque<CellPos> = path.into();
        if remaining.front() == Some(&current) {
            remaining.pop_front();
        }
        Self { remaining }
    }

    /// Advance the agent one cell.  Updates `pos` in place and returns
    /// `true` once the destination is reached (including the tick the last
    /// cell is stepped onto, and immediately for an already-empty walk).
    pub fn step(&mut self, pos: &mut CellPos) -> bool {
        if let Some(next) = self.remaining.pop_front() {
            *pos = next;
        }
        self.remaining.is_empty()
    }

    /// `true` when no steps remain.
    pub fn is_done(&self) -> bool {
        self.remaining.is_empty()
    }

    /// Steps left to the destination.
    pub fn len(&self) -> usize {
        self.remaining.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }
}
