//! Floor-plan representation and validating loader.
//!
//! # Data layout
//!
//! Cells live in a flat row-major `Vec<CellKind>`; `CellPos::index(cols)`
//! gives O(1) lookup with no bounds arithmetic beyond the multiply.  The
//! plan is immutable for the duration of a run: the scheduler mutates room
//! occupancy elsewhere, never the grid itself.
//!
//! # Validation
//!
//! [`FloorPlan::load`] is the only constructor.  It checks matrix shape,
//! the spawn/waiting singletons, room-list consistency, staff placement,
//! and reachability (BFS from Waiting under the destination-only traversal
//! rules), and returns *all* violations at once.

use std::collections::VecDeque;

use ward_core::{CellPos, Severity, StaffRole};

use crate::error::{GridError, GridResult, Violation};

// ── CellKind ──────────────────────────────────────────────────────────────────

/// Classification of one grid cell.  Fixed for the duration of a run.
///
/// Wire encoding (shared with the layout editor and the text format):
///
/// | Code | Kind       |
/// |------|------------|
/// | `-2` | `Wall`     |
/// | `-1` | `Spawn`    |
/// |  `0` | `Empty`    |
/// |  `1` | `Waiting`  |
/// |  `4` | `RoomLow`  |
/// |  `5` | `RoomHigh` |
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellKind {
    Wall,
    Spawn,
    Empty,
    Waiting,
    RoomLow,
    RoomHigh,
}

impl CellKind {
    /// Decode a wire code.  Returns `None` for unknown codes.
    pub fn from_code(code: i8) -> Option<CellKind> {
        match code {
            -2 => Some(CellKind::Wall),
            -1 => Some(CellKind::Spawn),
            0 => Some(CellKind::Empty),
            1 => Some(CellKind::Waiting),
            c if c == Severity::Low.room_code() => Some(CellKind::RoomLow),
            c if c == Severity::High.room_code() => Some(CellKind::RoomHigh),
            _ => None,
        }
    }

    /// The wire code for this kind.
    pub fn code(self) -> i8 {
        match self {
            CellKind::Wall => -2,
            CellKind::Spawn => -1,
            CellKind::Empty => 0,
            CellKind::Waiting => 1,
            CellKind::RoomLow => Severity::Low.room_code(),
            CellKind::RoomHigh => Severity::High.room_code(),
        }
    }

    /// `true` for cells that may only terminate a path, never be crossed.
    #[inline]
    pub fn is_destination_only(self) -> bool {
        matches!(self, CellKind::Spawn | CellKind::RoomLow | CellKind::RoomHigh)
    }

    /// `true` for cells an agent may stand on while passing through.
    #[inline]
    pub fn is_through(self) -> bool {
        matches!(self, CellKind::Empty | CellKind::Waiting)
    }

    /// The room severity, if this kind is a treatment room.
    pub fn room_severity(self) -> Option<Severity> {
        match self {
            CellKind::RoomLow => Some(Severity::Low),
            CellKind::RoomHigh => Some(Severity::High),
            _ => None,
        }
    }
}

// ── FloorPlan ─────────────────────────────────────────────────────────────────

/// A validated, immutable floor plan.
///
/// Fields are `pub` for direct indexed access on hot paths.  Do not
/// construct directly; use [`FloorPlan::load`] (or the text-format loader in
/// [`crate::loader`]), which guarantee every invariant below:
///
/// - the matrix is rectangular and non-empty;
/// - exactly one `Spawn` and one `Waiting` cell exist;
/// - at least one room of each severity exists, and the room lists agree
///   with the matrix marks;
/// - every room and every staff idle position is reachable from `Waiting`
///   under the destination-only traversal rules.
#[derive(Clone, Debug)]
pub struct FloorPlan {
    pub rows: u16,
    pub cols: u16,
    /// Row-major cell classification.  Length = `rows * cols`.
    pub cells: Vec<CellKind>,

    pub spawn: CellPos,
    pub waiting: CellPos,

    /// Low-severity room positions, in configured order.
    pub low_rooms: Vec<CellPos>,
    /// High-severity room positions, in configured order.
    pub high_rooms: Vec<CellPos>,

    /// Nurse idle positions, in configured order.  May be empty.
    pub nurses: Vec<CellPos>,
    /// Doctor idle positions, in configured order.  May be empty.
    pub doctors: Vec<CellPos>,
}

impl FloorPlan {
    /// Validate a raw configuration and build a `FloorPlan`.
    ///
    /// `matrix` uses the [`CellKind`] wire encoding.  A room listed in
    /// `low_rooms`/`high_rooms` whose matrix cell is `0` or `-2` is marked
    /// as that room kind — the layout editor emits listed rooms as empty
    /// cells or draws them into the perimeter wall.  A spawn, waiting, or
    /// differently-classed room cell at a listed position is a violation.
    ///
    /// On failure, returns [`GridError::Invalid`] carrying **every**
    /// violation found, so the caller can fix the layout in one pass.
    pub fn load(
        matrix: &[Vec<i8>],
        low_rooms: &[CellPos],
        high_rooms: &[CellPos],
        nurses: &[CellPos],
        doctors: &[CellPos],
    ) -> GridResult<FloorPlan> {
        let mut violations = Vec::new();

        // ── Shape ─────────────────────────────────────────────────────────
        if matrix.is_empty() || matrix[0].is_empty() {
            violations.push(Violation::EmptyMatrix);
            return Err(GridError::Invalid(violations));
        }
        let rows = matrix.len();
        let cols = matrix[0].len();
        for (r, row) in matrix.iter().enumerate() {
            if row.len() != cols {
                violations.push(Violation::NotRectangular {
                    row: r,
                    expected: cols,
                    got: row.len(),
                });
            }
        }
        if !violations.is_empty() {
            // A ragged matrix poisons every later check; stop at shape.
            return Err(GridError::Invalid(violations));
        }
        let rows = rows as u16;
        let cols = cols as u16;

        // ── Decode cells, locate spawn and waiting ────────────────────────
        let mut cells = vec![CellKind::Empty; rows as usize * cols as usize];
        let mut spawn = None;
        let mut waiting = None;

        for r in 0..rows {
            for c in 0..cols {
                let pos = CellPos::new(r, c);
                let code = matrix[r as usize][c as usize];
                let kind = match CellKind::from_code(code) {
                    Some(k) => k,
                    None => {
                        violations.push(Violation::UnknownCode { pos, code });
                        continue;
                    }
                };
                cells[pos.index(cols)] = kind;
                match kind {
                    CellKind::Spawn => match spawn {
                        None => spawn = Some(pos),
                        Some(_) => violations.push(Violation::DuplicateSpawn(pos)),
                    },
                    CellKind::Waiting => match waiting {
                        None => waiting = Some(pos),
                        Some(_) => violations.push(Violation::DuplicateWaiting(pos)),
                    },
                    _ => {}
                }
            }
        }
        if spawn.is_none() {
            violations.push(Violation::MissingSpawn);
        }
        if waiting.is_none() {
            violations.push(Violation::MissingWaiting);
        }

        // ── Mark rooms from the lists and cross-check the matrix ──────────
        if low_rooms.is_empty() {
            violations.push(Violation::NoRooms(Severity::Low));
        }
        if high_rooms.is_empty() {
            violations.push(Violation::NoRooms(Severity::High));
        }
        for (list, severity) in [(low_rooms, Severity::Low), (high_rooms, Severity::High)] {
            for &pos in list {
                if pos.row >= rows || pos.col >= cols {
                    violations.push(Violation::RoomOutOfBounds { pos, severity });
                    continue;
                }
                let slot = &mut cells[pos.index(cols)];
                let expected = match severity {
                    Severity::Low => CellKind::RoomLow,
                    Severity::High => CellKind::RoomHigh,
                };
                if *slot == CellKind::Empty || *slot == CellKind::Wall {
                    // The layout editor leaves listed rooms as 0, or draws
                    // them over the perimeter wall; the list is authoritative.
                    *slot = expected;
                } else if *slot != expected {
                    violations.push(Violation::RoomCellMismatch {
                        pos,
                        severity,
                        found: slot.code(),
                    });
                }
            }
        }
        // Rooms marked in the matrix must also appear in a list, or the
        // scheduler would route patients to rooms with no capacity record.
        for r in 0..rows {
            for c in 0..cols {
                let pos = CellPos::new(r, c);
                if let Some(severity) = cells[pos.index(cols)].room_severity() {
                    let list = match severity {
                        Severity::Low => low_rooms,
                        Severity::High => high_rooms,
                    };
                    if !list.contains(&pos) {
                        violations.push(Violation::UnlistedRoom { pos, severity });
                    }
                }
            }
        }

        // ── Staff placement ───────────────────────────────────────────────
        for (list, role) in [(nurses, StaffRole::Nurse), (doctors, StaffRole::Doctor)] {
            for &pos in list {
                if pos.row >= rows || pos.col >= cols {
                    violations.push(Violation::StaffOutOfBounds { role, pos });
                } else if !cells[pos.index(cols)].is_through() {
                    violations.push(Violation::StaffNotTraversable { role, pos });
                }
            }
        }

        // ── Reachability from Waiting ─────────────────────────────────────
        //
        // Only run once the structural checks hold; BFS over a grid with a
        // missing waiting cell or out-of-bounds rooms has nothing to say.
        if violations.is_empty() {
            let waiting = waiting.expect("checked above");
            let reached = reachable_from(&cells, rows, cols, waiting);

            // Movement over through cells is symmetric, so spawn reached
            // from waiting means arrivals can reach the waiting cell.
            let spawn = spawn.expect("checked above");
            if !reached[spawn.index(cols)] {
                violations.push(Violation::UnreachableSpawn(spawn));
            }
            for (list, severity) in [(low_rooms, Severity::Low), (high_rooms, Severity::High)] {
                for &pos in list {
                    if !reached[pos.index(cols)] {
                        violations.push(Violation::UnreachableRoom { pos, severity });
                    }
                }
            }
            for (list, role) in [(nurses, StaffRole::Nurse), (doctors, StaffRole::Doctor)] {
                for &pos in list {
                    if !reached[pos.index(cols)] {
                        violations.push(Violation::UnreachableStaff { role, pos });
                    }
                }
            }
        }

        if !violations.is_empty() {
            return Err(GridError::Invalid(violations));
        }

        Ok(FloorPlan {
            rows,
            cols,
            cells,
            spawn: spawn.expect("checked above"),
            waiting: waiting.expect("checked above"),
            low_rooms: low_rooms.to_vec(),
            high_rooms: high_rooms.to_vec(),
            nurses: nurses.to_vec(),
            doctors: doctors.to_vec(),
        })
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// The classification of `pos`.
    ///
    /// # Panics
    /// Panics if `pos` is out of bounds — callers hold validated positions.
    #[inline]
    pub fn cell(&self, pos: CellPos) -> CellKind {
        self.cells[pos.index(self.cols)]
    }

    #[inline]
    pub fn in_bounds(&self, pos: CellPos) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    /// Total cell count (`rows * cols`).
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Room positions of both severities: low-severity list first, each in
    /// configured order.
    pub fn rooms(&self) -> impl Iterator<Item = (CellPos, Severity)> + '_ {
        self.low_rooms
            .iter()
            .map(|&p| (p, Severity::Low))
            .chain(self.high_rooms.iter().map(|&p| (p, Severity::High)))
    }

    /// Rebuild the wire-encoded integer matrix (the floor-plan half of the
    /// engine's output contract).
    pub fn code_matrix(&self) -> Vec<Vec<i8>> {
        (0..self.rows)
            .map(|r| {
                (0..self.cols)
                    .map(|c| self.cell(CellPos::new(r, c)).code())
                    .collect()
            })
            .collect()
    }
}

// ── Reachability BFS ──────────────────────────────────────────────────────────

/// Breadth-first reachability from `start` under the traversal rules:
/// walls block, destination-only cells are marked reached but never
/// expanded.  Returns a row-major reached mask.
fn reachable_from(cells: &[CellKind], rows: u16, cols: u16, start: CellPos) -> Vec<bool> {
    let mut reached = vec![false; cells.len()];
    let mut queue = VecDeque::new();

    reached[start.index(cols)] = true;
    queue.push_back(start);

    while let Some(pos) = queue.pop_front() {
        for next in pos.neighbors4(rows, cols) {
            let idx = next.index(cols);
            if reached[idx] {
                continue;
            }
            let kind = cells[idx];
            if kind == CellKind::Wall {
                continue;
            }
            reached[idx] = true;
            if !kind.is_destination_only() {
                queue.push_back(next);
            }
        }
    }

    reached
}
