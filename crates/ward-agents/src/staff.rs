//! Staff (nurse/doctor) state machine.
//!
//! Staff are created once at setup from configured idle positions and
//! persist for the whole run, cycling:
//!
//! ```text
//! Idle → EnRouteToPatient → Treating → EnRouteToIdle → Idle
//! ```

use ward_core::{CellPos, RoomId, StaffId, StaffRole};

use crate::walk::PathWalk;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StaffPhase {
    /// At (or heading back to and now standing on) the idle position,
    /// available for matching.
    Idle,
    /// Matched to a treatment in `room`; walking there.
    EnRouteToPatient { room: RoomId },
    /// At `room`, treating; returns home when `remaining` reaches zero.
    Treating { room: RoomId, remaining: u32 },
    /// Walking back to the idle position.
    EnRouteToIdle,
}

/// One staff member.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Staff {
    pub id: StaffId,
    pub role: StaffRole,
    pub pos: CellPos,
    /// The "home" cell returned to when not assigned.
    pub idle_pos: CellPos,
    pub phase: StaffPhase,
    pub walk: PathWalk,
}

impl Staff {
    /// A staff member standing idle at its configured home cell.
    pub fn at_idle(id: StaffId, role: StaffRole, idle_pos: CellPos) -> Self {
        Self {
            id,
            role,
            pos: idle_pos,
            idle_pos,
            phase: StaffPhase::Idle,
            walk: PathWalk::idle(),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.phase == StaffPhase::Idle
    }
}
