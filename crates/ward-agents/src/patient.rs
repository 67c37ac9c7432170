//! Patient state machine.
//!
//! Lifecycle:
//!
//! ```text
//! Spawned → EnRouteToWaiting → Waiting → EnRouteToRoom → InTreatment → Discharged
//! ```
//!
//! `Spawned` is momentary: the scheduler computes the path to Waiting on the
//! spawn tick and immediately promotes the patient.  `Discharged` patients
//! are removed from the active set at the end of the tick that produced the
//! transition.

use ward_core::{CellPos, PatientId, RoomId, Severity};

use crate::walk::PathWalk;

/// Where a patient is in its lifecycle.  Room-bound phases carry the room
/// the patient was assigned to; `InTreatment` counts down the dwell window.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PatientPhase {
    /// Just created at the spawn cell; no path computed yet.
    Spawned,
    /// Walking from spawn to the waiting cell.
    EnRouteToWaiting,
    /// Queued at the waiting cell for a room of the patient's severity.
    Waiting,
    /// Assigned to `room` and walking there (capacity already reserved).
    EnRouteToRoom { room: RoomId },
    /// Occupying `room`; discharged when `remaining` reaches zero.
    InTreatment { room: RoomId, remaining: u32 },
    /// Treatment complete; removed from the active set this tick.
    Discharged,
}

/// One patient.  Created at the spawn cell, destroyed at discharge.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Patient {
    pub id: PatientId,
    /// Acuity class, drawn at spawn from the configured distribution.
    pub severity: Severity,
    pub pos: CellPos,
    pub phase: PatientPhase,
    pub walk: PathWalk,
}

impl Patient {
    /// A freshly spawned patient standing on the spawn cell.
    pub fn spawn(id: PatientId, severity: Severity, spawn_cell: CellPos) -> Self {
        Self {
            id,
            severity,
            pos: spawn_cell,
            phase: PatientPhase::Spawned,
            walk: PathWalk::idle(),
        }
    }

    /// `true` while the patient occupies a grid cell that congestion
    /// sampling should count (every phase before removal).
    pub fn occupies_cell(&self) -> bool {
        self.phase != PatientPhase::Discharged
    }

    /// The room this patient is assigned to or occupying, if any.
    pub fn room(&self) -> Option<RoomId> {
        match self.phase {
            PatientPhase::EnRouteToRoom { room } | PatientPhase::InTreatment { room, .. } => {
                Some(room)
            }
            _ => None,
        }
    }
}
