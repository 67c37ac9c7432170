//! Agent-subsystem error types.
//!
//! These errors indicate scheduler bugs, not recoverable runtime conditions:
//! validated floor plans and the deterministic per-tick ordering are supposed
//! to make them impossible.  `ward-sim` surfaces them as invariant violations.

use thiserror::Error;

use ward_core::{CellPos, PatientId, RoomId};

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("room {room} at {pos} is at capacity {capacity}")]
    RoomFull { room: RoomId, pos: CellPos, capacity: u8 },

    #[error("room {room} has no inbound reservation to consume")]
    NoReservation { room: RoomId },

    #[error("patient {patient} is not an occupant of room {room}")]
    NotAnOccupant { patient: PatientId, room: RoomId },
}

pub type AgentResult<T> = Result<T, AgentError>;
