//! Grid-subsystem error types.
//!
//! Validation failures are fatal for the configuration and are collected
//! exhaustively: `GridError::Invalid` carries *every* violation found, not
//! just the first, so a layout can be fixed in one pass.

use thiserror::Error;

use ward_core::{CellPos, Severity, StaffRole};

/// One specific problem with a floor-plan configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("matrix is empty")]
    EmptyMatrix,

    #[error("matrix is not rectangular: row {row} has {got} columns, expected {expected}")]
    NotRectangular { row: usize, expected: usize, got: usize },

    #[error("unknown cell code {code} at {pos}")]
    UnknownCode { pos: CellPos, code: i8 },

    #[error("no spawn cell (code -1) in matrix")]
    MissingSpawn,

    #[error("more than one spawn cell: second at {0}")]
    DuplicateSpawn(CellPos),

    #[error("no waiting cell (code 1) in matrix")]
    MissingWaiting,

    #[error("more than one waiting cell: second at {0}")]
    DuplicateWaiting(CellPos),

    #[error("no {0}-severity rooms configured")]
    NoRooms(Severity),

    #[error("{severity}-severity room at {pos} is out of bounds")]
    RoomOutOfBounds { pos: CellPos, severity: Severity },

    #[error("{severity}-severity room at {pos} conflicts with matrix code {found}")]
    RoomCellMismatch { pos: CellPos, severity: Severity, found: i8 },

    #[error("matrix marks a {severity}-severity room at {pos} that is not in the room list")]
    UnlistedRoom { pos: CellPos, severity: Severity },

    #[error("{role} idle position {pos} is out of bounds")]
    StaffOutOfBounds { role: StaffRole, pos: CellPos },

    #[error("{role} idle position {pos} is not on a traversable cell")]
    StaffNotTraversable { role: StaffRole, pos: CellPos },

    #[error("spawn cell at {0} is unreachable from the waiting cell")]
    UnreachableSpawn(CellPos),

    #[error("{severity}-severity room at {pos} is unreachable from the waiting cell")]
    UnreachableRoom { pos: CellPos, severity: Severity },

    #[error("{role} idle position {pos} is unreachable from the waiting cell")]
    UnreachableStaff { role: StaffRole, pos: CellPos },
}

/// Errors produced by `ward-grid`.
#[derive(Debug, Error)]
pub enum GridError {
    /// The configuration failed validation.  Every violation is listed.
    #[error("invalid floor plan ({} violation{}): {}",
            .0.len(),
            if .0.len() == 1 { "" } else { "s" },
            join_violations(.0))]
    Invalid(Vec<Violation>),

    /// The text-format loader could not parse its input.
    #[error("parse error at line {line}: {msg}")]
    Parse { line: usize, msg: String },

    /// No traversable path exists between two cells.
    #[error("no path from {from} to {to}")]
    NoPath { from: CellPos, to: CellPos },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GridError {
    /// The violation list, if this is a validation error.
    pub fn violations(&self) -> &[Violation] {
        match self {
            GridError::Invalid(v) => v,
            _ => &[],
        }
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

pub type GridResult<T> = Result<T, GridError>;
