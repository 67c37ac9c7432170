//! `ward-agents` — the people and rooms of the simulation.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`walk`]    | `PathWalk` — one-cell-per-tick path consumption           |
//! | [`patient`] | `Patient` + `PatientPhase` lifecycle                      |
//! | [`staff`]   | `Staff` + `StaffPhase` lifecycle                          |
//! | [`rooms`]   | `TreatmentRoom`, `RoomBoard` arena with capacity discipline |
//! | [`queue`]   | `WaitingQueue` — FIFO per severity class                  |
//! | [`error`]   | `AgentError`, `AgentResult<T>`                            |
//!
//! The state machines here hold data and enforce local invariants (room
//! capacity, legal phase transitions); the per-tick *ordering* that makes
//! the whole simulation deterministic lives in `ward-sim`.

pub mod error;
pub mod patient;
pub mod queue;
pub mod rooms;
pub mod staff;
pub mod walk;

#[cfg(test)]
mod tests;

pub use error::{AgentError, AgentResult};
pub use patient::{Patient, PatientPhase};
pub use queue::WaitingQueue;
pub use rooms::{RoomBoard, TreatmentRoom};
pub use staff::{Staff, StaffPhase};
pub use walk::PathWalk;
