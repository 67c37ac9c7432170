//! `ward-core` — foundational types for the `wardflow` ED congestion simulator.
//!
//! This crate is a dependency of every other `ward-*` crate.  It intentionally
//! has no `ward-*` dependencies and minimal external ones (only `rand`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module       | Contents                                              |
//! |--------------|-------------------------------------------------------|
//! | [`ids`]      | `PatientId`, `StaffId`, `RoomId`                      |
//! | [`cell`]     | `CellPos`, Manhattan distance, 4-neighbor iteration   |
//! | [`time`]     | `Tick`                                                |
//! | [`rng`]      | `SimRng` (deterministic per-run stream)               |
//! | [`severity`] | `Severity` enum and its wire codes                    |
//! | [`role`]     | `StaffRole` (nurse / doctor)                          |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod cell;
pub mod ids;
pub mod rng;
pub mod role;
pub mod severity;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use cell::CellPos;
pub use ids::{PatientId, RoomId, StaffId};
pub use rng::SimRng;
pub use role::StaffRole;
pub use severity::Severity;
pub use time::Tick;
