//! `ward-grid` — floor-plan grid model, pathfinding, and persistence.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                   |
//! |------------|------------------------------------------------------------|
//! | [`floor`]  | `CellKind`, `FloorPlan` (validated grid), reachability BFS |
//! | [`path`]   | `find_path` — A* with Manhattan heuristic                  |
//! | [`loader`] | Text-format parse/write (round-trippable)                  |
//! | [`error`]  | `GridError`, `Violation`, `GridResult<T>`                  |
//!
//! # Cell traversal rules
//!
//! These rules govern both validation and pathfinding:
//!
//! - `Wall` is never traversable.
//! - `Spawn`, `RoomLow`, and `RoomHigh` are traversable **only as a final
//!   destination** — never as a through-cell.
//! - `Empty` and `Waiting` are freely traversable.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                      |
//! |---------|-------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.          |

pub mod error;
pub mod floor;
pub mod loader;
pub mod path;


pub use error::{GridError, GridResult, Violation};
pub use floor::{CellKind, FloorPlan};
pub use loader::{parse_floor_file, parse_floor_reader, parse_floor_text, write_floor_text};
pub use path::{find_path, path_len};
