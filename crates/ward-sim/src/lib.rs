//! `ward-sim` — the wardflow simulation engine.
//!
//! # Five-phase tick loop
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   ① Spawn      — on the arrival schedule, a patient appears at Spawn.
//!   ② Patients   — movers advance one cell; arrivals enqueue / admit /
//!                  post staff demands; dwell expiry discharges.
//!   ③ Assignment — high queue then low: match queue heads to the nearest
//!                  free room by path length; reserve capacity.
//!   ④ Staff      — movers advance, treating windows count down; then open
//!                  demands match the nearest idle staff of their role.
//!   ⑤ Sample     — +1 per occupied cell into the congestion accumulator.
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                   |
//! |------------|----------------------------------------------------------|
//! | `parallel` | Runs the two regimes of a comparison on Rayon's pool.    |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ward_grid::parse_floor_text;
//! use ward_sim::{ScenarioConfig, run_comparison};
//!
//! let plan = parse_floor_text(&layout)?;
//! let comparison = run_comparison(&plan, &ScenarioConfig::default())?;
//! println!("standard mean {:.4}", comparison.standard.congestion.mean());
//! println!("mci      mean {:.4}", comparison.mci.congestion.mean());
//! ```

pub mod anomaly;
pub mod config;
pub mod congestion;
pub mod error;
pub mod observer;
pub mod scenario;
pub mod ward;

#[cfg(test)]
mod tests;

pub use anomaly::{AnomalyPoint, AnomalyReport, MAX_REPORTED};
pub use config::{Regime, RegimeKind, ScenarioConfig};
pub use congestion::{CongestionAccumulator, CongestionGrid};
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, ScenarioObserver};
pub use scenario::{RegimeComparison, ScenarioResult, SimState, run_comparison, run_scenario};
pub use ward::Ward;
