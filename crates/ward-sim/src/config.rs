//! Scenario configuration and operating regimes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{SimError, SimResult};

// ── ScenarioConfig ────────────────────────────────────────────────────────────

/// Global knobs for one scenario execution.
///
/// The same config drives both regimes of a comparison; regime-specific
/// adjustments (arrival frequency, room capacity) live in [`Regime`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Ticks simulated per run.
    pub total_ticks: u64,

    /// Root RNG seed.  The same seed produces bit-identical results.
    pub seed: u64,

    /// Stochastic repetitions accumulated into one heatmap.
    pub runs: u32,

    /// A patient arrives every this-many ticks (the standard regime's rate;
    /// MCI halves it).
    pub arrival_interval_ticks: u64,

    /// Dwell window, in ticks, for a patient in a room — and for a staff
    /// member's treating window from its own arrival.
    pub treatment_ticks: u32,

    /// Probability a spawned patient is high-severity.
    pub p_high: f64,
}

impl ScenarioConfig {
    /// Reject configurations the scheduler cannot run.
    pub fn validate(&self) -> SimResult<()> {
        if self.total_ticks == 0 {
            return Err(SimError::Config("total_ticks must be at least 1".into()));
        }
        if self.runs == 0 {
            return Err(SimError::Config("runs must be at least 1".into()));
        }
        if self.arrival_interval_ticks == 0 {
            return Err(SimError::Config(
                "arrival_interval_ticks must be at least 1".into(),
            ));
        }
        if self.treatment_ticks == 0 {
            return Err(SimError::Config("treatment_ticks must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.p_high) {
            return Err(SimError::Config(format!(
                "p_high must be in [0, 1], got {}",
                self.p_high
            )));
        }
        Ok(())
    }
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            total_ticks:            500,
            seed:                   42,
            runs:                   1,
            arrival_interval_ticks: 5,
            treatment_ticks:        20,
            p_high:                 0.3,
        }
    }
}

// ── Regime ────────────────────────────────────────────────────────────────────

/// Which operating regime a result was produced under.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum RegimeKind {
    Standard,
    Mci,
}

impl fmt::Display for RegimeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegimeKind::Standard => write!(f, "standard"),
            RegimeKind::Mci => write!(f, "mci"),
        }
    }
}

/// Regime-specific overrides derived from a [`ScenarioConfig`].
///
/// MCI (mass-casualty incident) doubles arrival pressure — the interval is
/// halved, floored at one tick — and doubles high-severity room capacity.
/// Everything else is identical so the two heatmaps stay comparable.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Regime {
    pub kind:                   RegimeKind,
    pub arrival_interval_ticks: u64,
    pub high_room_capacity:     u8,
}

impl Regime {
    pub fn standard(config: &ScenarioConfig) -> Regime {
        Regime {
            kind:                   RegimeKind::Standard,
            arrival_interval_ticks: config.arrival_interval_ticks,
            high_room_capacity:     1,
        }
    }

    pub fn mci(config: &ScenarioConfig) -> Regime {
        Regime {
            kind:                   RegimeKind::Mci,
            arrival_interval_ticks: (config.arrival_interval_ticks / 2).max(1),
            high_room_capacity:     2,
        }
    }
}
