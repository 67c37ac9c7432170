//! Scenario orchestration: runs, regimes, and the result contract.

use std::collections::BTreeMap;
use std::ops::ControlFlow;

use serde::{Deserialize, Serialize};
use ward_core::{CellPos, Severity, SimRng, StaffRole, Tick};
use ward_grid::FloorPlan;

use crate::{
    AnomalyReport, CongestionAccumulator, CongestionGrid, MAX_REPORTED, Regime, RegimeKind,
    ScenarioConfig, ScenarioObserver, SimResult, Ward,
};

#[cfg(feature = "parallel")]
use crate::NoopObserver;

// ── SimState ──────────────────────────────────────────────────────────────────

/// Final-state snapshot shipped alongside the heatmap.
///
/// The room map serializes with `"row,col"` string keys, the format the
/// downstream dashboard consumes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimState {
    pub spawn:   CellPos,
    pub waiting: CellPos,

    #[serde(with = "pos_key_map")]
    pub rooms: BTreeMap<CellPos, Severity>,

    /// Nurse positions at the final tick.
    pub nurses: Vec<CellPos>,
    /// Doctor positions at the final tick.
    pub doctors: Vec<CellPos>,
}

impl SimState {
    /// Snapshot a ward's geometry and current staff positions.
    pub fn capture(plan: &FloorPlan, ward: &Ward<'_>) -> SimState {
        SimState {
            spawn:   plan.spawn,
            waiting: plan.waiting,
            rooms:   ward
                .rooms
                .iter()
                .map(|(_, room)| (room.pos, room.severity))
                .collect(),
            nurses:  staff_positions(ward, StaffRole::Nurse),
            doctors: staff_positions(ward, StaffRole::Doctor),
        }
    }
}

fn staff_positions(ward: &Ward<'_>, role: StaffRole) -> Vec<CellPos> {
    ward.staff
        .iter()
        .filter(|s| s.role == role)
        .map(|s| s.pos)
        .collect()
}

/// `BTreeMap<CellPos, Severity>` ⇄ JSON object with `"row,col"` keys.
mod pos_key_map {
    use std::collections::BTreeMap;

    use serde::de::Error;
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serializer};
    use ward_core::{CellPos, Severity};

    pub fn serialize<S>(map: &BTreeMap<CellPos, Severity>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut out = serializer.serialize_map(Some(map.len()))?;
        for (pos, severity) in map {
            out.serialize_entry(&format!("{},{}", pos.row, pos.col), severity)?;
        }
        out.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BTreeMap<CellPos, Severity>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, Severity>::deserialize(deserializer)?;
        raw.into_iter()
            .map(|(key, severity)| {
                let (row, col) = key
                    .split_once(',')
                    .ok_or_else(|| D::Error::custom(format!("bad cell key {key:?}")))?;
                let row = row.trim().parse::<u16>().map_err(D::Error::custom)?;
                let col = col.trim().parse::<u16>().map_err(D::Error::custom)?;
                Ok((CellPos::new(row, col), severity))
            })
            .collect()
    }
}

// ── ScenarioResult ────────────────────────────────────────────────────────────

/// Everything one regime execution produces.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub regime: RegimeKind,

    /// The floor plan in its wire encoding, for rendering next to the
    /// heatmap.
    pub floor: Vec<Vec<i8>>,

    pub congestion: CongestionGrid,
    pub anomalies:  AnomalyReport,
    pub state:      SimState,
}

/// Both regimes over the same plan, seed, and staffing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegimeComparison {
    pub standard: ScenarioResult,
    pub mci:      ScenarioResult,
}

// ── Orchestration ─────────────────────────────────────────────────────────────

/// Run `config.runs` stochastic repetitions of one regime and aggregate
/// them into a single normalized heatmap.
///
/// Each run draws a child seed from the root seed, so the run sequence is
/// deterministic for a given `config.seed`.  Observers may abort between
/// ticks; an aborted run's samples are discarded and no further runs start.
pub fn run_scenario<O: ScenarioObserver>(
    plan:     &FloorPlan,
    config:   &ScenarioConfig,
    regime:   &Regime,
    observer: &mut O,
) -> SimResult<ScenarioResult> {
    config.validate()?;

    let mut root = SimRng::new(config.seed);
    let mut acc = CongestionAccumulator::new(plan.rows, plan.cols);
    let mut state = None;

    'runs: for run in 0..config.runs {
        let rng = root.child(u64::from(run));
        let mut ward = Ward::new(plan, config, regime, rng);
        let mut run_acc = CongestionAccumulator::new(plan.rows, plan.cols);

        for t in 0..config.total_ticks {
            let now = Tick(t);
            ward.tick(now, &mut run_acc)?;
            if let ControlFlow::Break(()) = observer.on_tick_end(now, ward.waiting_count()) {
                state = Some(SimState::capture(plan, &ward));
                break 'runs;
            }
        }

        acc.merge(run_acc);
        state = Some(SimState::capture(plan, &ward));
        observer.on_run_end(run);
    }
    observer.on_scenario_end(regime.kind);

    let congestion = acc.finish();
    let tagged = AnomalyReport::tag_outliers(&congestion);
    let anomalies = if tagged.is_empty() {
        AnomalyReport::top_n(&congestion, MAX_REPORTED)
    } else {
        AnomalyReport::from_tagged(tagged, MAX_REPORTED)
    };
    // `validate` guarantees runs >= 1, so the snapshot is always set; the
    // fallback keeps the signature honest without panicking.
    let state = state.unwrap_or_else(|| empty_state(plan));

    Ok(ScenarioResult {
        regime: regime.kind,
        floor: plan.code_matrix(),
        congestion,
        anomalies,
        state,
    })
}

fn empty_state(plan: &FloorPlan) -> SimState {
    SimState {
        spawn:   plan.spawn,
        waiting: plan.waiting,
        rooms:   plan.rooms().collect(),
        nurses:  plan.nurses.clone(),
        doctors: plan.doctors.clone(),
    }
}

/// Run the standard and MCI regimes side by side from the identical seed
/// and staffing.
///
/// The two executions share nothing but the (immutable) plan and config;
/// with the `parallel` feature they run concurrently via [`rayon::join`].
pub fn run_comparison(plan: &FloorPlan, config: &ScenarioConfig) -> SimResult<RegimeComparison> {
    let standard = Regime::standard(config);
    let mci = Regime::mci(config);

    #[cfg(feature = "parallel")]
    {
        let (standard, mci) = rayon::join(
            || run_scenario(plan, config, &standard, &mut NoopObserver),
            || run_scenario(plan, config, &mci, &mut NoopObserver),
        );
        Ok(RegimeComparison { standard: standard?, mci: mci? })
    }

    #[cfg(not(feature = "parallel"))]
    {
        let mut observer = crate::NoopObserver;
        Ok(RegimeComparison {
            standard: run_scenario(plan, config, &standard, &mut observer)?,
            mci:      run_scenario(plan, config, &mci, &mut observer)?,
        })
    }
}
