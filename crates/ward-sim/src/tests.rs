//! Unit tests for ward-sim.

use std::ops::ControlFlow;

use ward_core::{CellPos, PatientId, RoomId, SimRng, Tick};
use ward_grid::FloorPlan;

use crate::{
    AnomalyPoint, AnomalyReport, CongestionAccumulator, CongestionGrid, NoopObserver, Regime,
    RegimeKind, ScenarioConfig, ScenarioObserver, SimError, Ward, run_comparison, run_scenario,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn example_matrix() -> Vec<Vec<i8>> {
    vec![
        vec![-1, 1, -2, -2, -2],
        vec![-2, 0, 0, 0, -2],
        vec![-2, 0, 0, 0, -2],
        vec![-2, 0, 0, 0, -2],
    ]
}

/// The worked 4×5 example: low room (1,0), high room (3,4), one nurse and
/// one doctor on the open floor.
fn example_plan() -> FloorPlan {
    FloorPlan::load(
        &example_matrix(),
        &[CellPos::new(1, 0)],
        &[CellPos::new(3, 4)],
        &[CellPos::new(2, 2)],
        &[CellPos::new(3, 2)],
    )
    .unwrap()
}

fn config(total_ticks: u64, arrival: u64, treatment: u32, p_high: f64) -> ScenarioConfig {
    ScenarioConfig {
        total_ticks,
        seed: 7,
        runs: 1,
        arrival_interval_ticks: arrival,
        treatment_ticks: treatment,
        p_high,
    }
}

// ── Config & regimes ──────────────────────────────────────────────────────────

mod config_checks {
    use super::*;

    #[test]
    fn default_config_validates() {
        ScenarioConfig::default().validate().unwrap();
    }

    #[test]
    fn zero_ticks_rejected() {
        let bad = config(0, 5, 20, 0.3);
        assert!(matches!(bad.validate(), Err(SimError::Config(_))));
    }

    #[test]
    fn out_of_range_p_high_rejected() {
        let bad = config(10, 5, 20, 1.5);
        assert!(matches!(bad.validate(), Err(SimError::Config(_))));
    }

    #[test]
    fn mci_halves_arrival_interval_floored_at_one() {
        let base = config(10, 6, 20, 0.3);
        assert_eq!(Regime::mci(&base).arrival_interval_ticks, 3);

        let tight = config(10, 1, 20, 0.3);
        assert_eq!(Regime::mci(&tight).arrival_interval_ticks, 1);
    }

    #[test]
    fn mci_doubles_high_room_capacity() {
        let base = config(10, 6, 20, 0.3);
        assert_eq!(Regime::standard(&base).high_room_capacity, 1);
        assert_eq!(Regime::mci(&base).high_room_capacity, 2);
    }
}

// ── Congestion accumulation ───────────────────────────────────────────────────

mod congestion {
    use super::*;

    #[test]
    fn finish_normalizes_by_sampled_ticks() {
        let mut acc = CongestionAccumulator::new(2, 2);
        acc.sample([CellPos::new(0, 0), CellPos::new(1, 1)]);
        acc.sample([CellPos::new(0, 0)]);
        acc.sample([CellPos::new(0, 0), CellPos::new(0, 1)]);
        acc.sample([]);

        let grid = acc.finish();
        assert_eq!(grid.value(0, 0), 0.75);
        assert_eq!(grid.value(0, 1), 0.25);
        assert_eq!(grid.value(1, 0), 0.0);
        assert_eq!(grid.value(1, 1), 0.25);
    }

    #[test]
    fn merge_pools_runs_before_normalizing() {
        let mut a = CongestionAccumulator::new(1, 2);
        a.sample([CellPos::new(0, 0)]);
        a.sample([CellPos::new(0, 0)]);

        let mut b = CongestionAccumulator::new(1, 2);
        b.sample([CellPos::new(0, 1)]);
        b.sample([CellPos::new(0, 1)]);

        a.merge(b);
        assert_eq!(a.samples(), 4);
        let grid = a.finish();
        assert_eq!(grid.value(0, 0), 0.5);
        assert_eq!(grid.value(0, 1), 0.5);
    }

    #[test]
    fn zero_samples_finish_to_zeros() {
        let grid = CongestionAccumulator::new(3, 3).finish();
        assert_eq!(grid.max(), 0.0);
        assert_eq!(grid.mean(), 0.0);
    }

    #[test]
    fn raw_accumulation_scales_with_tick_count() {
        // With p_high = 0 the run draws nothing from the RNG, and arrival
        // interval 12 with treatment 4 settles the example floor into an
        // exact 12-tick cycle with no queue buildup.  Summed raw occupancy
        // (normalized mean times sampled ticks) must therefore double when
        // the tick count doubles, up to the startup transient.
        let plan = example_plan();
        let raw_sum = |ticks: u64| {
            let cfg = config(ticks, 12, 4, 0.0);
            let regime = Regime::standard(&cfg);
            let result = run_scenario(&plan, &cfg, &regime, &mut NoopObserver).unwrap();
            result.congestion.values.iter().sum::<f64>() * ticks as f64
        };

        let short = raw_sum(240);
        let long = raw_sum(480);
        assert!(short > 0.0);
        let ratio = long / short;
        assert!((1.9..2.1).contains(&ratio), "ratio {ratio}");
    }
}

// ── Anomaly extraction ────────────────────────────────────────────────────────

mod anomaly {
    use super::*;

    fn grid(values: Vec<f64>, cols: u16) -> CongestionGrid {
        let rows = (values.len() / cols as usize) as u16;
        CongestionGrid { rows, cols, values }
    }

    #[test]
    fn top_n_sorts_descending_and_drops_zeros() {
        let g = grid(vec![0.0, 0.4, 0.9, 0.0, 0.4, 0.1], 3);
        let report = AnomalyReport::top_n(&g, 10);

        let cells: Vec<(u16, u16)> = report.iter().map(|p| (p.row, p.col)).collect();
        // 0.9 first; the 0.4 tie breaks by row then col.
        assert_eq!(cells, vec![(0, 2), (0, 1), (1, 1), (1, 2)]);
        for pair in report.points.windows(2) {
            assert!(pair[0].congestion >= pair[1].congestion);
        }
    }

    #[test]
    fn top_n_caps_the_report() {
        let g = grid((1..=20).map(|i| i as f64 / 20.0).collect(), 5);
        let report = AnomalyReport::top_n(&g, 10);
        assert_eq!(report.len(), 10);
        assert_eq!(report.points[0].congestion, 1.0);
    }

    #[test]
    fn iqr_tagging_flags_only_the_high_tail() {
        // Quartiles of the sorted values interpolate to Q1 = 0.2075 and
        // Q3 = 0.2425, so the fences sit at 0.155 and 0.295: the 5.0 spike
        // is tagged, the 0.10 dip below the lower fence is not a hotspot.
        let g = grid(vec![0.10, 0.20, 0.21, 0.22, 0.23, 0.24, 0.25, 5.0], 4);
        let tagged = AnomalyReport::tag_outliers(&g);
        assert_eq!(tagged, vec![AnomalyPoint { row: 1, col: 3, congestion: 5.0 }]);
    }

    #[test]
    fn uniform_heatmap_tags_nothing() {
        // Zero spread collapses both fences onto the shared value.
        let g = grid(vec![0.3; 8], 4);
        assert!(AnomalyReport::tag_outliers(&g).is_empty());
    }

    #[test]
    fn from_tagged_collapses_duplicates_to_highest() {
        let tagged = vec![
            AnomalyPoint { row: 1, col: 1, congestion: 0.2 },
            AnomalyPoint { row: 1, col: 1, congestion: 0.8 },
            AnomalyPoint { row: 0, col: 3, congestion: 0.5 },
        ];
        let report = AnomalyReport::from_tagged(tagged, 10);
        assert_eq!(report.len(), 2);
        assert_eq!(report.points[0], AnomalyPoint { row: 1, col: 1, congestion: 0.8 });
        assert_eq!(report.points[1], AnomalyPoint { row: 0, col: 3, congestion: 0.5 });
    }
}

// ── Ward tick loop ────────────────────────────────────────────────────────────

mod ward_loop {
    use super::*;
    use ward_agents::{PatientPhase, StaffPhase};

    fn tick_n(ward: &mut Ward<'_>, acc: &mut CongestionAccumulator, from: u64, n: u64) {
        for t in from..from + n {
            ward.tick(Tick(t), acc).unwrap();
        }
    }

    /// Walks one low-severity patient through the whole lifecycle on the
    /// worked example.  Arrival interval 100 keeps it the only patient.
    #[test]
    fn single_patient_lifecycle() {
        let plan = example_plan();
        let cfg = config(100, 100, 4, 0.0);
        let regime = Regime::standard(&cfg);
        let mut ward = Ward::new(&plan, &cfg, &regime, SimRng::new(1));
        let mut acc = CongestionAccumulator::new(plan.rows, plan.cols);

        // Spawned and promoted; first step happens next tick.
        ward.tick(Tick(0), &mut acc).unwrap();
        assert_eq!(ward.patients.len(), 1);
        assert_eq!(ward.patients[0].phase, PatientPhase::EnRouteToWaiting);
        assert_eq!(ward.patients[0].pos, CellPos::new(0, 0));

        // Reaches waiting and is assigned the low room the same tick.
        ward.tick(Tick(1), &mut acc).unwrap();
        assert_eq!(ward.patients[0].phase, PatientPhase::EnRouteToRoom { room: RoomId(0) });
        assert_eq!(ward.patients[0].pos, CellPos::new(0, 1));
        assert_eq!(ward.rooms.get(RoomId(0)).free_capacity(), 0); // reserved

        ward.tick(Tick(2), &mut acc).unwrap();
        assert_eq!(ward.patients[0].pos, CellPos::new(1, 1));

        // Admission posts one nurse and one doctor demand, both matched.
        ward.tick(Tick(3), &mut acc).unwrap();
        assert_eq!(ward.patients[0].pos, CellPos::new(1, 0));
        assert!(matches!(
            ward.patients[0].phase,
            PatientPhase::InTreatment { room: RoomId(0), remaining: 4 }
        ));
        assert_eq!(ward.rooms.get(RoomId(0)).occupants, vec![PatientId(0)]);
        assert!(matches!(ward.staff[0].phase, StaffPhase::EnRouteToPatient { .. }));
        assert!(matches!(ward.staff[1].phase, StaffPhase::EnRouteToPatient { .. }));

        // Dwell counts down over the next three ticks, discharge on the fourth.
        tick_n(&mut ward, &mut acc, 4, 3);
        assert!(matches!(
            ward.patients[0].phase,
            PatientPhase::InTreatment { remaining: 1, .. }
        ));
        ward.tick(Tick(7), &mut acc).unwrap();
        assert_eq!(ward.patients[0].phase, PatientPhase::Discharged);
        assert_eq!(ward.rooms.get(RoomId(0)).free_capacity(), 1);
        assert!(!ward.patients[0].occupies_cell());
    }

    /// Two nurses at path-equal distance from the low room: the demand goes
    /// to the first-listed one.
    #[test]
    fn staff_tie_breaks_to_list_order() {
        let plan = FloorPlan::load(
            &example_matrix(),
            &[CellPos::new(1, 0)],
            &[CellPos::new(3, 4)],
            &[CellPos::new(1, 2), CellPos::new(2, 1)],
            &[],
        )
        .unwrap();
        let cfg = config(100, 100, 4, 0.0);
        let regime = Regime::standard(&cfg);
        let mut ward = Ward::new(&plan, &cfg, &regime, SimRng::new(1));
        let mut acc = CongestionAccumulator::new(plan.rows, plan.cols);

        // Ticks 0..=3: spawn, walk, assign, admit (see single_patient_lifecycle).
        tick_n(&mut ward, &mut acc, 0, 4);
        assert!(matches!(ward.staff[0].phase, StaffPhase::EnRouteToPatient { .. }));
        assert!(ward.staff[1].is_idle());
        // The doctor demand has no one to serve it and carries over.
        assert!(matches!(ward.patients[0].phase, PatientPhase::InTreatment { .. }));
    }

    /// Saturating arrivals never push a room past its effective capacity,
    /// in either regime.
    #[test]
    fn capacity_bound_holds_under_saturation() {
        for regime_of in [Regime::standard, Regime::mci] {
            let plan = example_plan();
            let cfg = config(60, 1, 10, 1.0);
            let regime = regime_of(&cfg);
            let mut ward = Ward::new(&plan, &cfg, &regime, SimRng::new(3));
            let mut acc = CongestionAccumulator::new(plan.rows, plan.cols);

            for t in 0..cfg.total_ticks {
                ward.tick(Tick(t), &mut acc).unwrap();
                for (_, room) in ward.rooms.iter() {
                    assert!(room.occupants.len() as u8 + room.inbound <= room.capacity);
                }
            }
        }
    }

    #[test]
    fn mci_ward_doubles_high_room_capacity_only() {
        let plan = example_plan();
        let cfg = config(10, 5, 10, 0.5);
        let regime = Regime::mci(&cfg);
        let ward = Ward::new(&plan, &cfg, &regime, SimRng::new(1));

        assert_eq!(ward.rooms.get(RoomId(0)).capacity, 1); // low
        assert_eq!(ward.rooms.get(RoomId(1)).capacity, 2); // high
    }
}

// ── Scenario orchestration ────────────────────────────────────────────────────

mod scenario {
    use super::*;

    #[test]
    fn same_seed_is_bit_identical() {
        let plan = example_plan();
        let cfg = config(120, 4, 8, 0.5);
        let regime = Regime::standard(&cfg);

        let a = run_scenario(&plan, &cfg, &regime, &mut NoopObserver).unwrap();
        let b = run_scenario(&plan, &cfg, &regime, &mut NoopObserver).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn heatmap_is_bounded_and_zero_on_walls() {
        let plan = example_plan();
        let cfg = config(200, 3, 8, 0.5);
        let regime = Regime::standard(&cfg);
        let result = run_scenario(&plan, &cfg, &regime, &mut NoopObserver).unwrap();

        let grid = &result.congestion;
        for (_, _, v) in grid.cells() {
            assert!((0.0..=1.0).contains(&v));
        }
        // Walls never hold an agent.
        assert_eq!(grid.value(0, 2), 0.0);
        assert_eq!(grid.value(1, 4), 0.0);
        assert_eq!(grid.value(2, 0), 0.0);
        // The spawn and waiting cells are on every patient's route.
        assert!(grid.value(0, 0) > 0.0);
        assert!(grid.value(0, 1) > 0.0);
    }

    #[test]
    fn mci_is_at_least_as_congested_as_standard() {
        let plan = example_plan();
        let cfg = config(300, 6, 8, 0.5);
        let comparison = run_comparison(&plan, &cfg).unwrap();

        assert_eq!(comparison.standard.regime, RegimeKind::Standard);
        assert_eq!(comparison.mci.regime, RegimeKind::Mci);
        assert!(comparison.mci.congestion.mean() >= comparison.standard.congestion.mean());
        // Both report the same floor, with the listed rooms marked.
        assert_eq!(comparison.standard.floor, comparison.mci.floor);
        assert_eq!(comparison.standard.floor[1][0], 4);
        assert_eq!(comparison.standard.floor[3][4], 5);
    }

    #[test]
    fn multiple_runs_pool_into_one_heatmap() {
        let plan = example_plan();
        let mut cfg = config(100, 4, 8, 0.5);
        cfg.runs = 3;
        let regime = Regime::standard(&cfg);
        let result = run_scenario(&plan, &cfg, &regime, &mut NoopObserver).unwrap();

        for (_, _, v) in result.congestion.cells() {
            assert!((0.0..=1.0).contains(&v));
        }
        assert!(result.congestion.value(0, 0) > 0.0);
    }

    struct StopAt(u64);

    impl ScenarioObserver for StopAt {
        fn on_tick_end(&mut self, tick: Tick, _waiting: usize) -> ControlFlow<()> {
            if tick.0 >= self.0 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        }
    }

    #[test]
    fn aborted_run_contributes_no_samples() {
        let plan = example_plan();
        let cfg = config(200, 3, 8, 0.5);
        let regime = Regime::standard(&cfg);
        let result = run_scenario(&plan, &cfg, &regime, &mut StopAt(10)).unwrap();

        assert_eq!(result.congestion.max(), 0.0);
        assert!(result.anomalies.is_empty());
        // The snapshot still reflects the plan geometry.
        assert_eq!(result.state.rooms.len(), 2);
    }

    #[test]
    fn anomalies_come_from_the_heatmap() {
        let plan = example_plan();
        let cfg = config(200, 3, 8, 0.5);
        let regime = Regime::standard(&cfg);
        let result = run_scenario(&plan, &cfg, &regime, &mut NoopObserver).unwrap();

        assert!(!result.anomalies.is_empty());
        assert!(result.anomalies.len() <= crate::MAX_REPORTED);
        for point in result.anomalies.iter() {
            assert_eq!(
                point.congestion,
                result.congestion.value(point.row, point.col)
            );
        }
    }

    #[test]
    fn result_serializes_with_cell_string_room_keys() {
        let plan = example_plan();
        let cfg = config(60, 4, 8, 0.5);
        let regime = Regime::standard(&cfg);
        let result = run_scenario(&plan, &cfg, &regime, &mut NoopObserver).unwrap();

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["state"]["rooms"]["1,0"], serde_json::json!("Low"));
        assert_eq!(json["state"]["rooms"]["3,4"], serde_json::json!("High"));
        assert_eq!(json["state"]["spawn"], serde_json::json!({"row": 0, "col": 0}));

        let back: crate::ScenarioResult = serde_json::from_value(json).unwrap();
        assert_eq!(back, result);
    }
}
