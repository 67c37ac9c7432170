//! smallward — smallest runnable wardflow scenario.
//!
//! Loads an embedded 6×8 emergency-department floor (four treatment rooms,
//! two nurses, one doctor), runs it under the standard and MCI regimes with
//! the same seed, and prints the two congestion heatmaps side by side plus
//! the hotspot report.  Swap the embedded layout for a real department
//! export to run at full scale.

use std::ops::ControlFlow;
use std::path::Path;
use std::time::Instant;

use anyhow::Result;

use ward_core::Tick;
use ward_grid::parse_floor_text;
use ward_sim::{
    Regime, RegimeComparison, ScenarioConfig, ScenarioObserver, ScenarioResult, run_scenario,
};

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:           u64 = 42;
const TOTAL_TICKS:    u64 = 500;
const RUNS:           u32 = 4;
const ARRIVAL_TICKS:  u64 = 6;
const TREATMENT_TICKS: u32 = 15;
const P_HIGH:         f64 = 0.35;

// ── Embedded floor plan ───────────────────────────────────────────────────────

// 6×8 hall: spawn top-left, waiting beside it, two wall pillars, low rooms
// on the bottom-left, high rooms on the bottom-right.
const FLOOR_TEXT: &str = "\
6 8
-1 1 0 0 0 0 0 -2
-2 0 0 0 0 0 0 -2
-2 0 -2 0 0 -2 0 -2
-2 0 0 0 0 0 0 -2
-2 0 0 0 0 0 0 -2
-2 -2 -2 -2 -2 -2 -2 -2
2
4 1
4 2
2
4 5
4 6
2
1 2
3 2
1
3 5
";

// ── Progress observer ─────────────────────────────────────────────────────────

/// Tracks the worst waiting-room backlog seen across a scenario.
struct PeakWaiting {
    peak: usize,
}

impl ScenarioObserver for PeakWaiting {
    fn on_tick_end(&mut self, _tick: Tick, waiting: usize) -> ControlFlow<()> {
        self.peak = self.peak.max(waiting);
        ControlFlow::Continue(())
    }
}

// ── Rendering ─────────────────────────────────────────────────────────────────

const SHADES: &[u8] = b" .:-=+*%@";

fn print_heatmap(result: &ScenarioResult) {
    let grid = &result.congestion;
    let max = grid.max().max(f64::MIN_POSITIVE);
    for row in 0..grid.rows {
        let mut line = String::with_capacity(grid.cols as usize);
        for col in 0..grid.cols {
            if result.floor[row as usize][col as usize] == -2 {
                line.push('#');
                continue;
            }
            let shade = (grid.value(row, col) / max * (SHADES.len() - 1) as f64).round() as usize;
            line.push(SHADES[shade.min(SHADES.len() - 1)] as char);
        }
        println!("    {line}");
    }
}

fn print_anomalies(result: &ScenarioResult) {
    println!("    {:<6} {:<8} {:<10}", "Rank", "Cell", "Congestion");
    for (rank, point) in result.anomalies.iter().enumerate() {
        println!(
            "    {:<6} ({:>2},{:>2}) {:>10.4}",
            rank + 1,
            point.row,
            point.col,
            point.congestion
        );
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    println!("=== smallward — wardflow congestion demo ===");
    println!("Ticks: {TOTAL_TICKS}  |  Runs: {RUNS}  |  Seed: {SEED}");
    println!();

    // 1. Load and validate the floor plan.
    let plan = parse_floor_text(FLOOR_TEXT)?;
    println!(
        "Floor: {}×{}, {} low + {} high rooms, {} nurses, {} doctors",
        plan.rows,
        plan.cols,
        plan.low_rooms.len(),
        plan.high_rooms.len(),
        plan.nurses.len(),
        plan.doctors.len()
    );

    let config = ScenarioConfig {
        total_ticks:            TOTAL_TICKS,
        seed:                   SEED,
        runs:                   RUNS,
        arrival_interval_ticks: ARRIVAL_TICKS,
        treatment_ticks:        TREATMENT_TICKS,
        p_high:                 P_HIGH,
    };

    // 2. Run both regimes from the identical seed.
    let t0 = Instant::now();
    let mut standard_peak = PeakWaiting { peak: 0 };
    let standard = run_scenario(&plan, &config, &Regime::standard(&config), &mut standard_peak)?;
    let mut mci_peak = PeakWaiting { peak: 0 };
    let mci = run_scenario(&plan, &config, &Regime::mci(&config), &mut mci_peak)?;
    let elapsed = t0.elapsed();

    println!("Both regimes complete in {:.3} s", elapsed.as_secs_f64());
    println!();

    // 3. Heatmaps.
    for (result, peak) in [(&standard, &standard_peak), (&mci, &mci_peak)] {
        println!(
            "{} — mean {:.4}, max {:.4}, peak waiting {}",
            result.regime,
            result.congestion.mean(),
            result.congestion.max(),
            peak.peak
        );
        print_heatmap(result);
        print_anomalies(result);
        println!();
    }

    // 4. Write the comparison contract for the dashboard.
    let comparison = RegimeComparison { standard, mci };
    std::fs::create_dir_all("output/smallward")?;
    let out = Path::new("output/smallward/comparison.json");
    std::fs::write(out, serde_json::to_vec_pretty(&comparison)?)?;
    println!("Wrote {}", out.display());

    Ok(())
}
