//! Scenario observer trait for progress reporting and early abort.

use std::ops::ControlFlow;

use ward_core::Tick;

use crate::RegimeKind;

/// Callbacks invoked by [`run_scenario`][crate::run_scenario] at tick and
/// run boundaries.
///
/// All methods have default implementations so implementors only override
/// what they care about.  Returning `ControlFlow::Break(())` from
/// [`on_tick_end`][Self::on_tick_end] aborts the scenario between ticks;
/// the aborted run's congestion samples are discarded.
pub trait ScenarioObserver {
    /// Called after every completed tick.  `waiting` is the number of
    /// patients queued at the waiting cell.
    fn on_tick_end(&mut self, _tick: Tick, _waiting: usize) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    /// Called after each completed stochastic run.
    fn on_run_end(&mut self, _run: u32) {}

    /// Called once when the scenario finishes (or aborts).
    fn on_scenario_end(&mut self, _kind: RegimeKind) {}
}

/// A [`ScenarioObserver`] that does nothing.
pub struct NoopObserver;

impl ScenarioObserver for NoopObserver {}
