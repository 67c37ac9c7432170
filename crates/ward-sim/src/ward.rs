//! The `Ward` struct and its per-tick scheduler.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;
use ward_agents::{
    PathWalk, Patient, PatientPhase, RoomBoard, Staff, StaffPhase, WaitingQueue,
};
use ward_core::{CellPos, PatientId, RoomId, Severity, SimRng, StaffId, StaffRole, Tick};
use ward_grid::{FloorPlan, find_path};

use crate::{CongestionAccumulator, Regime, ScenarioConfig, SimError, SimResult};

// ── Staff demands ─────────────────────────────────────────────────────────────

/// An open request for one staff member of `role` at a treatment room.
///
/// Each admission posts one nurse demand and one doctor demand.  Demands
/// queue FIFO and carry over across ticks until an idle staff member of the
/// required role exists.
#[derive(Copy, Clone, Debug)]
struct StaffDemand {
    room: RoomId,
    pos:  CellPos,
    role: StaffRole,
}

// ── Ward ──────────────────────────────────────────────────────────────────────

/// One regime's live simulation state over a validated floor plan.
///
/// [`Ward::tick`] runs the five-phase loop, in this fixed order:
///
/// 1. **Spawn**: on the arrival schedule, a patient appears at the spawn
///    cell with severity drawn from the configured distribution.
/// 2. **Patient pass** (spawn order): `Spawned` patients path to the
///    waiting cell; movers advance one cell; reaching the waiting cell
///    enqueues; reaching a room admits, starts the dwell countdown, and
///    posts one nurse and one doctor demand; dwell expiry discharges.
/// 3. **Assignment pass** (high queue first): each queue head is matched
///    to the nearest free same-severity room by path length (ties to the
///    first-listed room) and capacity is reserved before the walk starts.
/// 4. **Staff pass**: movers advance and treating windows count down; then
///    open demands, oldest first, match the nearest idle staff member of
///    the required role (ties to list order).  Newly matched agents start
///    moving on the next tick.
/// 5. **Sample**: every cell holding at least one agent contributes `+1`
///    to the congestion accumulator.
///
/// The tick is the atomic unit — state between phases is never observable
/// from outside.
pub struct Ward<'p> {
    plan: &'p FloorPlan,

    arrival_interval_ticks: u64,
    treatment_ticks:        u32,
    p_high:                 f64,

    rng: SimRng,

    /// All patients ever spawned, indexed by `PatientId`.  `Discharged`
    /// entries stay in place so IDs remain stable; every pass skips them.
    pub patients: Vec<Patient>,

    /// Nurses first, then doctors, each in configured order.
    pub staff: Vec<Staff>,

    pub rooms: RoomBoard,
    pub queue: WaitingQueue,

    demands: VecDeque<StaffDemand>,
}

impl<'p> Ward<'p> {
    pub fn new(
        plan:   &'p FloorPlan,
        config: &ScenarioConfig,
        regime: &Regime,
        rng:    SimRng,
    ) -> Ward<'p> {
        let mut staff = Vec::with_capacity(plan.nurses.len() + plan.doctors.len());
        for &pos in &plan.nurses {
            staff.push(Staff::at_idle(StaffId(staff.len() as u16), StaffRole::Nurse, pos));
        }
        for &pos in &plan.doctors {
            staff.push(Staff::at_idle(StaffId(staff.len() as u16), StaffRole::Doctor, pos));
        }

        Ward {
            plan,
            arrival_interval_ticks: regime.arrival_interval_ticks,
            treatment_ticks: config.treatment_ticks,
            p_high: config.p_high,
            rng,
            patients: Vec::new(),
            staff,
            rooms: RoomBoard::from_plan(plan, regime.high_room_capacity),
            queue: WaitingQueue::new(),
            demands: VecDeque::new(),
        }
    }

    /// Patients currently queued at the waiting cell.
    pub fn waiting_count(&self) -> usize {
        self.queue.total()
    }

    // ── Tick loop ─────────────────────────────────────────────────────────

    /// Advance the ward by one tick, sampling congestion at the end.
    pub fn tick(&mut self, now: Tick, congestion: &mut CongestionAccumulator) -> SimResult<()> {
        self.spawn_phase(now);
        self.patient_phase()?;
        self.assignment_phase()?;
        self.staff_phase()?;
        self.sample_phase(congestion);
        self.rooms.check_capacity()?;
        Ok(())
    }

    // ── Phase 1: spawn ────────────────────────────────────────────────────

    fn spawn_phase(&mut self, now: Tick) {
        if !now.0.is_multiple_of(self.arrival_interval_ticks) {
            return;
        }
        let severity = if self.rng.gen_bool(self.p_high) {
            Severity::High
        } else {
            Severity::Low
        };
        let id = PatientId(self.patients.len() as u32);
        self.patients.push(Patient::spawn(id, severity, self.plan.spawn));
    }

    // ── Phase 2: patient pass ─────────────────────────────────────────────

    fn patient_phase(&mut self) -> SimResult<()> {
        for i in 0..self.patients.len() {
            match self.patients[i].phase {
                // Momentary: path to the waiting cell, promoted this tick,
                // first step taken next tick.
                PatientPhase::Spawned => {
                    let pos = self.patients[i].pos;
                    let path = self.route(pos, self.plan.waiting)?;
                    let p = &mut self.patients[i];
                    p.walk = PathWalk::follow(path, p.pos);
                    p.phase = PatientPhase::EnRouteToWaiting;
                }

                PatientPhase::EnRouteToWaiting => {
                    let p = &mut self.patients[i];
                    if p.walk.step(&mut p.pos) {
                        p.phase = PatientPhase::Waiting;
                        self.queue.push(p.severity, p.id);
                    }
                }

                PatientPhase::EnRouteToRoom { room } => {
                    let p = &mut self.patients[i];
                    if p.walk.step(&mut p.pos) {
                        p.phase = PatientPhase::InTreatment {
                            room,
                            remaining: self.treatment_ticks,
                        };
                        let id = p.id;
                        self.rooms.admit(room, id)?;
                        let pos = self.rooms.get(room).pos;
                        self.demands.push_back(StaffDemand { room, pos, role: StaffRole::Nurse });
                        self.demands.push_back(StaffDemand { room, pos, role: StaffRole::Doctor });
                    }
                }

                PatientPhase::InTreatment { room, remaining } => {
                    if remaining <= 1 {
                        let id = self.patients[i].id;
                        self.rooms.discharge(room, id)?;
                        self.patients[i].phase = PatientPhase::Discharged;
                    } else {
                        self.patients[i].phase = PatientPhase::InTreatment {
                            room,
                            remaining: remaining - 1,
                        };
                    }
                }

                PatientPhase::Waiting | PatientPhase::Discharged => {}
            }
        }
        Ok(())
    }

    // ── Phase 3: room assignment ──────────────────────────────────────────

    fn assignment_phase(&mut self) -> SimResult<()> {
        for severity in Severity::URGENCY_ORDER {
            while let Some(pid) = self.queue.front(severity) {
                let Some((room, path)) = self.nearest_room(severity)? else {
                    break;
                };
                self.rooms.reserve(room)?;
                self.queue.pop(severity);
                let p = &mut self.patients[pid.index()];
                p.walk = PathWalk::follow(path, p.pos);
                p.phase = PatientPhase::EnRouteToRoom { room };
            }
        }
        Ok(())
    }

    /// The free room of `severity` nearest the waiting cell by path length,
    /// with its path.  Ties go to the first-listed room.
    fn nearest_room(&self, severity: Severity) -> SimResult<Option<(RoomId, Vec<CellPos>)>> {
        let candidates: Vec<(RoomId, CellPos)> = self.rooms.available(severity).collect();
        let mut best: Option<(RoomId, Vec<CellPos>)> = None;
        for (room, pos) in candidates {
            let path = self.route(self.plan.waiting, pos)?;
            let shorter = match &best {
                None => true,
                Some((_, b)) => path.len() < b.len(),
            };
            if shorter {
                best = Some((room, path));
            }
        }
        Ok(best)
    }

    // ── Phase 4: staff pass ───────────────────────────────────────────────

    fn staff_phase(&mut self) -> SimResult<()> {
        // Movement and treating countdowns first; demand matching after, so
        // a newly matched staff member takes its first step next tick.
        for i in 0..self.staff.len() {
            match self.staff[i].phase {
                StaffPhase::Idle => {}

                StaffPhase::EnRouteToPatient { room } => {
                    let s = &mut self.staff[i];
                    if s.walk.step(&mut s.pos) {
                        s.phase = StaffPhase::Treating {
                            room,
                            remaining: self.treatment_ticks,
                        };
                    }
                }

                StaffPhase::Treating { room: _, remaining } => {
                    if remaining <= 1 {
                        let pos = self.staff[i].pos;
                        let home = self.staff[i].idle_pos;
                        let path = self.route(pos, home)?;
                        let s = &mut self.staff[i];
                        s.walk = PathWalk::follow(path, s.pos);
                        s.phase = StaffPhase::EnRouteToIdle;
                    } else if let StaffPhase::Treating { remaining, .. } = &mut self.staff[i].phase
                    {
                        *remaining -= 1;
                    }
                }

                StaffPhase::EnRouteToIdle => {
                    let s = &mut self.staff[i];
                    if s.walk.step(&mut s.pos) {
                        s.phase = StaffPhase::Idle;
                    }
                }
            }
        }

        // Serve open demands oldest-first.  A demand with no idle staff of
        // its role carries over; younger demands of the other role may
        // still be served this tick.
        let pending = std::mem::take(&mut self.demands);
        for demand in pending {
            match self.nearest_idle_staff(demand.role, demand.pos)? {
                Some((idx, path)) => {
                    let s = &mut self.staff[idx];
                    s.walk = PathWalk::follow(path, s.pos);
                    s.phase = StaffPhase::EnRouteToPatient { room: demand.room };
                }
                None => self.demands.push_back(demand),
            }
        }
        Ok(())
    }

    /// The idle staff member of `role` nearest `target` by path length from
    /// their current position, with the path.  Ties go to list order.
    fn nearest_idle_staff(
        &self,
        role:   StaffRole,
        target: CellPos,
    ) -> SimResult<Option<(usize, Vec<CellPos>)>> {
        let mut best: Option<(usize, Vec<CellPos>)> = None;
        for (i, s) in self.staff.iter().enumerate() {
            if s.role != role || !s.is_idle() {
                continue;
            }
            let path = self.route(s.pos, target)?;
            let shorter = match &best {
                None => true,
                Some((_, b)) => path.len() < b.len(),
            };
            if shorter {
                best = Some((i, path));
            }
        }
        Ok(best)
    }

    // ── Phase 5: congestion sample ────────────────────────────────────────

    fn sample_phase(&self, congestion: &mut CongestionAccumulator) {
        // Per-cell sampling: a cell counts once no matter how many agents
        // share it.
        let mut occupied: FxHashSet<CellPos> = FxHashSet::default();
        for p in &self.patients {
            if p.occupies_cell() {
                occupied.insert(p.pos);
            }
        }
        for s in &self.staff {
            occupied.insert(s.pos);
        }
        congestion.sample(occupied);
    }

    // ── Helpers ───────────────────────────────────────────────────────────

    /// Pathfind between two cells validation proved connected.  Failure is
    /// a scheduler bug surfaced as [`SimError::PathLost`].
    fn route(&self, from: CellPos, to: CellPos) -> SimResult<Vec<CellPos>> {
        find_path(self.plan, from, to).map_err(|source| SimError::PathLost { from, to, source })
    }
}
