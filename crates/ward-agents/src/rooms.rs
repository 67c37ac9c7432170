//! The treatment-room arena.
//!
//! Rooms live in a flat `Vec<TreatmentRoom>` indexed by `RoomId`, with an
//! `FxHashMap<CellPos, RoomId>` side index for coordinate lookups.  All
//! mutation goes through [`RoomBoard`] methods inside the deterministic
//! per-tick pass — no long-lived aliased references into the arena.
//!
//! # Capacity discipline
//!
//! A room's effective free capacity is `capacity - occupants - inbound`.
//! Assignment *reserves* a unit (`inbound`) before the patient starts
//! walking, and arrival converts the reservation into occupancy, so the
//! occupant count can never exceed capacity even transiently within a tick.

use rustc_hash::FxHashMap;

use ward_core::{CellPos, PatientId, RoomId, Severity};
use ward_grid::FloorPlan;

use crate::error::{AgentError, AgentResult};

// ── TreatmentRoom ─────────────────────────────────────────────────────────────

/// One treatment room: fixed position and severity, mutable occupancy.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TreatmentRoom {
    pub pos: CellPos,
    pub severity: Severity,
    /// Concurrent-occupant limit: 1 in the standard regime; 2 for
    /// high-severity rooms under MCI.
    pub capacity: u8,
    /// Patients currently inside, in admission order.
    pub occupants: Vec<PatientId>,
    /// Units reserved by patients en route (assignment-time reservation).
    pub inbound: u8,
}

impl TreatmentRoom {
    /// Units still assignable: capacity minus occupants minus inbound.
    pub fn free_capacity(&self) -> u8 {
        self.capacity
            .saturating_sub(self.occupants.len() as u8)
            .saturating_sub(self.inbound)
    }
}

// ── RoomBoard ─────────────────────────────────────────────────────────────────

/// Arena of all treatment rooms for one scenario execution.
#[derive(Clone, Debug)]
pub struct RoomBoard {
    rooms: Vec<TreatmentRoom>,
    by_pos: FxHashMap<CellPos, RoomId>,
}

impl RoomBoard {
    /// Build the arena from a validated floor plan.  Low-severity rooms get
    /// capacity 1; high-severity rooms get `high_capacity` (1 standard,
    /// 2 MCI).  Room order follows the plan's configured lists, which is
    /// what makes the first-listed tie-break stable.
    pub fn from_plan(plan: &FloorPlan, high_capacity: u8) -> Self {
        let rooms: Vec<TreatmentRoom> = plan
            .rooms()
            .map(|(pos, severity)| TreatmentRoom {
                pos,
                severity,
                capacity: match severity {
                    Severity::Low => 1,
                    Severity::High => high_capacity,
                },
                occupants: Vec::new(),
                inbound: 0,
            })
            .collect();

        let by_pos = rooms
            .iter()
            .enumerate()
            .map(|(i, room)| (room.pos, RoomId(i as u16)))
            .collect();

        Self { rooms, by_pos }
    }

    // ── Lookups ───────────────────────────────────────────────────────────

    pub fn get(&self, id: RoomId) -> &TreatmentRoom {
        &self.rooms[id.index()]
    }

    /// The room occupying `pos`, if any.
    pub fn at(&self, pos: CellPos) -> Option<RoomId> {
        self.by_pos.get(&pos).copied()
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// All rooms in arena order.
    pub fn iter(&self) -> impl Iterator<Item = (RoomId, &TreatmentRoom)> {
        self.rooms
            .iter()
            .enumerate()
            .map(|(i, room)| (RoomId(i as u16), room))
    }

    /// Rooms of `severity` with free effective capacity, in configured
    /// (first-listed-first) order.
    pub fn available(&self, severity: Severity) -> impl Iterator<Item = (RoomId, CellPos)> + '_ {
        self.iter()
            .filter(move |(_, room)| room.severity == severity && room.free_capacity() > 0)
            .map(|(id, room)| (id, room.pos))
    }

    // ── Mutation (scheduler-only) ─────────────────────────────────────────

    /// Reserve one unit of `room` for an assigned patient about to start
    /// walking there.
    pub fn reserve(&mut self, id: RoomId) -> AgentResult<()> {
        let room = &mut self.rooms[id.index()];
        if room.free_capacity() == 0 {
            return Err(AgentError::RoomFull {
                room: id,
                pos: room.pos,
                capacity: room.capacity,
            });
        }
        room.inbound += 1;
        Ok(())
    }

    /// Convert an inbound reservation into occupancy on patient arrival.
    pub fn admit(&mut self, id: RoomId, patient: PatientId) -> AgentResult<()> {
        let room = &mut self.rooms[id.index()];
        if room.inbound == 0 {
            return Err(AgentError::NoReservation { room: id });
        }
        room.inbound -= 1;
        if room.occupants.len() as u8 >= room.capacity {
            return Err(AgentError::RoomFull {
                room: id,
                pos: room.pos,
                capacity: room.capacity,
            });
        }
        room.occupants.push(patient);
        Ok(())
    }

    /// Free one unit of capacity on patient discharge.
    pub fn discharge(&mut self, id: RoomId, patient: PatientId) -> AgentResult<()> {
        let room = &mut self.rooms[id.index()];
        match room.occupants.iter().position(|&p| p == patient) {
            Some(i) => {
                room.occupants.remove(i);
                Ok(())
            }
            None => Err(AgentError::NotAnOccupant { patient, room: id }),
        }
    }

    /// Debug-build invariant sweep: no room over capacity.  The scheduler
    /// calls this at every tick boundary.
    pub fn check_capacity(&self) -> AgentResult<()> {
        for (id, room) in self.iter() {
            if room.occupants.len() as u8 > room.capacity {
                return Err(AgentError::RoomFull {
                    room: id,
                    pos: room.pos,
                    capacity: room.capacity,
                });
            }
        }
        Ok(())
    }
}
