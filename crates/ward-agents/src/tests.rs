//! Unit tests for ward-agents.

use ward_core::{CellPos, PatientId, RoomId, Severity, StaffId, StaffRole};
use ward_grid::FloorPlan;

use crate::error::AgentError;
use crate::patient::{Patient, PatientPhase};
use crate::queue::WaitingQueue;
use crate::rooms::RoomBoard;
use crate::staff::{Staff, StaffPhase};
use crate::walk::PathWalk;

// ── Helpers ───────────────────────────────────────────────────────────────────

/// 4×5 plan with one low room at (1,0) and two high rooms at (3,1), (3,3).
fn board_plan() -> FloorPlan {
    let matrix = vec![
        vec![-1, 1, -2, -2, -2],
        vec![-2, 0, 0, 0, -2],
        vec![-2, 0, 0, 0, -2],
        vec![-2, 0, 0, 0, -2],
    ];
    FloorPlan::load(
        &matrix,
        &[CellPos::new(1, 0)],
        &[CellPos::new(3, 1), CellPos::new(3, 3)],
        &[],
        &[],
    )
    .unwrap()
}

// ── PathWalk ──────────────────────────────────────────────────────────────────

mod walk {
    use super::*;

    #[test]
    fn follow_drops_leading_current_cell() {
        let path = vec![CellPos::new(0, 0), CellPos::new(0, 1), CellPos::new(0, 2)];
        let walk = PathWalk::follow(path, CellPos::new(0, 0));
        assert_eq!(walk.len(), 2);
    }

    #[test]
    fn step_moves_one_cell_per_call() {
        let path = vec![CellPos::new(0, 0), CellPos::new(0, 1), CellPos::new(0, 2)];
        let mut pos = CellPos::new(0, 0);
        let mut walk = PathWalk::follow(path, pos);

        assert!(!walk.step(&mut pos));
        assert_eq!(pos, CellPos::new(0, 1));
        assert!(walk.step(&mut pos));
        assert_eq!(pos, CellPos::new(0, 2));
    }

    #[test]
    fn empty_walk_reports_done_without_moving() {
        let mut pos = CellPos::new(3, 3);
        let mut walk = PathWalk::idle();
        assert!(walk.step(&mut pos));
        assert_eq!(pos, CellPos::new(3, 3));
    }
}

// ── Patient & Staff ───────────────────────────────────────────────────────────

mod agents {
    use super::*;

    #[test]
    fn spawned_patient_occupies_spawn_cell() {
        let p = Patient::spawn(PatientId(0), Severity::High, CellPos::new(0, 0));
        assert_eq!(p.phase, PatientPhase::Spawned);
        assert_eq!(p.pos, CellPos::new(0, 0));
        assert!(p.occupies_cell());
        assert_eq!(p.room(), None);
    }

    #[test]
    fn discharged_patient_leaves_the_grid() {
        let mut p = Patient::spawn(PatientId(0), Severity::Low, CellPos::new(0, 0));
        p.phase = PatientPhase::Discharged;
        assert!(!p.occupies_cell());
    }

    #[test]
    fn room_accessor_covers_assigned_phases() {
        let mut p = Patient::spawn(PatientId(0), Severity::Low, CellPos::new(0, 0));
        p.phase = PatientPhase::EnRouteToRoom { room: RoomId(1) };
        assert_eq!(p.room(), Some(RoomId(1)));
        p.phase = PatientPhase::InTreatment { room: RoomId(1), remaining: 5 };
        assert_eq!(p.room(), Some(RoomId(1)));
    }

    #[test]
    fn staff_starts_idle_at_home() {
        let s = Staff::at_idle(StaffId(0), StaffRole::Doctor, CellPos::new(2, 2));
        assert!(s.is_idle());
        assert_eq!(s.pos, s.idle_pos);
        assert_eq!(s.phase, StaffPhase::Idle);
    }
}

// ── WaitingQueue ──────────────────────────────────────────────────────────────

mod queue {
    use super::*;

    #[test]
    fn fifo_within_severity() {
        let mut q = WaitingQueue::new();
        q.push(Severity::High, PatientId(3));
        q.push(Severity::High, PatientId(1));
        q.push(Severity::Low, PatientId(2));

        assert_eq!(q.front(Severity::High), Some(PatientId(3)));
        assert_eq!(q.pop(Severity::High), Some(PatientId(3)));
        assert_eq!(q.pop(Severity::High), Some(PatientId(1)));
        assert_eq!(q.pop(Severity::High), None);
        assert_eq!(q.pop(Severity::Low), Some(PatientId(2)));
        assert!(q.is_empty());
    }

    #[test]
    fn totals_span_both_queues() {
        let mut q = WaitingQueue::new();
        q.push(Severity::Low, PatientId(0));
        q.push(Severity::High, PatientId(1));
        assert_eq!(q.total(), 2);
        assert_eq!(q.len(Severity::Low), 1);
    }
}

// ── RoomBoard ─────────────────────────────────────────────────────────────────

mod rooms {
    use super::*;

    #[test]
    fn arena_built_in_configured_order() {
        let board = RoomBoard::from_plan(&board_plan(), 1);
        assert_eq!(board.len(), 3);
        // Low-severity list first, then high in list order.
        assert_eq!(board.get(RoomId(0)).pos, CellPos::new(1, 0));
        assert_eq!(board.get(RoomId(1)).pos, CellPos::new(3, 1));
        assert_eq!(board.get(RoomId(2)).pos, CellPos::new(3, 3));
        assert_eq!(board.at(CellPos::new(3, 3)), Some(RoomId(2)));
        assert_eq!(board.at(CellPos::new(2, 2)), None);
    }

    #[test]
    fn mci_capacity_applies_to_high_rooms_only() {
        let board = RoomBoard::from_plan(&board_plan(), 2);
        assert_eq!(board.get(RoomId(0)).capacity, 1); // low
        assert_eq!(board.get(RoomId(1)).capacity, 2); // high
    }

    #[test]
    fn reserve_admit_discharge_cycle() {
        let mut board = RoomBoard::from_plan(&board_plan(), 1);
        let room = RoomId(1);

        board.reserve(room).unwrap();
        assert_eq!(board.get(room).free_capacity(), 0);
        // Reserved but unoccupied: a second reservation must fail.
        assert!(matches!(board.reserve(room), Err(AgentError::RoomFull { .. })));

        board.admit(room, PatientId(0)).unwrap();
        assert_eq!(board.get(room).occupants, vec![PatientId(0)]);
        assert_eq!(board.get(room).inbound, 0);

        board.discharge(room, PatientId(0)).unwrap();
        assert_eq!(board.get(room).free_capacity(), 1);
    }

    #[test]
    fn admit_without_reservation_is_an_error() {
        let mut board = RoomBoard::from_plan(&board_plan(), 1);
        assert!(matches!(
            board.admit(RoomId(0), PatientId(0)),
            Err(AgentError::NoReservation { .. })
        ));
    }

    #[test]
    fn discharge_of_stranger_is_an_error() {
        let mut board = RoomBoard::from_plan(&board_plan(), 1);
        assert!(matches!(
            board.discharge(RoomId(0), PatientId(9)),
            Err(AgentError::NotAnOccupant { .. })
        ));
    }

    #[test]
    fn mci_high_room_holds_two() {
        let mut board = RoomBoard::from_plan(&board_plan(), 2);
        let room = RoomId(1);
        board.reserve(room).unwrap();
        board.reserve(room).unwrap();
        board.admit(room, PatientId(0)).unwrap();
        board.admit(room, PatientId(1)).unwrap();
        assert_eq!(board.get(room).occupants.len(), 2);
        assert!(matches!(board.reserve(room), Err(AgentError::RoomFull { .. })));
        board.check_capacity().unwrap();
    }

    #[test]
    fn available_respects_severity_and_reservations() {
        let mut board = RoomBoard::from_plan(&board_plan(), 1);
        let high: Vec<_> = board.available(Severity::High).collect();
        assert_eq!(high.len(), 2);

        board.reserve(RoomId(1)).unwrap();
        let high: Vec<_> = board.available(Severity::High).collect();
        assert_eq!(high, vec![(RoomId(2), CellPos::new(3, 3))]);
    }
}
