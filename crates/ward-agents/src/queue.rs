//! Waiting-room queues.
//!
//! One FIFO queue per severity class, ordered by arrival at the waiting
//! cell.  Arrival fairness holds *within* a class; cross-class priority is
//! the scheduler's drain order (`Severity::URGENCY_ORDER`).

use std::collections::VecDeque;

use ward_core::{PatientId, Severity};

/// Arrival-ordered patient queues, one per severity class.
#[derive(Clone, Debug, Default)]
pub struct WaitingQueue {
    queues: [VecDeque<PatientId>; 2],
}

impl WaitingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a patient that just reached the waiting cell.
    pub fn push(&mut self, severity: Severity, patient: PatientId) {
        self.queues[severity.index()].push_back(patient);
    }

    /// The head of a severity queue without removing it.
    pub fn front(&self, severity: Severity) -> Option<PatientId> {
        self.queues[severity.index()].front().copied()
    }

    /// Remove and return the head of a severity queue.
    pub fn pop(&mut self, severity: Severity) -> Option<PatientId> {
        self.queues[severity.index()].pop_front()
    }

    /// Patients waiting in one severity queue.
    pub fn len(&self, severity: Severity) -> usize {
        self.queues[severity.index()].len()
    }

    /// Patients waiting across both queues.
    pub fn total(&self) -> usize {
        self.queues.iter().map(VecDeque::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}
