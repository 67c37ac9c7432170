//! Patient acuity classification.

use std::fmt;

/// A patient's urgency class, which determines the room type the patient is
/// eligible for.  Assigned once at spawn and never changed.
///
/// The wire codes (4 = low, 5 = high) match the floor-plan matrix encoding
/// used by the layout editor, where the same integers mark the corresponding
/// treatment-room cells.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    Low,
    High,
}

impl Severity {
    /// Both severities, most urgent first — the order the scheduler drains
    /// the waiting queues in.
    pub const URGENCY_ORDER: [Severity; 2] = [Severity::High, Severity::Low];

    /// The floor-plan matrix code for a treatment room of this severity.
    #[inline]
    pub fn room_code(self) -> i8 {
        match self {
            Severity::Low => 4,
            Severity::High => 5,
        }
    }

    /// Index into per-severity arrays (`Low = 0`, `High = 1`).
    #[inline(always)]
    pub fn index(self) -> usize {
        match self {
            Severity::Low => 0,
            Severity::High => 1,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::High => write!(f, "high"),
        }
    }
}
