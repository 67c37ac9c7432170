//! Staff role classification.

use std::fmt;

/// The two staff roles in the ward.  Every active treatment requires one of
/// each, so the scheduler matches demand per role.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StaffRole {
    Nurse,
    Doctor,
}

impl fmt::Display for StaffRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StaffRole::Nurse => write!(f, "nurse"),
            StaffRole::Doctor => write!(f, "doctor"),
        }
    }
}
