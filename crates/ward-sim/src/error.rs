use thiserror::Error;
use ward_agents::AgentError;
use ward_core::CellPos;
use ward_grid::GridError;

/// Engine-level failures.
///
/// Every variant except `Config` signals a broken scheduler invariant, not a
/// recoverable runtime condition: floor-plan validation guarantees
/// reachability before a run starts, and the assignment pass reserves
/// capacity before a patient walks, so hitting either mid-run is a bug.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("scenario configuration error: {0}")]
    Config(String),

    /// A room admitted past its effective capacity.
    #[error("room capacity invariant violated: {0}")]
    CapacityExceeded(#[from] AgentError),

    /// The pathfinder failed between two cells validation proved connected.
    #[error("path lost mid-run from {from} to {to}: {source}")]
    PathLost {
        from:   CellPos,
        to:     CellPos,
        source: GridError,
    },
}

pub type SimResult<T> = Result<T, SimError>;
