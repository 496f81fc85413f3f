use thiserror::Error;

use crate::{agent::AgentId, topology::GridPos};

/// Rejected scenario parameters. Raised before any tick runs.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error("{agents} agents do not fit on a {width}x{height} grid")]
    Overcrowded { agents: u64, width: u32, height: u32 },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Faults that abort a run. Each one means a broken collaborator contract
/// or corrupted agent state, never a recoverable per-tick condition.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("no grid location recorded for agent {0}")]
    MissingLocation(AgentId),
    #[error("unknown agent {0}")]
    UnknownAgent(AgentId),
    #[error("cell {0} lies outside the grid")]
    OutOfBounds(GridPos),
    #[error("cell {pos} is already occupied by agent {occupant}")]
    CellOccupied { pos: GridPos, occupant: AgentId },
    #[error("agent {0} is already on the grid")]
    AlreadyPlaced(AgentId),
    #[error("no free cell left for another agent")]
    GridFull,
    #[error("feature sets differ in length: expected {expected}, found {found}")]
    FeatureLengthMismatch { expected: usize, found: usize },
    #[error("malformed feature set: {0}")]
    MalformedFeatures(String),
    #[error("invariant violated at tick {tick}: {detail}")]
    InvariantViolated { tick: u64, detail: String },
}
