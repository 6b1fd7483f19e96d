//! Error taxonomy for a placement run.
//!
//! Fatal variants (`ConfigMissing`, `ConfigInvalid`, `GoalMapUnavailable`) abort
//! the run. Per-cell variants (`PlacementFailed`, `UnknownCellToken`) are caught
//! by the reconciliation loop and turned into counters.

use thiserror::Error;

use crate::core::types::{ObjectKind, Position};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MegaverseError {
    #[error("required environment variable {var} is not set")]
    ConfigMissing { var: &'static str },

    #[error("invalid value for {var}: {reason}")]
    ConfigInvalid { var: &'static str, reason: String },

    #[error("goal map unavailable: {0}")]
    GoalMapUnavailable(String),

    #[error("failed to place {kind} at {position} (retriable: {retriable}): {cause}")]
    PlacementFailed {
        kind: ObjectKind,
        position: Position,
        retriable: bool,
        cause: String,
    },

    #[error("unknown cell token {token:?}")]
    UnknownCellToken { token: String },
}
