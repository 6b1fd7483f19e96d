//! Orchestration for one CLI entry point.

use tracing::info;

use crate::core::command::Action;
use crate::core::grid::GoalGrid;
use crate::error::MegaverseError;
use crate::io::client::RateLimitedClient;
use crate::io::clock::Clock;
use crate::io::config::MegaverseConfig;
use crate::io::goal::GoalMapFetcher;
use crate::io::transport::Transport;
use crate::reconcile::{GridReconciler, ReconcileSummary};

/// Side length of the phase-one map.
pub const X_PATTERN_SIZE: usize = 11;
/// Free cells at each end of the phase-one diagonals.
pub const X_PATTERN_MARGIN: usize = 2;

/// Which grid to reconcile and how.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Polyanet X across the 11x11 map.
    One,
    /// Whatever the goal map asks for.
    Two,
    /// Remove every object the goal map names.
    Clear,
}

impl Phase {
    fn action(self) -> Action {
        match self {
            Self::One | Self::Two => Action::Create,
            Self::Clear => Action::Delete,
        }
    }
}

/// Build the client for `cfg` over the given transport and clock.
pub fn build_client<T: Transport, C: Clock>(
    cfg: &MegaverseConfig,
    transport: T,
    clock: C,
) -> RateLimitedClient<T, C> {
    RateLimitedClient::new(transport, clock, cfg.min_interval, cfg.retry)
}

/// Derive the grid for `phase` and reconcile it.
///
/// Only goal-map retrieval can fail the run; per-cell failures end up in the
/// returned summary.
pub fn run_phase<T: Transport, C: Clock>(
    phase: Phase,
    cfg: &MegaverseConfig,
    client: &mut RateLimitedClient<T, C>,
) -> Result<ReconcileSummary, MegaverseError> {
    info!(?phase, candidate_id = %cfg.candidate_id, "starting run");
    let grid = match phase {
        Phase::One => GoalGrid::x_pattern(X_PATTERN_SIZE, X_PATTERN_MARGIN)
            .map_err(|err| MegaverseError::GoalMapUnavailable(err.to_string()))?,
        Phase::Two | Phase::Clear => GoalMapFetcher::new(&cfg.candidate_id).fetch(client)?,
    };
    let summary = GridReconciler::new(&cfg.candidate_id, phase.action()).reconcile(&grid, client);
    Ok(summary)
}
