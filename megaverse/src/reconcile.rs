//! Goal-driven reconciliation: one paced call per required cell.

use std::fmt;

use tracing::{error, info, instrument, warn};

use crate::core::command::{Action, PlacementCommand};
use crate::core::grid::GoalGrid;
use crate::core::types::{CellToken, Position};
use crate::error::MegaverseError;
use crate::io::client::RateLimitedClient;
use crate::io::clock::Clock;
use crate::io::transport::Transport;

/// Counters for one reconciliation walk.
///
/// `failed` includes cells whose token could not be interpreted; those are
/// also counted in `unknown`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub unknown: usize,
}

impl ReconcileSummary {
    pub fn is_complete(&self) -> bool {
        self.failed == 0
    }
}

impl fmt::Display for ReconcileSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "attempted={} succeeded={} failed={} (unknown tokens={})",
            self.attempted, self.succeeded, self.failed, self.unknown
        )
    }
}

/// Walks a goal grid row-major and drives each non-empty cell through the client.
#[derive(Debug, Clone)]
pub struct GridReconciler {
    candidate_id: String,
    action: Action,
}

impl GridReconciler {
    pub fn new(candidate_id: impl Into<String>, action: Action) -> Self {
        Self {
            candidate_id: candidate_id.into(),
            action,
        }
    }

    /// Every non-empty cell in walk order, paired with its command.
    ///
    /// Cells whose token cannot be interpreted yield `UnknownCellToken`.
    pub fn commands(
        grid: &GoalGrid,
    ) -> impl Iterator<Item = (Position, Result<PlacementCommand, MegaverseError>)> + '_ {
        grid.cells().filter_map(|(position, raw)| {
            raw.parse::<CellToken>()
                .map(|token| PlacementCommand::from_cell(position, &token))
                .transpose()
                .map(|command| (position, command))
        })
    }

    /// Reconcile `grid`, continuing past per-cell failures.
    ///
    /// Nothing is rolled back: cells placed before a failure stay placed.
    #[instrument(skip_all, fields(action = ?self.action, rows = grid.rows(), columns = grid.columns()))]
    pub fn reconcile<T: Transport, C: Clock>(
        &self,
        grid: &GoalGrid,
        client: &mut RateLimitedClient<T, C>,
    ) -> ReconcileSummary {
        let mut summary = ReconcileSummary::default();

        for (position, command) in Self::commands(grid) {
            summary.attempted += 1;
            let command = match command {
                Ok(command) => command,
                Err(err) => {
                    warn!(%position, error = %err, "skipping cell");
                    summary.failed += 1;
                    summary.unknown += 1;
                    continue;
                }
            };

            let request = command.request(&self.candidate_id, self.action);
            match client.execute(&request) {
                Ok(_) => {
                    summary.succeeded += 1;
                    info!(%command, "cell reconciled");
                }
                Err(err) => {
                    summary.failed += 1;
                    let err = err.into_placement(command.kind, position);
                    error!(error = %err, "cell failed");
                }
            }
        }

        info!(
            attempted = summary.attempted,
            succeeded = summary.succeeded,
            failed = summary.failed,
            unknown = summary.unknown,
            "reconciliation finished"
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;

    use super::*;
    use crate::core::request::{ApiRequest, ApiResponse, Method};
    use crate::core::retry::RetryPolicy;
    use crate::core::types::{Attribute, Color, ObjectKind, Position};
    use crate::test_support::{ManualClock, ScriptedTransport, grid};

    fn client(transport: ScriptedTransport) -> RateLimitedClient<ScriptedTransport, ManualClock> {
        RateLimitedClient::new(
            transport,
            ManualClock::new(),
            Duration::from_millis(500),
            RetryPolicy {
                max_retries: 3,
                base_delay: Duration::from_millis(100),
            },
        )
    }

    #[test]
    fn diagonal_grid_yields_two_polyanets() {
        let goal = grid(&[&["SPACE", "POLYANET"], &["POLYANET", "SPACE"]]);
        let commands: Vec<PlacementCommand> = GridReconciler::commands(&goal)
            .map(|(_, command)| command.expect("known token"))
            .collect();
        assert_eq!(
            commands,
            vec![
                PlacementCommand {
                    kind: ObjectKind::Polyanet,
                    position: Position::new(0, 1),
                    attribute: None,
                },
                PlacementCommand {
                    kind: ObjectKind::Polyanet,
                    position: Position::new(1, 0),
                    attribute: None,
                },
            ]
        );
    }

    #[test]
    fn command_count_matches_non_empty_cells() {
        let goal = grid(&[
            &["SPACE", "BLUE_SOLOON", "UP_COMETH", "SPACE"],
            &["POLYANET", "SPACE", "SPACE", "RED_SOLOON"],
            &["SPACE", "GREEN_SOLOON", "SPACE", "SPACE"],
        ]);
        let non_empty = goal.cells().filter(|(_, raw)| *raw != "SPACE").count();
        assert_eq!(non_empty, 5);
        assert_eq!(GridReconciler::commands(&goal).count(), non_empty);
    }

    #[test]
    fn unknown_token_yields_error_at_its_cell() {
        let goal = grid(&[&["GREEN_SOLOON", "POLYANET"]]);
        let cells: Vec<_> = GridReconciler::commands(&goal).collect();
        assert_eq!(cells.len(), 2);

        let (position, command) = &cells[0];
        assert_eq!(*position, Position::new(0, 0));
        assert!(matches!(
            command,
            Err(MegaverseError::UnknownCellToken { token }) if token == "GREEN_SOLOON"
        ));
        assert_eq!(cells[1].0, Position::new(0, 1));
        assert!(cells[1].1.is_ok());
    }

    #[test]
    fn reconcile_issues_calls_in_row_major_order() {
        let goal = grid(&[
            &["SPACE", "WHITE_SOLOON"],
            &["LEFT_COMETH", "POLYANET"],
        ]);
        let mut client = client(ScriptedTransport::accepting());

        let summary = GridReconciler::new("abc", Action::Create).reconcile(&goal, &mut client);
        assert_eq!(
            summary,
            ReconcileSummary {
                attempted: 3,
                succeeded: 3,
                failed: 0,
                unknown: 0,
            }
        );
        assert!(summary.is_complete());

        let requests = client.transport().requests();
        let paths: Vec<String> = requests.iter().map(ApiRequest::path).collect();
        assert_eq!(paths, vec!["/soloons", "/comeths", "/polyanets"]);
        assert_eq!(
            requests[0].body,
            Some(json!({"candidateId": "abc", "row": 0, "column": 1, "color": "white"}))
        );
        assert_eq!(
            requests[1].body,
            Some(json!({"candidateId": "abc", "row": 1, "column": 0, "direction": "left"}))
        );
    }

    /// A permanently failing cell is counted and the walk carries on.
    #[test]
    fn failed_cell_does_not_abort_walk() {
        let goal = grid(&[&["POLYANET", "POLYANET", "POLYANET"]]);
        let transport = ScriptedTransport::new(vec![
            Ok(ApiResponse::new(201, "")),
            Ok(ApiResponse::new(400, "out of bounds")),
            Ok(ApiResponse::new(201, "")),
        ]);
        let mut client = client(transport);

        let summary = GridReconciler::new("abc", Action::Create).reconcile(&goal, &mut client);
        assert_eq!(summary.attempted, 3);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 1);
        assert!(!summary.is_complete());
        assert_eq!(client.transport().call_count(), 3);
    }

    #[test]
    fn exhausted_retries_count_once_per_cell() {
        let goal = grid(&[&["POLYANET", "SPACE", "POLYANET"]]);
        let transport = ScriptedTransport::new(vec![
            Ok(ApiResponse::new(429, "")),
            Ok(ApiResponse::new(429, "")),
            Ok(ApiResponse::new(429, "")),
        ]);
        let mut client = client(transport);

        let summary = GridReconciler::new("abc", Action::Create).reconcile(&goal, &mut client);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(client.transport().call_count(), 4);
    }

    /// Unknown tokens are skipped and counted rather than aborting the run.
    #[test]
    fn unknown_token_is_counted_and_walk_continues() {
        let goal = grid(&[&["GREEN_SOLOON", "POLYANET"]]);
        let mut client = client(ScriptedTransport::accepting());

        let summary = GridReconciler::new("abc", Action::Create).reconcile(&goal, &mut client);
        assert_eq!(
            summary,
            ReconcileSummary {
                attempted: 2,
                succeeded: 1,
                failed: 1,
                unknown: 1,
            }
        );
        assert_eq!(client.transport().call_count(), 1);
        assert_eq!(GridReconciler::commands(&goal).count(), summary.attempted);
    }

    #[test]
    fn delete_action_targets_same_endpoints() {
        let goal = grid(&[&["PURPLE_SOLOON", "SPACE"]]);
        let mut client = client(ScriptedTransport::accepting());

        GridReconciler::new("abc", Action::Delete).reconcile(&goal, &mut client);
        let requests = client.transport().requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::Delete);
        assert_eq!(requests[0].path(), "/soloons");
        assert_eq!(
            requests[0].body,
            Some(json!({"candidateId": "abc", "row": 0, "column": 0}))
        );
    }

    #[test]
    fn consecutive_placements_are_paced() {
        let goal = grid(&[&["POLYANET", "POLYANET", "POLYANET"]]);
        let mut client = client(ScriptedTransport::accepting());

        GridReconciler::new("abc", Action::Create).reconcile(&goal, &mut client);
        assert_eq!(client.transport().call_count(), 3);
        assert_eq!(
            client.clock().sleeps(),
            vec![Duration::from_millis(500), Duration::from_millis(500)]
        );
    }

    #[test]
    fn summary_line_reports_all_counts() {
        let summary = ReconcileSummary {
            attempted: 4,
            succeeded: 3,
            failed: 1,
            unknown: 0,
        };
        assert_eq!(
            summary.to_string(),
            "attempted=4 succeeded=3 failed=1 (unknown tokens=0)"
        );
    }

    #[test]
    fn soloon_attribute_is_preserved_in_commands() {
        let goal = grid(&[&["SPACE", "SPACE"], &["SPACE", "BLUE_SOLOON"]]);
        let (position, command) = GridReconciler::commands(&goal).next().expect("cell");
        let command = command.expect("known token");
        assert_eq!(command.attribute, Some(Attribute::Color(Color::Blue)));
        assert_eq!(position, Position::new(1, 1));
        assert_eq!(command.position, position);
    }
}
