//! Goal map retrieval.

use serde::Deserialize;
use tracing::{info, instrument};

use crate::core::grid::GoalGrid;
use crate::core::request::ApiRequest;
use crate::error::MegaverseError;
use crate::io::client::RateLimitedClient;
use crate::io::clock::Clock;
use crate::io::transport::Transport;

#[derive(Debug, Deserialize)]
struct GoalMapResponse {
    goal: Vec<Vec<String>>,
}

/// Fetches the target grid for one candidate. Never caches.
#[derive(Debug, Clone)]
pub struct GoalMapFetcher {
    candidate_id: String,
}

impl GoalMapFetcher {
    pub fn new(candidate_id: impl Into<String>) -> Self {
        Self {
            candidate_id: candidate_id.into(),
        }
    }

    /// The candidate id travels as a single path segment; the transport escapes it.
    pub fn request(&self) -> ApiRequest {
        ApiRequest::get(["map", self.candidate_id.as_str(), "goal"])
    }

    /// Issue one (retried) `GET /map/{candidateId}/goal` and validate the grid.
    #[instrument(skip_all, fields(candidate_id = %self.candidate_id))]
    pub fn fetch<T: Transport, C: Clock>(
        &self,
        client: &mut RateLimitedClient<T, C>,
    ) -> Result<GoalGrid, MegaverseError> {
        let response = client
            .execute(&self.request())
            .map_err(|err| MegaverseError::GoalMapUnavailable(err.to_string()))?;
        let parsed: GoalMapResponse = serde_json::from_str(&response.body).map_err(|err| {
            MegaverseError::GoalMapUnavailable(format!("parse goal map: {err}"))
        })?;
        let grid = GoalGrid::new(parsed.goal)
            .map_err(|err| MegaverseError::GoalMapUnavailable(err.to_string()))?;
        info!(
            rows = grid.rows(),
            columns = grid.columns(),
            "goal map fetched"
        );
        Ok(grid)
    }
}
