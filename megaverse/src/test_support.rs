//! Test-only helpers: scripted transport, virtual clock and grid builders.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::core::grid::GoalGrid;
use crate::core::request::{ApiRequest, ApiResponse};
use crate::io::clock::Clock;
use crate::io::transport::{Transport, TransportError};

/// Transport that replays queued outcomes and records every request.
///
/// Once the queue is drained every further call answers `201 Created`.
pub struct ScriptedTransport {
    responses: RefCell<VecDeque<Result<ApiResponse, TransportError>>>,
    requests: RefCell<Vec<ApiRequest>>,
    sent_at: RefCell<Vec<Instant>>,
}

impl ScriptedTransport {
    pub fn new(responses: Vec<Result<ApiResponse, TransportError>>) -> Self {
        Self {
            responses: RefCell::new(responses.into()),
            requests: RefCell::new(Vec::new()),
            sent_at: RefCell::new(Vec::new()),
        }
    }

    /// Transport that answers `201 Created` to everything.
    pub fn accepting() -> Self {
        Self::new(Vec::new())
    }

    pub fn call_count(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.borrow().clone()
    }

    /// Wall-clock instants at which each request was sent.
    pub fn sent_at(&self) -> Vec<Instant> {
        self.sent_at.borrow().clone()
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        self.sent_at.borrow_mut().push(Instant::now());
        self.requests.borrow_mut().push(request.clone());
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(ApiResponse::new(201, "{}")))
    }
}

/// Virtual clock: `sleep` advances time instantly and is recorded.
pub struct ManualClock {
    origin: Instant,
    offset: Cell<Duration>,
    sleeps: RefCell<Vec<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Cell::new(Duration::ZERO),
            sleeps: RefCell::new(Vec::new()),
        }
    }

    /// Move time forward without recording a sleep.
    pub fn advance(&self, by: Duration) {
        self.offset.set(self.offset.get() + by);
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.borrow().clone()
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.offset.get()
    }

    fn sleep(&self, duration: Duration) {
        self.sleeps.borrow_mut().push(duration);
        self.advance(duration);
    }
}

/// Build a grid from string rows. Panics on shape errors.
pub fn grid(rows: &[&[&str]]) -> GoalGrid {
    GoalGrid::new(
        rows.iter()
            .map(|row| row.iter().map(|token| token.to_string()).collect())
            .collect(),
    )
    .expect("valid test grid")
}

/// JSON body of a goal-map response for `rows`.
pub fn goal_body(rows: &[&[&str]]) -> String {
    serde_json::json!({ "goal": rows }).to_string()
}
