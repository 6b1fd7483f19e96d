//! Minimum-interval pacing gate.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::io::clock::Clock;

/// Enforces a minimum gap between consecutive outbound calls.
///
/// This is a gate, not a queue: [`Pacer::wait`] blocks the caller until the
/// interval has elapsed since the last recorded call. The owner records each
/// call once its exchange has finished, so the gap holds between sends even
/// when a send itself takes time.
#[derive(Debug, Clone)]
pub struct Pacer {
    min_interval: Duration,
    last_call: Option<Instant>,
}

impl Pacer {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: None,
        }
    }

    /// Block until a call may be issued. Returns the time waited.
    pub fn wait<C: Clock>(&self, clock: &C) -> Duration {
        let Some(last) = self.last_call else {
            return Duration::ZERO;
        };
        let elapsed = clock.now().saturating_duration_since(last);
        if elapsed >= self.min_interval {
            return Duration::ZERO;
        }
        let remaining = self.min_interval - elapsed;
        debug!(wait_ms = remaining.as_millis() as u64, "pacing outbound call");
        clock.sleep(remaining);
        remaining
    }

    /// Stamp the end of a call.
    pub fn record<C: Clock>(&mut self, clock: &C) {
        self.last_call = Some(clock.now());
    }
}
