//! Paced, retrying client over a [`Transport`].

use std::time::Duration;

use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::core::request::{ApiRequest, ApiResponse};
use crate::core::retry::{RetryPolicy, StatusClass, classify_status};
use crate::core::types::{ObjectKind, Position};
use crate::error::MegaverseError;
use crate::io::clock::Clock;
use crate::io::pacer::Pacer;
use crate::io::transport::Transport;

/// A call that never produced a 2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{cause} (after {attempts} attempt(s))")]
pub struct CallError {
    /// True when the budget ran out on retriable failures.
    pub retriable: bool,
    pub attempts: u32,
    /// Last observed failure.
    pub cause: String,
}

impl CallError {
    pub fn into_placement(self, kind: ObjectKind, position: Position) -> MegaverseError {
        MegaverseError::PlacementFailed {
            kind,
            position,
            retriable: self.retriable,
            cause: self.to_string(),
        }
    }
}

/// Executes calls one at a time, never closer together than the pacer's
/// interval, retrying 429/5xx and network failures with exponential backoff.
pub struct RateLimitedClient<T, C> {
    transport: T,
    clock: C,
    pacer: Pacer,
    policy: RetryPolicy,
}

impl<T: Transport, C: Clock> RateLimitedClient<T, C> {
    pub fn new(transport: T, clock: C, min_interval: Duration, policy: RetryPolicy) -> Self {
        Self {
            transport,
            clock,
            pacer: Pacer::new(min_interval),
            policy,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Execute `request`, pacing every attempt and retrying transient failures.
    ///
    /// Gives up after `max_retries` attempts with `retriable: true`, or after the
    /// first non-retriable failure with `retriable: false`.
    #[instrument(skip_all, fields(method = %request.method, path = %request.path()))]
    pub fn execute(&mut self, request: &ApiRequest) -> Result<ApiResponse, CallError> {
        let max_attempts = self.policy.max_retries.max(1);
        let mut attempt = 0;
        loop {
            attempt += 1;
            self.pacer.wait(&self.clock);
            info!(attempt, max_attempts, "sending request");

            let outcome = self.transport.send(request);
            self.pacer.record(&self.clock);

            let cause = match outcome {
                Ok(response) => match classify_status(response.status) {
                    StatusClass::Success => return Ok(response),
                    StatusClass::Retriable => describe_status(&response),
                    StatusClass::Fatal => {
                        warn!(attempt, status = response.status, "request rejected");
                        return Err(CallError {
                            retriable: false,
                            attempts: attempt,
                            cause: describe_status(&response),
                        });
                    }
                },
                Err(err) if err.is_retriable() => err.to_string(),
                Err(err) => {
                    warn!(attempt, error = %err, "request failed");
                    return Err(CallError {
                        retriable: false,
                        attempts: attempt,
                        cause: err.to_string(),
                    });
                }
            };

            let Some(delay) = self.policy.backoff_after(attempt) else {
                warn!(attempt, cause = %cause, "retries exhausted");
                return Err(CallError {
                    retriable: true,
                    attempts: attempt,
                    cause,
                });
            };
            warn!(
                attempt,
                max_attempts,
                cause = %cause,
                backoff_ms = delay.as_millis() as u64,
                "retriable failure, backing off"
            );
            self.clock.sleep(delay);
        }
    }
}

fn describe_status(response: &ApiResponse) -> String {
    let body = response.body.trim();
    if body.is_empty() {
        format!("HTTP {}", response.status)
    } else {
        format!("HTTP {}: {}", response.status, body)
    }
}
