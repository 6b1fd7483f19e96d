//! Run configuration sourced from environment variables.

use std::time::Duration;

use reqwest::Url;

use crate::core::retry::RetryPolicy;
use crate::error::MegaverseError;

pub const API_BASE_URL_VAR: &str = "API_BASE_URL";
pub const CANDIDATE_ID_VAR: &str = "CANDIDATE_ID";
pub const MIN_INTERVAL_MS_VAR: &str = "MEGAVERSE_MIN_INTERVAL_MS";
pub const MAX_RETRIES_VAR: &str = "MEGAVERSE_MAX_RETRIES";
pub const RETRY_BASE_MS_VAR: &str = "MEGAVERSE_RETRY_BASE_MS";
pub const TIMEOUT_SECS_VAR: &str = "MEGAVERSE_TIMEOUT_SECS";

pub const DEFAULT_API_BASE_URL: &str = "https://challenge.crossmint.io/api";

/// Megaverse run configuration.
///
/// Only `CANDIDATE_ID` is required. Everything else falls back to the values
/// the challenge API tolerates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MegaverseConfig {
    /// API root without a trailing `/`.
    pub api_base_url: String,
    pub candidate_id: String,
    /// Minimum gap between two outbound calls.
    pub min_interval: Duration,
    pub retry: RetryPolicy,
    /// Per-attempt HTTP timeout.
    pub request_timeout: Duration,
}

impl MegaverseConfig {
    /// Defaults for everything but the candidate id.
    pub fn with_candidate(candidate_id: impl Into<String>) -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            candidate_id: candidate_id.into(),
            min_interval: Duration::from_millis(500),
            retry: RetryPolicy::default(),
            request_timeout: Duration::from_secs(10),
        }
    }

    /// Load from the process environment.
    pub fn from_env() -> Result<Self, MegaverseError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, MegaverseError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let candidate_id = lookup(CANDIDATE_ID_VAR)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or(MegaverseError::ConfigMissing {
                var: CANDIDATE_ID_VAR,
            })?;
        let mut cfg = Self::with_candidate(candidate_id);

        if let Some(url) = lookup(API_BASE_URL_VAR) {
            cfg.api_base_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(ms) = parse_var::<u64, _>(&lookup, MIN_INTERVAL_MS_VAR)? {
            cfg.min_interval = Duration::from_millis(ms);
        }
        if let Some(retries) = parse_var::<u32, _>(&lookup, MAX_RETRIES_VAR)? {
            cfg.retry.max_retries = retries;
        }
        if let Some(ms) = parse_var::<u64, _>(&lookup, RETRY_BASE_MS_VAR)? {
            cfg.retry.base_delay = Duration::from_millis(ms);
        }
        if let Some(secs) = parse_var::<u64, _>(&lookup, TIMEOUT_SECS_VAR)? {
            cfg.request_timeout = Duration::from_secs(secs);
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), MegaverseError> {
        if self.api_base_url.is_empty() {
            return Err(invalid(API_BASE_URL_VAR, "must not be empty"));
        }
        let url = Url::parse(&self.api_base_url)
            .map_err(|err| invalid(API_BASE_URL_VAR, &format!("{:?}: {err}", self.api_base_url)))?;
        if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
            return Err(invalid(
                API_BASE_URL_VAR,
                &format!("{:?}: expected an http(s) URL", self.api_base_url),
            ));
        }
        if self.retry.max_retries == 0 {
            return Err(invalid(MAX_RETRIES_VAR, "must be > 0"));
        }
        if self.request_timeout.is_zero() {
            return Err(invalid(TIMEOUT_SECS_VAR, "must be > 0"));
        }
        Ok(())
    }
}

fn parse_var<T, F>(lookup: &F, var: &'static str) -> Result<Option<T>, MegaverseError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(var) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<T>()
        .map(Some)
        .map_err(|err| invalid(var, &format!("{raw:?}: {err}")))
}

fn invalid(var: &'static str, reason: &str) -> MegaverseError {
    MegaverseError::ConfigInvalid {
        var,
        reason: reason.to_string(),
    }
}
