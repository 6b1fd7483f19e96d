//! Stable exit codes for megaverse CLI commands.

/// Every required cell was placed.
pub const OK: i32 = 0;
/// The run aborted: missing/invalid config, goal map unavailable, or other errors.
pub const FATAL: i32 = 1;
/// The run completed but at least one cell failed permanently.
pub const PARTIAL: i32 = 2;
