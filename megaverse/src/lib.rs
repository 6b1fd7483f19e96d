//! Reliable placement engine for the Megaverse grid API.
//!
//! A run derives a goal grid, walks it row-major and issues one paced,
//! retried create call per required cell. The crate keeps a strict split:
//!
//! - **[`core`]**: Pure, deterministic logic (tokens, grid, commands, retry policy).
//!   No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting adapters (environment config, clock, pacing, HTTP).
//!   Isolated behind traits so tests run without sockets or real sleeps.
//!
//! Orchestration modules ([`reconcile`], [`phase`]) coordinate core logic with I/O
//! to implement CLI commands.

pub mod core;
pub mod error;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod phase;
pub mod reconcile;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
