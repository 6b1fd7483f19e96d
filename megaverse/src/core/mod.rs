//! Deterministic, pure logic for the placement engine.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data structures and return deterministic outputs suitable for tests.

pub mod command;
pub mod grid;
pub mod request;
pub mod retry;
pub mod types;
