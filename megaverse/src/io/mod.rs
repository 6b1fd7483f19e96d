//! I/O adapters for placement runs.

pub mod client;
pub mod clock;
pub mod config;
pub mod goal;
pub mod pacer;
pub mod transport;
