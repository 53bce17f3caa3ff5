//! Support library for the clasp CLI binary.
//!
//! Exposes the command pipeline and logging setup so tests can drive the
//! commands without spawning a process.

pub mod cli;
pub mod logging;
