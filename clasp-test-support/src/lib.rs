//! Shared test utilities used across clasp crates.

pub mod ci;
pub mod tracing;
