//! Property-based tests for the single-linkage driver.
//!
//! Checks the driver against an independent component computation, bounds
//! the relabelling work done by the cluster forest, verifies the incremental
//! size diagnostics after every merge, and asserts that repeated runs emit
//! identical logs.

mod invariants;
mod strategies;
#[cfg(test)]
mod tests;
mod types;
