//! Benchmark support crate for clasp.
//!
//! Provides seeded random similarity graphs and parameter types shared by
//! the Criterion benchmarks for linkage, components and sweeps.

pub mod error;
pub mod params;
pub mod source;
