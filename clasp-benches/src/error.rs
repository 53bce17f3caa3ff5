//! Benchmark setup error type.

use clasp_core::{ClaspError, GraphError};

/// Errors that may occur while preparing benchmark inputs.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// The generator configuration was rejected.
    #[error("invalid graph configuration: {reason}")]
    InvalidConfig {
        /// Why the configuration was rejected.
        reason: &'static str,
    },
    /// Assembling the graph failed.
    #[error("graph construction failed: {0}")]
    Graph(#[from] GraphError),
    /// A core operation failed.
    #[error("core operation failed: {0}")]
    Core(#[from] ClaspError),
}
