//! Benchmark parameter types.

use std::fmt;

/// Size of one benchmark input graph.
#[derive(Clone, Copy, Debug)]
pub struct GraphBenchParams {
    /// Number of nodes.
    pub node_count: usize,
    /// Average number of stored entries per node.
    pub mean_degree: usize,
}

impl fmt::Display for GraphBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={},d={}", self.node_count, self.mean_degree)
    }
}
