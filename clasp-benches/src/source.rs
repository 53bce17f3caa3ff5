//! Seeded random similarity graphs.

use clasp_core::SparseGraph;
use rand::{Rng, SeedableRng, rngs::SmallRng};

use crate::error::BenchSetupError;

/// Shape of a generated graph.
#[derive(Clone, Copy, Debug)]
pub struct RandomGraphConfig {
    /// Number of nodes, forming the domain `0..node_count`.
    pub node_count: usize,
    /// Average number of stored entries per node.
    pub mean_degree: usize,
    /// Seed for the generator.
    pub seed: u64,
}

impl RandomGraphConfig {
    /// Generates a symmetric graph with weights in `(0, 1]`.
    ///
    /// Endpoints are drawn uniformly, so sparse configurations leave some
    /// nodes isolated and split the rest into several components.
    ///
    /// # Errors
    /// Returns [`BenchSetupError::InvalidConfig`] for fewer than two nodes.
    pub fn generate(&self) -> Result<SparseGraph, BenchSetupError> {
        if self.node_count < 2 {
            return Err(BenchSetupError::InvalidConfig {
                reason: "at least two nodes are required",
            });
        }
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let pairs = self.node_count.saturating_mul(self.mean_degree) / 2;
        let mut entries = Vec::with_capacity(pairs.saturating_mul(2));
        for _ in 0..pairs {
            let source = rng.gen_range(0..self.node_count);
            let target = rng.gen_range(0..self.node_count);
            if source == target {
                continue;
            }
            let weight = 1.0 - rng.gen_range(0.0..1.0_f32);
            entries.extend([(source, target, weight), (target, source, weight)]);
        }
        Ok(SparseGraph::canonical(self.node_count, entries)?)
    }
}
