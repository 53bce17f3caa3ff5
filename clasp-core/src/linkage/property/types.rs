//! Fixture types for linkage property tests.

use test_strategy::Arbitrary;

use crate::{NodeId, SparseGraph};

/// Shape of the generated similarity graph.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Arbitrary)]
pub(super) enum GraphShape {
    /// Random pairs with distinct continuous weights.
    #[weight(3)]
    Unique,
    /// Random pairs drawing weights from a tiny pool, so ties dominate.
    #[weight(3)]
    ManyIdentical,
    /// A random spanning path plus a few extra edges.
    #[weight(2)]
    Sparse,
    /// Several blocks without any cross-block edge.
    #[weight(2)]
    Disconnected,
    /// Nodes with no edges at all.
    #[weight(1)]
    Edgeless,
}

/// Generated input for the linkage properties.
#[derive(Clone, Debug)]
pub(super) struct LinkageFixture {
    /// Number of nodes in the canonical domain.
    pub node_count: usize,
    /// Undirected edges as `(i, j, weight)` with `i < j`.
    pub edges: Vec<(NodeId, NodeId, f32)>,
    /// Shape used during generation.
    pub shape: GraphShape,
}

impl LinkageFixture {
    /// Builds the symmetric canonical graph described by the fixture.
    pub(super) fn graph(&self) -> SparseGraph {
        let mirrored = self
            .edges
            .iter()
            .flat_map(|&(i, j, weight)| [(i, j, weight), (j, i, weight)]);
        SparseGraph::canonical(self.node_count, mirrored)
            .expect("generated edges stay inside the domain")
    }
}
