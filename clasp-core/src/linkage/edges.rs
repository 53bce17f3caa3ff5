//! Edge extraction and ordering for the linkage driver.

use std::cmp::Ordering;

use crate::graph::{NodeId, SparseGraph};

/// Undirected weighted edge taken from the upper triangle of a graph.
///
/// # Examples
/// ```
/// use clasp_core::Edge;
///
/// let edge = Edge::new(0, 3, 0.75);
/// assert_eq!(edge.source(), 0);
/// assert_eq!(edge.target(), 3);
/// assert_eq!(edge.weight(), 0.75);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    source: NodeId,
    target: NodeId,
    weight: f32,
}

impl Edge {
    /// Creates an edge.
    #[must_use]
    pub fn new(source: NodeId, target: NodeId, weight: f32) -> Self {
        Self {
            source,
            target,
            weight,
        }
    }

    /// Returns the lower endpoint, taken from the row the edge was read from.
    #[must_use]
    #[rustfmt::skip]
    pub fn source(&self) -> NodeId { self.source }

    /// Returns the higher endpoint.
    #[must_use]
    #[rustfmt::skip]
    pub fn target(&self) -> NodeId { self.target }

    /// Returns the similarity weight.
    #[must_use]
    #[rustfmt::skip]
    pub fn weight(&self) -> f32 { self.weight }
}

/// Collects every entry `i -> j` with `j > i`, in row-major order.
///
/// Self-loops and lower-triangle entries are ignored, so a symmetric graph
/// yields each undirected edge exactly once.
#[must_use]
pub fn extract_edges(graph: &SparseGraph) -> Vec<Edge> {
    graph
        .entries()
        .filter(|&(row, column, _)| column > row)
        .map(|(row, column, weight)| Edge::new(row, column, weight))
        .collect()
}

/// Sorts edges by weight, largest first.
///
/// The sort is stable: edges of equal weight keep their extraction order,
/// which makes the join sequence reproducible.
pub fn order_edges(edges: &mut [Edge]) {
    edges.sort_by(descending_weight);
}

fn descending_weight(left: &Edge, right: &Edge) -> Ordering {
    right.weight.total_cmp(&left.weight)
}
