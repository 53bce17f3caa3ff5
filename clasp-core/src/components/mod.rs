//! Connected components of a similarity graph.
//!
//! Components are computed either by breadth-first propagation over the
//! stored adjacency, when the caller vouches that the graph is symmetric, or
//! by unioning the endpoints of every stored entry, which treats each entry
//! as undirected.

mod partition;
mod union_find;

pub use partition::Partition;

use std::collections::VecDeque;

use tracing::debug;

use crate::{
    Result,
    graph::{NodeId, SparseGraph},
};

use self::union_find::DisjointSet;

/// Partitions `graph` into connected components.
///
/// With `restrict` set, only the listed nodes take part and entries touching
/// any other node are ignored. When `assume_symmetric` is `true` the stored
/// rows are trusted as undirected adjacency; otherwise each entry joins its
/// endpoints in both directions.
///
/// # Errors
/// Returns [`crate::GraphError::NodeOutsideDomain`] when `restrict` names a
/// node outside the graph.
///
/// # Examples
/// ```
/// use clasp_core::{SparseGraph, find_components};
///
/// let graph = SparseGraph::canonical(4, [(0, 1, 1.0), (2, 1, 1.0)])?;
/// let partition = find_components(&graph, None, false)?;
/// assert_eq!(partition.columns(), &[vec![0, 1, 2], vec![3]]);
///
/// let restricted = find_components(&graph, Some([0, 2, 3].as_slice()), false)?;
/// assert_eq!(restricted.sizes(), vec![1, 1, 1]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn find_components(
    graph: &SparseGraph,
    restrict: Option<&[NodeId]>,
    assume_symmetric: bool,
) -> Result<Partition> {
    let scoped;
    let graph = match restrict {
        Some(nodes) => {
            scoped = graph.restrict(nodes)?;
            &scoped
        }
        None => graph,
    };

    let labels = if assume_symmetric {
        propagate(graph)
    } else {
        union_entries(graph)
    };

    let domain = graph.domain();
    let mut columns: Vec<Vec<NodeId>> = vec![Vec::new(); domain.len()];
    for (&node, &label) in domain.iter().zip(&labels) {
        columns[label].push(node);
    }
    let partition = Partition::from_columns(columns)?;
    debug!(
        nodes = domain.len(),
        components = partition.len(),
        "components discovered"
    );
    record_components(partition.len());
    Ok(partition)
}

/// Labels every domain position with the position of the first node reached
/// in its component.
fn propagate(graph: &SparseGraph) -> Vec<usize> {
    let domain = graph.domain();
    let mut labels = vec![usize::MAX; domain.len()];
    let mut queue = VecDeque::new();
    for start in 0..domain.len() {
        if labels[start] != usize::MAX {
            continue;
        }
        labels[start] = start;
        queue.push_back(start);
        while let Some(position) = queue.pop_front() {
            let neighbours = graph.row(domain[position]).unwrap_or_default();
            for &(neighbour, _) in neighbours {
                let Ok(next) = domain.binary_search(&neighbour) else {
                    continue;
                };
                if labels[next] == usize::MAX {
                    labels[next] = start;
                    queue.push_back(next);
                }
            }
        }
    }
    labels
}

fn union_entries(graph: &SparseGraph) -> Vec<usize> {
    let domain = graph.domain();
    let mut sets = DisjointSet::new(domain.len());
    for (row, column, _) in graph.entries() {
        if let (Ok(left), Ok(right)) = (domain.binary_search(&row), domain.binary_search(&column)) {
            sets.union(left, right);
        }
    }
    sets.labels()
}

#[cfg(feature = "metrics")]
fn record_components(count: usize) {
    metrics::counter!("components_discovered_total").increment(count as u64);
}

#[cfg(not(feature = "metrics"))]
fn record_components(_count: usize) {}
