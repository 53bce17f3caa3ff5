//! Sparse weighted graph over an arbitrary node domain.
//!
//! A [`SparseGraph`] stores one adjacency row per domain node. Rows are kept
//! sorted by neighbour with at most one entry per neighbour, so every
//! consumer can rely on a stable iteration order. Weights are similarities:
//! larger means more similar.

use crate::error::GraphError;

/// Identifier of a node in a graph domain.
pub type NodeId = usize;

/// Weighted adjacency structure with sorted rows.
///
/// The row and column domains are identical. Duplicate entries supplied at
/// construction are merged by keeping the larger weight.
///
/// # Examples
/// ```
/// use clasp_core::SparseGraph;
///
/// let graph = SparseGraph::canonical(3, [(0, 1, 0.9), (1, 2, 0.5)])?;
/// assert!(graph.is_canonical());
/// assert_eq!(graph.weight(0, 1), Some(0.9));
/// assert_eq!(graph.weight(1, 0), None);
/// # Ok::<(), clasp_core::GraphError>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SparseGraph {
    domain: Vec<NodeId>,
    rows: Vec<Vec<(NodeId, f32)>>,
}

impl SparseGraph {
    /// Builds a graph from a node domain and `(row, column, weight)` entries.
    ///
    /// The domain is sorted and deduplicated.
    ///
    /// # Errors
    /// Returns [`GraphError::NonFiniteWeight`] for NaN or infinite weights and
    /// [`GraphError::NodeOutsideDomain`] when an entry names a node the domain
    /// does not contain.
    pub fn from_entries<D, E>(domain: D, entries: E) -> Result<Self, GraphError>
    where
        D: IntoIterator<Item = NodeId>,
        E: IntoIterator<Item = (NodeId, NodeId, f32)>,
    {
        let mut domain: Vec<NodeId> = domain.into_iter().collect();
        domain.sort_unstable();
        domain.dedup();
        let mut rows = vec![Vec::new(); domain.len()];
        for (row, column, weight) in entries {
            if !weight.is_finite() {
                return Err(GraphError::NonFiniteWeight { row, column });
            }
            let position = locate(&domain, row)?;
            locate(&domain, column)?;
            rows[position].push((column, weight));
        }
        rows.iter_mut().for_each(normalise_row);
        Ok(Self { domain, rows })
    }

    /// Builds a graph over the canonical domain `0..node_count`.
    ///
    /// # Errors
    /// Fails under the same conditions as [`Self::from_entries`].
    pub fn canonical<E>(node_count: usize, entries: E) -> Result<Self, GraphError>
    where
        E: IntoIterator<Item = (NodeId, NodeId, f32)>,
    {
        Self::from_entries(0..node_count, entries)
    }

    /// Builds a graph over `domain` without any entries.
    #[must_use]
    pub fn isolated<D>(domain: D) -> Self
    where
        D: IntoIterator<Item = NodeId>,
    {
        let mut domain: Vec<NodeId> = domain.into_iter().collect();
        domain.sort_unstable();
        domain.dedup();
        let rows = vec![Vec::new(); domain.len()];
        Self { domain, rows }
    }

    /// Returns the number of nodes in the domain.
    #[must_use]
    #[rustfmt::skip]
    pub fn node_count(&self) -> usize { self.domain.len() }

    /// Returns the sorted node domain.
    #[must_use]
    #[rustfmt::skip]
    pub fn domain(&self) -> &[NodeId] { &self.domain }

    /// Returns the total number of stored entries.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    /// Returns `true` when the domain is exactly `0..node_count`.
    #[must_use]
    pub fn is_canonical(&self) -> bool {
        self.first_non_canonical().is_none()
    }

    /// Returns the first `(position, node)` pair where the node differs from
    /// its position, or `None` for a canonical domain.
    #[must_use]
    pub fn first_non_canonical(&self) -> Option<(usize, NodeId)> {
        self.domain
            .iter()
            .copied()
            .enumerate()
            .find(|&(position, node)| position != node)
    }

    /// Returns `true` when `node` belongs to the domain.
    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        self.domain.binary_search(&node).is_ok()
    }

    /// Returns the adjacency row of `node` sorted by neighbour.
    #[must_use]
    pub fn row(&self, node: NodeId) -> Option<&[(NodeId, f32)]> {
        let position = self.domain.binary_search(&node).ok()?;
        self.rows.get(position).map(Vec::as_slice)
    }

    /// Iterates over `(node, row)` pairs in domain order.
    pub fn rows(&self) -> impl Iterator<Item = (NodeId, &[(NodeId, f32)])> + '_ {
        self.domain
            .iter()
            .copied()
            .zip(self.rows.iter().map(Vec::as_slice))
    }

    /// Iterates over every `(row, column, weight)` entry in row-major order.
    pub fn entries(&self) -> impl Iterator<Item = (NodeId, NodeId, f32)> + '_ {
        self.rows().flat_map(|(node, row)| {
            row.iter()
                .map(move |&(column, weight)| (node, column, weight))
        })
    }

    /// Returns the stored weight of the `row -> column` entry.
    #[must_use]
    pub fn weight(&self, row: NodeId, column: NodeId) -> Option<f32> {
        let entries = self.row(row)?;
        entries
            .binary_search_by_key(&column, |&(neighbour, _)| neighbour)
            .ok()
            .map(|index| entries[index].1)
    }

    /// Returns `true` when every entry has a mirror entry of equal weight.
    #[must_use]
    pub fn is_symmetric(&self) -> bool {
        self.entries()
            .all(|(row, column, weight)| self.weight(column, row) == Some(weight))
    }

    /// Returns a copy where every entry is mirrored, merging duplicates by
    /// keeping the larger weight.
    #[must_use]
    pub fn symmetrized(&self) -> Self {
        let mut rows = self.rows.clone();
        for (row, column, weight) in self.entries() {
            if let Ok(position) = self.domain.binary_search(&column) {
                rows[position].push((row, weight));
            }
        }
        rows.iter_mut().for_each(normalise_row);
        Self {
            domain: self.domain.clone(),
            rows,
        }
    }

    /// Returns a copy keeping only entries accepted by `keep`.
    #[must_use]
    pub fn retain_entries<F>(&self, mut keep: F) -> Self
    where
        F: FnMut(NodeId, NodeId, f32) -> bool,
    {
        let rows = self
            .rows()
            .map(|(node, row)| {
                row.iter()
                    .copied()
                    .filter(|&(column, weight)| keep(node, column, weight))
                    .collect::<Vec<_>>()
            })
            .collect();
        Self {
            domain: self.domain.clone(),
            rows,
        }
    }

    /// Returns a copy keeping entries whose weight is at least `cutoff`.
    #[must_use]
    pub fn at_least(&self, cutoff: f64) -> Self {
        self.retain_entries(|_, _, weight| f64::from(weight) >= cutoff)
    }

    /// Returns a copy where `f` rewrites or drops each entry.
    ///
    /// # Errors
    /// Returns [`GraphError::NonFiniteWeight`] when `f` yields a NaN or
    /// infinite weight.
    pub fn filter_map_entries<F>(&self, mut f: F) -> Result<Self, GraphError>
    where
        F: FnMut(NodeId, NodeId, f32) -> Option<f32>,
    {
        let mut rows = Vec::with_capacity(self.rows.len());
        for (node, row) in self.rows() {
            let mut kept = Vec::with_capacity(row.len());
            for &(column, weight) in row {
                let Some(mapped) = f(node, column, weight) else {
                    continue;
                };
                if !mapped.is_finite() {
                    return Err(GraphError::NonFiniteWeight { row: node, column });
                }
                kept.push((column, mapped));
            }
            rows.push(kept);
        }
        Ok(Self {
            domain: self.domain.clone(),
            rows,
        })
    }

    /// Returns the sub-graph induced by `nodes` on both rows and columns.
    ///
    /// # Errors
    /// Returns [`GraphError::NodeOutsideDomain`] when a requested node is not
    /// part of this graph.
    pub fn restrict(&self, nodes: &[NodeId]) -> Result<Self, GraphError> {
        let mut domain = nodes.to_vec();
        domain.sort_unstable();
        domain.dedup();
        let mut rows = Vec::with_capacity(domain.len());
        for &node in &domain {
            let position = locate(&self.domain, node)?;
            let row = self.rows[position]
                .iter()
                .copied()
                .filter(|&(column, _)| domain.binary_search(&column).is_ok())
                .collect();
            rows.push(row);
        }
        Ok(Self { domain, rows })
    }

    /// Returns a copy with every node renamed through `image`.
    ///
    /// # Errors
    /// Returns [`GraphError::UnmappedNode`] when `image` yields `None` for a
    /// domain node.
    pub fn relabel<F>(&self, mut image: F) -> Result<Self, GraphError>
    where
        F: FnMut(NodeId) -> Option<NodeId>,
    {
        let mut lookup = |node: NodeId| image(node).ok_or(GraphError::UnmappedNode { node });
        let domain = self
            .domain
            .iter()
            .map(|&node| lookup(node))
            .collect::<Result<Vec<_>, _>>()?;
        let mut entries = Vec::with_capacity(self.entry_count());
        for (row, column, weight) in self.entries() {
            entries.push((lookup(row)?, lookup(column)?, weight));
        }
        Self::from_entries(domain, entries)
    }
}

fn locate(domain: &[NodeId], node: NodeId) -> Result<usize, GraphError> {
    domain
        .binary_search(&node)
        .map_err(|_| GraphError::NodeOutsideDomain { node })
}

fn normalise_row(row: &mut Vec<(NodeId, f32)>) {
    row.sort_by_key(|&(column, _)| column);
    row.dedup_by(|next, kept| {
        if next.0 == kept.0 {
            kept.1 = kept.1.max(next.1);
            true
        } else {
            false
        }
    });
}
