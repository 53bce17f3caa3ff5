//! Component partitions.

use crate::{
    error::GraphError,
    graph::{NodeId, SparseGraph},
};

/// Disjoint columns covering a node domain.
///
/// Columns are ordered by size, largest first, with ties broken by the
/// smallest member. Members inside a column are sorted.
///
/// # Examples
/// ```
/// use clasp_core::Partition;
///
/// let partition = Partition::from_columns(vec![vec![4], vec![2, 0, 1]])?;
/// assert_eq!(partition.columns(), &[vec![0, 1, 2], vec![4]]);
/// assert_eq!(partition.sizes(), vec![3, 1]);
/// assert_eq!(partition.column_of(4), Some(1));
/// # Ok::<(), clasp_core::GraphError>(())
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Partition {
    domain: Vec<NodeId>,
    assignment: Vec<usize>,
    columns: Vec<Vec<NodeId>>,
}

impl Partition {
    /// Builds a partition from arbitrary member lists.
    ///
    /// Empty columns are dropped.
    ///
    /// # Errors
    /// Returns [`GraphError::DuplicateMember`] when a node appears in more
    /// than one column or twice in the same column.
    pub fn from_columns(mut columns: Vec<Vec<NodeId>>) -> Result<Self, GraphError> {
        columns.retain(|column| !column.is_empty());
        columns.iter_mut().for_each(|column| column.sort_unstable());
        columns.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a[0].cmp(&b[0])));

        let mut members: Vec<(NodeId, usize)> = columns
            .iter()
            .enumerate()
            .flat_map(|(index, column)| column.iter().map(move |&node| (node, index)))
            .collect();
        members.sort_unstable();
        if let Some(pair) = members.windows(2).find(|pair| pair[0].0 == pair[1].0) {
            return Err(GraphError::DuplicateMember { node: pair[0].0 });
        }
        let (domain, assignment) = members.into_iter().unzip();
        Ok(Self {
            domain,
            assignment,
            columns,
        })
    }

    /// Returns the number of columns.
    #[must_use]
    #[rustfmt::skip]
    pub fn len(&self) -> usize { self.columns.len() }

    /// Returns `true` when the partition has no columns.
    #[must_use]
    #[rustfmt::skip]
    pub fn is_empty(&self) -> bool { self.columns.is_empty() }

    /// Returns the member lists.
    #[must_use]
    #[rustfmt::skip]
    pub fn columns(&self) -> &[Vec<NodeId>] { &self.columns }

    /// Returns the sorted union of all columns.
    #[must_use]
    #[rustfmt::skip]
    pub fn domain(&self) -> &[NodeId] { &self.domain }

    /// Returns the column sizes in column order.
    #[must_use]
    pub fn sizes(&self) -> Vec<usize> {
        self.columns.iter().map(Vec::len).collect()
    }

    /// Returns the index of the column holding `node`.
    #[must_use]
    pub fn column_of(&self, node: NodeId) -> Option<usize> {
        let position = self.domain.binary_search(&node).ok()?;
        self.assignment.get(position).copied()
    }

    /// Returns `true` when both nodes belong to the same column.
    #[must_use]
    pub fn same_column(&self, left: NodeId, right: NodeId) -> bool {
        matches!(
            (self.column_of(left), self.column_of(right)),
            (Some(a), Some(b)) if a == b
        )
    }

    /// Returns the columns selected by `indices`, keeping their order.
    ///
    /// Out-of-range indices are ignored.
    #[must_use]
    pub fn select(&self, indices: &[usize]) -> Self {
        let columns = indices
            .iter()
            .filter_map(|&index| self.columns.get(index).cloned())
            .collect();
        Self::from_columns(columns).unwrap_or_default()
    }

    /// Returns the entries of `graph` whose endpoints share a column.
    #[must_use]
    pub fn within_blocks(&self, graph: &SparseGraph) -> SparseGraph {
        graph.retain_entries(|row, column, _| self.same_column(row, column))
    }

    /// Returns the entries of `graph` whose endpoints do not share a column.
    #[must_use]
    pub fn between_blocks(&self, graph: &SparseGraph) -> SparseGraph {
        graph.retain_entries(|row, column, _| !self.same_column(row, column))
    }

    /// Returns a copy with every member renamed through `image`.
    ///
    /// # Errors
    /// Returns [`GraphError::UnmappedNode`] when `image` yields `None`, and
    /// [`GraphError::DuplicateMember`] when two members collide.
    pub fn relabel<F>(&self, mut image: F) -> Result<Self, GraphError>
    where
        F: FnMut(NodeId) -> Option<NodeId>,
    {
        let columns = self
            .columns
            .iter()
            .map(|column| {
                column
                    .iter()
                    .map(|&node| image(node).ok_or(GraphError::UnmappedNode { node }))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_columns(columns)
    }
}
