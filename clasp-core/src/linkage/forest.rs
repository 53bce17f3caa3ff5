//! Weighted union-find with explicit member lists.
//!
//! Every node stores its cluster root directly, so `find` is a single lookup.
//! Each root additionally owns an intrusive singly linked list of its
//! members. A merge appends the smaller list to the larger one and relabels
//! only the smaller side, which bounds the total relabelling work by
//! `N log2 N` over any merge sequence.

use std::mem;

use crate::graph::NodeId;

#[derive(Clone, Debug)]
struct ClusterNode {
    name: String,
    root: NodeId,
    size: usize,
    largest_sub_split: usize,
    singleton_joins: usize,
    next: Option<NodeId>,
    last: NodeId,
}

impl ClusterNode {
    fn leaf(id: NodeId, name: String) -> Self {
        Self {
            name,
            root: id,
            size: 1,
            largest_sub_split: 0,
            singleton_joins: 0,
            next: None,
            last: id,
        }
    }
}

/// One side of a merge, captured before the merge took place.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MergedSide {
    /// Root of the cluster.
    pub root: NodeId,
    /// Name the cluster carried.
    pub name: String,
    /// Number of members.
    pub size: usize,
}

/// Outcome of [`ClusterForest::merge`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Merge {
    /// Root that now represents the merged cluster.
    pub new_root: NodeId,
    /// Root that was absorbed and relabelled.
    pub other_root: NodeId,
    /// Name synthesised for the merged cluster.
    pub name: String,
    /// First argument side.
    pub left: MergedSide,
    /// Second argument side.
    pub right: MergedSide,
    /// Size of the merged cluster.
    pub size: usize,
    /// Largest smaller-side size seen in any merge inside the cluster.
    pub largest_sub_split: usize,
    /// Number of merges inside the cluster where exactly one side was a
    /// singleton.
    pub singleton_joins: usize,
}

/// Cluster arena used by the linkage driver.
///
/// # Examples
/// ```
/// use clasp_core::ClusterForest;
///
/// let mut forest = ClusterForest::new(3);
/// let merge = forest.merge(0, 2).expect("distinct roots merge");
/// assert_eq!(merge.name, "L1_2");
/// assert_eq!(forest.find(2), Some(0));
/// assert_eq!(forest.size(2), Some(2));
/// assert!(forest.merge(0, 0).is_none());
/// ```
#[derive(Clone, Debug)]
pub struct ClusterForest {
    nodes: Vec<ClusterNode>,
    merges: usize,
    relabels: usize,
}

impl ClusterForest {
    /// Creates `node_count` singleton clusters named `leaf_<id>`.
    #[must_use]
    pub fn new(node_count: usize) -> Self {
        Self::with_names((0..node_count).map(|id| format!("leaf_{id}")))
    }

    /// Creates one singleton cluster per supplied name.
    #[must_use]
    pub fn with_names<I>(names: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let nodes = names
            .into_iter()
            .enumerate()
            .map(|(id, name)| ClusterNode::leaf(id, name))
            .collect();
        Self {
            nodes,
            merges: 0,
            relabels: 0,
        }
    }

    /// Returns the number of leaves.
    #[must_use]
    #[rustfmt::skip]
    pub fn len(&self) -> usize { self.nodes.len() }

    /// Returns `true` when the forest holds no leaves.
    #[must_use]
    #[rustfmt::skip]
    pub fn is_empty(&self) -> bool { self.nodes.is_empty() }

    /// Returns the number of merges performed so far.
    #[must_use]
    #[rustfmt::skip]
    pub fn merge_count(&self) -> usize { self.merges }

    /// Returns the number of clusters currently present.
    #[must_use]
    pub fn cluster_count(&self) -> usize {
        self.nodes.len() - self.merges
    }

    /// Returns how many root reassignments merges have performed in total.
    #[must_use]
    #[rustfmt::skip]
    pub fn relabel_count(&self) -> usize { self.relabels }

    /// Returns the root of the cluster containing `node`.
    #[must_use]
    pub fn find(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node).map(|entry| entry.root)
    }

    /// Returns `true` when `node` currently roots a cluster.
    #[must_use]
    pub fn is_root(&self, node: NodeId) -> bool {
        self.find(node) == Some(node)
    }

    /// Returns `true` when `node` never took part in a merge.
    #[must_use]
    pub fn is_isolate(&self, node: NodeId) -> bool {
        self.nodes
            .get(node)
            .is_some_and(|entry| entry.root == node && entry.next.is_none())
    }

    /// Returns the size of the cluster containing `node`.
    #[must_use]
    pub fn size(&self, node: NodeId) -> Option<usize> {
        self.root_entry(node).map(|entry| entry.size)
    }

    /// Returns the name of the cluster containing `node`.
    #[must_use]
    pub fn name(&self, node: NodeId) -> Option<&str> {
        self.root_entry(node).map(|entry| entry.name.as_str())
    }

    /// Returns the largest sub-split of the cluster containing `node`.
    #[must_use]
    pub fn largest_sub_split(&self, node: NodeId) -> Option<usize> {
        self.root_entry(node).map(|entry| entry.largest_sub_split)
    }

    /// Returns the singleton-join count of the cluster containing `node`.
    #[must_use]
    pub fn singleton_joins(&self, node: NodeId) -> Option<usize> {
        self.root_entry(node).map(|entry| entry.singleton_joins)
    }

    /// Iterates over the members of the cluster containing `node`, starting
    /// at its root.
    pub fn members(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut cursor = self.find(node);
        std::iter::from_fn(move || {
            let current = cursor?;
            cursor = self.nodes.get(current).and_then(|entry| entry.next);
            Some(current)
        })
    }

    /// Returns the sizes of all current clusters in root order.
    #[must_use]
    pub fn cluster_sizes(&self) -> Vec<usize> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|&(id, entry)| entry.root == id)
            .map(|(_, entry)| entry.size)
            .collect()
    }

    /// Merges the clusters rooted at `root_a` and `root_b`.
    ///
    /// The larger side keeps its root; on equal sizes `root_a` wins. The
    /// merged cluster is named `L<order>_<size>` where `order` counts merges
    /// from one. Returns `None` when the roots coincide or either argument is
    /// not a root.
    pub fn merge(&mut self, root_a: NodeId, root_b: NodeId) -> Option<Merge> {
        if root_a == root_b || !self.is_root(root_a) || !self.is_root(root_b) {
            return None;
        }
        let (a, b) = (&self.nodes[root_a], &self.nodes[root_b]);
        let (size_a, size_b) = (a.size, b.size);
        let size = size_a + size_b;
        let largest_sub_split = a
            .largest_sub_split
            .max(b.largest_sub_split)
            .max(size_a.min(size_b));
        let singleton_joins =
            a.singleton_joins + b.singleton_joins + usize::from((size_a == 1) != (size_b == 1));
        let (new_root, other_root) = if size_a >= size_b {
            (root_a, root_b)
        } else {
            (root_b, root_a)
        };

        self.merges += 1;
        let name = format!("L{}_{size}", self.merges);
        let left = MergedSide {
            root: root_a,
            name: mem::take(&mut self.nodes[root_a].name),
            size: size_a,
        };
        let right = MergedSide {
            root: root_b,
            name: mem::take(&mut self.nodes[root_b].name),
            size: size_b,
        };

        let tail = self.nodes[new_root].last;
        self.nodes[tail].next = Some(other_root);
        self.nodes[new_root].last = self.nodes[other_root].last;
        let mut cursor = Some(other_root);
        while let Some(member) = cursor {
            let entry = &mut self.nodes[member];
            entry.root = new_root;
            cursor = entry.next;
            self.relabels += 1;
        }

        let root = &mut self.nodes[new_root];
        root.name.clone_from(&name);
        root.size = size;
        root.largest_sub_split = largest_sub_split;
        root.singleton_joins = singleton_joins;

        Some(Merge {
            new_root,
            other_root,
            name,
            left,
            right,
            size,
            largest_sub_split,
            singleton_joins,
        })
    }

    fn root_entry(&self, node: NodeId) -> Option<&ClusterNode> {
        let root = self.find(node)?;
        self.nodes.get(root)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn larger_side_keeps_its_root() {
        let mut forest = ClusterForest::new(4);
        forest.merge(1, 2).expect("distinct roots");
        let merge = forest.merge(3, 1).expect("distinct roots");
        assert_eq!(merge.new_root, 1);
        assert_eq!(merge.other_root, 3);
        assert_eq!(merge.left.name, "leaf_3");
        assert_eq!(merge.right.name, "L1_2");
        assert_eq!(forest.find(3), Some(1));
        assert_eq!(forest.name(3), Some("L2_3"));
    }

    #[rstest]
    fn equal_sizes_favour_first_argument() {
        let mut forest = ClusterForest::new(2);
        let merge = forest.merge(1, 0).expect("distinct roots");
        assert_eq!(merge.new_root, 1);
        assert_eq!(forest.find(0), Some(1));
    }

    #[rstest]
    fn rejects_non_roots_and_self_merges() {
        let mut forest = ClusterForest::new(3);
        forest.merge(0, 1).expect("distinct roots");
        assert!(forest.merge(1, 2).is_none());
        assert!(forest.merge(0, 0).is_none());
        assert!(forest.merge(0, 9).is_none());
        assert_eq!(forest.merge_count(), 1);
    }

    #[rstest]
    fn diagnostics_follow_pre_merge_values() {
        let mut forest = ClusterForest::new(6);
        let first = forest.merge(0, 1).expect("distinct roots");
        assert_eq!((first.largest_sub_split, first.singleton_joins), (1, 0));
        let second = forest.merge(0, 2).expect("distinct roots");
        assert_eq!((second.largest_sub_split, second.singleton_joins), (1, 1));
        forest.merge(3, 4).expect("distinct roots");
        forest.merge(3, 5).expect("distinct roots");
        let joined = forest.merge(0, 3).expect("distinct roots");
        assert_eq!(joined.size, 6);
        assert_eq!(joined.largest_sub_split, 3);
        assert_eq!(joined.singleton_joins, 2);
        assert_eq!(forest.cluster_count(), 1);
    }

    #[rstest]
    fn member_lists_cover_each_cluster() {
        let mut forest = ClusterForest::new(5);
        forest.merge(0, 4).expect("distinct roots");
        forest.merge(2, 0).expect("distinct roots");
        let mut members: Vec<_> = forest.members(2).collect();
        members.sort_unstable();
        assert_eq!(members, vec![0, 2, 4]);
        assert_eq!(forest.members(1).collect::<Vec<_>>(), vec![1]);
        assert!(forest.is_isolate(1));
        assert!(!forest.is_isolate(0));
        assert_eq!(forest.cluster_sizes(), vec![3, 1, 1]);
    }
}
