//! Union-find used when the input graph may be asymmetric.
//!
//! Every stored entry unions its endpoints, which yields the components of
//! the symmetrised graph without materialising the mirror entries.

#[derive(Clone, Debug)]
pub(super) struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    pub(super) fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    pub(super) fn find(&mut self, mut node: usize) -> usize {
        let mut root = node;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        while self.parent[node] != node {
            let parent = self.parent[node];
            self.parent[node] = root;
            node = parent;
        }

        root
    }

    /// Joins the sets of `left` and `right`. Returns `false` when they were
    /// already joined.
    pub(super) fn union(&mut self, left: usize, right: usize) -> bool {
        let (mut left, mut right) = (self.find(left), self.find(right));
        if left == right {
            return false;
        }
        if self.rank[left] < self.rank[right] {
            std::mem::swap(&mut left, &mut right);
        }
        self.parent[right] = left;
        if self.rank[left] == self.rank[right] {
            self.rank[left] = self.rank[left].saturating_add(1);
        }
        true
    }

    /// Returns one label per element; elements share a label exactly when
    /// they share a set.
    pub(super) fn labels(&mut self) -> Vec<usize> {
        (0..self.parent.len()).map(|node| self.find(node)).collect()
    }
}
