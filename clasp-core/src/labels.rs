//! Node label tables.
//!
//! A [`LabelTable`] maps node identifiers to human-readable labels. Output
//! writers use it to replace numeric identifiers in emitted records.

use std::{borrow::Cow, collections::BTreeMap};

use crate::graph::NodeId;

/// Ordered mapping from node identifiers to labels.
///
/// # Examples
/// ```
/// use clasp_core::LabelTable;
///
/// let table = LabelTable::from_pairs([(0, "alpha"), (2, "gamma")]);
/// assert_eq!(table.get(2), Some("gamma"));
/// assert_eq!(table.label_or_id(1), "1");
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LabelTable {
    labels: BTreeMap<NodeId, String>,
}

impl LabelTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from `(node, label)` pairs. Later pairs win.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (NodeId, S)>,
        S: Into<String>,
    {
        Self {
            labels: pairs
                .into_iter()
                .map(|(node, label)| (node, label.into()))
                .collect(),
        }
    }

    /// Inserts or replaces the label of `node`, returning the previous one.
    pub fn insert(&mut self, node: NodeId, label: impl Into<String>) -> Option<String> {
        self.labels.insert(node, label.into())
    }

    /// Returns the label of `node`.
    #[must_use]
    pub fn get(&self, node: NodeId) -> Option<&str> {
        self.labels.get(&node).map(String::as_str)
    }

    /// Returns the label of `node` or its decimal identifier.
    #[must_use]
    pub fn label_or_id(&self, node: NodeId) -> Cow<'_, str> {
        self.get(node)
            .map_or_else(|| Cow::Owned(node.to_string()), Cow::Borrowed)
    }

    /// Returns the number of labelled nodes.
    #[must_use]
    #[rustfmt::skip]
    pub fn len(&self) -> usize { self.labels.len() }

    /// Returns `true` when no node is labelled.
    #[must_use]
    #[rustfmt::skip]
    pub fn is_empty(&self) -> bool { self.labels.is_empty() }

    /// Iterates over `(node, label)` pairs in node order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &str)> + '_ {
        self.labels
            .iter()
            .map(|(&node, label)| (node, label.as_str()))
    }

    /// Returns the labels of the nodes in `domain` only.
    #[must_use]
    pub fn select(&self, domain: &[NodeId]) -> Self {
        self.filtered(|node| domain.binary_search(&node).is_ok())
    }

    /// Returns the labels of the nodes outside `domain`.
    #[must_use]
    pub fn deselect(&self, domain: &[NodeId]) -> Self {
        self.filtered(|node| domain.binary_search(&node).is_err())
    }

    /// Returns a table whose keys are renamed through `image`, dropping
    /// nodes without an image.
    #[must_use]
    pub fn relabel<F>(&self, mut image: F) -> Self
    where
        F: FnMut(NodeId) -> Option<NodeId>,
    {
        Self {
            labels: self
                .labels
                .iter()
                .filter_map(|(&node, label)| image(node).map(|mapped| (mapped, label.clone())))
                .collect(),
        }
    }

    fn filtered(&self, mut keep: impl FnMut(NodeId) -> bool) -> Self {
        Self {
            labels: self
                .labels
                .iter()
                .filter(|&(&node, _)| keep(node))
                .map(|(&node, label)| (node, label.clone()))
                .collect(),
        }
    }
}

impl<S: Into<String>> FromIterator<(NodeId, S)> for LabelTable {
    fn from_iter<I: IntoIterator<Item = (NodeId, S)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}
