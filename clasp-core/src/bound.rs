//! Domain bounding by component size.
//!
//! Selects the components that reach a minimum size, derives the retained
//! node domain from them and, on request, an order-preserving map onto
//! `0..M` so downstream consumers see a canonical domain.

use tracing::debug;

use crate::{
    Result,
    components::Partition,
    error::ClaspError,
    graph::{NodeId, SparseGraph},
    labels::LabelTable,
};

/// Order-preserving bijection from a sparse node set onto `0..M`.
///
/// # Examples
/// ```
/// use clasp_core::DomainMap;
///
/// let map = DomainMap::new(&[7, 3, 12]);
/// assert_eq!(map.image(3), Some(0));
/// assert_eq!(map.image(12), Some(2));
/// assert_eq!(map.image(5), None);
/// assert_eq!(map.preimage(1), Some(7));
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DomainMap {
    sources: Vec<NodeId>,
}

impl DomainMap {
    /// Builds the map for `nodes`. Duplicates are ignored.
    #[must_use]
    pub fn new(nodes: &[NodeId]) -> Self {
        let mut sources = nodes.to_vec();
        sources.sort_unstable();
        sources.dedup();
        Self { sources }
    }

    /// Returns the dense image of `node`.
    #[must_use]
    pub fn image(&self, node: NodeId) -> Option<NodeId> {
        self.sources.binary_search(&node).ok()
    }

    /// Returns the node mapped onto `image`.
    #[must_use]
    pub fn preimage(&self, image: NodeId) -> Option<NodeId> {
        self.sources.get(image).copied()
    }

    /// Returns the number of mapped nodes.
    #[must_use]
    #[rustfmt::skip]
    pub fn len(&self) -> usize { self.sources.len() }

    /// Returns `true` when the map is empty.
    #[must_use]
    #[rustfmt::skip]
    pub fn is_empty(&self) -> bool { self.sources.is_empty() }

    /// Iterates over `(node, image)` pairs in increasing order.
    pub fn pairs(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.sources
            .iter()
            .enumerate()
            .map(|(image, &node)| (node, image))
    }
}

/// Result of bounding a partition by component size.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundedDomain {
    retained: Vec<NodeId>,
    partition: Partition,
    map: Option<DomainMap>,
    strict_subset: bool,
}

impl BoundedDomain {
    /// Returns the retained nodes in their original numbering.
    #[must_use]
    #[rustfmt::skip]
    pub fn retained(&self) -> &[NodeId] { &self.retained }

    /// Returns the selected columns, relabelled when a map is active.
    #[must_use]
    #[rustfmt::skip]
    pub fn partition(&self) -> &Partition { &self.partition }

    /// Returns the canonicalising map when one was requested.
    #[must_use]
    #[rustfmt::skip]
    pub fn map(&self) -> Option<&DomainMap> { self.map.as_ref() }

    /// Returns `true` when some component fell below the bound.
    #[must_use]
    #[rustfmt::skip]
    pub fn is_strict_subset(&self) -> bool { self.strict_subset }

    /// Restricts `graph` to the retained domain and applies the map.
    ///
    /// The retained domain is compared against `graph` itself, not the
    /// partition, so nodes outside a restricted partition never leak through.
    ///
    /// # Errors
    /// Returns a graph error when a retained node is missing from `graph`.
    pub fn restrict_graph(&self, graph: &SparseGraph) -> Result<SparseGraph> {
        let restricted = if self.retained.as_slice() == graph.domain() {
            graph.clone()
        } else {
            graph.restrict(&self.retained)?
        };
        match &self.map {
            Some(map) => Ok(restricted.relabel(|node| map.image(node))?),
            None => Ok(restricted),
        }
    }

    /// Returns the labels of retained nodes, renumbered through the map.
    #[must_use]
    pub fn restrict_labels(&self, labels: &LabelTable) -> LabelTable {
        let selected = labels.select(&self.retained);
        match &self.map {
            Some(map) => selected.relabel(|node| map.image(node)),
            None => selected,
        }
    }

    /// Returns the labels of nodes that were dropped.
    ///
    /// # Errors
    /// Returns [`ClaspError::DeselectionAfterMapping`] when a map is active,
    /// since dropped nodes have no image.
    pub fn deselected_labels(&self, labels: &LabelTable) -> Result<LabelTable> {
        if self.map.is_some() {
            return Err(ClaspError::DeselectionAfterMapping);
        }
        Ok(labels.deselect(&self.retained))
    }
}

/// Keeps the components of `partition` with at least `min_size` members.
///
/// A bound of zero keeps every component. With `canonical` set the result
/// carries a [`DomainMap`] and its partition is expressed in mapped ids.
///
/// # Errors
/// Propagates relabelling failures, which cannot occur for a well-formed
/// partition.
///
/// # Examples
/// ```
/// use clasp_core::{Partition, bound_domain};
///
/// let partition = Partition::from_columns(vec![vec![0, 1, 2], vec![3]])?;
/// let bounded = bound_domain(&partition, 2, true)?;
/// assert_eq!(bounded.retained(), &[0, 1, 2]);
/// assert!(bounded.is_strict_subset());
/// let map = bounded.map().expect("canonical map requested");
/// assert_eq!(map.pairs().collect::<Vec<_>>(), vec![(0, 0), (1, 1), (2, 2)]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn bound_domain(partition: &Partition, min_size: usize, canonical: bool) -> Result<BoundedDomain> {
    let selected: Vec<usize> = partition
        .columns()
        .iter()
        .enumerate()
        .filter(|(_, column)| column.len() >= min_size)
        .map(|(index, _)| index)
        .collect();
    let kept = partition.select(&selected);
    let retained = kept.domain().to_vec();
    let strict_subset = retained.len() < partition.domain().len();
    debug!(
        min_size,
        components = kept.len(),
        retained = retained.len(),
        dropped = partition.domain().len() - retained.len(),
        "bounded domain"
    );

    let (partition, map) = if canonical {
        let map = DomainMap::new(&retained);
        (kept.relabel(|node| map.image(node))?, Some(map))
    } else {
        (kept, None)
    };
    Ok(BoundedDomain {
        retained,
        partition,
        map,
        strict_subset,
    })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::test_utils::undirected;

    fn partition() -> Partition {
        Partition::from_columns(vec![vec![2, 6, 8], vec![0, 4], vec![5]])
            .expect("columns are disjoint")
    }

    #[rstest]
    #[case::keep_all(0, vec![0, 2, 4, 5, 6, 8], false)]
    #[case::one_is_everything(1, vec![0, 2, 4, 5, 6, 8], false)]
    #[case::pairs(2, vec![0, 2, 4, 6, 8], true)]
    #[case::largest(3, vec![2, 6, 8], true)]
    #[case::nothing(4, vec![], true)]
    fn selects_columns_by_size(
        #[case] min_size: usize,
        #[case] retained: Vec<NodeId>,
        #[case] strict: bool,
    ) {
        let bounded = bound_domain(&partition(), min_size, false).expect("bounding succeeds");
        assert_eq!(bounded.retained(), retained.as_slice());
        assert_eq!(bounded.is_strict_subset(), strict);
        assert!(bounded.map().is_none());
    }

    #[rstest]
    fn canonical_map_is_order_preserving() {
        let bounded = bound_domain(&partition(), 2, true).expect("bounding succeeds");
        let map = bounded.map().expect("map requested");
        assert_eq!(
            map.pairs().collect::<Vec<_>>(),
            vec![(0, 0), (2, 1), (4, 2), (6, 3), (8, 4)]
        );
        assert_eq!(bounded.partition().columns(), &[vec![1, 3, 4], vec![0, 2]]);
    }

    #[rstest]
    fn restrict_graph_drops_and_renumbers() {
        let graph = undirected(9, &[(2, 6, 1.0), (0, 5, 0.5), (0, 4, 0.25)]);
        let bounded = bound_domain(&partition(), 2, true).expect("bounding succeeds");
        let restricted = bounded.restrict_graph(&graph).expect("retained nodes exist");
        assert!(restricted.is_canonical());
        assert_eq!(restricted.node_count(), 5);
        assert_eq!(restricted.weight(1, 3), Some(1.0));
        assert_eq!(restricted.weight(0, 2), Some(0.25));
        assert_eq!(restricted.entry_count(), 4);
    }

    #[rstest]
    #[case::plain(false)]
    #[case::canonical(true)]
    fn restrict_graph_honours_a_restricted_partition(#[case] canonical: bool) {
        let graph = undirected(4, &[(0, 1, 0.5), (1, 2, 0.75), (2, 3, 1.0)]);
        let partition = Partition::from_columns(vec![vec![0, 1]]).expect("one column");
        let bounded = bound_domain(&partition, 0, canonical).expect("bounding succeeds");
        assert!(!bounded.is_strict_subset());

        let restricted = bounded.restrict_graph(&graph).expect("retained nodes exist");
        assert_eq!(restricted.domain(), &[0, 1]);
        assert_eq!(restricted.entry_count(), 2);
        assert_eq!(restricted.weight(0, 1), Some(0.5));
        assert_eq!(restricted.weight(1, 0), Some(0.5));
        assert_eq!(restricted.weight(1, 2), None);
    }

    #[rstest]
    fn labels_follow_the_bound() {
        let labels = LabelTable::from_pairs([(0, "a"), (5, "f"), (8, "i")]);
        let plain = bound_domain(&partition(), 2, false).expect("bounding succeeds");
        assert_eq!(plain.restrict_labels(&labels).len(), 2);
        let dropped = plain.deselected_labels(&labels).expect("no map active");
        assert_eq!(dropped.iter().collect::<Vec<_>>(), vec![(5, "f")]);

        let mapped = bound_domain(&partition(), 2, true).expect("bounding succeeds");
        assert_eq!(mapped.restrict_labels(&labels).get(4), Some("i"));
        assert!(matches!(
            mapped.deselected_labels(&labels),
            Err(ClaspError::DeselectionAfterMapping)
        ));
    }
}
