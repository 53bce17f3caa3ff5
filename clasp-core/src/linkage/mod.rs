//! Single-linkage dendrogram construction.
//!
//! The driver orders the upper-triangle edges of a canonical graph by
//! descending weight and merges clusters in that order using a
//! [`ClusterForest`]. Each merge is reported to a [`JoinSink`] together with
//! size and balance diagnostics. Nodes that never merged are closed out with
//! synthetic isolate records once the edge scan ends.

mod edges;
mod forest;
#[cfg(test)]
mod property;
mod sink;
#[cfg(test)]
mod tests;

pub use edges::{Edge, extract_edges, order_edges};
pub use forest::{ClusterForest, Merge, MergedSide};
pub use sink::{ISOLATE_WEIGHT, JoinEvent, JoinKind, JoinLog, JoinSink, LeafTouch};

use tracing::{debug, info};

use crate::{
    Result,
    error::ClaspError,
    graph::{NodeId, SparseGraph},
    labels::LabelTable,
};

/// Tunables for [`link`].
///
/// # Examples
/// ```
/// use clasp_core::LinkageConfig;
///
/// let config = LinkageConfig::new().with_stop_below(0.25);
/// assert_eq!(config.stop_below(), Some(0.25));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LinkageConfig {
    stop_below: Option<f32>,
}

impl LinkageConfig {
    /// Creates a configuration that consumes every edge.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stops the edge scan at the first edge lighter than `threshold`.
    #[must_use]
    pub fn with_stop_below(mut self, threshold: f32) -> Self {
        self.stop_below = Some(threshold);
        self
    }

    /// Returns the configured stop threshold.
    #[must_use]
    #[rustfmt::skip]
    pub fn stop_below(&self) -> Option<f32> { self.stop_below }
}

/// Totals describing a completed linkage run.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct LinkageSummary {
    /// Number of leaves.
    pub node_count: usize,
    /// Number of upper-triangle edges extracted.
    pub edge_count: usize,
    /// Number of edges examined, including the one that hit the threshold.
    pub edges_consumed: usize,
    /// Number of merge records emitted.
    pub merges: usize,
    /// Number of isolate records emitted.
    pub isolates: usize,
    /// Whether the scan ended at the stop threshold.
    pub stopped_early: bool,
    /// Total root reassignments performed by merges.
    pub relabels: usize,
}

impl LinkageSummary {
    /// Returns the number of records emitted.
    #[must_use]
    pub fn records(&self) -> usize {
        self.merges + self.isolates
    }
}

/// Builds the single-linkage dendrogram of `graph`.
///
/// Only entries `i -> j` with `j > i` are read, so callers wanting both
/// directions considered should pass a symmetrised graph. Leaf names come
/// from `labels` when present and fall back to `leaf_<id>`.
///
/// # Errors
/// Returns [`ClaspError::NonCanonicalDomain`] before emitting anything when
/// the domain is not `0..N`, [`ClaspError::InvalidStopThreshold`] for a NaN
/// or infinite threshold, and [`ClaspError::Output`] when the sink fails.
///
/// # Examples
/// ```
/// use clasp_core::{JoinKind, JoinLog, LinkageConfig, SparseGraph, link};
///
/// let graph = SparseGraph::canonical(3, [(0, 1, 0.9), (1, 0, 0.9)])?;
/// let mut log = JoinLog::default();
/// let summary = link(&graph, None, &LinkageConfig::default(), &mut log)?;
/// assert_eq!(summary.merges, 1);
/// assert_eq!(summary.isolates, 1);
/// assert_eq!(log.joins()[1].kind, JoinKind::Isolate);
/// assert_eq!(log.joins()[1].name, "sgl_2");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn link<S>(
    graph: &SparseGraph,
    labels: Option<&LabelTable>,
    config: &LinkageConfig,
    sink: &mut S,
) -> Result<LinkageSummary>
where
    S: JoinSink + ?Sized,
{
    if let Some(threshold) = config.stop_below.filter(|t| !t.is_finite()) {
        return Err(ClaspError::InvalidStopThreshold { got: threshold });
    }
    if let Some((position, node)) = graph.first_non_canonical() {
        return Err(ClaspError::NonCanonicalDomain { position, node });
    }

    let mut edges = extract_edges(graph);
    order_edges(&mut edges);
    debug!(edges = edges.len(), nodes = graph.node_count(), "ordered edges");

    let mut driver = Driver::new(graph.node_count(), edges.len(), labels, sink);
    driver.sink.begin().map_err(ClaspError::output("join header"))?;
    let stopped_early = driver.consume(&edges, config.stop_below)?;
    let isolates = driver.close_isolates()?;
    if isolates > 0 {
        info!(isolates, "isolated nodes in data");
    }

    Ok(LinkageSummary {
        node_count: driver.node_count,
        edge_count: driver.edge_count,
        edges_consumed: driver.consumed,
        merges: driver.forest.merge_count(),
        isolates,
        stopped_early,
        relabels: driver.forest.relabel_count(),
    })
}

/// Change in the sum of squared cluster sizes when clusters of `left` and
/// `right` members merge.
pub(crate) fn square_sum_delta(left: usize, right: usize) -> f64 {
    let (left, right) = (left as f64, right as f64);
    (left + right).powi(2) - left.powi(2) - right.powi(2)
}

struct Driver<'a, S: ?Sized> {
    sink: &'a mut S,
    labels: Option<&'a LabelTable>,
    forest: ClusterForest,
    node_count: usize,
    edge_count: usize,
    consumed: usize,
    order: usize,
    square_sum: f64,
}

impl<'a, S: JoinSink + ?Sized> Driver<'a, S> {
    fn new(
        node_count: usize,
        edge_count: usize,
        labels: Option<&'a LabelTable>,
        sink: &'a mut S,
    ) -> Self {
        let names = (0..node_count).map(|id| {
            labels
                .and_then(|table| table.get(id))
                .map_or_else(|| format!("leaf_{id}"), str::to_owned)
        });
        Self {
            sink,
            labels,
            forest: ClusterForest::with_names(names),
            node_count,
            edge_count,
            consumed: 0,
            order: 1,
            square_sum: node_count as f64,
        }
    }

    /// Scans `edges` in order. Returns `true` when the threshold ended the
    /// scan.
    fn consume(&mut self, edges: &[Edge], stop_below: Option<f32>) -> Result<bool> {
        for edge in edges {
            self.consumed += 1;
            if stop_below.is_some_and(|threshold| edge.weight() < threshold) {
                debug!(
                    weight = edge.weight(),
                    consumed = self.consumed,
                    "stop threshold reached"
                );
                return Ok(true);
            }
            if !self.absorb(edge)? {
                continue;
            }
            if self.order == self.node_count {
                break;
            }
        }
        Ok(false)
    }

    /// Merges the clusters joined by `edge`. Returns `false` when both
    /// endpoints already share a cluster.
    fn absorb(&mut self, edge: &Edge) -> Result<bool> {
        let roots = self
            .forest
            .find(edge.source())
            .zip(self.forest.find(edge.target()));
        let Some((source_root, target_root)) = roots else {
            return Ok(false);
        };
        let Some(merge) = self.forest.merge(source_root, target_root) else {
            return Ok(false);
        };
        self.square_sum += square_sum_delta(merge.left.size, merge.right.size);

        if merge.left.size == 1 {
            self.touch(edge.source(), Some(edge.weight()))?;
        }
        if merge.right.size == 1 {
            self.touch(edge.target(), Some(edge.weight()))?;
        }
        let event = JoinEvent {
            order: self.order,
            kind: JoinKind::Merge,
            weight: edge.weight(),
            name: merge.name,
            left_name: merge.left.name,
            right_name: merge.right.name,
            left_size: merge.left.size,
            right_size: merge.right.size,
            merged_size: merge.size,
            progress: self.progress(),
            centroid: self.centroid(),
            largest_sub_split: merge.largest_sub_split,
            singleton_joins: merge.singleton_joins,
        };
        self.sink
            .join(&event)
            .map_err(ClaspError::output("join record"))?;
        record_join();
        self.order += 1;
        Ok(true)
    }

    fn close_isolates(&mut self) -> Result<usize> {
        let isolated: Vec<NodeId> = (0..self.node_count)
            .filter(|&node| self.forest.is_isolate(node))
            .collect();
        for &node in &isolated {
            self.touch(node, None)?;
            let leaf_name = self.forest.name(node).unwrap_or_default().to_owned();
            let event = JoinEvent {
                order: self.order,
                kind: JoinKind::Isolate,
                weight: ISOLATE_WEIGHT,
                name: format!("sgl_{node}"),
                left_name: leaf_name.clone(),
                right_name: leaf_name,
                left_size: 1,
                right_size: 1,
                merged_size: 1,
                progress: self.progress(),
                centroid: self.centroid(),
                largest_sub_split: 0,
                singleton_joins: 0,
            };
            self.sink
                .join(&event)
                .map_err(ClaspError::output("isolate record"))?;
            self.order += 1;
        }
        record_isolates(isolated.len());
        Ok(isolated.len())
    }

    fn touch(&mut self, leaf: NodeId, weight: Option<f32>) -> Result<()> {
        let name = self
            .labels
            .map_or_else(|| leaf.to_string(), |table| table.label_or_id(leaf).into_owned());
        self.sink
            .leaf(&LeafTouch { leaf, name, weight })
            .map_err(ClaspError::output("leaf list"))
    }

    fn progress(&self) -> f64 {
        if self.edge_count == 0 {
            0.0
        } else {
            self.consumed as f64 / self.edge_count as f64
        }
    }

    fn centroid(&self) -> f64 {
        0.5 + self.square_sum / self.node_count as f64
    }
}

#[cfg(feature = "metrics")]
fn record_join() {
    metrics::counter!("linkage_joins_total").increment(1);
}

#[cfg(not(feature = "metrics"))]
fn record_join() {}

#[cfg(feature = "metrics")]
fn record_isolates(count: usize) {
    metrics::counter!("linkage_isolates_total").increment(count as u64);
}

#[cfg(not(feature = "metrics"))]
fn record_isolates(_count: usize) {}
