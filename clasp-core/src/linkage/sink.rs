//! Join records emitted by the linkage driver and the sinks that consume them.

use std::io;

use crate::graph::NodeId;

/// Weight reported for the synthetic records that close out isolated nodes.
pub const ISOLATE_WEIGHT: f32 = 1000.0;

/// Distinguishes real merges from the trailing isolate records.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum JoinKind {
    /// Two clusters were merged by an edge.
    Merge,
    /// A node without any merge was closed out after the edge scan.
    Isolate,
}

/// A single dendrogram record.
///
/// `left` names the cluster of the edge source and `right` the cluster of the
/// edge target. Isolate records use the same leaf name on both sides.
#[derive(Clone, Debug, PartialEq)]
pub struct JoinEvent {
    /// One-based position in the emitted sequence.
    pub order: usize,
    /// Whether this record is a merge or an isolate.
    pub kind: JoinKind,
    /// Edge weight that caused the merge, or [`ISOLATE_WEIGHT`].
    pub weight: f32,
    /// Name of the resulting cluster.
    pub name: String,
    /// Name of the source-side cluster before the merge.
    pub left_name: String,
    /// Name of the target-side cluster before the merge.
    pub right_name: String,
    /// Size of the source-side cluster before the merge.
    pub left_size: usize,
    /// Size of the target-side cluster before the merge.
    pub right_size: usize,
    /// Size of the merged cluster.
    pub merged_size: usize,
    /// Fraction of the ordered edges consumed when the record was produced,
    /// in `[0, 1]`.
    pub progress: f64,
    /// `0.5 + sum of squared cluster sizes / N`.
    pub centroid: f64,
    /// Largest sub-split diagnostic of the merged cluster.
    pub largest_sub_split: usize,
    /// Singleton-join diagnostic of the merged cluster.
    pub singleton_joins: usize,
}

impl JoinEvent {
    /// Returns the progress as a percentage.
    #[must_use]
    pub fn progress_percent(&self) -> f64 {
        self.progress * 100.0
    }
}

/// Notes that a leaf left singleton state, or was an isolate.
#[derive(Clone, Debug, PartialEq)]
pub struct LeafTouch {
    /// The leaf node.
    pub leaf: NodeId,
    /// Label of the leaf, or its decimal identifier when unlabelled.
    pub name: String,
    /// Weight of the joining edge; `None` for isolates.
    pub weight: Option<f32>,
}

/// Receives linkage output in emission order.
///
/// For each merge the leaf touches come before the join record.
pub trait JoinSink {
    /// Called once before the first record.
    ///
    /// # Errors
    /// Returns any I/O error raised while preparing the output.
    fn begin(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Receives a join record.
    ///
    /// # Errors
    /// Returns any I/O error raised while writing the record.
    fn join(&mut self, event: &JoinEvent) -> io::Result<()>;

    /// Receives a leaf touch.
    ///
    /// # Errors
    /// Returns any I/O error raised while writing the touch.
    fn leaf(&mut self, touch: &LeafTouch) -> io::Result<()>;
}

/// In-memory [`JoinSink`] that keeps every record.
///
/// # Examples
/// ```
/// use clasp_core::{JoinLog, LinkageConfig, SparseGraph, link};
///
/// let graph = SparseGraph::canonical(2, [(0, 1, 0.5), (1, 0, 0.5)])?;
/// let mut log = JoinLog::default();
/// link(&graph, None, &LinkageConfig::default(), &mut log)?;
/// assert_eq!(log.joins().len(), 1);
/// assert_eq!(log.leaves().len(), 2);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct JoinLog {
    joins: Vec<JoinEvent>,
    leaves: Vec<LeafTouch>,
}

impl JoinLog {
    /// Returns the recorded join events.
    #[must_use]
    #[rustfmt::skip]
    pub fn joins(&self) -> &[JoinEvent] { &self.joins }

    /// Returns the recorded leaf touches.
    #[must_use]
    #[rustfmt::skip]
    pub fn leaves(&self) -> &[LeafTouch] { &self.leaves }
}

impl JoinSink for JoinLog {
    fn join(&mut self, event: &JoinEvent) -> io::Result<()> {
        self.joins.push(event.clone());
        Ok(())
    }

    fn leaf(&mut self, touch: &LeafTouch) -> io::Result<()> {
        self.leaves.push(touch.clone());
        Ok(())
    }
}
