//! Run-wide orchestration for the clasp library.
//!
//! [`Clasp`] holds the validated configuration and exposes one instrumented
//! entry point per analysis mode. Each call borrows its inputs and leaves them
//! untouched.

use std::borrow::Cow;

use tracing::{info, instrument};

use crate::{
    Result,
    bound::{BoundedDomain, bound_domain},
    components::{Partition, find_components},
    error::ClaspError,
    graph::{NodeId, SparseGraph},
    labels::LabelTable,
    linkage::{JoinSink, LinkageConfig, LinkageSummary, link},
    sweep::{SweepLevels, SweepSink, sweep},
    transform::EdgeTransform,
};

/// Validated configuration and entry point for every analysis mode.
///
/// # Examples
/// ```
/// use clasp_core::{ClaspBuilder, JoinLog, SparseGraph};
///
/// let clasp = ClaspBuilder::new().with_component_bound(2).build()?;
/// let graph = SparseGraph::canonical(4, [(0, 1, 0.9), (1, 2, 0.5)])?;
///
/// let partition = clasp.components(&graph, None)?;
/// assert_eq!(partition.sizes(), vec![3, 1]);
/// let bounded = clasp.bound(&partition)?;
/// assert_eq!(bounded.retained(), &[0, 1, 2]);
///
/// let mut log = JoinLog::default();
/// let summary = clasp.link(&graph, None, &mut log)?;
/// assert_eq!((summary.merges, summary.isolates), (2, 1));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug)]
pub struct Clasp {
    symmetric_input: bool,
    component_bound: usize,
    canonical: bool,
    linkage: LinkageConfig,
    transform: Option<EdgeTransform>,
}

impl Clasp {
    pub(crate) fn new(
        symmetric_input: bool,
        component_bound: usize,
        canonical: bool,
        stop_below: Option<f32>,
        transform: Option<EdgeTransform>,
    ) -> Self {
        let linkage = stop_below.map_or_else(LinkageConfig::new, |threshold| {
            LinkageConfig::new().with_stop_below(threshold)
        });
        Self {
            symmetric_input,
            component_bound,
            canonical,
            linkage,
            transform,
        }
    }

    /// Returns whether input graphs are trusted to be symmetric.
    #[must_use]
    #[rustfmt::skip]
    pub fn symmetric_input(&self) -> bool { self.symmetric_input }

    /// Returns the minimum component size applied by [`Clasp::bound`].
    #[must_use]
    #[rustfmt::skip]
    pub fn component_bound(&self) -> usize { self.component_bound }

    /// Returns whether bounded domains are renumbered onto `0..M`.
    #[must_use]
    #[rustfmt::skip]
    pub fn canonical(&self) -> bool { self.canonical }

    /// Returns the linkage tunables.
    #[must_use]
    #[rustfmt::skip]
    pub fn linkage_config(&self) -> &LinkageConfig { &self.linkage }

    /// Applies the configured edge transform, borrowing `graph` when there is
    /// none.
    ///
    /// # Errors
    /// Returns a graph error when the transform produces a non-finite weight.
    pub fn prepare<'a>(&self, graph: &'a SparseGraph) -> Result<Cow<'a, SparseGraph>> {
        match &self.transform {
            Some(transform) => {
                let shaped = transform.apply(graph)?;
                info!(
                    transform = %transform,
                    before = graph.entry_count(),
                    after = shaped.entry_count(),
                    "applied edge transform"
                );
                Ok(Cow::Owned(shaped))
            }
            None => Ok(Cow::Borrowed(graph)),
        }
    }

    /// Partitions `graph` into connected components.
    ///
    /// # Errors
    /// Returns a graph error when `restrict` names a node outside `graph`.
    #[instrument(
        name = "core.components",
        err,
        skip(self, graph, restrict),
        fields(
            nodes = graph.node_count(),
            entries = graph.entry_count(),
            restricted = restrict.is_some(),
        ),
    )]
    pub fn components(
        &self,
        graph: &SparseGraph,
        restrict: Option<&[NodeId]>,
    ) -> Result<Partition> {
        let partition = find_components(graph, restrict, self.symmetric_input)?;
        info!(components = partition.len(), "found components");
        Ok(partition)
    }

    /// Keeps the components reaching the configured bound.
    ///
    /// # Errors
    /// Propagates relabelling failures from [`bound_domain`].
    #[instrument(
        name = "core.bound",
        err,
        skip(self, partition),
        fields(
            components = partition.len(),
            min_size = self.component_bound,
            canonical = self.canonical,
        ),
    )]
    pub fn bound(&self, partition: &Partition) -> Result<BoundedDomain> {
        let bounded = bound_domain(partition, self.component_bound, self.canonical)?;
        info!(
            retained = bounded.retained().len(),
            components = bounded.partition().len(),
            strict_subset = bounded.is_strict_subset(),
            "bounded domain"
        );
        Ok(bounded)
    }

    /// Streams the components of `graph` at every level of `levels`.
    ///
    /// # Errors
    /// Returns graph errors from the restriction and
    /// [`ClaspError::Output`] when `sink` fails.
    #[instrument(
        name = "core.sweep",
        err,
        skip(self, graph, restrict, sink),
        fields(nodes = graph.node_count(), entries = graph.entry_count(), levels = %levels),
    )]
    pub fn sweep<S>(
        &self,
        graph: &SparseGraph,
        restrict: Option<&[NodeId]>,
        levels: &SweepLevels,
        sink: &mut S,
    ) -> Result<usize>
    where
        S: SweepSink + ?Sized,
    {
        let emitted = sweep(graph, restrict, self.symmetric_input, levels, sink)?;
        info!(levels = emitted, "finished sweep");
        Ok(emitted)
    }

    /// Checks that `graph` has the canonical domain linkage needs.
    ///
    /// Callers that open outputs for [`Clasp::link`] run this first so a
    /// rejected graph leaves existing files untouched.
    ///
    /// # Errors
    /// Returns [`ClaspError::NonCanonicalDomain`] naming the first gap.
    pub fn check_linkable(&self, graph: &SparseGraph) -> Result<()> {
        match graph.first_non_canonical() {
            Some((position, node)) => Err(ClaspError::NonCanonicalDomain { position, node }),
            None => Ok(()),
        }
    }

    /// Builds the single-linkage dendrogram of `graph`.
    ///
    /// Unless input is declared symmetric, the graph is mirrored first so
    /// that entries stored in either direction take part.
    ///
    /// # Errors
    /// Returns [`ClaspError::NonCanonicalDomain`] before any output when the
    /// domain is not `0..N`, and [`ClaspError::Output`] when `sink` fails.
    #[instrument(
        name = "core.link",
        err,
        skip(self, graph, labels, sink),
        fields(
            nodes = graph.node_count(),
            entries = graph.entry_count(),
            labelled = labels.is_some(),
        ),
    )]
    pub fn link<S>(
        &self,
        graph: &SparseGraph,
        labels: Option<&LabelTable>,
        sink: &mut S,
    ) -> Result<LinkageSummary>
    where
        S: JoinSink + ?Sized,
    {
        self.check_linkable(graph)?;
        let mirrored;
        let graph = if self.symmetric_input {
            graph
        } else {
            mirrored = graph.symmetrized();
            &mirrored
        };
        let summary = link(graph, labels, &self.linkage, sink)?;
        info!(
            merges = summary.merges,
            isolates = summary.isolates,
            edges_consumed = summary.edges_consumed,
            stopped_early = summary.stopped_early,
            "finished linking"
        );
        Ok(summary)
    }
}
