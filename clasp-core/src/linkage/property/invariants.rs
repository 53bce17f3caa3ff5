//! Property bodies shared by the proptest and rstest runners.

use std::collections::BTreeMap;

use proptest::test_runner::{TestCaseError, TestCaseResult};

use crate::{
    JoinEvent, JoinKind, JoinLog, LinkageConfig, LinkageSummary, find_components, link,
};

use super::types::LinkageFixture;

fn run_linkage(
    fixture: &LinkageFixture,
    config: &LinkageConfig,
) -> Result<(LinkageSummary, JoinLog), TestCaseError> {
    let mut log = JoinLog::default();
    let summary = link(&fixture.graph(), None, config, &mut log).map_err(|err| {
        TestCaseError::fail(format!(
            "link failed: {err} (shape={:?}, nodes={})",
            fixture.shape, fixture.node_count
        ))
    })?;
    Ok((summary, log))
}

/// Replays join records into the current cluster sizes keyed by cluster name.
struct SizeLedger {
    sizes: BTreeMap<String, usize>,
}

impl SizeLedger {
    fn new(node_count: usize) -> Self {
        Self {
            sizes: (0..node_count).map(|id| (format!("leaf_{id}"), 1)).collect(),
        }
    }

    fn apply(&mut self, join: &JoinEvent) -> TestCaseResult {
        if join.kind == JoinKind::Isolate {
            return Ok(());
        }
        for side in [&join.left_name, &join.right_name] {
            if self.sizes.remove(side).is_none() {
                return Err(TestCaseError::fail(format!(
                    "join {} names unknown cluster {side}",
                    join.order
                )));
            }
        }
        self.sizes.insert(join.name.clone(), join.merged_size);
        Ok(())
    }

    fn square_sum(&self) -> f64 {
        self.sizes.values().map(|&size| (size * size) as f64).sum()
    }

    fn sorted_sizes(&self) -> Vec<usize> {
        let mut sizes: Vec<_> = self.sizes.values().copied().collect();
        sizes.sort_unstable_by(|a, b| b.cmp(a));
        sizes
    }
}

/// Without a stop threshold the dendrogram closes exactly the connected
/// components found by the component finder.
pub(super) fn run_component_agreement_property(fixture: &LinkageFixture) -> TestCaseResult {
    let (summary, log) = run_linkage(fixture, &LinkageConfig::default())?;
    let partition = find_components(&fixture.graph(), None, true)
        .map_err(|err| TestCaseError::fail(format!("components failed: {err}")))?;

    let expected_merges = fixture.node_count - partition.len();
    if summary.merges != expected_merges {
        return Err(TestCaseError::fail(format!(
            "merge count {} differs from N - components = {expected_merges} (shape={:?})",
            summary.merges, fixture.shape
        )));
    }
    let singletons = partition.sizes().iter().filter(|&&size| size == 1).count();
    if summary.isolates != singletons {
        return Err(TestCaseError::fail(format!(
            "isolate count {} differs from singleton components {singletons}",
            summary.isolates
        )));
    }

    let mut ledger = SizeLedger::new(fixture.node_count);
    for join in log.joins() {
        ledger.apply(join)?;
    }
    let mut expected = partition.sizes();
    expected.sort_unstable_by(|a, b| b.cmp(a));
    if ledger.sorted_sizes() != expected {
        return Err(TestCaseError::fail(format!(
            "cluster sizes {:?} differ from component sizes {expected:?}",
            ledger.sorted_sizes()
        )));
    }
    Ok(())
}

/// Every merge relabels only the smaller side, so no node is relabelled more
/// than `log2 N` times.
pub(super) fn run_relabel_bound_property(fixture: &LinkageFixture) -> TestCaseResult {
    let (summary, _) = run_linkage(fixture, &LinkageConfig::default())?;
    let n = fixture.node_count as f64;
    let bound = if fixture.node_count < 2 { 0.0 } else { n * n.log2() };
    if summary.relabels as f64 > bound {
        return Err(TestCaseError::fail(format!(
            "relabels {} exceed N log2 N = {bound} (shape={:?})",
            summary.relabels, fixture.shape
        )));
    }
    Ok(())
}

/// The incremental centroid matches a recomputation from the replayed sizes
/// after every merge.
pub(super) fn run_centroid_property(fixture: &LinkageFixture) -> TestCaseResult {
    let (_, log) = run_linkage(fixture, &LinkageConfig::default())?;
    let n = fixture.node_count as f64;
    let mut ledger = SizeLedger::new(fixture.node_count);
    for join in log.joins() {
        ledger.apply(join)?;
        let expected = 0.5 + ledger.square_sum() / n;
        if (join.centroid - expected).abs() > 1e-9 {
            return Err(TestCaseError::fail(format!(
                "join {} centroid {} differs from recomputed {expected}",
                join.order, join.centroid
            )));
        }
    }
    Ok(())
}

/// Identical input yields identical logs, and a stop threshold keeps every
/// merge at or above it in non-increasing weight order.
pub(super) fn run_determinism_property(fixture: &LinkageFixture) -> TestCaseResult {
    let threshold = fixture
        .edges
        .get(fixture.edges.len() / 2)
        .map_or(0.5, |&(_, _, weight)| weight);
    let config = LinkageConfig::new().with_stop_below(threshold);
    let (first_summary, first) = run_linkage(fixture, &config)?;
    let (second_summary, second) = run_linkage(fixture, &config)?;
    if first != second || first_summary != second_summary {
        return Err(TestCaseError::fail(format!(
            "repeated runs diverged (shape={:?}, nodes={})",
            fixture.shape, fixture.node_count
        )));
    }

    let merges: Vec<f32> = first
        .joins()
        .iter()
        .filter(|join| join.kind == JoinKind::Merge)
        .map(|join| join.weight)
        .collect();
    if merges.iter().any(|&weight| weight < threshold) {
        return Err(TestCaseError::fail(format!(
            "merge below threshold {threshold}: {merges:?}"
        )));
    }
    if merges.windows(2).any(|pair| pair[1] > pair[0]) {
        return Err(TestCaseError::fail(format!(
            "merge weights increase: {merges:?}"
        )));
    }
    if merges.len() >= fixture.node_count.max(1) {
        return Err(TestCaseError::fail(format!(
            "{} merges for {} nodes",
            merges.len(),
            fixture.node_count
        )));
    }
    Ok(())
}
