//! Shared test utilities for `clasp-core`.

use clasp_test_support::ci::property_test_profile::ProptestRunProfile;
use proptest::test_runner::Config as ProptestConfig;

use crate::{NodeId, SparseGraph};

/// Builds a standard proptest configuration from the shared CI profile.
///
/// This keeps property suites aligned on the same `PROGTEST_CASES` and
/// `CLASP_PBT_FORK` interpretation.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases, false);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

/// Builds a symmetric canonical graph from undirected `(i, j, weight)` edges.
pub(crate) fn undirected(node_count: usize, edges: &[(NodeId, NodeId, f32)]) -> SparseGraph {
    let mirrored = edges
        .iter()
        .flat_map(|&(i, j, weight)| [(i, j, weight), (j, i, weight)]);
    SparseGraph::canonical(node_count, mirrored).expect("fixture edges are valid")
}
