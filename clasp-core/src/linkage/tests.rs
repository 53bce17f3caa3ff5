//! Unit tests for the single-linkage driver.

use rstest::rstest;

use crate::{ClaspError, LabelTable, SparseGraph};

use super::*;

fn symmetric(node_count: usize, edges: &[(NodeId, NodeId, f32)]) -> SparseGraph {
    SparseGraph::canonical(node_count, edges.iter().copied())
        .expect("fixture edges are valid")
        .symmetrized()
}

fn run(graph: &SparseGraph, config: &LinkageConfig) -> (LinkageSummary, JoinLog) {
    let mut log = JoinLog::default();
    let summary = link(graph, None, config, &mut log).expect("linkage must succeed");
    (summary, log)
}

#[rstest]
fn chain_of_three_merges_in_weight_order() {
    let graph = symmetric(3, &[(0, 1, 0.9), (1, 2, 0.5)]);
    let (summary, log) = run(&graph, &LinkageConfig::default());

    assert_eq!(summary.merges, 2);
    assert_eq!(summary.isolates, 0);
    let [first, second] = log.joins() else {
        panic!("expected two joins, got {:?}", log.joins());
    };
    assert_eq!(first.weight, 0.9);
    assert_eq!((first.left_size, first.right_size, first.merged_size), (1, 1, 2));
    assert_eq!((first.left_name.as_str(), first.right_name.as_str()), ("leaf_0", "leaf_1"));
    assert_eq!(first.name, "L1_2");
    assert_eq!(second.weight, 0.5);
    assert_eq!((second.left_size, second.right_size, second.merged_size), (2, 1, 3));
    assert_eq!(second.left_name, "L1_2");
    assert_eq!(second.name, "L2_3");
    assert_eq!(second.order, 2);
}

#[rstest]
fn reports_progress_and_centroid() {
    let graph = symmetric(3, &[(0, 1, 0.9), (1, 2, 0.5)]);
    let (_, log) = run(&graph, &LinkageConfig::default());

    let progress: Vec<_> = log.joins().iter().map(JoinEvent::progress_percent).collect();
    assert_eq!(progress, vec![50.0, 100.0]);
    // sizes {2,1} then {3}
    let centroids: Vec<_> = log.joins().iter().map(|j| j.centroid).collect();
    assert_eq!(centroids, vec![0.5 + 5.0 / 3.0, 0.5 + 9.0 / 3.0]);
}

#[rstest]
fn leaf_touches_precede_their_join() {
    let graph = symmetric(4, &[(0, 1, 0.8), (2, 3, 0.7), (1, 2, 0.6)]);
    let (_, log) = run(&graph, &LinkageConfig::default());

    let touched: Vec<_> = log
        .leaves()
        .iter()
        .map(|touch| (touch.leaf, touch.weight))
        .collect();
    assert_eq!(
        touched,
        vec![(0, Some(0.8)), (1, Some(0.8)), (2, Some(0.7)), (3, Some(0.7))]
    );
    let last = log.joins().last().expect("three joins");
    assert_eq!((last.left_size, last.right_size), (2, 2));
    assert_eq!(last.singleton_joins, 0);
    assert_eq!(last.largest_sub_split, 2);
}

#[rstest]
fn edgeless_graph_emits_only_isolates() {
    let graph = SparseGraph::isolated(0..3);
    let (summary, log) = run(&graph, &LinkageConfig::default());

    assert_eq!(summary.merges, 0);
    assert_eq!(summary.isolates, 3);
    let names: Vec<_> = log.joins().iter().map(|j| j.name.as_str()).collect();
    assert_eq!(names, vec!["sgl_0", "sgl_1", "sgl_2"]);
    for (order, join) in log.joins().iter().enumerate() {
        assert_eq!(join.order, order + 1);
        assert_eq!(join.kind, JoinKind::Isolate);
        assert_eq!(join.weight, ISOLATE_WEIGHT);
        assert_eq!(join.left_name, join.right_name);
        assert_eq!(join.progress, 0.0);
        assert_eq!(join.centroid, 1.5);
    }
    assert!(log.leaves().iter().all(|touch| touch.weight.is_none()));
}

#[rstest]
fn isolates_follow_merges_and_keep_counting() {
    let graph = symmetric(4, &[(1, 3, 0.4)]);
    let (summary, log) = run(&graph, &LinkageConfig::default());

    assert_eq!(summary.records(), 3);
    let tail: Vec<_> = log
        .joins()
        .iter()
        .map(|j| (j.order, j.kind, j.name.as_str()))
        .collect();
    assert_eq!(
        tail,
        vec![
            (1, JoinKind::Merge, "L1_2"),
            (2, JoinKind::Isolate, "sgl_0"),
            (3, JoinKind::Isolate, "sgl_2"),
        ]
    );
}

#[rstest]
#[case::above_every_edge(1.0, 0, true)]
#[case::between_edges(0.6, 1, true)]
#[case::below_every_edge(0.1, 2, false)]
fn stop_threshold_ends_the_scan(
    #[case] threshold: f32,
    #[case] expected_merges: usize,
    #[case] expected_stop: bool,
) {
    let graph = symmetric(3, &[(0, 1, 0.9), (1, 2, 0.5)]);
    let config = LinkageConfig::new().with_stop_below(threshold);
    let (summary, log) = run(&graph, &config);

    assert_eq!(summary.merges, expected_merges);
    assert_eq!(summary.stopped_early, expected_stop);
    assert!(log.joins().iter().all(|j| j.kind == JoinKind::Isolate || j.weight >= threshold));
    let isolates = log
        .joins()
        .iter()
        .filter(|j| j.kind == JoinKind::Isolate)
        .count();
    assert_eq!(isolates, summary.isolates);
}

#[rstest]
fn threshold_edge_counts_towards_progress() {
    let graph = symmetric(3, &[(0, 1, 0.9), (1, 2, 0.5)]);
    let config = LinkageConfig::new().with_stop_below(0.6);
    let (summary, log) = run(&graph, &config);

    assert_eq!(summary.edges_consumed, 2);
    let isolate = log.joins().last().expect("node 2 is isolated");
    assert_eq!(isolate.name, "sgl_2");
    assert_eq!(isolate.progress, 1.0);
}

#[rstest]
fn stops_once_a_single_cluster_remains() {
    let graph = symmetric(3, &[(0, 1, 0.9), (1, 2, 0.8), (0, 2, 0.7)]);
    let (summary, _) = run(&graph, &LinkageConfig::default());

    assert_eq!(summary.merges, 2);
    assert_eq!(summary.edges_consumed, 2);
    assert_eq!(summary.edge_count, 3);
}

#[rstest]
fn labels_name_leaves_and_touches() {
    let graph = symmetric(3, &[(0, 2, 0.75)]);
    let labels = LabelTable::from_pairs([(0, "alpha"), (2, "gamma")]);
    let mut log = JoinLog::default();
    link(&graph, Some(&labels), &LinkageConfig::default(), &mut log)
        .expect("linkage must succeed");

    let first = &log.joins()[0];
    assert_eq!((first.left_name.as_str(), first.right_name.as_str()), ("alpha", "gamma"));
    let names: Vec<_> = log.leaves().iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["alpha", "gamma", "1"]);
    assert_eq!(log.joins()[1].left_name, "leaf_1");
}

#[rstest]
fn asymmetric_input_reads_upper_triangle_only() {
    let graph = SparseGraph::canonical(2, [(1, 0, 0.9)]).expect("entries are valid");
    let (summary, _) = run(&graph, &LinkageConfig::default());
    assert_eq!(summary.edge_count, 0);
    assert_eq!(summary.isolates, 2);
}

#[rstest]
fn rejects_non_canonical_domain_before_emitting() {
    let graph = SparseGraph::from_entries([0, 2], [(0, 2, 1.0)]).expect("entries are valid");
    let mut log = JoinLog::default();
    let err = link(&graph, None, &LinkageConfig::default(), &mut log)
        .expect_err("domain has a gap");
    assert!(matches!(
        err,
        ClaspError::NonCanonicalDomain { position: 1, node: 2 }
    ));
    assert!(log.joins().is_empty());
    assert!(log.leaves().is_empty());
}

#[rstest]
#[case::nan(f32::NAN)]
#[case::negative_infinity(f32::NEG_INFINITY)]
fn rejects_non_finite_thresholds(#[case] threshold: f32) {
    let graph = SparseGraph::isolated(0..2);
    let mut log = JoinLog::default();
    let config = LinkageConfig::new().with_stop_below(threshold);
    let err = link(&graph, None, &config, &mut log).expect_err("threshold must be finite");
    assert_eq!(err.code().as_str(), "CLASP_INVALID_STOP_THRESHOLD");
}

#[rstest]
fn sink_failures_surface_as_output_errors() {
    struct Failing;

    impl JoinSink for Failing {
        fn join(&mut self, _event: &JoinEvent) -> std::io::Result<()> {
            Err(std::io::Error::other("disk full"))
        }

        fn leaf(&mut self, _touch: &LeafTouch) -> std::io::Result<()> {
            Ok(())
        }
    }

    let graph = symmetric(2, &[(0, 1, 0.5)]);
    let err = link(&graph, None, &LinkageConfig::default(), &mut Failing)
        .expect_err("sink rejects joins");
    assert!(matches!(err, ClaspError::Output { what: "join record", .. }));
    assert!(err.to_string().contains("disk full"));
}

#[rstest]
fn empty_graph_emits_nothing() {
    let graph = SparseGraph::default();
    let (summary, log) = run(&graph, &LinkageConfig::default());
    assert_eq!(summary, LinkageSummary::default());
    assert!(log.joins().is_empty());
}
