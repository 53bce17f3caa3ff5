//! Graph generators for linkage property tests.
//!
//! Every generator is driven by a seeded [`SmallRng`] so that rstest cases
//! can replay a shape deterministically.

use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::types::{GraphShape, LinkageFixture};

const MIN_NODES: usize = 2;
const MAX_NODES: usize = 48;

/// Samples fixtures across every [`GraphShape`].
pub(super) fn linkage_fixture_strategy() -> impl Strategy<Value = LinkageFixture> {
    (any::<GraphShape>(), any::<u64>()).prop_map(|(shape, seed)| {
        let mut rng = SmallRng::seed_from_u64(seed);
        generate_fixture(shape, &mut rng)
    })
}

/// Generates a fixture of the requested shape.
pub(super) fn generate_fixture(shape: GraphShape, rng: &mut SmallRng) -> LinkageFixture {
    let node_count = rng.gen_range(MIN_NODES..=MAX_NODES);
    let edges = match shape {
        GraphShape::Unique => random_pairs(rng, node_count, 0.15, |r| r.gen_range(0.01_f32..1.0)),
        GraphShape::ManyIdentical => {
            let pool = [0.25_f32, 0.5, 0.75];
            random_pairs(rng, node_count, 0.3, move |r| pool[r.gen_range(0..pool.len())])
        }
        GraphShape::Sparse => sparse_path(rng, node_count),
        GraphShape::Disconnected => disjoint_blocks(rng, node_count),
        GraphShape::Edgeless => Vec::new(),
    };
    LinkageFixture {
        node_count,
        edges,
        shape,
    }
}

fn random_pairs(
    rng: &mut SmallRng,
    node_count: usize,
    probability: f64,
    mut weight: impl FnMut(&mut SmallRng) -> f32,
) -> Vec<(usize, usize, f32)> {
    let mut edges = Vec::new();
    for i in 0..node_count {
        for j in (i + 1)..node_count {
            if rng.gen_bool(probability) {
                let w = weight(rng);
                edges.push((i, j, w));
            }
        }
    }
    edges
}

fn sparse_path(rng: &mut SmallRng, node_count: usize) -> Vec<(usize, usize, f32)> {
    let mut order: Vec<usize> = (0..node_count).collect();
    for i in (1..order.len()).rev() {
        let j = rng.gen_range(0..=i);
        order.swap(i, j);
    }
    let mut edges: Vec<_> = order
        .windows(2)
        .map(|pair| {
            let (a, b) = (pair[0].min(pair[1]), pair[0].max(pair[1]));
            (a, b, rng.gen_range(0.01_f32..1.0))
        })
        .collect();
    for _ in 0..node_count / 3 {
        let (i, j) = (rng.gen_range(0..node_count), rng.gen_range(0..node_count));
        if i != j {
            edges.push((i.min(j), i.max(j), rng.gen_range(0.01_f32..1.0)));
        }
    }
    edges
}

fn disjoint_blocks(rng: &mut SmallRng, node_count: usize) -> Vec<(usize, usize, f32)> {
    let blocks = rng.gen_range(2..=4_usize).min(node_count);
    let mut edges = Vec::new();
    for i in 0..node_count {
        for j in (i + 1)..node_count {
            if i % blocks == j % blocks && rng.gen_bool(0.4) {
                edges.push((i, j, rng.gen_range(0.01_f32..1.0)));
            }
        }
    }
    edges
}
