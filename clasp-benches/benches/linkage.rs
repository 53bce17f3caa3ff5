//! Single-linkage benchmarks.
//!
//! Measures a full linkage run over random graphs of increasing size, with
//! join records collected in memory so output formatting stays out of the
//! measurement.
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use clasp_benches::{error::BenchSetupError, params::GraphBenchParams, source::RandomGraphConfig};
use clasp_core::{JoinLog, LinkageConfig, link};

const SEED: u64 = 42;
const MEAN_DEGREE: usize = 8;
const NODE_COUNTS: &[usize] = &[1_000, 10_000, 50_000];

fn linkage_impl(c: &mut Criterion) -> Result<(), BenchSetupError> {
    let mut group = c.benchmark_group("single_linkage");
    group.sample_size(20);

    for &node_count in NODE_COUNTS {
        let graph = RandomGraphConfig {
            node_count,
            mean_degree: MEAN_DEGREE,
            seed: SEED,
        }
        .generate()?;
        let params = GraphBenchParams {
            node_count,
            mean_degree: MEAN_DEGREE,
        };
        let config = LinkageConfig::default();

        group.bench_with_input(BenchmarkId::from_parameter(params), &graph, |b, graph| {
            b.iter(|| {
                let mut log = JoinLog::default();
                link(graph, None, &config, &mut log)
            });
        });
    }

    group.finish();
    Ok(())
}

fn linkage(c: &mut Criterion) {
    if let Err(err) = linkage_impl(c) {
        panic!("linkage benchmark setup failed: {err}");
    }
}

criterion_group!(benches, linkage);
criterion_main!(benches);
