//! Criterion benchmarks for QUBO construction and the search engines.
//!
//! Uses seeded synthetic catalogs so runs are comparable across machines.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use u_siting::catalog::{self, SiteCatalog};
use u_siting::greedy::GreedyRunner;
use u_siting::qubo::{build_qubo, QuboParams};
use u_siting::sa::{SaConfig, SaRunner};
use u_siting::tabu::{TabuConfig, TabuRunner};
use u_siting::Selection;

fn catalog(n: usize) -> SiteCatalog {
    catalog::generate(n, &mut StdRng::seed_from_u64(42))
}

fn bench_build_qubo(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_qubo");
    let params = QuboParams::default();

    for &n in &[20, 100, 300] {
        let sites = catalog(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &sites, |b, s| {
            b.iter(|| black_box(build_qubo(black_box(s), &params)))
        });
    }
    group.finish();
}

fn bench_sa(c: &mut Criterion) {
    let mut group = c.benchmark_group("sa");
    group.sample_size(10);

    for &n in &[20, 100, 300] {
        let qubo = build_qubo(&catalog(n), &QuboParams::default());
        let config = SaConfig::default().with_steps(10_000);
        group.bench_with_input(BenchmarkId::from_parameter(n), &(qubo, config), |b, (q, c)| {
            b.iter(|| {
                let mut rng = StdRng::seed_from_u64(42);
                let result = SaRunner::run(black_box(q), &Selection::empty(q.size()), c, &mut rng);
                black_box(result)
            })
        });
    }
    group.finish();
}

fn bench_tabu(c: &mut Criterion) {
    let mut group = c.benchmark_group("tabu");
    group.sample_size(10);

    for &n in &[20, 100, 300] {
        let qubo = build_qubo(&catalog(n), &QuboParams::default());
        let initial = Selection::random(n, &mut StdRng::seed_from_u64(7));
        let config = TabuConfig::default().with_iterations(200);
        group.bench_with_input(
            BenchmarkId::from_parameter(n),
            &(qubo, initial, config),
            |b, (q, x, c)| b.iter(|| black_box(TabuRunner::run(black_box(q), x, c))),
        );
    }
    group.finish();
}

fn bench_greedy(c: &mut Criterion) {
    let mut group = c.benchmark_group("greedy");

    for &n in &[100, 1_000, 10_000] {
        let sites = catalog(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &sites, |b, s| {
            b.iter(|| black_box(GreedyRunner::run(black_box(s), 900_000.0, 10)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build_qubo, bench_sa, bench_tabu, bench_greedy);
criterion_main!(benches);
