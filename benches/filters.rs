//! Benchmarks for per-candidate predicate evaluation.
//!
//! Each iteration evaluates the predicate once for every point, the way a
//! filtered graph search does over its visited set. Three attribute layouts:
//!
//! - dense: 1 000 attribute ids, 50 per point
//! - sparse: 100 000 attribute ids, 50 per point
//! - very_sparse: 100 000 attribute ids, 5 per point
//!
//! The bitset backend only runs in the dense layout; its 1024-id universe
//! cannot hold the sparse ones.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use facetgate::{AttrId, AttributeFilter, FilterConfig, FilterKind, FilterPredicate, PointId};
use rand::prelude::*;

#[derive(Clone, Copy)]
struct Scenario {
    name: &'static str,
    total_attributes: usize,
    attrs_per_point: usize,
}

const SCENARIOS: [Scenario; 3] = [
    Scenario {
        name: "dense",
        total_attributes: 1_000,
        attrs_per_point: 50,
    },
    Scenario {
        name: "sparse",
        total_attributes: 100_000,
        attrs_per_point: 50,
    },
    Scenario {
        name: "very_sparse",
        total_attributes: 100_000,
        attrs_per_point: 5,
    },
];

const SIZES: [usize; 3] = [512, 4_096, 16_384];

// === Generators ===

/// Distinct random attributes per point, seeded for reproducibility.
fn random_assignments(n_points: usize, scenario: Scenario) -> Vec<Vec<AttrId>> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..n_points)
        .map(|_| {
            rand::seq::index::sample(&mut rng, scenario.total_attributes, scenario.attrs_per_point)
                .into_iter()
                .map(|a| a as AttrId)
                .collect()
        })
        .collect()
}

fn random_query(n_attrs: usize, scenario: Scenario, seed: u64) -> Vec<AttrId> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n_attrs)
        .map(|_| rng.gen_range(0..scenario.total_attributes) as AttrId)
        .collect()
}

fn build_filter(kind: FilterKind, assignments: &[Vec<AttrId>]) -> Box<dyn AttributeFilter> {
    let mut filter = FilterConfig::new(kind).build().expect("valid config");
    for (point, attrs) in assignments.iter().enumerate() {
        for &attr in attrs {
            filter
                .add_attribute(point as PointId, attr)
                .expect("attribute within universe");
        }
    }
    filter
}

fn kinds_for(scenario: Scenario) -> impl Iterator<Item = FilterKind> {
    FilterKind::ALL
        .into_iter()
        .filter(move |kind| !kind.is_bounded() || scenario.total_attributes <= facetgate::MAX_ATTRIBUTES)
}

// === Benchmarks ===

fn bench_predicate(c: &mut Criterion, query_len: usize, group_name: &str) {
    for scenario in SCENARIOS {
        let mut group = c.benchmark_group(format!("{group_name}/{}", scenario.name));

        for n in SIZES {
            group.throughput(Throughput::Elements(n as u64));
            let assignments = random_assignments(n, scenario);
            let query = random_query(query_len, scenario, 7);

            for kind in kinds_for(scenario) {
                let mut filter = build_filter(kind, &assignments);
                filter.set_query_attributes(&query).expect("query within universe");

                group.bench_with_input(BenchmarkId::new(kind.as_str(), n), &n, |bench, &n| {
                    bench.iter(|| {
                        let mut accepted = 0usize;
                        for point in 0..n as PointId {
                            if filter.matches(black_box(point)) {
                                accepted += 1;
                            }
                        }
                        accepted
                    });
                });
            }
        }

        group.finish();
    }
}

fn bench_single_attribute(c: &mut Criterion) {
    bench_predicate(c, 1, "single");
}

fn bench_multi_attribute(c: &mut Criterion) {
    bench_predicate(c, 2, "multi");
}

fn bench_insert(c: &mut Criterion) {
    let scenario = SCENARIOS[0];
    let assignments = random_assignments(4_096, scenario);
    let mut group = c.benchmark_group("insert/dense");
    group.throughput(Throughput::Elements(
        (assignments.len() * scenario.attrs_per_point) as u64,
    ));

    for kind in kinds_for(scenario) {
        group.bench_function(kind.as_str(), |bench| {
            bench.iter(|| build_filter(kind, black_box(&assignments)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_single_attribute,
    bench_multi_attribute,
    bench_insert
);
criterion_main!(benches);
