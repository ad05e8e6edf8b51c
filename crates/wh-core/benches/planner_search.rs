use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use wh_config::{default_catalog, Policy};
use wh_core::plan;

fn bench_plan(c: &mut Criterion) {
    let catalog = default_catalog();
    let policy = Policy::default();

    let mut group = c.benchmark_group("plan_iterations");
    for iterations in [1_000u64, 10_000u64] {
        group.bench_with_input(
            BenchmarkId::from_parameter(iterations),
            &iterations,
            |b, &iterations| {
                b.iter(|| {
                    let mut rng = StdRng::seed_from_u64(42);
                    plan(&catalog, &policy, 1800.0, 2200.0, 0.0, iterations, &mut rng).unwrap()
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_plan);
criterion_main!(benches);
