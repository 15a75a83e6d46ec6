use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use deadlock_analyzer::detection::{detect, Mode, RawMatrices, SystemState};
use deadlock_analyzer::{Analyzer, Scenario};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_multi(rng: &mut StdRng, p: usize, r: usize) -> SystemState {
    let allocated: Vec<Vec<i64>> = (0..p)
        .map(|_| (0..r).map(|_| rng.gen_range(0..4)).collect())
        .collect();
    let max = allocated
        .iter()
        .map(|row| row.iter().map(|a| a + rng.gen_range(0..5)).collect())
        .collect();
    let available = (0..r).map(|_| rng.gen_range(0..6)).collect();
    let raw = RawMatrices {
        allocated,
        max,
        available,
        ..Default::default()
    };
    SystemState::from_raw(raw, Mode::Multi, p, r).unwrap()
}

fn random_single(rng: &mut StdRng, p: usize, r: usize) -> SystemState {
    let mut allocated = vec![vec![0; r]; p];
    let mut available = vec![0; r];
    for j in 0..r {
        let owner = rng.gen_range(0..=p);
        if owner < p {
            allocated[owner][j] = 1;
        } else {
            available[j] = 1;
        }
    }
    let requested = (0..p)
        .map(|_| (0..r).map(|_| rng.gen_range(0..2)).collect())
        .collect();
    let raw = RawMatrices {
        allocated,
        requested,
        available,
        ..Default::default()
    };
    SystemState::from_raw(raw, Mode::Single, p, r).unwrap()
}

fn bench_detect_multi(c: &mut Criterion) {
    let mut group = c.benchmark_group("detect_multi");
    group.sample_size(50);

    group.bench_function("detect_10x10", |b| {
        b.iter_batched(
            || {
                let mut rng = StdRng::seed_from_u64(42);
                (0..100).map(|_| random_multi(&mut rng, 10, 10)).collect::<Vec<_>>()
            },
            |states| {
                for state in states.iter() {
                    black_box(detect(state));
                }
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

fn bench_detect_single(c: &mut Criterion) {
    let mut group = c.benchmark_group("detect_single");
    group.sample_size(50);

    // Includes graph derivation.
    group.bench_function("detect_10x10_with_graph", |b| {
        b.iter_batched(
            || {
                let mut rng = StdRng::seed_from_u64(1337);
                (0..100).map(|_| random_single(&mut rng, 10, 10)).collect::<Vec<_>>()
            },
            |states| {
                for state in states.iter() {
                    let result = detect(state);
                    black_box(result.graph.as_ref().and_then(|g| g.find_cycle()));
                }
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

fn bench_analyze_json(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze_json");
    group.sample_size(30);

    let mut rng = StdRng::seed_from_u64(2024);
    let json = Scenario::from_state(&random_multi(&mut rng, 10, 10))
        .to_json()
        .unwrap();
    let analyzer = Analyzer::default();

    group.bench_function("parse_validate_detect", |b| {
        b.iter(|| black_box(analyzer.analyze_json(black_box(&json)).unwrap()))
    });

    group.finish();
}

criterion_group!(benches, bench_detect_multi, bench_detect_single, bench_analyze_json);
criterion_main!(benches);
