use alchm_core::{
    ALL_BODIES, AlchemicalTransform, EnergyVector, Position, PositionMap, geometric_mean, kalchm,
};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

fn sample_positions() -> PositionMap {
    ALL_BODIES
        .iter()
        .enumerate()
        .map(|(i, b)| (*b, Position::from_longitude(17.3 + i as f64 * 37.9, i % 3 == 0)))
        .collect()
}

fn transform_bench(c: &mut Criterion) {
    let positions = sample_positions();
    let transform = AlchemicalTransform::default();

    let mut group = c.benchmark_group("transform");
    group.bench_function("full_chart", |b| {
        b.iter(|| transform.transform(black_box(&positions)))
    });
    group.bench_function("kalchm", |b| {
        b.iter(|| kalchm(black_box(&EnergyVector::new(3.2, 4.1, 2.7, 1.9))))
    });
    group.bench_function("geometric_mean_64", |b| {
        let values: Vec<f64> = (1..=64).map(|i| i as f64 * 0.37).collect();
        b.iter(|| geometric_mean(black_box(&values)))
    });
    group.finish();
}

criterion_group!(benches, transform_bench);
criterion_main!(benches);
