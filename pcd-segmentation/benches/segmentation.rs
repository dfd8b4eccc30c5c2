use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pcd_core::{config::Config, pointcloud::point::Point};
use pcd_segmentation::segment_buildings;
use rand::{rngs::StdRng, Rng, SeedableRng};

fn two_buildings(n: usize) -> Vec<Point> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..n)
        .map(|i| {
            let offset = if i % 2 == 0 { 0.0 } else { 0.6 };
            Point::new(
                offset + rng.gen::<f64>() * 0.4,
                rng.gen::<f64>(),
                rng.gen::<f64>(),
            )
        })
        .collect()
}

fn bench_segmentation(c: &mut Criterion) {
    let config = Config::default();
    let points = two_buildings(2_000);

    c.bench_function("segment 2k points", |b| {
        b.iter(|| {
            let mut rng = StdRng::seed_from_u64(7);
            segment_buildings(black_box(&points), None, &config, &mut rng)
        })
    });

    c.bench_function("segment 2k points with hint", |b| {
        b.iter(|| {
            let mut rng = StdRng::seed_from_u64(7);
            segment_buildings(black_box(&points), Some(2), &config, &mut rng)
        })
    });
}

criterion_group!(benches, bench_segmentation);
criterion_main!(benches);
