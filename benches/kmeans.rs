#[path = "../util/util.rs"]
mod util;

use util::bench_images;

use std::time::Duration;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, SamplingMode};
use gama::kmeans::{self, KmeansOptions};

fn kmeans_dominant_colors(c: &mut Criterion) {
    let images = bench_images();

    let mut group = c.benchmark_group("kmeans_dominant_colors");
    group
        .sample_size(30)
        .noise_threshold(0.05)
        .sampling_mode(SamplingMode::Flat)
        .warm_up_time(Duration::from_millis(500));

    for (k, secs) in [(2, 2), (6, 3), (16, 4)] {
        group.measurement_time(Duration::from_secs(secs));
        for (name, image) in &images {
            group.bench_with_input(BenchmarkId::new(k.to_string(), name), image, |b, image| {
                b.iter(|| kmeans::dominant_colors_with(image, k, KmeansOptions::new()))
            });
        }
    }
}

criterion_group!(benches, kmeans_dominant_colors);
criterion_main!(benches);
