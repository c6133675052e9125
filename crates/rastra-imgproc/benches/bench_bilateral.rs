use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use rastra_grid::Grid;
use rastra_imgproc::filter::{bilateral, bilateral_limited};

fn bench_bilateral(c: &mut Criterion) {
    let mut group = c.benchmark_group("Bilateral");

    for (width, height) in [(256, 224), (512, 448)].iter() {
        for radius in [1usize, 2, 4].iter() {
            let window = 2 * radius + 1;
            group.throughput(criterion::Throughput::Elements(
                (*width * *height * window * window) as u64,
            ));

            let parameter_string = format!("{}x{}x{}", width, height, radius);

            let grid_data = (0..width * height)
                .map(|i| (i % 251) as f32)
                .collect::<Vec<_>>();
            let grid_size = [*width, *height].into();

            let src = Grid::new(grid_size, grid_data).unwrap();
            let dst = Grid::from_size_val(grid_size, 0.0f32).unwrap();

            group.bench_with_input(
                BenchmarkId::new("bilateral_f32", &parameter_string),
                &(&src, &dst),
                |b, i| {
                    let (src, mut dst) = (i.0, i.1.clone());
                    b.iter(|| black_box(bilateral(src, &mut dst, 1.5f32, 8.0, *radius)))
                },
            );

            group.bench_with_input(
                BenchmarkId::new("bilateral_limited_f32", &parameter_string),
                &(&src, &dst),
                |b, i| {
                    let (src, mut dst) = (i.0, i.1.clone());
                    b.iter(|| {
                        black_box(bilateral_limited(
                            src, &mut dst, 1.5f32, 8.0, 16.0, *radius,
                        ))
                    })
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_bilateral);
criterion_main!(benches);
