use criterion::black_box;
use criterion::{criterion_group, criterion_main, Criterion};
use texture3d::{Extent3d, Format, Swizzles, Texture3d};

use criterion::BenchmarkId;
use criterion::Throughput;

fn store_load_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_load_level");
    for size in [16, 32, 64] {
        // Allocate outside the benchmark to only measure texel access.
        let texture = Texture3d::with_full_chain(
            Format::RGBA8_UNORM,
            Extent3d::new(size, size, size),
            Swizzles::default(),
        )
        .unwrap();

        group.throughput(Throughput::Bytes((size * size * size * 4) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                for z in 0..size {
                    for y in 0..size {
                        for x in 0..size {
                            let value: u32 = texture.load([x, y, z], black_box(0)).unwrap();
                            texture.store([x, y, z], black_box(0), value.wrapping_add(1)).unwrap();
                        }
                    }
                }
            });
        });
    }
    group.finish();
}

fn clear_level_benchmark(c: &mut Criterion) {
    let texture = Texture3d::with_full_chain(
        Format::RGBA16_SFLOAT,
        Extent3d::new(128, 128, 128),
        Swizzles::default(),
    )
    .unwrap();

    let mut group = c.benchmark_group("clear_level");
    for level in [0, 2, 4] {
        group.bench_with_input(BenchmarkId::from_parameter(level), &level, |b, &level| {
            b.iter(|| texture.clear_level(black_box(level), black_box(0x3c00u64)));
        });
    }
    group.finish();
}

criterion_group!(benches, store_load_benchmark, clear_level_benchmark);
criterion_main!(benches);
