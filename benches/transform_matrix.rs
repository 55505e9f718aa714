use criterion::{Criterion, black_box, criterion_group, criterion_main};
use glam::Vec3;
use transform_matrix::{Degrees, OrientationStyle, TransformMatrix};

fn sample_transform() -> TransformMatrix {
    let mut m = TransformMatrix::from_scale(Vec3::new(1.5, 0.5, 2.0));
    m.append_rotation(Degrees(33.0), Vec3::new(1.0, 2.0, 3.0));
    m.append_translation(Vec3::new(-4.0, 1.0, 7.0));
    m
}

pub fn bench_multiply(c: &mut Criterion) {
    let a = sample_transform();
    let b = TransformMatrix::axis_rotation(Vec3::Y, Degrees(10.0));
    c.bench_function("transform_matrix_multiply", |bencher| {
        bencher.iter(|| {
            let mut m = black_box(a);
            for _ in 0..1000 {
                m.multiply(black_box(&b));
            }
            m
        })
    });
}

pub fn bench_append(c: &mut Criterion) {
    let a = sample_transform();
    let b = TransformMatrix::axis_rotation(Vec3::Y, Degrees(10.0));
    c.bench_function("transform_matrix_append", |bencher| {
        bencher.iter(|| {
            let mut m = black_box(a);
            for _ in 0..1000 {
                m.append(black_box(&b));
            }
            m
        })
    });
}

pub fn bench_invert(c: &mut Criterion) {
    let a = sample_transform();
    c.bench_function("transform_matrix_invert", |bencher| {
        bencher.iter(|| black_box(a).inverted())
    });
}

pub fn bench_decompose(c: &mut Criterion) {
    let a = sample_transform();
    c.bench_function("transform_matrix_decompose", |bencher| {
        bencher.iter(|| black_box(a).decompose(OrientationStyle::EulerAngles))
    });
}

criterion_group!(
    benches,
    bench_multiply,
    bench_append,
    bench_invert,
    bench_decompose
);
criterion_main!(benches);
