use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use image::{DynamicImage, Rgb, RgbImage};
use photo_compress::processing::{compute_target_size, encode_image, normalize_color, resize_image};
use photo_compress::OutputFormat;

fn create_test_image(width: u32, height: u32) -> DynamicImage {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x * y) % 256) as u8])
    });
    DynamicImage::ImageRgb8(img)
}

fn bench_compute_target_size(c: &mut Criterion) {
    c.bench_function("compute_target_size", |b| {
        b.iter(|| {
            compute_target_size(
                black_box(6000),
                black_box(4000),
                black_box(2400),
                black_box(1600),
            )
        })
    });
}

fn bench_resize(c: &mut Criterion) {
    let mut group = c.benchmark_group("resize_lanczos3");
    group.sample_size(10);

    for &(width, height) in &[(1200u32, 800u32), (2400, 1600)] {
        let img = create_test_image(width, height);
        let target = compute_target_size(width, height, width / 2, height / 2);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", width, height)),
            &img,
            |b, img| b.iter(|| resize_image(black_box(img.clone()), target)),
        );
    }

    group.finish();
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    group.sample_size(10);

    let img = normalize_color(create_test_image(800, 600));
    for format in OutputFormat::all_formats() {
        group.bench_with_input(BenchmarkId::from_parameter(format), &img, |b, img| {
            b.iter(|| encode_image(black_box(img), format, 85))
        });
    }

    group.finish();
}

fn bench_jpeg_quality(c: &mut Criterion) {
    let mut group = c.benchmark_group("jpeg_quality");
    group.sample_size(10);

    let img = create_test_image(800, 600);
    for quality in [50u8, 75, 90] {
        group.bench_with_input(BenchmarkId::from_parameter(quality), &quality, |b, &q| {
            b.iter(|| encode_image(black_box(&img), OutputFormat::Jpeg, q))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_compute_target_size,
    bench_resize,
    bench_encode,
    bench_jpeg_quality
);
criterion_main!(benches);
