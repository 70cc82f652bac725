use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rust_oned::BitArray;
use rust_oned::utils::binarization::{binarize_row, otsu_threshold};
use rust_oned::utils::grayscale::{rgb_to_grayscale, rgba_to_grayscale};

fn bench_rgb_to_grayscale_small(c: &mut Criterion) {
    let image = vec![128u8; 100 * 100 * 3];
    c.bench_function("rgb_to_grayscale_100x100", |b| {
        b.iter(|| rgb_to_grayscale(black_box(&image), black_box(100), black_box(100)))
    });
}

fn bench_rgb_to_grayscale_large(c: &mut Criterion) {
    let image = vec![128u8; 1920 * 1080 * 3];
    c.bench_function("rgb_to_grayscale_1920x1080", |b| {
        b.iter(|| rgb_to_grayscale(black_box(&image), black_box(1920), black_box(1080)))
    });
}

fn bench_rgba_to_grayscale_medium(c: &mut Criterion) {
    let image = vec![128u8; 640 * 480 * 4];
    c.bench_function("rgba_to_grayscale_640x480", |b| {
        b.iter(|| rgba_to_grayscale(black_box(&image), black_box(640), black_box(480)))
    });
}

fn bench_otsu_threshold_medium(c: &mut Criterion) {
    let gray: Vec<u8> = (0..640 * 480).map(|i| (i * 31 % 256) as u8).collect();
    c.bench_function("otsu_threshold_640x480", |b| {
        b.iter(|| otsu_threshold(black_box(&gray)))
    });
}

fn bench_binarize_row(c: &mut Criterion) {
    let pixels: Vec<u8> = (0..1920).map(|i| if (i / 3) % 2 == 0 { 20 } else { 230 }).collect();
    let mut row = BitArray::default();
    c.bench_function("binarize_row_1920", |b| {
        b.iter(|| binarize_row(black_box(&pixels), black_box(128), &mut row))
    });
}

criterion_group!(
    benches,
    bench_rgb_to_grayscale_small,
    bench_rgb_to_grayscale_large,
    bench_rgba_to_grayscale_medium,
    bench_otsu_threshold_medium,
    bench_binarize_row
);
criterion_main!(benches);
