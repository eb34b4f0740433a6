use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use mzpeak_numpress::binary::{BinaryArrayCodec, NumpressConfig};
use mzpeak_numpress::numpress::{
    decode_linear, decode_pic, decode_slof, encode_linear, encode_pic, encode_slof,
    optimal_linear_fixed_point, optimal_slof_fixed_point,
};

fn generate_mz(len: usize) -> Vec<f64> {
    (0..len)
        .map(|i| 100.0 + i as f64 * 0.37 + ((i * 31) % 17) as f64 * 0.0011)
        .collect()
}

fn generate_intensities(len: usize) -> Vec<f64> {
    (0..len)
        .map(|i| ((i as u64 * 2_654_435_761) % 1_000_000) as f64)
        .collect()
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");

    for size in [1_000usize, 10_000, 100_000] {
        let mz = generate_mz(size);
        let intensities = generate_intensities(size);
        let linear_fp = optimal_linear_fixed_point(&mz);
        let slof_fp = optimal_slof_fixed_point(&intensities);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("linear", size), &mz, |b, data| {
            b.iter(|| encode_linear(black_box(data), linear_fp))
        });
        group.bench_with_input(BenchmarkId::new("pic", size), &intensities, |b, data| {
            b.iter(|| encode_pic(black_box(data)))
        });
        group.bench_with_input(BenchmarkId::new("slof", size), &intensities, |b, data| {
            b.iter(|| encode_slof(black_box(data), slof_fp))
        });
    }

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    for size in [1_000usize, 10_000, 100_000] {
        let mz = generate_mz(size);
        let intensities = generate_intensities(size);
        let (Ok(linear), Ok(pic), Ok(slof)) = (
            encode_linear(&mz, optimal_linear_fixed_point(&mz)),
            encode_pic(&intensities),
            encode_slof(&intensities, optimal_slof_fixed_point(&intensities)),
        ) else {
            panic!("benchmark data must encode");
        };

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("linear", size), &linear, |b, data| {
            b.iter(|| decode_linear(black_box(data)))
        });
        group.bench_with_input(BenchmarkId::new("pic", size), &pic, |b, data| {
            b.iter(|| decode_pic(black_box(data)))
        });
        group.bench_with_input(BenchmarkId::new("slof", size), &slof, |b, data| {
            b.iter(|| decode_slof(black_box(data)))
        });
    }

    group.finish();
}

fn bench_binary_array(c: &mut Criterion) {
    let mut group = c.benchmark_group("binary_array");
    let mz = generate_mz(10_000);
    group.throughput(Throughput::Elements(mz.len() as u64));

    for (name, config, zlib) in [
        ("plain_zlib", NumpressConfig::default(), true),
        ("linear", NumpressConfig::linear(), false),
        ("linear_zlib", NumpressConfig::linear(), true),
    ] {
        group.bench_function(name, |b| {
            b.iter(|| BinaryArrayCodec::encode(black_box(&mz), &config, zlib))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode, bench_binary_array);
criterion_main!(benches);
