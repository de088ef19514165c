//! Normalization and output benchmarks.
//!
//! Run with: `cargo bench --package lazsync-bench --bench pipeline_benchmark`

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use lazsync_bench::orders_payload;
use lazsync_lib::{Collection, OutputFormat, normalize};
use std::hint::black_box;

fn normalize_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");
    for count in [18, 100, 1_000] {
        let payload = orders_payload(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("orders", count), &payload, |b, payload| {
            b.iter(|| normalize(Collection::Orders, black_box(payload)));
        });
    }
    group.finish();
}

fn format_benchmark(c: &mut Criterion) {
    let payload = orders_payload(1_000);
    let Ok(records) = normalize(Collection::Orders, &payload) else {
        return;
    };

    let mut group = c.benchmark_group("format");
    group.throughput(Throughput::Elements(records.len() as u64));
    for format in OutputFormat::all() {
        group.bench_with_input(
            BenchmarkId::new("orders", format),
            format,
            |b, format| {
                b.iter(|| {
                    let mut out = Vec::with_capacity(256 * 1024);
                    let _ = format.write_records(black_box(&records), &mut out);
                    out
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, normalize_benchmark, format_benchmark);
criterion_main!(benches);
