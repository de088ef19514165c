//! Request signing and page planning benchmarks.
//!
//! Run with: `cargo bench --package lazsync-bench --bench sign_benchmark`

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use lazsync_bench::{SECRET, api_params, system_params};
use lazsync_lib::{PagePlan, Signer, signing_string};
use std::hint::black_box;

fn sign_benchmark(c: &mut Criterion) {
    let signer = Signer::new(SECRET);
    let system = system_params();

    let mut group = c.benchmark_group("sign");
    for count in [2, 16, 128] {
        let api = api_params(count);
        group.throughput(Throughput::Elements((count + system.len()) as u64));

        group.bench_with_input(BenchmarkId::new("signing_string", count), &api, |b, api| {
            b.iter(|| signing_string(black_box("/orders/get"), &system, api));
        });
        group.bench_with_input(BenchmarkId::new("hmac_sha256", count), &api, |b, api| {
            b.iter(|| signer.sign(black_box("/orders/get"), &system, api));
        });
    }
    group.finish();
}

fn plan_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("plan");
    for total in [20_u64, 10_000, 1_000_000] {
        group.bench_with_input(BenchmarkId::new("pages", total), &total, |b, &total| {
            b.iter(|| {
                PagePlan::new(black_box(total), 18)
                    .map(|plan| plan.map(|task| task.offset).sum::<u64>())
            });
        });
    }
    group.finish();
}

criterion_group!(benches, sign_benchmark, plan_benchmark);
criterion_main!(benches);
