//! Criterion micro-benchmarks comparing `GrowableBuffer` against `Vec` and
//! `SmallVec` for append, middle insert/erase and indexed reads.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use growbuf::{GrowableBuffer, GrowthPolicy};
use growbuf_bench::{apply_edits, edit_script, values, Edit};
use smallvec::SmallVec;

const SIZES: [usize; 3] = [100, 10_000, 1_000_000];

/// Benchmark: append N values to an empty container.
fn bench_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("append");
    for n in SIZES {
        let input = values(n, 42);
        group.bench_with_input(BenchmarkId::new("growbuf", n), &input, |b, input| {
            b.iter(|| {
                let mut buf = GrowableBuffer::new();
                for &v in input {
                    buf.append(v).unwrap();
                }
                black_box(buf.len())
            });
        });
        group.bench_with_input(BenchmarkId::new("growbuf_2x", n), &input, |b, input| {
            let policy = GrowthPolicy {
                scale_factor: 2.0,
                bias: 0,
                ..GrowthPolicy::default()
            };
            b.iter(|| {
                let mut buf = GrowableBuffer::with_policy(policy).unwrap();
                for &v in input {
                    buf.append(v).unwrap();
                }
                black_box(buf.len())
            });
        });
        group.bench_with_input(BenchmarkId::new("vec", n), &input, |b, input| {
            b.iter(|| {
                let mut v = Vec::new();
                for &x in input {
                    v.push(x);
                }
                black_box(v.len())
            });
        });
        group.bench_with_input(BenchmarkId::new("smallvec", n), &input, |b, input| {
            b.iter(|| {
                let mut v: SmallVec<[u64; 16]> = SmallVec::new();
                for &x in input {
                    v.push(x);
                }
                black_box(v.len())
            });
        });
    }
    group.finish();
}

/// Benchmark: replay 1K random inserts/erases on a 10K-element container.
fn bench_insert_erase(c: &mut Criterion) {
    let start = values(10_000, 7);
    let script = edit_script(start.len(), 1_000, 11);

    let mut group = c.benchmark_group("insert_erase_10k");
    group.bench_function("growbuf", |b| {
        b.iter(|| {
            let mut buf = GrowableBuffer::from(start.as_slice());
            apply_edits(&mut buf, &script).unwrap();
            black_box(buf.len())
        });
    });
    group.bench_function("vec", |b| {
        b.iter(|| {
            let mut v = start.clone();
            for &edit in &script {
                match edit {
                    Edit::Insert(i, x) => v.insert(i, x),
                    Edit::Erase(i) => {
                        v.remove(i);
                    }
                }
            }
            black_box(v.len())
        });
    });
    group.finish();
}

/// Benchmark: sum 10K elements through `at` versus slice iteration.
fn bench_read(c: &mut Criterion) {
    let buf: GrowableBuffer<u64> = values(10_000, 3).into_iter().collect();

    let mut group = c.benchmark_group("read_10k");
    group.bench_function("at", |b| {
        b.iter(|| {
            let mut sum = 0u64;
            for i in 0..buf.len() {
                if let Some(&v) = buf.at(i) {
                    sum = sum.wrapping_add(v);
                }
            }
            black_box(sum)
        });
    });
    group.bench_function("slice_iter", |b| {
        b.iter(|| black_box(buf.iter().fold(0u64, |acc, &v| acc.wrapping_add(v))));
    });
    group.finish();
}

criterion_group!(benches, bench_append, bench_insert_erase, bench_read);
criterion_main!(benches);
