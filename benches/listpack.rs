//! Criterion benchmarks for the packed listpack representation.
//!
//! Run with:
//!   cargo bench --bench listpack

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use listd::listpack::{End, Listpack};

fn bench_push_tail(c: &mut Criterion) {
    let mut group = c.benchmark_group("listpack_push_tail");

    for &entries in &[16usize, 256, 4096] {
        group.throughput(Throughput::Elements(entries as u64));
        group.bench_with_input(BenchmarkId::new("small_values", entries), &entries, |b, &entries| {
            b.iter(|| {
                let mut lp = Listpack::new();
                for i in 0..entries {
                    lp.push(i.to_string().as_bytes(), End::Tail);
                }
                lp
            });
        });
    }
}

fn bench_insert_before_head(c: &mut Criterion) {
    let mut group = c.benchmark_group("listpack_insert_before_head");

    for &entries in &[16usize, 256] {
        group.bench_with_input(BenchmarkId::new("prepend_n", entries), &entries, |b, &entries| {
            b.iter(|| {
                let mut lp = Listpack::new();
                for _ in 0..entries {
                    lp.push(b"x", End::Head);
                }
                lp
            });
        });
    }
}

fn bench_cascade_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("listpack_cascade_update");

    // Fill with entries right at the prevlen-width boundary, then push one
    // more small entry at the head, forcing every successor's prevlen field
    // to widen by one byte.
    group.bench_function("grow_prevlen_width", |b| {
        b.iter(|| {
            let mut lp = Listpack::new();
            for _ in 0..200 {
                lp.push(&[b'a'; 200], End::Tail);
            }
            lp.push(b"x", End::Head);
            lp
        });
    });
}

criterion_group!(benches, bench_push_tail, bench_insert_before_head, bench_cascade_update);
criterion_main!(benches);
