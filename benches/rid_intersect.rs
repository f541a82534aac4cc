use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use heurodb::query::rid_set::intersect_all;
use heurodb::record::RID;

fn rid_list(len: usize, stride: usize) -> Vec<RID> {
    (0..len)
        .map(|i| {
            let n = i * stride;
            RID::new((n / 64) as i32, n % 64)
        })
        .collect()
}

fn bench_intersect(c: &mut Criterion) {
    let mut group = c.benchmark_group("rid_intersect");
    for size in [100usize, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::new("two_lists", size), &size, |b, &size| {
            let a = rid_list(size, 2);
            let c = rid_list(size, 3);
            b.iter(|| intersect_all(black_box(vec![a.clone(), c.clone()])));
        });
        group.bench_with_input(BenchmarkId::new("three_lists", size), &size, |b, &size| {
            let a = rid_list(size, 2);
            let c = rid_list(size, 3);
            let d = rid_list(size, 5);
            b.iter(|| intersect_all(black_box(vec![a.clone(), c.clone(), d.clone()])));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_intersect);
criterion_main!(benches);
