use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use xpcurve::{CurveParameters, DEFAULT_MAX_ENTRIES, LevelRange};

fn breakdown(c: &mut Criterion) {
    let curve = CurveParameters::default();
    let itemized = LevelRange::new(1, 501).unwrap();
    let suppressed = LevelRange::new(1, 1_000_000).unwrap();
    c.bench_function("itemized breakdown", |b| {
        b.iter(|| curve.build_breakdown(black_box(itemized), DEFAULT_MAX_ENTRIES))
    });
    c.bench_function("suppressed breakdown", |b| {
        b.iter(|| curve.build_breakdown(black_box(suppressed), DEFAULT_MAX_ENTRIES))
    });
}

criterion_group!(benches, breakdown);
criterion_main!(benches);
