use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use xpcurve::CurveParameters;

fn walk(curve: &CurveParameters, start: u64, mut xp: f64) -> u64 {
    let mut level = start;
    loop {
        let Ok(step) = curve.cumulative_cost(level as f64, (level + 1) as f64) else {
            return level;
        };
        if step > xp {
            return level;
        }
        xp -= step;
        level += 1;
    }
}

fn inverse(c: &mut Criterion) {
    let curve = CurveParameters::default();
    let xp = curve.cumulative_cost(1.0, 2_500.5).unwrap();
    c.bench_function("closed form inverse", |b| {
        b.iter(|| curve.level_after_adding_xp(black_box(1.0), black_box(xp)))
    });
    c.bench_function("level walk", |b| {
        b.iter(|| walk(&curve, black_box(1), black_box(xp)))
    });
}

criterion_group!(benches, inverse);
criterion_main!(benches);
