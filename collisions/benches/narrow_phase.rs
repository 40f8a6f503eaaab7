use collisions::{check, GjkConfig};
use common::{Fix64, FixVec2, Shape, ShapeDesc, VertexArena};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::prelude::*;

fn random_point(rng: &mut StdRng) -> FixVec2 {
    FixVec2::new(
        Fix64::from_raw(rng.gen_range(-(50i64 << 32)..(50i64 << 32))),
        Fix64::from_raw(rng.gen_range(-(50i64 << 32)..(50i64 << 32))),
    )
}

fn scene(kind: u32, count: usize) -> (VertexArena, Vec<Shape>) {
    let mut rng = StdRng::seed_from_u64(kind as u64);
    let mut arena = VertexArena::new();
    let shapes = (0..count)
        .map(|_| {
            let center = random_point(&mut rng);
            let desc = match kind {
                0 => ShapeDesc::circle(center, Fix64::from_int(4)),
                1 => ShapeDesc::rect(center, FixVec2::from_ints(6, 3), Fix64::from_ratio(1, 2)),
                _ => ShapeDesc::oval(center, FixVec2::from_ints(5, 2), Fix64::ONE),
            };
            desc.build(&mut arena).unwrap()
        })
        .collect();
    (arena, shapes)
}

fn pairwise(c: &mut Criterion, name: &str, kind: u32) {
    let (arena, shapes) = scene(kind, 128);
    let config = GjkConfig::default();
    c.bench_function(name, |b| {
        b.iter(|| {
            let mut hits = 0u32;
            for a in &shapes {
                for other in &shapes {
                    if check(black_box(a), black_box(other), &arena, &config) {
                        hits += 1;
                    }
                }
            }
            hits
        })
    });
}

fn circle_benchmark(c: &mut Criterion) {
    pairwise(c, "narrow_phase_circles", 0);
}

fn polygon_benchmark(c: &mut Criterion) {
    pairwise(c, "narrow_phase_polygons", 1);
}

fn oval_benchmark(c: &mut Criterion) {
    pairwise(c, "narrow_phase_ovals", 2);
}

criterion_group!(benches, circle_benchmark, polygon_benchmark, oval_benchmark);
criterion_main!(benches);
