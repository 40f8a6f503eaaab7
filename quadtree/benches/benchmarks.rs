use common::{Aabb, CollisionGroup, ShapeId};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fixmath::{Fix64, FixVec2};
use quadtree::{QuadTree, QuadTreeConfig};
use rand::prelude::*;

fn random_box(rng: &mut StdRng, size: i64) -> Aabb {
    let x = rng.gen_range(-4000i64..4000) << 32;
    let y = rng.gen_range(-4000i64..4000) << 32;
    let min = FixVec2::new(Fix64::from_raw(x), Fix64::from_raw(y));
    let max = FixVec2::new(Fix64::from_raw(x + (size << 32)), Fix64::from_raw(y + (size << 32)));
    Aabb::new(min, max)
}

fn populated(count: u32) -> (QuadTree, Vec<Aabb>) {
    let mut rng = StdRng::seed_from_u64(7);
    let mut tree = QuadTree::new(QuadTreeConfig::default()).unwrap();
    let boxes: Vec<Aabb> = (0..count).map(|_| random_box(&mut rng, 10)).collect();
    for (i, b) in boxes.iter().enumerate() {
        tree.insert(ShapeId(i as u32), CollisionGroup::Enemy, b);
    }
    (tree, boxes)
}

fn insert_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(1);
    let boxes: Vec<Aabb> = (0..10_000).map(|_| random_box(&mut rng, 10)).collect();
    c.bench_function("quadtree_insert", |b| {
        b.iter(|| {
            let mut tree = QuadTree::new(QuadTreeConfig::default()).unwrap();
            for (i, aabb) in boxes.iter().enumerate() {
                tree.insert(ShapeId(i as u32), CollisionGroup::Enemy, black_box(aabb));
            }
            tree
        })
    });
}

fn update_benchmark(c: &mut Criterion) {
    let (mut tree, boxes) = populated(10_000);
    let step = FixVec2::from_ints(3, -2);
    let mut flip = false;
    c.bench_function("quadtree_update", |b| {
        b.iter(|| {
            flip = !flip;
            let delta = if flip { step } else { FixVec2::ZERO };
            for (i, aabb) in boxes.iter().enumerate() {
                let moved = Aabb::new(aabb.min + delta, aabb.max + delta);
                tree.update(ShapeId(i as u32), black_box(&moved));
            }
        })
    });
}

fn query_benchmark(c: &mut Criterion) {
    let (tree, _) = populated(10_000);
    let mut rng = StdRng::seed_from_u64(3);
    let query_boxes: Vec<Aabb> = (0..1_000).map(|_| random_box(&mut rng, 40)).collect();
    let mut out = Vec::new();
    c.bench_function("quadtree_query", |b| {
        b.iter(|| {
            let mut total = 0usize;
            for query_box in &query_boxes {
                tree.query(black_box(query_box), CollisionGroup::Enemy, &mut out);
                total += out.len();
            }
            total
        })
    });
}

criterion_group!(benches, insert_benchmark, update_benchmark, query_benchmark);
criterion_main!(benches);
