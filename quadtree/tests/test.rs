use common::{Aabb, CollisionGroup, ShapeId};
use fixmath::{Fix64, FixVec2};
use quadtree::{CellRange, Placement, QuadTree, QuadTreeConfig, QuadtreeError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn small_tree() -> QuadTree {
    QuadTree::new(QuadTreeConfig {
        origin: FixVec2::ZERO,
        cell_size: Fix64::ONE,
        max_depth: 4,
    })
    .unwrap()
}

fn rect(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Aabb {
    Aabb::new(FixVec2::from_ints(min_x, min_y), FixVec2::from_ints(max_x, max_y))
}

fn half(v: i32) -> Fix64 {
    Fix64::from_ratio(v, 2)
}

#[test]
fn test_level_selection() {
    let qt = small_tree();
    assert_eq!(qt.root_size(), Fix64::from_int(16));
    let tiny = Aabb::new(FixVec2::ZERO, FixVec2::new(half(1), half(1)));
    assert_eq!(qt.level_for(&tiny), 4);
    // a cell must be strictly larger than the box
    assert_eq!(qt.level_for(&rect(0, 0, 1, 1)), 3);
    assert_eq!(qt.level_for(&rect(0, 0, 3, 1)), 2);
    assert_eq!(qt.level_for(&rect(0, 0, 16, 16)), 0);
}

#[test]
fn test_single_candidate() {
    let mut qt = small_tree();
    qt.insert(ShapeId(1), CollisionGroup::Enemy, &rect(2, 2, 3, 3));
    let mut out = Vec::new();
    qt.query(&rect(0, 0, 4, 4), CollisionGroup::Enemy, &mut out);
    assert_eq!(out, vec![ShapeId(1)]);
    qt.query(&rect(0, 0, 4, 4), CollisionGroup::Hero, &mut out);
    assert!(out.is_empty());
    qt.query(&rect(12, 12, 13, 13), CollisionGroup::Enemy, &mut out);
    assert!(out.is_empty());
}

#[test]
fn test_max_edge_on_boundary_covers_next_cell() {
    let mut qt = small_tree();
    // size 1 lands on level 3 (cells of 2); max edge 2 sits on a boundary
    qt.insert(ShapeId(7), CollisionGroup::Default, &rect(1, 1, 2, 2));
    assert_eq!(
        qt.placement(ShapeId(7)),
        Some(Placement::Cells(CellRange {
            level: 3,
            min_x: 0,
            min_y: 0,
            max_x: 1,
            max_y: 1,
        }))
    );
    let query_box = Aabb::new(
        FixVec2::new(half(5), half(5)),
        FixVec2::new(Fix64::from_int(3), Fix64::from_int(3)),
    );
    let mut out = Vec::new();
    qt.query(&query_box, CollisionGroup::Default, &mut out);
    assert_eq!(out, vec![ShapeId(7)]);
}

#[test]
fn test_world_edge_is_clamped() {
    let mut qt = small_tree();
    qt.insert(ShapeId(3), CollisionGroup::Default, &rect(15, 15, 16, 16));
    match qt.placement(ShapeId(3)) {
        Some(Placement::Cells(range)) => {
            assert_eq!(range.level, 3);
            assert_eq!((range.max_x, range.max_y), (7, 7));
        }
        other => panic!("unexpected placement {:?}", other),
    }
}

#[test]
fn test_out_of_bounds_goes_to_root_bucket() {
    let mut qt = small_tree();
    qt.insert(ShapeId(9), CollisionGroup::Item, &rect(-3, 2, 1, 4));
    assert_eq!(qt.placement(ShapeId(9)), Some(Placement::Outside));
    let mut out = Vec::new();
    qt.query(&rect(10, 10, 11, 11), CollisionGroup::Item, &mut out);
    assert_eq!(out, vec![ShapeId(9)]);
    qt.query(&rect(100, 100, 101, 101), CollisionGroup::Item, &mut out);
    assert_eq!(out, vec![ShapeId(9)]);
}

#[test]
fn test_unchanged_update_is_noop() {
    let mut qt = small_tree();
    qt.insert(ShapeId(1), CollisionGroup::Default, &rect(1, 1, 2, 2));
    qt.insert(ShapeId(2), CollisionGroup::Default, &rect(4, 4, 9, 6));
    qt.insert(ShapeId(3), CollisionGroup::Hero, &rect(-1, 0, 1, 1));
    let mut before = Vec::new();
    qt.cell_members(&mut before);
    for (id, b) in [(1, rect(1, 1, 2, 2)), (2, rect(4, 4, 9, 6)), (3, rect(-1, 0, 1, 1))] {
        assert!(!qt.update(ShapeId(id), &b));
    }
    let mut after = Vec::new();
    qt.cell_members(&mut after);
    assert_eq!(before, after);
}

#[test]
fn test_small_move_stays_put_and_large_move_relocates() {
    let mut qt = small_tree();
    qt.insert(ShapeId(1), CollisionGroup::Default, &rect(8, 8, 11, 9));
    let placed = qt.placement(ShapeId(1));

    // still inside the same level-2 cell
    assert!(!qt.update(ShapeId(1), &rect(8, 9, 11, 10)));
    // shrinking to a finer level inside the old cells is also a no-op
    let shrunk = Aabb::new(FixVec2::from_ints(9, 9), FixVec2::new(half(19), half(19)));
    assert!(!qt.update(ShapeId(1), &shrunk));
    assert_eq!(qt.placement(ShapeId(1)), placed);

    assert!(qt.update(ShapeId(1), &rect(1, 1, 2, 2)));
    let mut out = Vec::new();
    qt.query(&rect(10, 10, 11, 11), CollisionGroup::Default, &mut out);
    assert!(out.is_empty());
    qt.query(&rect(0, 0, 1, 1), CollisionGroup::Default, &mut out);
    assert_eq!(out, vec![ShapeId(1)]);
}

#[test]
fn test_growing_box_relocates_to_coarser_level() {
    let mut qt = small_tree();
    qt.insert(ShapeId(1), CollisionGroup::Default, &rect(0, 0, 1, 1));
    assert!(qt.update(ShapeId(1), &rect(0, 0, 5, 5)));
    match qt.placement(ShapeId(1)) {
        Some(Placement::Cells(range)) => assert_eq!(range.level, 1),
        other => panic!("unexpected placement {:?}", other),
    }
}

#[test]
fn test_remove_and_set_group() {
    let mut qt = small_tree();
    qt.insert(ShapeId(1), CollisionGroup::Default, &rect(1, 1, 5, 2));
    qt.insert(ShapeId(2), CollisionGroup::Default, &rect(1, 1, 2, 2));
    assert!(qt.membership_count() >= 2);

    qt.set_group(ShapeId(2), CollisionGroup::Bullet);
    let mut out = Vec::new();
    qt.query(&rect(0, 0, 4, 4), CollisionGroup::Default, &mut out);
    assert_eq!(out, vec![ShapeId(1)]);
    qt.query(&rect(0, 0, 4, 4), CollisionGroup::Bullet, &mut out);
    assert_eq!(out, vec![ShapeId(2)]);

    assert!(qt.remove(ShapeId(1)));
    assert!(qt.remove(ShapeId(2)));
    assert!(!qt.remove(ShapeId(2)));
    assert_eq!(qt.membership_count(), 0);
    let mut boxes = Vec::new();
    qt.all_cell_bounding_boxes(&mut boxes);
    assert!(boxes.is_empty());
}

#[test]
fn test_cell_bounding_boxes() {
    let mut qt = small_tree();
    qt.insert(ShapeId(1), CollisionGroup::Default, &rect(1, 1, 2, 2));
    let mut boxes = Vec::new();
    qt.all_cell_bounding_boxes(&mut boxes);
    assert_eq!(
        boxes,
        vec![rect(0, 0, 2, 2), rect(2, 0, 4, 2), rect(0, 2, 2, 4), rect(2, 2, 4, 4)]
    );
}

#[test]
fn test_query_is_superset_of_overlaps() {
    let mut rng = StdRng::seed_from_u64(2024);
    let mut qt = QuadTree::new(QuadTreeConfig {
        origin: FixVec2::from_ints(-512, -512),
        cell_size: Fix64::from_int(8),
        max_depth: 7,
    })
    .unwrap();
    let random_box = |rng: &mut StdRng| {
        let x = rng.gen_range(-600i64..600) << 32;
        let y = rng.gen_range(-600i64..600) << 32;
        let w = rng.gen_range(0i64..(40 << 32));
        let h = rng.gen_range(0i64..(40 << 32));
        Aabb::new(
            FixVec2::new(Fix64::from_raw(x), Fix64::from_raw(y)),
            FixVec2::new(Fix64::from_raw(x + w), Fix64::from_raw(y + h)),
        )
    };

    let mut boxes: Vec<Aabb> = (0..500).map(|_| random_box(&mut rng)).collect();
    for (i, b) in boxes.iter().enumerate() {
        qt.insert(ShapeId(i as u32), CollisionGroup::Enemy, b);
    }
    // move half of them
    for i in (0..boxes.len()).step_by(2) {
        boxes[i] = random_box(&mut rng);
        qt.update(ShapeId(i as u32), &boxes[i]);
    }

    let mut out = Vec::new();
    for _ in 0..200 {
        let query_box = random_box(&mut rng);
        qt.query(&query_box, CollisionGroup::Enemy, &mut out);
        assert!(out.windows(2).all(|w| w[0] < w[1]));
        for (i, b) in boxes.iter().enumerate() {
            if b.overlaps(&query_box) {
                assert!(out.contains(&ShapeId(i as u32)), "missing {} for {:?}", i, query_box);
            }
        }
    }
}

#[test]
fn test_invalid_configs() {
    let bad_cell = QuadTree::new(QuadTreeConfig {
        cell_size: Fix64::ZERO,
        ..QuadTreeConfig::default()
    });
    assert!(matches!(bad_cell, Err(QuadtreeError::InvalidCellSize { .. })));
    let deep = QuadTree::new(QuadTreeConfig {
        max_depth: 40,
        ..QuadTreeConfig::default()
    });
    assert!(matches!(deep, Err(QuadtreeError::InvalidMaxDepth { max_depth: 40 })));
    let huge = QuadTree::new(QuadTreeConfig {
        cell_size: Fix64::from_int(1 << 20),
        max_depth: 16,
        ..QuadTreeConfig::default()
    });
    assert!(matches!(huge, Err(QuadtreeError::RootTooLarge { .. })));
}
