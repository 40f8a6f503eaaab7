use common::*;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn v(x: i32, y: i32) -> FixVec2 {
    FixVec2::from_ints(x, y)
}

fn f(x: i32) -> Fix64 {
    Fix64::from_int(x)
}

fn near(a: FixVec2, b: FixVec2, tolerance: Fix64) -> bool {
    (a.x - b.x).abs() <= tolerance && (a.y - b.y).abs() <= tolerance
}

#[test]
fn test_circle_support_and_bounds() {
    let mut arena = VertexArena::new();
    let shape = ShapeDesc::circle(v(2, 3), f(5)).build(&mut arena).unwrap();
    assert_eq!(shape.furthest_point(v(10, 0), &arena), v(7, 3));
    assert_eq!(shape.furthest_point(v(0, -1), &arena), v(2, -2));
    assert_eq!(shape.bounding_box(&arena), Aabb::new(v(-3, -2), v(7, 8)));
}

#[test]
fn test_rect_vertices_and_support() {
    let mut arena = VertexArena::new();
    let shape = ShapeDesc::rect(v(10, 10), v(4, 2), Fix64::ZERO)
        .build(&mut arena)
        .unwrap();
    let poly = shape.as_polygon().unwrap();
    assert_eq!(
        poly.world_vertices(&arena),
        &[v(8, 9), v(8, 11), v(12, 11), v(12, 9)]
    );
    assert_eq!(shape.furthest_point(v(1, 1), &arena), v(12, 11));
    assert_eq!(shape.furthest_point(v(-1, -1), &arena), v(8, 9));
    assert_eq!(shape.bounding_box(&arena), Aabb::new(v(8, 9), v(12, 11)));
}

#[test]
fn test_polygon_support_keeps_first_on_tie() {
    let mut arena = VertexArena::new();
    let shape = ShapeDesc::rect(FixVec2::ZERO, v(2, 2), Fix64::ZERO)
        .build(&mut arena)
        .unwrap();
    // (-1,1) and (1,1) tie along +y; (-1,1) comes first.
    assert_eq!(shape.furthest_point(v(0, 1), &arena), v(-1, 1));
}

#[test]
fn test_diamond_vertices() {
    let mut arena = VertexArena::new();
    let shape = ShapeDesc::diamond(FixVec2::ZERO, v(4, 6), Fix64::ZERO)
        .build(&mut arena)
        .unwrap();
    let poly = shape.as_polygon().unwrap();
    assert_eq!(
        poly.world_vertices(&arena),
        &[v(-2, 0), v(0, 3), v(2, 0), v(0, -3)]
    );
}

#[test]
fn test_polygon_rotation_rewrites_world_vertices() {
    let mut arena = VertexArena::new();
    let mut shape = ShapeDesc::rect(v(5, 0), v(4, 2), Fix64::ZERO)
        .build(&mut arena)
        .unwrap();
    shape.set_rotation(Fix64::PI_OVER_2, &mut arena);
    let tol = Fix64::from_raw(1 << 16);
    let bb = shape.bounding_box(&arena);
    assert!(near(bb.min, v(4, -2), tol));
    assert!(near(bb.max, v(6, 2), tol));
    // model vertices are untouched
    let poly = *shape.as_polygon().unwrap();
    assert_eq!(poly.model_vertices(&arena)[2], v(2, 1));
}

#[test]
fn test_oval_support_axis_and_diagonal() {
    let mut arena = VertexArena::new();
    let shape = ShapeDesc::oval(FixVec2::ZERO, v(4, 2), Fix64::ZERO)
        .build(&mut arena)
        .unwrap();
    let tol = Fix64::from_raw(1 << 22);
    assert!(near(shape.furthest_point(v(1, 0), &arena), v(4, 0), tol));
    assert!(near(shape.furthest_point(v(0, 1), &arena), v(0, 2), tol));
    assert!(near(shape.furthest_point(v(-1, 0), &arena), v(-4, 0), tol));

    // For x²/16 + y²/4 = 1 and direction (1,1): x = 16/sqrt(20), y = 4/sqrt(20).
    let p = shape.furthest_point(v(1, 1), &arena);
    assert!((p.x.to_f64() - 3.577708763).abs() < 1e-3);
    assert!((p.y.to_f64() - 0.894427191).abs() < 1e-3);
}

#[test]
fn test_oval_support_lies_on_boundary() {
    let mut arena = VertexArena::new();
    let center = v(-7, 3);
    let shape = ShapeDesc::oval(center, v(6, 3), Fix64::from_ratio(1, 3))
        .build(&mut arena)
        .unwrap();
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..200 {
        let dir = FixVec2::new(
            Fix64::from_raw(rng.gen_range(-(8i64 << 32)..(8i64 << 32))),
            Fix64::from_raw(rng.gen_range(-(8i64 << 32)..(8i64 << 32))),
        );
        let p = shape.furthest_point(dir, &arena);
        let local = (p - center).rotated(-Fix64::from_ratio(1, 3));
        let (x, y) = (local.x.to_f64(), local.y.to_f64());
        let on_curve = x * x / 36.0 + y * y / 9.0;
        assert!((on_curve - 1.0).abs() < 1e-2, "{:?} -> {}", dir, on_curve);
    }
}

#[test]
fn test_oval_steep_direction_falls_back_to_axis() {
    let mut arena = VertexArena::new();
    let shape = ShapeDesc::oval(FixVec2::ZERO, v(4, 2), Fix64::ZERO)
        .build(&mut arena)
        .unwrap();
    let dir = FixVec2::new(Fix64::from_raw(1), f(1000));
    let p = shape.furthest_point(dir, &arena);
    assert!(near(p, v(0, 2), Fix64::from_raw(1 << 24)));
}

#[test]
fn test_oval_set_axis() {
    let mut arena = VertexArena::new();
    let mut shape = ShapeDesc::oval(FixVec2::ZERO, v(4, 2), Fix64::ZERO)
        .build(&mut arena)
        .unwrap();
    assert_eq!(shape.set_oval_axis(v(1, 3)), Ok(true));
    let Shape::Oval(o) = shape else { panic!("not an oval") };
    assert_eq!(o.sqr_axis(), v(1, 9));
    assert_eq!(o.axis_ratio(), f(9));
    assert_eq!(shape.bounding_box(&arena), Aabb::new(v(-3, -3), v(3, 3)));
    assert!(shape.set_oval_axis(v(-1, 3)).is_err());
}

#[test]
fn test_capsule_support_and_centers() {
    let mut arena = VertexArena::new();
    let mut shape = ShapeDesc::capsule(v(-5, 0), v(5, 0), f(2))
        .build(&mut arena)
        .unwrap();
    assert_eq!(shape.center(), FixVec2::ZERO);
    assert_eq!(shape.furthest_point(v(1, 0), &arena), v(7, 0));
    assert_eq!(shape.furthest_point(v(-1, 0), &arena), v(-7, 0));
    assert_eq!(shape.furthest_point(v(0, 1), &arena), v(5, 2));
    assert_eq!(shape.bounding_box(&arena), Aabb::new(v(-7, -2), v(7, 2)));

    assert!(shape.set_capsule_centers(v(0, 0), v(0, 10)));
    assert_eq!(shape.center(), v(0, 5));
    shape.set_center(v(1, 1), &mut arena);
    let Shape::Capsule(c) = shape else { panic!("not a capsule") };
    assert_eq!(c.center_a(), v(1, -4));
    assert_eq!(c.center_b(), v(1, 6));
}

#[test]
fn test_move_by_translates_polygon() {
    let mut arena = VertexArena::new();
    let mut shape = ShapeDesc::rect(FixVec2::ZERO, v(2, 2), Fix64::ZERO)
        .build(&mut arena)
        .unwrap();
    shape.move_by(v(3, -1), &mut arena);
    assert_eq!(shape.center(), v(3, -1));
    assert_eq!(shape.bounding_box(&arena), Aabb::new(v(2, -2), v(4, 0)));
}

#[test]
fn test_invalid_descriptors() {
    let mut arena = VertexArena::new();
    assert_eq!(
        ShapeDesc::circle(FixVec2::ZERO, f(-1)).build(&mut arena),
        Err(ShapeError::InvalidRadius { radius: f(-1) })
    );
    assert_eq!(
        ShapeDesc::polygon(FixVec2::ZERO, &[], Fix64::ZERO).build(&mut arena),
        Err(ShapeError::EmptyPolygon)
    );
    assert!(ShapeDesc::oval(FixVec2::ZERO, v(1, -1), Fix64::ZERO)
        .validate()
        .is_err());
    assert!(arena.is_empty());
}

#[test]
fn test_arena_compaction_preserves_content() {
    let mut arena = VertexArena::new();
    let a = ShapeDesc::rect(v(0, 0), v(2, 2), Fix64::ZERO)
        .build(&mut arena)
        .unwrap();
    let b = ShapeDesc::diamond(v(9, 9), v(2, 4), Fix64::ZERO)
        .build(&mut arena)
        .unwrap();
    let c = ShapeDesc::rect(v(-9, 4), v(6, 2), Fix64::ZERO)
        .build(&mut arena)
        .unwrap();
    a.release(&mut arena);
    assert_eq!(arena.holes(), 4);

    let mut b_poly = *b.as_polygon().unwrap();
    let mut c_poly = *c.as_polygon().unwrap();
    let before_b = b_poly.world_vertices(&arena).to_vec();
    let before_c = c_poly.world_vertices(&arena).to_vec();

    let reclaimed = arena.compact([b_poly.slice_mut(), c_poly.slice_mut()]);
    assert_eq!(reclaimed, 4);
    assert_eq!(arena.len(), 8);
    assert_eq!(arena.holes(), 0);
    assert_eq!(b_poly.vertex_start(), 0);
    assert_eq!(c_poly.vertex_start(), 4);
    assert_eq!(b_poly.world_vertices(&arena), before_b.as_slice());
    assert_eq!(c_poly.world_vertices(&arena), before_c.as_slice());
}

#[test]
fn test_aabb_overlap_is_inclusive() {
    let a = Aabb::new(v(0, 0), v(2, 2));
    let touching = Aabb::new(v(2, 2), v(3, 3));
    let apart = Aabb::new(v(3, 0), v(4, 1));
    assert!(a.overlaps(&touching));
    assert!(!a.overlaps(&apart));
    assert!(a.contains(&Aabb::new(v(0, 0), v(1, 2))));
    assert_eq!(a.union(&apart), Aabb::new(v(0, 0), v(4, 2)));
    assert_eq!(a.center(), v(1, 1));
}

#[test]
fn test_group_order() {
    assert_eq!(CollisionGroup::ALL.len(), CollisionGroup::COUNT);
    for (i, g) in CollisionGroup::ALL.iter().enumerate() {
        assert_eq!(g.index(), i);
    }
    assert!(CollisionGroup::Hero < CollisionGroup::Item);
}

#[cfg(feature = "serde")]
#[test]
fn test_value_types_serialize() {
    let id = ShapeId(42);
    assert_eq!(serde_json::to_string(&id).unwrap(), "42");
    assert_eq!(serde_json::from_str::<ShapeId>("42").unwrap(), id);

    let desc = ShapeDesc::rect(v(3, -2), v(4, 6), Fix64::ZERO);
    let json = serde_json::to_string(&(desc.clone(), CollisionGroup::Enemy)).unwrap();
    let (back, group): (ShapeDesc, CollisionGroup) = serde_json::from_str(&json).unwrap();
    assert_eq!(back, desc);
    assert_eq!(group, CollisionGroup::Enemy);

    let bounds = Aabb::new(v(-1, -1), v(5, 7));
    let json = serde_json::to_string(&bounds).unwrap();
    assert_eq!(serde_json::from_str::<Aabb>(&json).unwrap(), bounds);
}

fn small_point() -> impl Strategy<Value = FixVec2> {
    (-500i32..500, -500i32..500).prop_map(|(x, y)| v(x, y))
}

fn direction() -> impl Strategy<Value = FixVec2> {
    small_point().prop_filter("non-zero direction", |d| !d.is_zero())
}

proptest! {
    #[test]
    fn prop_polygon_support_is_argmax(
        center in small_point(),
        vertices in prop::collection::vec(small_point(), 3..12),
        dir in direction(),
    ) {
        let mut arena = VertexArena::new();
        let shape = ShapeDesc::polygon(center, &vertices, Fix64::ZERO)
            .build(&mut arena)
            .unwrap();
        let world = shape.as_polygon().unwrap().world_vertices(&arena);
        let best = shape.furthest_point(dir, &arena);
        prop_assert!(world.contains(&best));
        let unit = dir.normalized();
        for vertex in world {
            prop_assert!(unit.dot(*vertex) <= unit.dot(best));
        }
    }

    #[test]
    fn prop_circle_support_on_boundary(
        center in small_point(),
        radius in 1i32..1000,
        dir in direction(),
    ) {
        let mut arena = VertexArena::new();
        let shape = ShapeDesc::circle(center, f(radius)).build(&mut arena).unwrap();
        let point = shape.furthest_point(dir, &arena);
        let distance = (point - center).length();
        prop_assert!((distance - f(radius)).abs() <= Fix64::from_ratio(1, 100));
        prop_assert!(dir.dot(point - center) > Fix64::ZERO);
    }

    #[test]
    fn prop_compaction_keeps_live_polygons(
        sizes in prop::collection::vec((1i32..20, 1i32..20, any::<bool>()), 1..16),
    ) {
        let mut arena = VertexArena::new();
        let mut live = Vec::new();
        for (i, (w, h, keep)) in sizes.iter().enumerate() {
            let shape = ShapeDesc::rect(v(i as i32 * 30, 0), v(*w, *h), Fix64::ZERO)
                .build(&mut arena)
                .unwrap();
            if *keep {
                live.push(*shape.as_polygon().unwrap());
            } else {
                shape.release(&mut arena);
            }
        }
        let before: Vec<Vec<FixVec2>> =
            live.iter().map(|p| p.world_vertices(&arena).to_vec()).collect();

        arena.compact(live.iter_mut().map(|p| p.slice_mut()));

        prop_assert_eq!(arena.holes(), 0);
        prop_assert_eq!(arena.len(), live.len() * 4);
        for (poly, vertices) in live.iter().zip(&before) {
            prop_assert_eq!(poly.world_vertices(&arena), vertices.as_slice());
        }
    }
}
