use common::{Shape, VertexArena};
use fixmath::{Fix64, FixVec2};

/// Up to three Minkowski-difference points, newest last.
#[derive(Clone, Copy, Debug, Default)]
struct Simplex {
    points: [FixVec2; 3],
    len: usize,
}

impl Simplex {
    #[inline(always)]
    fn push(&mut self, p: FixVec2) {
        debug_assert!(self.len < 3, "simplex overflow");
        self.points[self.len] = p;
        self.len += 1;
    }

    #[inline(always)]
    fn remove(&mut self, idx: usize) {
        for i in idx..self.len - 1 {
            self.points[i] = self.points[i + 1];
        }
        self.len -= 1;
    }
}

#[inline(always)]
fn support(a: &Shape, b: &Shape, arena: &VertexArena, direction: FixVec2) -> FixVec2 {
    a.furthest_point(direction, arena) - b.furthest_point(-direction, arena)
}

/// 2D GJK boolean test. Touching counts as intersecting.
pub fn intersects(a: &Shape, b: &Shape, arena: &VertexArena, max_iterations: u32) -> bool {
    let mut direction = (b.center() - a.center()).normalized();
    if direction.is_zero() {
        direction = FixVec2::UNIT_X;
    }

    let first = support(a, b, arena, direction);
    if first.is_zero() {
        return true;
    }
    let mut simplex = Simplex::default();
    simplex.push(first);
    direction = (-first).normalized();

    for _ in 0..max_iterations {
        let point = support(a, b, arena, direction);
        if point.dot(direction) < Fix64::ZERO {
            return false;
        }
        simplex.push(point);
        if evolve(&mut simplex, &mut direction) {
            return true;
        }
    }
    false
}

/// Same as [`intersects`] with the pair put in a canonical order first, so the
/// answer does not depend on which shape is passed first.
pub fn intersects_ordered(a: &Shape, b: &Shape, arena: &VertexArena, max_iterations: u32) -> bool {
    if ordering_key(b) < ordering_key(a) {
        intersects(b, a, arena, max_iterations)
    } else {
        intersects(a, b, arena, max_iterations)
    }
}

fn ordering_key(shape: &Shape) -> (u8, i64, i64, i64, i64, i64) {
    let c = shape.center();
    let (k, p, q, r) = match shape {
        Shape::Circle(circle) => (0, circle.radius.raw(), 0, 0),
        Shape::Oval(oval) => (
            1,
            oval.axis().x.raw(),
            oval.axis().y.raw(),
            oval.rotation().raw(),
        ),
        Shape::Polygon(poly) => (2, poly.vertex_start() as i64, poly.rotation().raw(), 0),
        Shape::Capsule(capsule) => (
            3,
            capsule.center_a().x.raw(),
            capsule.center_a().y.raw(),
            capsule.radius().raw(),
        ),
    };
    (k, c.x.raw(), c.y.raw(), p, q, r)
}

/// Reduces the simplex toward the origin and picks the next search direction.
/// Returns true once the origin is enclosed.
fn evolve(simplex: &mut Simplex, direction: &mut FixVec2) -> bool {
    match simplex.len {
        2 => {
            let b = simplex.points[0];
            let a = simplex.points[1];
            let towards = (b - a).normal_towards(-a);
            if towards.is_zero() {
                // The origin lies on segment AB.
                return true;
            }
            *direction = towards;
            false
        }
        3 => {
            let c = simplex.points[0];
            let b = simplex.points[1];
            let a = simplex.points[2];
            let ab = b - a;
            let ac = c - a;
            let ao = -a;
            let ab_perp = ab.normal_towards(-ac);
            let ac_perp = ac.normal_towards(-ab);
            if ab_perp.is_zero() || ac_perp.is_zero() {
                // Collinear points; continue from the newest edge.
                simplex.remove(0);
                return evolve(simplex, direction);
            }
            if ab_perp.dot(ao) > Fix64::ZERO {
                simplex.remove(0);
                *direction = ab_perp;
                false
            } else if ac_perp.dot(ao) > Fix64::ZERO {
                simplex.remove(1);
                *direction = ac_perp;
                false
            } else {
                true
            }
        }
        n => {
            debug_assert!(false, "unexpected simplex size {}", n);
            false
        }
    }
}
