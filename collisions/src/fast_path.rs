use common::{Capsule, Circle};
use fixmath::Fix64;

#[inline(always)]
pub fn circle_circle(a: &Circle, b: &Circle) -> bool {
    let reach = a.radius + b.radius;
    a.center.distance_squared(b.center) <= reach * reach
}

/// Projects the circle center onto the capsule axis and measures against the
/// nearest point of the core segment.
pub fn circle_capsule(circle: &Circle, capsule: &Capsule) -> bool {
    let reach = circle.radius + capsule.radius();
    let reach_sq = reach * reach;
    let axis = capsule.center_b() - capsule.center_a();
    let len = axis.length();
    if len.is_zero() {
        return circle.center.distance_squared(capsule.center_a()) <= reach_sq;
    }

    let unit = axis / len;
    let delta = circle.center - capsule.center();
    let along = unit.dot(delta);
    let half = len * Fix64::HALF;
    let along_abs = along.abs();
    if along_abs > half + reach {
        return false;
    }
    if along_abs >= half {
        let end = if along > Fix64::ZERO {
            capsule.center_b()
        } else {
            capsule.center_a()
        };
        return circle.center.distance_squared(end) <= reach_sq;
    }
    delta.length_squared() - along * along <= reach_sq
}
