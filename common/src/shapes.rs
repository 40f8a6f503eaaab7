use fixmath::{Fix64, FixVec2};
use smallvec::SmallVec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::aabb::Aabb;
use crate::arena::VertexArena;
use crate::error::{ShapeError, ShapeResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Circle {
    pub center: FixVec2,
    pub radius: Fix64,
}

/// Ellipse with semi-axes `axis.x` (local x) and `axis.y` (local y).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Oval {
    center: FixVec2,
    rotation: Fix64,
    axis: FixVec2,
    sqr_axis: FixVec2,
    axis_ratio: Fix64,
}

impl Oval {
    fn new(center: FixVec2, axis: FixVec2, rotation: Fix64) -> Self {
        let mut oval = Oval {
            center,
            rotation,
            axis: FixVec2::ZERO,
            sqr_axis: FixVec2::ZERO,
            axis_ratio: Fix64::ZERO,
        };
        oval.set_axis(axis);
        oval
    }

    pub fn center(&self) -> FixVec2 {
        self.center
    }

    pub fn rotation(&self) -> Fix64 {
        self.rotation
    }

    pub fn axis(&self) -> FixVec2 {
        self.axis
    }

    pub fn sqr_axis(&self) -> FixVec2 {
        self.sqr_axis
    }

    /// `b² / a²`, or `MAX` when the x axis is degenerate.
    pub fn axis_ratio(&self) -> Fix64 {
        self.axis_ratio
    }

    fn set_axis(&mut self, axis: FixVec2) {
        self.axis = axis;
        self.sqr_axis = FixVec2::new(axis.x * axis.x, axis.y * axis.y);
        self.axis_ratio = if self.sqr_axis.x.is_zero() {
            Fix64::MAX
        } else {
            self.sqr_axis.y / self.sqr_axis.x
        };
    }

    fn furthest_point(&self, direction: FixVec2) -> FixVec2 {
        let local = direction.fast_rotated(-self.rotation);
        let (a, b) = (self.axis.x, self.axis.y);
        let fallback = FixVec2::new(Fix64::ZERO, b * local.y.signum());
        let point = if local.x.is_zero() {
            fallback
        } else if local.y.is_zero() {
            FixVec2::new(a * local.x.signum(), Fix64::ZERO)
        } else {
            // Tangent point whose normal is parallel to `local`.
            let slope = local.y / local.x;
            let ratio = slope * self.axis_ratio;
            let denom = Fix64::ONE + slope * ratio;
            if denom.is_saturated() {
                fallback
            } else {
                let x = local.x.signum() * a * (Fix64::ONE / denom).sqrt();
                let y = x * ratio;
                if y.is_saturated() {
                    fallback
                } else {
                    FixVec2::new(x, y)
                }
            }
        };
        point.fast_rotated(self.rotation) + self.center
    }

    fn bounding_box(&self) -> Aabb {
        let r = self.axis.x.max(self.axis.y);
        Aabb::from_center_half(self.center, FixVec2::new(r, r))
    }
}

/// Polygon whose vertices live in a [`VertexArena`] slice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Polygon {
    center: FixVec2,
    rotation: Fix64,
    vertex_start: usize,
    vertex_count: usize,
}

impl Polygon {
    pub fn center(&self) -> FixVec2 {
        self.center
    }

    pub fn rotation(&self) -> Fix64 {
        self.rotation
    }

    pub fn vertex_start(&self) -> usize {
        self.vertex_start
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Slice start and length, for arena compaction.
    pub fn slice_mut(&mut self) -> (&mut usize, usize) {
        (&mut self.vertex_start, self.vertex_count)
    }

    pub fn world_vertices<'a>(&self, arena: &'a VertexArena) -> &'a [FixVec2] {
        arena.world(self.vertex_start, self.vertex_count)
    }

    pub fn model_vertices<'a>(&self, arena: &'a VertexArena) -> &'a [FixVec2] {
        arena.model(self.vertex_start, self.vertex_count)
    }

    fn refresh(&self, arena: &mut VertexArena) {
        let (sin, cos) = (self.rotation.sin(), self.rotation.cos());
        let (model, world) = arena.model_and_world_mut(self.vertex_start, self.vertex_count);
        for (w, m) in world.iter_mut().zip(model) {
            *w = m.rotated_by(sin, cos) + self.center;
        }
    }

    fn furthest_point(&self, direction: FixVec2, arena: &VertexArena) -> FixVec2 {
        let dir = direction.normalized();
        let vertices = self.world_vertices(arena);
        let mut best = vertices[0];
        let mut best_dot = dir.dot(best);
        for v in &vertices[1..] {
            let d = dir.dot(*v);
            if d > best_dot {
                best = *v;
                best_dot = d;
            }
        }
        best
    }
}

/// Segment from `center_a` to `center_b` swept by a circle of `radius`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capsule {
    center: FixVec2,
    center_a: FixVec2,
    center_b: FixVec2,
    radius: Fix64,
}

impl Capsule {
    fn new(center_a: FixVec2, center_b: FixVec2, radius: Fix64) -> Self {
        let mut capsule = Capsule {
            center: FixVec2::ZERO,
            center_a,
            center_b,
            radius,
        };
        capsule.recenter();
        capsule
    }

    fn recenter(&mut self) {
        self.center = (self.center_a + self.center_b) * Fix64::HALF;
    }

    pub fn center(&self) -> FixVec2 {
        self.center
    }

    pub fn center_a(&self) -> FixVec2 {
        self.center_a
    }

    pub fn center_b(&self) -> FixVec2 {
        self.center_b
    }

    pub fn radius(&self) -> Fix64 {
        self.radius
    }

    fn furthest_point(&self, direction: FixVec2) -> FixVec2 {
        let end = if direction.dot(self.center_a - self.center) > Fix64::ZERO {
            self.center_a
        } else {
            self.center_b
        };
        end + direction.normalized() * self.radius
    }

    fn bounding_box(&self) -> Aabb {
        let r = FixVec2::new(self.radius, self.radius);
        Aabb::new(
            self.center_a.min(self.center_b) - r,
            self.center_a.max(self.center_b) + r,
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ShapeKind {
    Circle,
    Oval,
    Polygon,
    Capsule,
}

/// A registered shape. The variant never changes after creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    Circle(Circle),
    Oval(Oval),
    Polygon(Polygon),
    Capsule(Capsule),
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Circle(_) => ShapeKind::Circle,
            Shape::Oval(_) => ShapeKind::Oval,
            Shape::Polygon(_) => ShapeKind::Polygon,
            Shape::Capsule(_) => ShapeKind::Capsule,
        }
    }

    pub fn center(&self) -> FixVec2 {
        match self {
            Shape::Circle(c) => c.center,
            Shape::Oval(o) => o.center,
            Shape::Polygon(p) => p.center,
            Shape::Capsule(c) => c.center,
        }
    }

    /// Zero for circles and capsules.
    pub fn rotation(&self) -> Fix64 {
        match self {
            Shape::Oval(o) => o.rotation,
            Shape::Polygon(p) => p.rotation,
            Shape::Circle(_) | Shape::Capsule(_) => Fix64::ZERO,
        }
    }

    /// Point of the shape furthest along `direction`.
    pub fn furthest_point(&self, direction: FixVec2, arena: &VertexArena) -> FixVec2 {
        match self {
            Shape::Circle(c) => c.center + direction.normalized() * c.radius,
            Shape::Oval(o) => o.furthest_point(direction),
            Shape::Polygon(p) => p.furthest_point(direction, arena),
            Shape::Capsule(c) => c.furthest_point(direction),
        }
    }

    /// Exact for circles, capsules and polygons. Ovals use a square of the
    /// larger semi-axis.
    pub fn bounding_box(&self, arena: &VertexArena) -> Aabb {
        match self {
            Shape::Circle(c) => {
                Aabb::from_center_half(c.center, FixVec2::new(c.radius, c.radius))
            }
            Shape::Oval(o) => o.bounding_box(),
            Shape::Polygon(p) => Aabb::from_points(p.world_vertices(arena)),
            Shape::Capsule(c) => c.bounding_box(),
        }
    }

    /// Moves the shape so its center lands on `center`. Capsule endpoints are
    /// translated together.
    pub fn set_center(&mut self, center: FixVec2, arena: &mut VertexArena) {
        match self {
            Shape::Circle(c) => c.center = center,
            Shape::Oval(o) => o.center = center,
            Shape::Polygon(p) => {
                p.center = center;
                p.refresh(arena);
            }
            Shape::Capsule(c) => {
                let delta = center - c.center;
                c.center_a += delta;
                c.center_b += delta;
                c.recenter();
            }
        }
    }

    pub fn move_by(&mut self, delta: FixVec2, arena: &mut VertexArena) {
        let center = self.center() + delta;
        self.set_center(center, arena);
    }

    /// Only ovals and polygons carry a rotation; other variants ignore it.
    pub fn set_rotation(&mut self, rotation: Fix64, arena: &mut VertexArena) {
        match self {
            Shape::Oval(o) => o.rotation = rotation,
            Shape::Polygon(p) => {
                p.rotation = rotation;
                p.refresh(arena);
            }
            Shape::Circle(_) | Shape::Capsule(_) => {}
        }
    }

    /// Returns false when the shape is not an oval.
    pub fn set_oval_axis(&mut self, axis: FixVec2) -> ShapeResult<bool> {
        check_axis(axis)?;
        match self {
            Shape::Oval(o) => {
                o.set_axis(axis);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Returns false when the shape is not a capsule.
    pub fn set_capsule_centers(&mut self, center_a: FixVec2, center_b: FixVec2) -> bool {
        match self {
            Shape::Capsule(c) => {
                c.center_a = center_a;
                c.center_b = center_b;
                c.recenter();
                true
            }
            _ => false,
        }
    }

    pub fn as_polygon(&self) -> Option<&Polygon> {
        match self {
            Shape::Polygon(p) => Some(p),
            _ => None,
        }
    }

    /// Releases any arena storage. The shape must not be used afterwards.
    pub fn release(&self, arena: &mut VertexArena) {
        if let Shape::Polygon(p) = self {
            arena.release(p.vertex_start, p.vertex_count);
        }
    }
}

/// Creation parameters for a [`Shape`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ShapeDesc {
    Circle {
        center: FixVec2,
        radius: Fix64,
    },
    Oval {
        center: FixVec2,
        axis: FixVec2,
        rotation: Fix64,
    },
    Polygon {
        center: FixVec2,
        vertices: SmallVec<[FixVec2; 8]>,
        rotation: Fix64,
    },
    Capsule {
        center_a: FixVec2,
        center_b: FixVec2,
        radius: Fix64,
    },
}

impl ShapeDesc {
    pub fn circle(center: FixVec2, radius: Fix64) -> Self {
        ShapeDesc::Circle { center, radius }
    }

    pub fn oval(center: FixVec2, axis: FixVec2, rotation: Fix64) -> Self {
        ShapeDesc::Oval {
            center,
            axis,
            rotation,
        }
    }

    /// `vertices` are model-space offsets from `center`.
    pub fn polygon(center: FixVec2, vertices: &[FixVec2], rotation: Fix64) -> Self {
        ShapeDesc::Polygon {
            center,
            vertices: SmallVec::from_slice(vertices),
            rotation,
        }
    }

    /// Box of the given full width and height.
    pub fn rect(center: FixVec2, size: FixVec2, rotation: Fix64) -> Self {
        let a = size * Fix64::HALF;
        let b = FixVec2::new(a.x, -a.y);
        Self::polygon(center, &[-a, -b, a, b], rotation)
    }

    /// Rhombus with its corners on the axes.
    pub fn diamond(center: FixVec2, size: FixVec2, rotation: Fix64) -> Self {
        let b = FixVec2::new(size.x * Fix64::HALF, Fix64::ZERO);
        let c = FixVec2::new(Fix64::ZERO, size.y * Fix64::HALF);
        Self::polygon(center, &[-b, c, b, -c], rotation)
    }

    pub fn capsule(center_a: FixVec2, center_b: FixVec2, radius: Fix64) -> Self {
        ShapeDesc::Capsule {
            center_a,
            center_b,
            radius,
        }
    }

    pub fn validate(&self) -> ShapeResult<()> {
        match self {
            ShapeDesc::Circle { radius, .. } | ShapeDesc::Capsule { radius, .. } => {
                check_radius(*radius)
            }
            ShapeDesc::Oval { axis, .. } => check_axis(*axis),
            ShapeDesc::Polygon { vertices, .. } => {
                if vertices.is_empty() {
                    Err(ShapeError::EmptyPolygon)
                } else {
                    Ok(())
                }
            }
        }
    }

    /// Validates and builds the shape, reserving polygon storage in `arena`.
    pub fn build(&self, arena: &mut VertexArena) -> ShapeResult<Shape> {
        self.validate()?;
        let shape = match self {
            ShapeDesc::Circle { center, radius } => Shape::Circle(Circle {
                center: *center,
                radius: *radius,
            }),
            ShapeDesc::Oval {
                center,
                axis,
                rotation,
            } => Shape::Oval(Oval::new(*center, *axis, *rotation)),
            ShapeDesc::Polygon {
                center,
                vertices,
                rotation,
            } => {
                let polygon = Polygon {
                    center: *center,
                    rotation: *rotation,
                    vertex_start: arena.reserve(vertices),
                    vertex_count: vertices.len(),
                };
                polygon.refresh(arena);
                Shape::Polygon(polygon)
            }
            ShapeDesc::Capsule {
                center_a,
                center_b,
                radius,
            } => Shape::Capsule(Capsule::new(*center_a, *center_b, *radius)),
        };
        Ok(shape)
    }
}

fn check_radius(radius: Fix64) -> ShapeResult<()> {
    if radius.is_negative() {
        return Err(ShapeError::InvalidRadius { radius });
    }
    Ok(())
}

fn check_axis(axis: FixVec2) -> ShapeResult<()> {
    if axis.x.is_negative() || axis.y.is_negative() {
        return Err(ShapeError::InvalidAxis {
            a: axis.x,
            b: axis.y,
        });
    }
    Ok(())
}
