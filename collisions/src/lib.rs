//! Boolean overlap tests between two shapes.
//!
//! Circle pairs and circle/capsule pairs use closed-form tests; every other
//! pair runs 2D GJK over the shapes' support functions.

pub mod config;
pub mod fast_path;
pub mod gjk;

pub use config::GjkConfig;

use common::{Shape, VertexArena};

/// True when the shapes overlap or touch.
pub fn check(a: &Shape, b: &Shape, arena: &VertexArena, config: &GjkConfig) -> bool {
    match (a, b) {
        (Shape::Circle(x), Shape::Circle(y)) => fast_path::circle_circle(x, y),
        (Shape::Circle(c), Shape::Capsule(k)) | (Shape::Capsule(k), Shape::Circle(c)) => {
            fast_path::circle_capsule(c, k)
        }
        _ => gjk::intersects_ordered(a, b, arena, config.max_iterations),
    }
}
