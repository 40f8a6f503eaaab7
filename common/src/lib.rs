pub mod aabb;
pub mod arena;
pub mod error;
pub mod shapes;
pub mod slab;
pub mod types;

pub use aabb::Aabb;
pub use arena::VertexArena;
pub use error::{ShapeError, ShapeResult};
pub use fixmath::{Fix64, FixVec2};
pub use shapes::{Capsule, Circle, Oval, Polygon, Shape, ShapeDesc, ShapeKind};
pub use slab::{LinkedSlab, SlotHandle};
pub use types::{CollisionGroup, ShapeId};
