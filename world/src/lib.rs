//! Collision registry built on the `collisions` narrow phase.
//!
//! Shapes are registered into a [`CollisionWorld`] under a
//! [`CollisionGroup`](common::CollisionGroup). Queries test one shape against
//! a whole group; listeners run such queries once per tick and the batch
//! engine spreads them over a worker pool.

pub mod batch;
mod buckets;
pub mod collider_set;
pub mod config;
pub mod error;
pub mod listeners;
pub mod owners;
mod store;
pub mod world;

pub use batch::{AllQuery, MinQuery};
pub use collider_set::ColliderSet;
pub use config::{BatchConfig, BroadPhase, WorldConfig};
pub use error::{CollisionError, CollisionResult};
pub use listeners::{Contact, ContactCallback, ListenerCallbacks, ListenerHandle, ReceiverHandle};
pub use owners::ShapeOwners;
pub use world::{CollisionWorld, ShapeDebug};

pub use collisions::GjkConfig;
pub use common::{Aabb, CollisionGroup, Shape, ShapeDesc, ShapeError, ShapeId};
pub use fixmath::{Fix64, FixVec2};
pub use quadtree::QuadTreeConfig;
