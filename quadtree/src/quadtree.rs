//! Grid-level quadtree over fixed-point AABBs.
//!
//! Level `d` splits the root into `2^d x 2^d` cells. A shape is stored at the
//! deepest level whose cells are strictly larger than the shape, replicated
//! into every cell its box covers. Boxes that leave the world go to a single
//! catch-all bucket that every query visits.

mod config;
mod maintenance;
mod query;
mod types;

pub use config::QuadTreeConfig;
pub use types::{CellRange, Placement};

use crate::error::{QuadtreeError, QuadtreeResult};
use common::{Aabb, CollisionGroup, ShapeId};
use fixmath::Fix64;
use fxhash::FxHashMap;
use types::{CellKey, GroupSets, TreeEntry};

pub(crate) const MAX_DEPTH_LIMIT: u32 = 16;

pub struct QuadTree {
    config: QuadTreeConfig,
    root_size: Fix64,
    cells: FxHashMap<CellKey, GroupSets>,
    // Occupied cell count per level, used to pick the cheaper query scan.
    occupied: Vec<usize>,
    outside: GroupSets,
    entries: FxHashMap<ShapeId, TreeEntry>,
}
