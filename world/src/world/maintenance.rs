use super::*;
use common::{Aabb, CollisionGroup, Shape};
use fixmath::FixVec2;
use tracing::info;

/// Read-only snapshot of one registered shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShapeDebug {
    pub id: ShapeId,
    pub group: CollisionGroup,
    pub enabled: bool,
    pub shape: Shape,
    pub aabb: Aabb,
    /// World-space vertices; empty unless the shape is a polygon.
    pub vertices: Vec<FixVec2>,
}

impl CollisionWorld {
    /// Repacks the vertex arena so live polygon slices are contiguous, in
    /// ascending id order. Returns the number of vertex slots reclaimed.
    pub fn compact_vertex_arena(&mut self) -> usize {
        let store = self.store_mut();
        let before = store.arena().len();
        let reclaimed = store.compact();
        info!(
            before,
            live = store.arena().len(),
            reclaimed,
            "vertex arena compacted"
        );
        reclaimed
    }

    /// Appends every registered shape to `out`, ascending by id.
    pub fn debug_shapes(&self, out: &mut Vec<ShapeDebug>) {
        let arena = self.store.arena();
        for id in self.store.sorted_ids() {
            let Some(record) = self.store.get(id) else {
                continue;
            };
            let vertices = record
                .shape
                .as_polygon()
                .map(|poly| poly.world_vertices(arena).to_vec())
                .unwrap_or_default();
            out.push(ShapeDebug {
                id,
                group: record.group,
                enabled: record.enabled,
                shape: record.shape,
                aabb: record.aabb,
                vertices,
            });
        }
    }
}
