use common::{Aabb, CollisionGroup, Shape, ShapeId, VertexArena};
use fxhash::FxHashMap;

/// A registered shape plus the bookkeeping the world keeps for it.
#[derive(Clone, Debug)]
pub struct ShapeRecord {
    pub shape: Shape,
    pub group: CollisionGroup,
    pub enabled: bool,
    pub aabb: Aabb,
}

/// Id to shape map together with the vertex arena the polygons point into.
/// Batch workers read it through a shared snapshot.
#[derive(Clone, Debug, Default)]
pub struct ShapeStore {
    records: FxHashMap<ShapeId, ShapeRecord>,
    arena: VertexArena,
}

impl ShapeStore {
    pub fn get(&self, id: ShapeId) -> Option<&ShapeRecord> {
        self.records.get(&id)
    }

    pub fn arena(&self) -> &VertexArena {
        &self.arena
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Ids in ascending order.
    pub fn sorted_ids(&self) -> Vec<ShapeId> {
        let mut ids: Vec<ShapeId> = self.records.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub(crate) fn arena_mut(&mut self) -> &mut VertexArena {
        &mut self.arena
    }

    pub(crate) fn get_mut(&mut self, id: ShapeId) -> Option<&mut ShapeRecord> {
        self.records.get_mut(&id)
    }

    /// Record and arena borrowed together, for mutations that rewrite
    /// polygon vertices.
    pub(crate) fn record_and_arena_mut(
        &mut self,
        id: ShapeId,
    ) -> Option<(&mut ShapeRecord, &mut VertexArena)> {
        let record = self.records.get_mut(&id)?;
        Some((record, &mut self.arena))
    }

    pub(crate) fn insert(&mut self, id: ShapeId, record: ShapeRecord) {
        let previous = self.records.insert(id, record);
        debug_assert!(previous.is_none(), "{:?} registered twice", id);
    }

    /// Drops the record and releases its vertex slice.
    pub(crate) fn remove(&mut self, id: ShapeId) -> Option<ShapeRecord> {
        let record = self.records.remove(&id)?;
        record.shape.release(&mut self.arena);
        Some(record)
    }

    /// Packs live polygon slices in ascending id order. Returns the number of
    /// vertex slots reclaimed.
    pub(crate) fn compact(&mut self) -> usize {
        let mut polygons: Vec<_> = self
            .records
            .iter_mut()
            .filter_map(|(id, record)| match &mut record.shape {
                Shape::Polygon(poly) => Some((*id, poly)),
                _ => None,
            })
            .collect();
        polygons.sort_unstable_by_key(|(id, _)| *id);
        self.arena
            .compact(polygons.into_iter().map(|(_, poly)| poly.slice_mut()))
    }
}
