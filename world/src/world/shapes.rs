use super::*;
use crate::store::ShapeRecord;
use common::{Aabb, CollisionGroup, Shape, ShapeDesc, VertexArena};
use fixmath::{Fix64, FixVec2};
use tracing::debug;

impl CollisionWorld {
    /// Builds and registers a shape. It starts enabled.
    pub fn add_shape(&mut self, desc: &ShapeDesc, group: CollisionGroup) -> CollisionResult<ShapeId> {
        desc.validate()?;
        let id = self.allocate_id();
        let store = self.store_mut();
        let shape = desc.build(store.arena_mut())?;
        let aabb = shape.bounding_box(store.arena());
        store.insert(
            id,
            ShapeRecord {
                shape,
                group,
                enabled: true,
                aabb,
            },
        );
        self.buckets.insert(group, id);
        if let Some(tree) = &mut self.quadtree {
            tree.insert(id, group, &aabb);
        }
        debug!(?id, ?group, kind = ?shape.kind(), "shape added");
        Ok(id)
    }

    /// Unregisters a shape, releases its vertices and drops every listener
    /// and receiver it owns.
    pub fn remove_shape(&mut self, id: ShapeId) -> bool {
        let Some(record) = self.store_mut().remove(id) else {
            debug_assert!(false, "remove_shape on unknown {:?}", id);
            return false;
        };
        self.buckets.remove(record.group, id);
        if let Some(tree) = &mut self.quadtree {
            tree.remove(id);
        }
        let listeners = self.bindings.remove_listeners_of(id);
        let receivers = self.bindings.remove_receivers_of(id);
        debug!(?id, listeners, receivers, "shape removed");
        true
    }

    pub fn set_center(&mut self, id: ShapeId, center: FixVec2) {
        self.mutate(id, "set_center", |shape, arena| shape.set_center(center, arena));
    }

    pub fn move_by(&mut self, id: ShapeId, delta: FixVec2) {
        self.mutate(id, "move_by", |shape, arena| shape.move_by(delta, arena));
    }

    /// Circles and capsules ignore rotation.
    pub fn set_rotation(&mut self, id: ShapeId, rotation: Fix64) {
        self.mutate(id, "set_rotation", |shape, arena| {
            shape.set_rotation(rotation, arena)
        });
    }

    /// Returns `Ok(false)` when the shape is not an oval.
    pub fn set_oval_axis(&mut self, id: ShapeId, axis: FixVec2) -> CollisionResult<bool> {
        match self.mutate(id, "set_oval_axis", |shape, _| shape.set_oval_axis(axis)) {
            Some(result) => Ok(result?),
            None => Ok(false),
        }
    }

    /// Returns false when the shape is not a capsule.
    pub fn set_capsule_centers(&mut self, id: ShapeId, center_a: FixVec2, center_b: FixVec2) -> bool {
        self.mutate(id, "set_capsule_centers", |shape, _| {
            shape.set_capsule_centers(center_a, center_b)
        })
        .unwrap_or(false)
    }

    /// Disabled shapes stay registered but never match and never fire
    /// callbacks.
    pub fn set_enabled(&mut self, id: ShapeId, enabled: bool) {
        match self.store_mut().get_mut(id) {
            Some(record) => record.enabled = enabled,
            None => debug_assert!(false, "set_enabled on unknown {:?}", id),
        }
    }

    pub fn set_group(&mut self, id: ShapeId, group: CollisionGroup) {
        let Some(record) = self.store_mut().get_mut(id) else {
            debug_assert!(false, "set_group on unknown {:?}", id);
            return;
        };
        let previous = std::mem::replace(&mut record.group, group);
        if previous == group {
            return;
        }
        self.buckets.remove(previous, id);
        self.buckets.insert(group, id);
        if let Some(tree) = &mut self.quadtree {
            tree.set_group(id, group);
        }
        debug!(?id, from = ?previous, to = ?group, "shape group changed");
    }

    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.store.get(id).map(|r| &r.shape)
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.store.get(id).is_some()
    }

    pub fn is_enabled(&self, id: ShapeId) -> bool {
        self.store.get(id).map_or(false, |r| r.enabled)
    }

    pub fn group_of(&self, id: ShapeId) -> Option<CollisionGroup> {
        self.store.get(id).map(|r| r.group)
    }

    pub fn bounding_box(&self, id: ShapeId) -> Option<Aabb> {
        self.store.get(id).map(|r| r.aabb)
    }

    pub fn vertex_arena(&self) -> &VertexArena {
        self.store.arena()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn group_len(&self, group: CollisionGroup) -> usize {
        self.buckets.len(group)
    }

    /// Runs `op` on the shape, then refreshes its bounding box and quadtree
    /// placement.
    fn mutate<R>(
        &mut self,
        id: ShapeId,
        name: &str,
        op: impl FnOnce(&mut Shape, &mut VertexArena) -> R,
    ) -> Option<R> {
        let Some((record, arena)) = self.store_mut().record_and_arena_mut(id) else {
            debug_assert!(false, "{} on unknown {:?}", name, id);
            return None;
        };
        let result = op(&mut record.shape, arena);
        record.aabb = record.shape.bounding_box(arena);
        let aabb = record.aabb;
        if let Some(tree) = &mut self.quadtree {
            tree.update(id, &aabb);
        }
        Some(result)
    }
}
