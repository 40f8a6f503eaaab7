use crate::error::CollisionResult;
use crate::listeners::{ListenerCallbacks, ListenerHandle};
use crate::world::CollisionWorld;
use common::{CollisionGroup, ShapeDesc, ShapeId};
use fixmath::FixVec2;
use tracing::warn;

/// Several shapes of one game object moved, toggled and torn down together.
///
/// Every call after [`destroy`](ColliderSet::destroy) is logged and ignored.
#[derive(Debug, Default)]
pub struct ColliderSet {
    shapes: Vec<ShapeId>,
    destroyed: bool,
}

impl ColliderSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shapes(&self) -> &[ShapeId] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn usable(&self, op: &str) -> bool {
        if self.destroyed {
            warn!(op, "collider set used after destroy");
        }
        !self.destroyed
    }

    /// Registers a new shape in `world` and adds it to the set.
    pub fn spawn(
        &mut self,
        world: &mut CollisionWorld,
        desc: &ShapeDesc,
        group: CollisionGroup,
    ) -> CollisionResult<Option<ShapeId>> {
        if !self.usable("spawn") {
            return Ok(None);
        }
        let id = world.add_shape(desc, group)?;
        self.shapes.push(id);
        Ok(Some(id))
    }

    /// Adds an already registered shape. Returns false when it was already in
    /// the set.
    pub fn append(&mut self, id: ShapeId) -> bool {
        if !self.usable("append") || self.shapes.contains(&id) {
            return false;
        }
        self.shapes.push(id);
        true
    }

    /// Removes `count` shapes starting at `start` from the set and from the
    /// world, together with their listeners and receivers.
    pub fn remove_range(&mut self, world: &mut CollisionWorld, start: usize, count: usize) {
        if !self.usable("remove_range") {
            return;
        }
        let end = (start + count).min(self.shapes.len());
        for id in self.shapes.drain(start.min(end)..end) {
            if world.contains(id) {
                world.remove_shape(id);
            }
        }
    }

    pub fn set_center(&self, world: &mut CollisionWorld, center: FixVec2) {
        if self.usable("set_center") {
            for id in &self.shapes {
                world.set_center(*id, center);
            }
        }
    }

    pub fn move_by(&self, world: &mut CollisionWorld, delta: FixVec2) {
        if self.usable("move_by") {
            for id in &self.shapes {
                world.move_by(*id, delta);
            }
        }
    }

    pub fn set_enabled(&self, world: &mut CollisionWorld, enabled: bool) {
        if self.usable("set_enabled") {
            for id in &self.shapes {
                world.set_enabled(*id, enabled);
            }
        }
    }

    /// Adds one listener per shape; `callbacks` builds each shape's set.
    pub fn add_listener<F>(
        &self,
        world: &mut CollisionWorld,
        groups: &[CollisionGroup],
        multi_match: bool,
        mut callbacks: F,
    ) -> Vec<ListenerHandle>
    where
        F: FnMut(ShapeId) -> ListenerCallbacks,
    {
        if !self.usable("add_listener") {
            return Vec::new();
        }
        self.shapes
            .iter()
            .map(|id| world.add_listener(*id, groups, callbacks(*id), multi_match))
            .collect()
    }

    /// Removes every shape of the set from the world along with their
    /// bindings. Later calls are no-ops.
    pub fn destroy(&mut self, world: &mut CollisionWorld) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        for id in self.shapes.drain(..) {
            if world.contains(id) {
                world.remove_shape(id);
            }
        }
    }
}
