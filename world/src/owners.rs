use common::ShapeId;
use fxhash::FxHashMap;

/// Maps shapes to whatever host object owns them, kept apart from the
/// shapes themselves.
#[derive(Debug, Clone)]
pub struct ShapeOwners<T> {
    owners: FxHashMap<ShapeId, T>,
}

impl<T> Default for ShapeOwners<T> {
    fn default() -> Self {
        ShapeOwners {
            owners: FxHashMap::default(),
        }
    }
}

impl<T> ShapeOwners<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the previous owner, if any.
    pub fn insert(&mut self, id: ShapeId, owner: T) -> Option<T> {
        self.owners.insert(id, owner)
    }

    pub fn get(&self, id: ShapeId) -> Option<&T> {
        self.owners.get(&id)
    }

    pub fn get_mut(&mut self, id: ShapeId) -> Option<&mut T> {
        self.owners.get_mut(&id)
    }

    pub fn remove(&mut self, id: ShapeId) -> Option<T> {
        self.owners.remove(&id)
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.owners.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    /// Drops owners whose shape no longer satisfies `alive`.
    pub fn retain_live(&mut self, mut alive: impl FnMut(ShapeId) -> bool) {
        self.owners.retain(|id, _| alive(*id));
    }
}
