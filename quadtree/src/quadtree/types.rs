use super::*;
use smallvec::SmallVec;

/// Inclusive cell index range at one level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellRange {
    pub level: u32,
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl CellRange {
    /// The same range expressed at a coarser `level`.
    #[inline(always)]
    pub fn at_level(&self, level: u32) -> CellRange {
        debug_assert!(level <= self.level, "cannot refine a cell range");
        let shift = self.level - level;
        CellRange {
            level,
            min_x: self.min_x >> shift,
            min_y: self.min_y >> shift,
            max_x: self.max_x >> shift,
            max_y: self.max_y >> shift,
        }
    }

    #[inline(always)]
    pub fn contains(&self, other: &CellRange) -> bool {
        self.level == other.level
            && self.min_x <= other.min_x
            && self.min_y <= other.min_y
            && other.max_x <= self.max_x
            && other.max_y <= self.max_y
    }

    pub fn cell_count(&self) -> usize {
        (self.max_x - self.min_x + 1) as usize * (self.max_y - self.min_y + 1) as usize
    }

    pub(crate) fn keys(&self) -> impl Iterator<Item = CellKey> + '_ {
        (self.min_y..=self.max_y).flat_map(move |y| {
            (self.min_x..=self.max_x).map(move |x| CellKey {
                level: self.level,
                x,
                y,
            })
        })
    }
}

/// Where a shape currently lives in the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Placement {
    Cells(CellRange),
    Outside,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct CellKey {
    pub(crate) level: u32,
    pub(crate) y: u32,
    pub(crate) x: u32,
}

/// Per-group member lists of one cell, in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct GroupSets {
    groups: [SmallVec<[ShapeId; 4]>; CollisionGroup::COUNT],
}

impl GroupSets {
    #[inline(always)]
    pub(crate) fn members(&self, group: CollisionGroup) -> &[ShapeId] {
        &self.groups[group.index()]
    }

    pub(crate) fn insert(&mut self, group: CollisionGroup, id: ShapeId) {
        let set = &mut self.groups[group.index()];
        debug_assert!(!set.contains(&id), "{:?} already in cell", id);
        set.push(id);
    }

    pub(crate) fn remove(&mut self, group: CollisionGroup, id: ShapeId) -> bool {
        let set = &mut self.groups[group.index()];
        match set.iter().position(|x| *x == id) {
            Some(pos) => {
                set.remove(pos);
                true
            }
            None => false,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.groups.iter().all(|g| g.is_empty())
    }

    pub(crate) fn len(&self) -> usize {
        self.groups.iter().map(|g| g.len()).sum()
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct TreeEntry {
    pub(crate) group: CollisionGroup,
    pub(crate) placement: Placement,
}
