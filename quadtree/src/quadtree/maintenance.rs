use super::*;
use std::collections::hash_map::Entry;

impl QuadTree {
    pub fn new(config: QuadTreeConfig) -> QuadtreeResult<Self> {
        if config.cell_size <= Fix64::ZERO || config.cell_size.is_saturated() {
            return Err(QuadtreeError::InvalidCellSize {
                cell_size: config.cell_size,
            });
        }
        if config.max_depth > MAX_DEPTH_LIMIT {
            return Err(QuadtreeError::InvalidMaxDepth {
                max_depth: config.max_depth,
            });
        }
        let raw = config.cell_size.raw();
        let too_large = QuadtreeError::RootTooLarge {
            cell_size: config.cell_size,
            max_depth: config.max_depth,
        };
        if raw.leading_zeros() <= config.max_depth + 1 {
            return Err(too_large);
        }
        let root_size = Fix64::from_raw(raw << config.max_depth);
        let far = config.origin + fixmath::FixVec2::new(root_size, root_size);
        if far.x.is_saturated() || far.y.is_saturated() {
            return Err(too_large);
        }
        Ok(Self {
            config,
            root_size,
            cells: FxHashMap::default(),
            occupied: vec![0; config.max_depth as usize + 1],
            outside: GroupSets::default(),
            entries: FxHashMap::default(),
        })
    }

    pub fn config(&self) -> &QuadTreeConfig {
        &self.config
    }

    pub fn root_size(&self) -> Fix64 {
        self.root_size
    }

    pub fn bounds(&self) -> Aabb {
        let far = self.config.origin + fixmath::FixVec2::new(self.root_size, self.root_size);
        Aabb::new(self.config.origin, far)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn placement(&self, id: ShapeId) -> Option<Placement> {
        self.entries.get(&id).map(|e| e.placement)
    }

    #[inline(always)]
    pub(crate) fn cell_raw(&self, level: u32) -> i64 {
        self.config.cell_size.raw() << (self.config.max_depth - level)
    }

    /// Deepest level whose cell size is strictly larger than the box.
    pub fn level_for(&self, aabb: &Aabb) -> u32 {
        let extent = aabb.width().max(aabb.height()).raw();
        (0..=self.config.max_depth)
            .rev()
            .find(|&level| self.cell_raw(level) > extent)
            .unwrap_or(0)
    }

    #[inline(always)]
    fn cell_index(&self, coord: Fix64, origin: Fix64, level: u32) -> u32 {
        let last = (1i64 << level) - 1;
        let offset = coord.raw().saturating_sub(origin.raw());
        offset.div_euclid(self.cell_raw(level)).clamp(0, last) as u32
    }

    /// Cells covered by `aabb` at `level`, clamped to the grid. A max edge on a
    /// cell boundary also covers the cell after it.
    pub(crate) fn range_at(&self, aabb: &Aabb, level: u32) -> CellRange {
        let origin = self.config.origin;
        CellRange {
            level,
            min_x: self.cell_index(aabb.min.x, origin.x, level),
            min_y: self.cell_index(aabb.min.y, origin.y, level),
            max_x: self.cell_index(aabb.max.x, origin.x, level),
            max_y: self.cell_index(aabb.max.y, origin.y, level),
        }
    }

    pub fn placement_for(&self, aabb: &Aabb) -> Placement {
        if !self.bounds().contains(aabb) {
            return Placement::Outside;
        }
        Placement::Cells(self.range_at(aabb, self.level_for(aabb)))
    }

    pub fn insert(&mut self, id: ShapeId, group: CollisionGroup, aabb: &Aabb) {
        debug_assert!(!self.entries.contains_key(&id), "{:?} inserted twice", id);
        let placement = self.placement_for(aabb);
        self.attach(id, group, placement);
        self.entries.insert(id, TreeEntry { group, placement });
    }

    /// Re-evaluates a shape after its box changed. Returns true when the shape
    /// was moved to other cells; a box that still fits its previous cells is
    /// left where it is.
    pub fn update(&mut self, id: ShapeId, aabb: &Aabb) -> bool {
        let Some(entry) = self.entries.get(&id).copied() else {
            debug_assert!(false, "update of unknown {:?}", id);
            return false;
        };
        let next = self.placement_for(aabb);
        if covers(entry.placement, next) {
            return false;
        }
        self.detach(id, entry.group, entry.placement);
        self.attach(id, entry.group, next);
        self.entries.insert(
            id,
            TreeEntry {
                group: entry.group,
                placement: next,
            },
        );
        true
    }

    pub fn set_group(&mut self, id: ShapeId, group: CollisionGroup) {
        let Some(entry) = self.entries.get(&id).copied() else {
            debug_assert!(false, "set_group of unknown {:?}", id);
            return;
        };
        if entry.group == group {
            return;
        }
        self.detach(id, entry.group, entry.placement);
        self.attach(id, group, entry.placement);
        self.entries.insert(
            id,
            TreeEntry {
                group,
                placement: entry.placement,
            },
        );
    }

    pub fn remove(&mut self, id: ShapeId) -> bool {
        match self.entries.remove(&id) {
            Some(entry) => {
                self.detach(id, entry.group, entry.placement);
                true
            }
            None => false,
        }
    }

    fn attach(&mut self, id: ShapeId, group: CollisionGroup, placement: Placement) {
        let range = match placement {
            Placement::Outside => {
                self.outside.insert(group, id);
                return;
            }
            Placement::Cells(range) => range,
        };
        for key in range.keys() {
            match self.cells.entry(key) {
                Entry::Occupied(mut cell) => cell.get_mut().insert(group, id),
                Entry::Vacant(slot) => {
                    let mut cell = GroupSets::default();
                    cell.insert(group, id);
                    slot.insert(cell);
                    self.occupied[key.level as usize] += 1;
                }
            }
        }
    }

    fn detach(&mut self, id: ShapeId, group: CollisionGroup, placement: Placement) {
        let range = match placement {
            Placement::Outside => {
                self.outside.remove(group, id);
                return;
            }
            Placement::Cells(range) => range,
        };
        for key in range.keys() {
            let Some(cell) = self.cells.get_mut(&key) else {
                debug_assert!(false, "missing cell {:?} for {:?}", key, id);
                continue;
            };
            cell.remove(group, id);
            if cell.is_empty() {
                self.cells.remove(&key);
                self.occupied[key.level as usize] -= 1;
            }
        }
    }
}

/// True when shapes placed at `current` can stay put for `next`. Only an
/// equal or finer `next` can be covered.
fn covers(current: Placement, next: Placement) -> bool {
    match (current, next) {
        (Placement::Outside, Placement::Outside) => true,
        (Placement::Cells(cur), Placement::Cells(new)) => {
            new.level >= cur.level && cur.contains(&new.at_level(cur.level))
        }
        _ => false,
    }
}
