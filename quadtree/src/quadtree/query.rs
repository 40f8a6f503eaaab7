use super::*;

impl QuadTree {
    /// Members of `group` sharing a cell with `aabb`, ascending and without
    /// duplicates. `out` is cleared first.
    pub fn query(&self, aabb: &Aabb, group: CollisionGroup, out: &mut Vec<ShapeId>) {
        out.clear();
        out.extend_from_slice(self.outside.members(group));
        if self.bounds().overlaps(aabb) {
            for level in 0..=self.config.max_depth {
                let occupied = self.occupied[level as usize];
                if occupied == 0 {
                    continue;
                }
                let range = self.range_at(aabb, level);
                if range.cell_count() <= occupied {
                    for key in range.keys() {
                        if let Some(cell) = self.cells.get(&key) {
                            out.extend_from_slice(cell.members(group));
                        }
                    }
                } else {
                    for (key, cell) in &self.cells {
                        if key.level == level
                            && (range.min_x..=range.max_x).contains(&key.x)
                            && (range.min_y..=range.max_y).contains(&key.y)
                        {
                            out.extend_from_slice(cell.members(group));
                        }
                    }
                }
            }
        }
        out.sort_unstable();
        out.dedup();
    }

    /// Bounding box of every occupied cell, ordered by level then row.
    pub fn all_cell_bounding_boxes(&self, boxes: &mut Vec<Aabb>) {
        let mut keys: Vec<CellKey> = self.cells.keys().copied().collect();
        keys.sort_unstable();
        let origin = self.config.origin;
        boxes.extend(keys.iter().map(|key| {
            let size = self.cell_raw(key.level);
            let min = fixmath::FixVec2::new(
                Fix64::from_raw(origin.x.raw() + size * key.x as i64),
                Fix64::from_raw(origin.y.raw() + size * key.y as i64),
            );
            let max = min + fixmath::FixVec2::new(Fix64::from_raw(size), Fix64::from_raw(size));
            Aabb::new(min, max)
        }));
    }

    /// Flattened `(cell, group, id)` membership, sorted, for inspection. Each
    /// cell is reported as a single-cell range.
    pub fn cell_members(&self, out: &mut Vec<(Placement, CollisionGroup, ShapeId)>) {
        for (key, cell) in &self.cells {
            let placement = Placement::Cells(CellRange {
                level: key.level,
                min_x: key.x,
                min_y: key.y,
                max_x: key.x,
                max_y: key.y,
            });
            for group in CollisionGroup::ALL {
                out.extend(cell.members(group).iter().map(|id| (placement, group, *id)));
            }
        }
        for group in CollisionGroup::ALL {
            out.extend(
                self.outside
                    .members(group)
                    .iter()
                    .map(|id| (Placement::Outside, group, *id)),
            );
        }
        out.sort_unstable_by_key(|(placement, group, id)| {
            let cell = match placement {
                Placement::Cells(r) => (0, r.level, r.min_y, r.min_x),
                Placement::Outside => (1, 0, 0, 0),
            };
            (cell, *group, *id)
        });
    }

    /// Total stored memberships, counting replicas.
    pub fn membership_count(&self) -> usize {
        self.outside.len() + self.cells.values().map(|c| c.len()).sum::<usize>()
    }
}
