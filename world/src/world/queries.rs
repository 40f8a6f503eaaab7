use super::*;
use crate::batch::{AllQuery, MinQuery};
use crate::store::ShapeRecord;
use common::CollisionGroup;
use std::ops::ControlFlow;

impl CollisionWorld {
    /// Narrow-phase test between two registered shapes, regardless of their
    /// enabled flags.
    pub fn check(&self, a: ShapeId, b: ShapeId) -> bool {
        let (Some(first), Some(second)) = (self.store.get(a), self.store.get(b)) else {
            debug_assert!(false, "check on unknown {:?} or {:?}", a, b);
            return false;
        };
        collisions::check(&first.shape, &second.shape, self.store.arena(), &self.gjk)
    }

    /// First enabled member of `group` colliding with `id`, in bucket order
    /// (ascending id with a quadtree). A disabled source never matches.
    pub fn check_against_group(&self, id: ShapeId, group: CollisionGroup) -> Option<ShapeId> {
        let Some(source) = self.store.get(id) else {
            debug_assert!(false, "check_against_group on unknown {:?}", id);
            return None;
        };
        if !source.enabled {
            return None;
        }
        let mut found = None;
        self.scan_group(id, source, group, |other, record| {
            if record.enabled && self.narrow(source, record) {
                found = Some(other);
                return ControlFlow::Break(());
            }
            ControlFlow::Continue(())
        });
        found
    }

    /// Every member of `group` colliding with `id`, written to `out` after
    /// clearing it. `force` ignores the enabled flags on both sides.
    pub fn check_against_group_all(
        &self,
        id: ShapeId,
        group: CollisionGroup,
        force: bool,
        out: &mut Vec<ShapeId>,
    ) {
        out.clear();
        let Some(source) = self.store.get(id) else {
            debug_assert!(false, "check_against_group_all on unknown {:?}", id);
            return;
        };
        if !force && !source.enabled {
            return;
        }
        self.scan_group(id, source, group, |other, record| {
            if (force || record.enabled) && self.narrow(source, record) {
                out.push(other);
            }
            ControlFlow::Continue(())
        });
    }

    /// Starts a parallel search for the smallest id in `group` colliding
    /// with `id`. The result does not depend on the chunk size.
    pub fn batch_find_min(&mut self, id: ShapeId, group: CollisionGroup) -> MinQuery {
        let source = match self.store.get(id) {
            Some(record) if record.enabled => record.shape,
            _ => return self.batch.empty_min(),
        };
        let candidates = self.buckets.snapshot(group);
        self.batch.find_min(
            Arc::clone(&self.store),
            (id, source),
            group,
            candidates,
            self.gjk,
        )
    }

    /// Starts a parallel search for every id in `group` colliding with `id`.
    pub fn batch_find_all(&mut self, id: ShapeId, group: CollisionGroup, sort: bool) -> AllQuery {
        let source = match self.store.get(id) {
            Some(record) if record.enabled => record.shape,
            _ => return self.batch.empty_all(),
        };
        let candidates = self.buckets.snapshot(group);
        self.batch.find_all(
            Arc::clone(&self.store),
            (id, source),
            group,
            candidates,
            self.gjk,
            sort,
        )
    }

    #[inline]
    fn narrow(&self, a: &ShapeRecord, b: &ShapeRecord) -> bool {
        collisions::check(&a.shape, &b.shape, self.store.arena(), &self.gjk)
    }

    /// Visits registered candidates of `group` for `source`, skipping the
    /// source itself.
    fn scan_group<F>(&self, id: ShapeId, source: &ShapeRecord, group: CollisionGroup, visit: F)
    where
        F: FnMut(ShapeId, &ShapeRecord) -> ControlFlow<()>,
    {
        match &self.quadtree {
            Some(tree) => {
                let mut candidates = Vec::new();
                tree.query(&source.aabb, group, &mut candidates);
                self.visit_candidates(id, candidates.into_iter(), visit);
            }
            None => self.visit_candidates(id, self.buckets.iter(group), visit),
        }
    }

    fn visit_candidates<I, F>(&self, id: ShapeId, candidates: I, mut visit: F)
    where
        I: Iterator<Item = ShapeId>,
        F: FnMut(ShapeId, &ShapeRecord) -> ControlFlow<()>,
    {
        for other in candidates {
            if other == id {
                continue;
            }
            let Some(record) = self.store.get(other) else {
                continue;
            };
            if visit(other, record).is_break() {
                return;
            }
        }
    }
}
