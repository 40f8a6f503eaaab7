use common::{CollisionGroup, LinkedSlab, ShapeId, SlotHandle};
use fxhash::FxHashMap;
use std::sync::Arc;

#[derive(Debug, Default)]
struct Bucket {
    order: LinkedSlab<ShapeId>,
    slots: FxHashMap<ShapeId, SlotHandle>,
    // Materialized member list handed to batch queries; dropped on change.
    snapshot: Option<Arc<[ShapeId]>>,
}

/// Every registered shape, grouped by collision group in insertion order.
#[derive(Debug, Default)]
pub(crate) struct GroupBuckets {
    buckets: [Bucket; CollisionGroup::COUNT],
}

impl GroupBuckets {
    pub(crate) fn insert(&mut self, group: CollisionGroup, id: ShapeId) {
        let bucket = &mut self.buckets[group.index()];
        if bucket.slots.contains_key(&id) {
            debug_assert!(false, "{:?} already in {:?}", id, group);
            return;
        }
        let handle = bucket.order.push_back(id);
        bucket.slots.insert(id, handle);
        bucket.snapshot = None;
    }

    pub(crate) fn remove(&mut self, group: CollisionGroup, id: ShapeId) -> bool {
        let bucket = &mut self.buckets[group.index()];
        match bucket.slots.remove(&id) {
            Some(handle) => {
                bucket.order.remove(handle);
                bucket.snapshot = None;
                true
            }
            None => false,
        }
    }

    pub(crate) fn iter(&self, group: CollisionGroup) -> impl Iterator<Item = ShapeId> + '_ {
        self.buckets[group.index()].order.iter().map(|(_, id)| *id)
    }

    pub(crate) fn len(&self, group: CollisionGroup) -> usize {
        self.buckets[group.index()].order.len()
    }

    /// Member list as a shared slice, built at most once between changes.
    pub(crate) fn snapshot(&mut self, group: CollisionGroup) -> Arc<[ShapeId]> {
        let bucket = &mut self.buckets[group.index()];
        if let Some(cached) = &bucket.snapshot {
            return Arc::clone(cached);
        }
        let members: Arc<[ShapeId]> = bucket.order.iter().map(|(_, id)| *id).collect();
        bucket.snapshot = Some(Arc::clone(&members));
        members
    }

    pub(crate) fn invalidate_snapshots(&mut self) {
        for bucket in &mut self.buckets {
            bucket.snapshot = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_is_cached_until_membership_changes() {
        let mut buckets = GroupBuckets::default();
        buckets.insert(CollisionGroup::Enemy, ShapeId(3));
        buckets.insert(CollisionGroup::Enemy, ShapeId(1));
        let first = buckets.snapshot(CollisionGroup::Enemy);
        assert_eq!(&first[..], &[ShapeId(3), ShapeId(1)]);
        assert!(Arc::ptr_eq(&first, &buckets.snapshot(CollisionGroup::Enemy)));

        buckets.insert(CollisionGroup::Hero, ShapeId(9));
        assert!(Arc::ptr_eq(&first, &buckets.snapshot(CollisionGroup::Enemy)));

        assert!(buckets.remove(CollisionGroup::Enemy, ShapeId(3)));
        assert!(!buckets.remove(CollisionGroup::Enemy, ShapeId(3)));
        let second = buckets.snapshot(CollisionGroup::Enemy);
        assert_eq!(&second[..], &[ShapeId(1)]);

        buckets.invalidate_snapshots();
        assert!(!Arc::ptr_eq(&second, &buckets.snapshot(CollisionGroup::Enemy)));
        assert_eq!(buckets.iter(CollisionGroup::Hero).collect::<Vec<_>>(), vec![ShapeId(9)]);
    }
}
