use super::*;
use crate::listeners::{
    Contact, ListenerBinding, ListenerCallbacks, ListenerHandle, ReceiverBinding, ReceiverHandle,
};
use common::CollisionGroup;
use tracing::{debug, trace};

impl CollisionWorld {
    /// Watches `groups` for shapes colliding with `id`.
    ///
    /// Groups are visited in ascending order. In single-match mode each group's
    /// first match (or lack of one) is fed through enter, stay and exit, so a
    /// later group without a match ends the contact for that frame. In
    /// multi-match mode stay fires once per match and enter, exit and
    /// receivers are not used.
    pub fn add_listener(
        &mut self,
        id: ShapeId,
        groups: &[CollisionGroup],
        callbacks: ListenerCallbacks,
        multi_match: bool,
    ) -> ListenerHandle {
        debug_assert!(self.contains(id), "add_listener on unknown {:?}", id);
        let binding = ListenerBinding::new(id, groups, callbacks, multi_match);
        debug!(?id, groups = ?binding.groups, multi_match, "listener added");
        self.bindings.add_listener(binding)
    }

    /// Fires `callback` on `id` whenever a single-match listener of a shape
    /// in `group` matches `id`. The contact's target is the listening shape.
    /// Replaces any earlier receiver for the same shape and group.
    pub fn add_receiver(
        &mut self,
        id: ShapeId,
        group: CollisionGroup,
        callback: impl FnMut(Contact) + 'static,
    ) -> ReceiverHandle {
        debug_assert!(self.contains(id), "add_receiver on unknown {:?}", id);
        debug!(?id, ?group, "receiver added");
        self.bindings.add_receiver(ReceiverBinding {
            source: id,
            group,
            callback: Box::new(callback),
        })
    }

    pub fn remove_listener(&mut self, handle: ListenerHandle) -> bool {
        self.bindings.remove_listener(handle)
    }

    pub fn remove_receiver(&mut self, handle: ReceiverHandle) -> bool {
        self.bindings.remove_receiver(handle)
    }

    pub fn remove_listeners_of(&mut self, id: ShapeId) -> usize {
        let removed = self.bindings.remove_listeners_of(id);
        debug!(?id, removed, "listeners removed");
        removed
    }

    pub fn remove_receivers_of(&mut self, id: ShapeId) -> usize {
        let removed = self.bindings.remove_receivers_of(id);
        debug!(?id, removed, "receivers removed");
        removed
    }

    pub fn listener_count(&self) -> usize {
        self.bindings.listeners.len()
    }

    pub fn receiver_count(&self) -> usize {
        self.bindings.receivers.len()
    }

    /// Runs every listener once, in registration order. Call once per tick.
    pub fn traverse_listeners(&mut self) {
        self.buckets.invalidate_snapshots();
        // Detached while the queries below borrow the world.
        let mut bindings = std::mem::take(&mut self.bindings);
        let mut matches = Vec::new();
        let mut visited = 0usize;

        let mut cursor = bindings.listeners.first();
        while let Some(handle) = cursor {
            cursor = bindings.listeners.next(handle);
            let Some(binding) = bindings.listeners.get_mut(handle) else {
                continue;
            };
            let source = binding.source;
            let source_group = match self.store.get(source) {
                Some(record) if record.enabled => record.group,
                _ => continue,
            };
            visited += 1;

            if binding.multi_match {
                for i in 0..binding.groups.len() {
                    self.check_against_group_all(source, binding.groups[i], false, &mut matches);
                    for target in &matches {
                        binding.stay(*target);
                    }
                }
                continue;
            }

            for i in 0..binding.groups.len() {
                let found = self.check_against_group(source, binding.groups[i]);
                binding.advance(found);
                let Some(target) = found else {
                    continue;
                };
                // Field-level borrow; `binding` still holds the listener slab.
                let receiver = bindings
                    .receiver_index
                    .get(&(target, source_group))
                    .and_then(|handle| bindings.receivers.get_mut(*handle));
                if let Some(receiver) = receiver {
                    (receiver.callback)(Contact {
                        source: target,
                        target: source,
                    });
                }
            }
        }

        trace!(listeners = bindings.listeners.len(), visited, "listeners traversed");
        self.bindings = bindings;
    }
}
