use common::{CollisionGroup, LinkedSlab, ShapeId, SlotHandle};
use fxhash::FxHashMap;
use smallvec::SmallVec;
use std::fmt;

/// A pair reported to a listener or receiver callback. `source` is the shape
/// the binding belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Contact {
    pub source: ShapeId,
    pub target: ShapeId,
}

pub type ContactCallback = Box<dyn FnMut(Contact)>;

/// Enter, stay and exit callbacks of one listener. Missing callbacks are
/// skipped.
#[derive(Default)]
pub struct ListenerCallbacks {
    pub(crate) on_enter: Option<ContactCallback>,
    pub(crate) on_stay: Option<ContactCallback>,
    pub(crate) on_exit: Option<ContactCallback>,
}

impl ListenerCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stay-only callbacks.
    pub fn stay(callback: impl FnMut(Contact) + 'static) -> Self {
        Self::new().on_stay(callback)
    }

    pub fn on_enter(mut self, callback: impl FnMut(Contact) + 'static) -> Self {
        self.on_enter = Some(Box::new(callback));
        self
    }

    pub fn on_stay(mut self, callback: impl FnMut(Contact) + 'static) -> Self {
        self.on_stay = Some(Box::new(callback));
        self
    }

    pub fn on_exit(mut self, callback: impl FnMut(Contact) + 'static) -> Self {
        self.on_exit = Some(Box::new(callback));
        self
    }
}

impl fmt::Debug for ListenerCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerCallbacks")
            .field("on_enter", &self.on_enter.is_some())
            .field("on_stay", &self.on_stay.is_some())
            .field("on_exit", &self.on_exit.is_some())
            .finish()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerHandle(pub(crate) SlotHandle);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ReceiverHandle(pub(crate) SlotHandle);

#[derive(Debug)]
pub(crate) struct ListenerBinding {
    pub(crate) source: ShapeId,
    /// Ascending, no duplicates.
    pub(crate) groups: SmallVec<[CollisionGroup; 4]>,
    pub(crate) callbacks: ListenerCallbacks,
    pub(crate) multi_match: bool,
    pub(crate) tracked: Option<ShapeId>,
}

impl ListenerBinding {
    pub(crate) fn new(
        source: ShapeId,
        groups: &[CollisionGroup],
        callbacks: ListenerCallbacks,
        multi_match: bool,
    ) -> Self {
        let mut groups: SmallVec<[CollisionGroup; 4]> = groups.iter().copied().collect();
        groups.sort_unstable();
        groups.dedup();
        ListenerBinding {
            source,
            groups,
            callbacks,
            multi_match,
            tracked: None,
        }
    }

    /// Feeds this frame's single match (or none) through the enter/stay/exit
    /// state machine.
    pub(crate) fn advance(&mut self, found: Option<ShapeId>) {
        let source = self.source;
        match (found, self.tracked) {
            (Some(target), tracked) => {
                if tracked.is_none() {
                    if let Some(enter) = &mut self.callbacks.on_enter {
                        enter(Contact { source, target });
                    }
                }
                if let Some(stay) = &mut self.callbacks.on_stay {
                    stay(Contact { source, target });
                }
                self.tracked = Some(target);
            }
            (None, Some(previous)) => {
                if let Some(exit) = &mut self.callbacks.on_exit {
                    exit(Contact {
                        source,
                        target: previous,
                    });
                }
                self.tracked = None;
            }
            (None, None) => {}
        }
    }

    pub(crate) fn stay(&mut self, target: ShapeId) {
        if let Some(stay) = &mut self.callbacks.on_stay {
            stay(Contact {
                source: self.source,
                target,
            });
        }
    }
}

pub(crate) struct ReceiverBinding {
    pub(crate) source: ShapeId,
    pub(crate) group: CollisionGroup,
    pub(crate) callback: ContactCallback,
}

impl fmt::Debug for ReceiverBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReceiverBinding")
            .field("source", &self.source)
            .field("group", &self.group)
            .finish()
    }
}

/// Listener and receiver bindings in registration order.
#[derive(Debug, Default)]
pub(crate) struct Bindings {
    pub(crate) listeners: LinkedSlab<ListenerBinding>,
    pub(crate) receivers: LinkedSlab<ReceiverBinding>,
    pub(crate) receiver_index: FxHashMap<(ShapeId, CollisionGroup), SlotHandle>,
}

impl Bindings {
    pub(crate) fn add_listener(&mut self, binding: ListenerBinding) -> ListenerHandle {
        ListenerHandle(self.listeners.push_back(binding))
    }

    pub(crate) fn remove_listener(&mut self, handle: ListenerHandle) -> bool {
        self.listeners.remove(handle.0).is_some()
    }

    pub(crate) fn remove_listeners_of(&mut self, source: ShapeId) -> usize {
        let doomed: Vec<SlotHandle> = self
            .listeners
            .iter()
            .filter(|(_, binding)| binding.source == source)
            .map(|(handle, _)| handle)
            .collect();
        for handle in &doomed {
            self.listeners.remove(*handle);
        }
        doomed.len()
    }

    /// Registers a receiver, replacing any previous one for the same source
    /// and group.
    pub(crate) fn add_receiver(&mut self, binding: ReceiverBinding) -> ReceiverHandle {
        let key = (binding.source, binding.group);
        if let Some(previous) = self.receiver_index.remove(&key) {
            self.receivers.remove(previous);
        }
        let handle = self.receivers.push_back(binding);
        self.receiver_index.insert(key, handle);
        ReceiverHandle(handle)
    }

    pub(crate) fn remove_receiver(&mut self, handle: ReceiverHandle) -> bool {
        let Some(binding) = self.receivers.remove(handle.0) else {
            return false;
        };
        let key = (binding.source, binding.group);
        if self.receiver_index.get(&key) == Some(&handle.0) {
            self.receiver_index.remove(&key);
        }
        true
    }

    pub(crate) fn remove_receivers_of(&mut self, source: ShapeId) -> usize {
        let mut removed = 0;
        for group in CollisionGroup::ALL {
            if let Some(handle) = self.receiver_index.remove(&(source, group)) {
                self.receivers.remove(handle);
                removed += 1;
            }
        }
        removed
    }
}
