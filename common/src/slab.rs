/// Handle into a [`LinkedSlab`]. The generation makes handles to removed
/// entries go stale instead of aliasing a reused slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SlotHandle {
    index: u32,
    generation: u32,
}

const NIL: u32 = u32::MAX;

#[derive(Clone, Debug)]
struct Slot<T> {
    value: Option<T>,
    generation: u32,
    prev: u32,
    next: u32,
}

/// Insertion-ordered arena with O(1) insert and remove.
///
/// Slots are recycled through a free list; live slots are threaded on a
/// doubly-linked index list so iteration follows insertion order.
#[derive(Clone, Debug)]
pub struct LinkedSlab<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    head: u32,
    tail: u32,
    len: usize,
}

impl<T> Default for LinkedSlab<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LinkedSlab<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: NIL,
            tail: NIL,
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Appends at the end of the iteration order.
    pub fn push_back(&mut self, value: T) -> SlotHandle {
        let index = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.value = Some(value);
                slot.prev = self.tail;
                slot.next = NIL;
                index
            }
            None => {
                let index = self.slots.len() as u32;
                debug_assert!(index != NIL, "slab index space exhausted");
                self.slots.push(Slot {
                    value: Some(value),
                    generation: 0,
                    prev: self.tail,
                    next: NIL,
                });
                index
            }
        };
        if self.tail == NIL {
            self.head = index;
        } else {
            self.slots[self.tail as usize].next = index;
        }
        self.tail = index;
        self.len += 1;
        SlotHandle {
            index,
            generation: self.slots[index as usize].generation,
        }
    }

    pub fn remove(&mut self, handle: SlotHandle) -> Option<T> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        let (prev, next) = (slot.prev, slot.next);
        if prev == NIL {
            self.head = next;
        } else {
            self.slots[prev as usize].next = next;
        }
        if next == NIL {
            self.tail = prev;
        } else {
            self.slots[next as usize].prev = prev;
        }
        self.free.push(handle.index);
        self.len -= 1;
        Some(value)
    }

    pub fn get(&self, handle: SlotHandle) -> Option<&T> {
        let slot = self.slots.get(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.value.as_ref()
    }

    pub fn get_mut(&mut self, handle: SlotHandle) -> Option<&mut T> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.value.as_mut()
    }

    pub fn contains(&self, handle: SlotHandle) -> bool {
        self.get(handle).is_some()
    }

    #[inline(always)]
    fn handle_at(&self, index: u32) -> Option<SlotHandle> {
        if index == NIL {
            return None;
        }
        Some(SlotHandle {
            index,
            generation: self.slots[index as usize].generation,
        })
    }

    pub fn first(&self) -> Option<SlotHandle> {
        self.handle_at(self.head)
    }

    /// Successor in insertion order. A stale handle has no successor.
    pub fn next(&self, handle: SlotHandle) -> Option<SlotHandle> {
        let slot = self.slots.get(handle.index as usize)?;
        if slot.generation != handle.generation || slot.value.is_none() {
            return None;
        }
        self.handle_at(slot.next)
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            slab: self,
            cursor: self.head,
        }
    }

    pub fn clear(&mut self) {
        let mut cursor = self.head;
        while cursor != NIL {
            let slot = &mut self.slots[cursor as usize];
            slot.value = None;
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(cursor);
            cursor = slot.next;
        }
        self.head = NIL;
        self.tail = NIL;
        self.len = 0;
    }
}

pub struct Iter<'a, T> {
    slab: &'a LinkedSlab<T>,
    cursor: u32,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (SlotHandle, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor == NIL {
            return None;
        }
        let index = self.cursor;
        let slot = &self.slab.slots[index as usize];
        self.cursor = slot.next;
        let value = slot.value.as_ref()?;
        Some((
            SlotHandle {
                index,
                generation: slot.generation,
            },
            value,
        ))
    }
}
