//! Doubly linked lists whose nodes live in a shared arena.
//!
//! A [`LinkedList`] is only a head record (`first`, `last`, `len`). The nodes
//! themselves are owned by a [`ListPool`] and addressed through [`Handle`]s,
//! which stay valid until the node is released back to the pool. A node is
//! linked into at most one list at a time; the pool never needs to know which
//! one, the caller always passes the owning list explicitly. This keeps
//! splicing O(1) and leaves no aliasing between nodes and their lists.

use std::ops::{Index, IndexMut};

pub type Handle = usize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LinkedList {
    first: Option<Handle>,
    last: Option<Handle>,
    len: usize,
}

impl LinkedList {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn first(&self) -> Option<Handle> {
        self.first
    }

    #[inline(always)]
    pub fn last(&self) -> Option<Handle> {
        self.last
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[derive(Debug)]
struct Slot<T> {
    value: Option<T>,
    previous: Option<Handle>,
    next: Option<Handle>,
    linked: bool,
}

/// Arena of list nodes, released slots are recycled.
#[derive(Debug)]
pub struct ListPool<T> {
    slots: Vec<Slot<T>>,
    free: Vec<Handle>,
}

impl<T> Default for ListPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ListPool<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
        }
    }

    /// number of values currently allocated (linked or detached)
    pub fn num_allocated(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Stores `value` in a detached node.
    pub fn insert(&mut self, value: T) -> Handle {
        let slot = Slot {
            value: Some(value),
            previous: None,
            next: None,
            linked: false,
        };
        match self.free.pop() {
            Some(handle) => {
                self.slots[handle] = slot;
                handle
            }
            None => {
                self.slots.push(slot);
                self.slots.len() - 1
            }
        }
    }

    /// Releases a detached node and returns its value.
    pub fn release(&mut self, handle: Handle) -> T {
        let slot = &mut self.slots[handle];
        debug_assert!(!slot.linked, "releasing node {} while it is linked", handle);
        let value = slot
            .value
            .take()
            .unwrap_or_else(|| panic!("node {} was already released", handle));
        self.free.push(handle);
        value
    }

    #[inline(always)]
    pub fn is_live(&self, handle: Handle) -> bool {
        handle < self.slots.len() && self.slots[handle].value.is_some()
    }

    #[inline(always)]
    pub fn is_linked(&self, handle: Handle) -> bool {
        self.slots[handle].linked
    }

    #[inline(always)]
    pub fn next(&self, handle: Handle) -> Option<Handle> {
        self.slots[handle].next
    }

    #[inline(always)]
    pub fn previous(&self, handle: Handle) -> Option<Handle> {
        self.slots[handle].previous
    }

    /// Allocates a node for `value` and appends it to `list`.
    pub fn append(&mut self, list: &mut LinkedList, value: T) -> Handle {
        let handle = self.insert(value);
        self.link_back(list, handle);
        handle
    }

    /// Appends the detached node `handle` to `list`.
    pub fn link_back(&mut self, list: &mut LinkedList, handle: Handle) {
        debug_assert!(self.is_live(handle));
        debug_assert!(!self.slots[handle].linked, "node {} is already linked", handle);
        {
            let slot = &mut self.slots[handle];
            slot.previous = list.last;
            slot.next = None;
            slot.linked = true;
        }
        match list.last {
            Some(last) => self.slots[last].next = Some(handle),
            None => list.first = Some(handle),
        }
        list.last = Some(handle);
        list.len += 1;
    }

    /// Detaches `handle` from `list` in O(1), the node stays allocated.
    pub fn unlink(&mut self, list: &mut LinkedList, handle: Handle) {
        debug_assert!(self.slots[handle].linked, "node {} is not linked", handle);
        debug_assert!(list.len > 0);
        let (previous, next) = {
            let slot = &mut self.slots[handle];
            slot.linked = false;
            (slot.previous.take(), slot.next.take())
        };
        match previous {
            Some(previous) => self.slots[previous].next = next,
            None => {
                debug_assert_eq!(list.first, Some(handle), "node {} is not owned by this list", handle);
                list.first = next;
            }
        }
        match next {
            Some(next) => self.slots[next].previous = previous,
            None => {
                debug_assert_eq!(list.last, Some(handle), "node {} is not owned by this list", handle);
                list.last = previous;
            }
        }
        list.len -= 1;
    }

    /// Unlinks `handle` from `list` and releases it.
    pub fn remove(&mut self, list: &mut LinkedList, handle: Handle) -> T {
        self.unlink(list, handle);
        self.release(handle)
    }

    /// Moves every node of `source` to the end of `target`, `source` is left empty.
    pub fn splice(&mut self, target: &mut LinkedList, source: &mut LinkedList) {
        let moved = std::mem::take(source);
        let (Some(first), Some(last)) = (moved.first, moved.last) else {
            return;
        };
        match target.last {
            Some(tail) => {
                self.slots[tail].next = Some(first);
                self.slots[first].previous = Some(tail);
            }
            None => target.first = Some(first),
        }
        target.last = Some(last);
        target.len += moved.len;
    }

    /// Unlinks and releases all nodes whose value matches `predicate`.
    pub fn remove_all<F>(&mut self, list: &mut LinkedList, mut predicate: F) -> Vec<T>
    where
        F: FnMut(&T) -> bool,
    {
        let mut removed = Vec::new();
        let mut cursor = list.first;
        while let Some(handle) = cursor {
            cursor = self.slots[handle].next;
            if predicate(&self[handle]) {
                removed.push(self.remove(list, handle));
            }
        }
        removed
    }

    /// Releases every node of `list` and returns the values in list order.
    pub fn drain(&mut self, list: &mut LinkedList) -> Vec<T> {
        let mut values = Vec::with_capacity(list.len);
        let mut cursor = list.first;
        while let Some(handle) = cursor {
            let slot = &mut self.slots[handle];
            cursor = slot.next;
            slot.previous = None;
            slot.next = None;
            slot.linked = false;
            values.push(self.release(handle));
        }
        *list = LinkedList::default();
        values
    }

    pub fn handles<'a>(&'a self, list: &LinkedList) -> Handles<'a, T> {
        Handles {
            pool: self,
            cursor: list.first,
        }
    }

    pub fn iter<'a>(&'a self, list: &LinkedList) -> impl Iterator<Item = &'a T> + 'a {
        self.handles(list).map(move |handle| &self[handle])
    }

    /// O(n) ownership check, meant for assertions.
    pub fn contains(&self, list: &LinkedList, handle: Handle) -> bool {
        self.handles(list).any(|it| it == handle)
    }

    pub fn extend<I>(&mut self, list: &mut LinkedList, values: I)
    where
        I: IntoIterator<Item = T>,
    {
        for value in values {
            self.append(list, value);
        }
    }
}

impl<T: Clone> ListPool<T> {
    pub fn to_vec(&self, list: &LinkedList) -> Vec<T> {
        self.iter(list).cloned().collect()
    }
}

pub struct Handles<'a, T> {
    pool: &'a ListPool<T>,
    cursor: Option<Handle>,
}

impl<T> Iterator for Handles<'_, T> {
    type Item = Handle;

    fn next(&mut self) -> Option<Self::Item> {
        let handle = self.cursor?;
        self.cursor = self.pool.slots[handle].next;
        Some(handle)
    }
}

impl<T> Index<Handle> for ListPool<T> {
    type Output = T;

    #[inline(always)]
    fn index(&self, handle: Handle) -> &Self::Output {
        self.slots[handle]
            .value
            .as_ref()
            .unwrap_or_else(|| panic!("stale list handle {}", handle))
    }
}

impl<T> IndexMut<Handle> for ListPool<T> {
    #[inline(always)]
    fn index_mut(&mut self, handle: Handle) -> &mut Self::Output {
        self.slots[handle]
            .value
            .as_mut()
            .unwrap_or_else(|| panic!("stale list handle {}", handle))
    }
}
