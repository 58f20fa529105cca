//! Slot storage for tree nodes.
//!
//! Nodes are stored in a `Vec` of slots and referenced by [`NodeId`]. Freed slots are pushed onto
//! a free list and handed out again by later allocations, so ids are stable for as long as the
//! node they name is alive.

use core::{fmt, ops};

/// Index of a node in an [`Arena`].
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

pub(crate) struct Arena<T> {
    slots: Vec<Option<T>>,
    free: Vec<u32>,
    len: usize,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Arena<T> {
        Arena {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Returns the number of live slots.
    #[inline]
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    #[cfg(test)]
    pub(crate) fn slots_allocated(&self) -> usize {
        self.slots.len()
    }

    /// Stores `item`, reusing a freed slot if one is available.
    pub(crate) fn alloc(&mut self, item: T) -> NodeId {
        self.len += 1;

        if let Some(idx) = self.free.pop() {
            let slot = &mut self.slots[idx as usize];
            debug_assert!(slot.is_none(), "free list names a live slot");
            *slot = Some(item);
            return NodeId(idx);
        }

        let idx = u32::try_from(self.slots.len()).expect("arena exceeded u32::MAX slots");
        self.slots.push(Some(item));
        NodeId(idx)
    }

    /// Removes and returns the item at `id`, returning its slot to the free list.
    pub(crate) fn free(&mut self, id: NodeId) -> T {
        let item = self.slots[id.index()]
            .take()
            .unwrap_or_else(|| panic!("double free of node {id:?}"));

        self.free.push(id.0);
        self.len -= 1;
        item
    }

    /// Returns mutable references to two distinct live slots.
    pub(crate) fn pair_mut(&mut self, a: NodeId, b: NodeId) -> (&mut T, &mut T) {
        assert_ne!(a, b, "`pair_mut` requires distinct ids");

        let (lo, hi, swapped) = if a < b { (a, b, false) } else { (b, a, true) };
        let (head, tail) = self.slots.split_at_mut(hi.index());
        let lo = head[lo.index()].as_mut().expect("stale node id");
        let hi = tail[0].as_mut().expect("stale node id");

        if swapped {
            (hi, lo)
        } else {
            (lo, hi)
        }
    }

    /// Drops every item and forgets all slots.
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.len = 0;
    }
}

impl<T> ops::Index<NodeId> for Arena<T> {
    type Output = T;

    #[inline]
    fn index(&self, id: NodeId) -> &T {
        match self.slots.get(id.index()) {
            Some(Some(item)) => item,
            _ => panic!("stale node id {id:?}"),
        }
    }
}

impl<T> ops::IndexMut<NodeId> for Arena<T> {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut T {
        match self.slots.get_mut(id.index()) {
            Some(Some(item)) => item,
            _ => panic!("stale node id {id:?}"),
        }
    }
}
