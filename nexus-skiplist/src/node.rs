//! Node graph: per-level doubly-linked lists joined by vertical towers.
//!
//! ```text
//! Level 2:  F ─────────────────────► 50
//!           │                        │
//! Level 1:  F ────────► 20 ────────► 50
//!           │           │            │
//! Level 0:  F ──► 10 ──► 20 ──► 30 ──► 50 ──► 60
//! ```
//!
//! `F` is the sentinel ("front") column. Horizontal links run both ways
//! (`left`/`right`), vertical links join copies of the same key
//! (`up`/`down`). Only the level-0 node owns the entry; copies above it
//! refer back to that node by index.

use core::mem;

use crate::{Index, Storage};

/// A key/value pair, set once when its node is created.
///
/// Updates replace the whole entry rather than writing into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
}

impl<K, V> Entry<K, V> {
    #[inline]
    pub(crate) fn new(key: K, value: V) -> Self {
        Self { key, value }
    }
}

#[derive(Debug)]
enum Payload<K, V, Idx> {
    /// Sentinel at the start of a level.
    Front,
    /// Level-0 node; owns the entry.
    Entry(Entry<K, V>),
    /// Copy above level 0; holds the index of its level-0 node.
    Tower(Idx),
}

/// One appearance of an entry at one level, or a level's sentinel.
///
/// Nodes live in a [`Storage`] and link to each other by index.
#[derive(Debug)]
pub struct Node<K, V, Idx: Index> {
    level: u8,
    payload: Payload<K, V, Idx>,
    left: Idx,
    right: Idx,
    up: Idx,
    down: Idx,
}

impl<K, V, Idx: Index> Node<K, V, Idx> {
    fn unlinked(level: usize, payload: Payload<K, V, Idx>) -> Self {
        Self {
            level: level as u8,
            payload,
            left: Idx::NONE,
            right: Idx::NONE,
            up: Idx::NONE,
            down: Idx::NONE,
        }
    }

    /// Creates a sentinel for `level`.
    #[inline]
    pub(crate) fn front(level: usize) -> Self {
        Self::unlinked(level, Payload::Front)
    }

    /// Creates a level-0 node owning `entry`.
    #[inline]
    pub(crate) fn base(entry: Entry<K, V>) -> Self {
        Self::unlinked(0, Payload::Entry(entry))
    }

    /// Creates a copy at `level` of the entry owned by `base`.
    #[inline]
    pub(crate) fn tower(level: usize, base: Idx) -> Self {
        Self::unlinked(level, Payload::Tower(base))
    }

    /// Level this node sits on (0 is the bottom).
    #[inline]
    pub fn level(&self) -> usize {
        self.level as usize
    }

    /// Returns `true` for a level sentinel.
    #[inline]
    pub fn is_front(&self) -> bool {
        matches!(self.payload, Payload::Front)
    }

    #[inline]
    pub(crate) fn left(&self) -> Idx {
        self.left
    }

    #[inline]
    pub(crate) fn right(&self) -> Idx {
        self.right
    }

    #[inline]
    pub(crate) fn up(&self) -> Idx {
        self.up
    }

    #[inline]
    pub(crate) fn down(&self) -> Idx {
        self.down
    }

    /// Index of the level-0 node for a tower copy.
    #[inline]
    pub(crate) fn tower_base(&self) -> Option<Idx> {
        match self.payload {
            Payload::Tower(base) => Some(base),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn entry(&self) -> Option<&Entry<K, V>> {
        match &self.payload {
            Payload::Entry(entry) => Some(entry),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn entry_mut(&mut self) -> Option<&mut Entry<K, V>> {
        match &mut self.payload {
            Payload::Entry(entry) => Some(entry),
            _ => None,
        }
    }

    /// Swaps in a new entry, returning the old one.
    pub(crate) fn replace_entry(&mut self, entry: Entry<K, V>) -> Option<Entry<K, V>> {
        debug_assert!(self.entry().is_some(), "replacing entry of a non-base node");
        match mem::replace(&mut self.payload, Payload::Entry(entry)) {
            Payload::Entry(old) => Some(old),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn into_entry(self) -> Option<Entry<K, V>> {
        match self.payload {
            Payload::Entry(entry) => Some(entry),
            _ => None,
        }
    }

    #[cfg(test)]
    pub(crate) fn set_left(&mut self, left: Idx) {
        self.left = left;
    }

    // ========================================================================
    // Link operations
    // ========================================================================

    /// Splices `idx` into its level immediately right of `pred`.
    ///
    /// # Panics
    ///
    /// Panics if `pred` or `idx` is not valid in storage.
    pub(crate) fn link_after<S>(storage: &mut S, pred: Idx, idx: Idx)
    where
        S: Storage<Self, Index = Idx>,
    {
        let right = storage.get(pred).expect("invalid 'pred' index").right;

        let node = storage.get_mut(idx).expect("invalid index");
        node.left = pred;
        node.right = right;

        storage.get_mut(pred).expect("invalid 'pred' index").right = idx;
        if right.is_some() {
            storage.get_mut(right).expect("invalid right link").left = idx;
        }
    }

    /// Stacks `idx` directly on top of `below`.
    ///
    /// # Panics
    ///
    /// Panics if `below` or `idx` is not valid in storage.
    pub(crate) fn link_above<S>(storage: &mut S, below: Idx, idx: Idx)
    where
        S: Storage<Self, Index = Idx>,
    {
        storage.get_mut(below).expect("invalid 'below' index").up = idx;
        storage.get_mut(idx).expect("invalid index").down = below;
    }

    /// Detaches `idx` from all four neighbours.
    ///
    /// Neighbours on the same level are joined to each other; vertical
    /// neighbours lose their link to `idx`. The node stays in storage with
    /// every link cleared.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is not valid in storage.
    pub(crate) fn unlink<S>(storage: &mut S, idx: Idx)
    where
        S: Storage<Self, Index = Idx>,
    {
        let node = storage.get_mut(idx).expect("invalid index");
        let left = mem::replace(&mut node.left, Idx::NONE);
        let right = mem::replace(&mut node.right, Idx::NONE);
        let up = mem::replace(&mut node.up, Idx::NONE);
        let down = mem::replace(&mut node.down, Idx::NONE);

        if left.is_some() {
            storage.get_mut(left).expect("invalid left link").right = right;
        }
        if right.is_some() {
            storage.get_mut(right).expect("invalid right link").left = left;
        }
        if up.is_some() {
            storage.get_mut(up).expect("invalid up link").down = Idx::NONE;
        }
        if down.is_some() {
            storage.get_mut(down).expect("invalid down link").up = Idx::NONE;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestNode = Node<u64, &'static str, usize>;
    type TestStorage = slab::Slab<TestNode>;

    fn base(storage: &mut TestStorage, key: u64) -> usize {
        Storage::insert(storage, Node::base(Entry::new(key, "v")))
    }

    fn links(storage: &TestStorage, idx: usize) -> (usize, usize, usize, usize) {
        let node = &storage[idx];
        (node.left, node.right, node.up, node.down)
    }

    #[test]
    fn link_after_splices_between() {
        let mut storage = TestStorage::new();
        let front = Storage::insert(&mut storage, TestNode::front(0));
        let a = base(&mut storage, 1);
        let c = base(&mut storage, 3);

        TestNode::link_after(&mut storage, front, a);
        TestNode::link_after(&mut storage, a, c);

        let b = base(&mut storage, 2);
        TestNode::link_after(&mut storage, a, b);

        assert_eq!(storage[front].right, a);
        assert_eq!(links(&storage, a).1, b);
        assert_eq!(links(&storage, b), (a, c, usize::NONE, usize::NONE));
        assert_eq!(links(&storage, c).0, b);
    }

    #[test]
    fn link_after_at_end() {
        let mut storage = TestStorage::new();
        let front = Storage::insert(&mut storage, TestNode::front(0));
        let a = base(&mut storage, 1);

        TestNode::link_after(&mut storage, front, a);

        assert_eq!(links(&storage, a), (front, usize::NONE, usize::NONE, usize::NONE));
        assert!(storage[front].left.is_none());
    }

    #[test]
    fn link_above_joins_tower() {
        let mut storage = TestStorage::new();
        let a = base(&mut storage, 1);
        let copy = Storage::insert(&mut storage, TestNode::tower(1, a));

        TestNode::link_above(&mut storage, a, copy);

        assert_eq!(storage[a].up, copy);
        assert_eq!(storage[copy].down, a);
        assert_eq!(storage[copy].tower_base(), Some(a));
        assert_eq!(storage[copy].level(), 1);
    }

    #[test]
    fn unlink_clears_all_relations() {
        let mut storage = TestStorage::new();
        let front = Storage::insert(&mut storage, TestNode::front(0));
        let a = base(&mut storage, 1);
        let b = base(&mut storage, 2);
        let c = base(&mut storage, 3);
        TestNode::link_after(&mut storage, front, a);
        TestNode::link_after(&mut storage, a, b);
        TestNode::link_after(&mut storage, b, c);

        let copy = Storage::insert(&mut storage, TestNode::tower(1, b));
        TestNode::link_above(&mut storage, b, copy);

        TestNode::unlink(&mut storage, b);

        assert_eq!(links(&storage, b), (usize::NONE, usize::NONE, usize::NONE, usize::NONE));
        assert_eq!(storage[a].right, c);
        assert_eq!(storage[c].left, a);
        assert!(storage[copy].down.is_none());
    }

    #[test]
    fn payload_accessors() {
        let front = TestNode::front(2);
        assert!(front.is_front());
        assert!(front.entry().is_none());
        assert_eq!(front.level(), 2);

        let mut node = TestNode::base(Entry::new(7, "a"));
        assert!(!node.is_front());
        assert_eq!(node.entry().map(|e| e.key), Some(7));

        let old = node.replace_entry(Entry::new(7, "b"));
        assert_eq!(old, Some(Entry::new(7, "a")));
        assert_eq!(node.into_entry(), Some(Entry::new(7, "b")));
    }
}
