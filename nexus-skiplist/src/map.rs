//! Skip list map over a tower-linked node graph.
//!
//! Every public operation funnels through one search that drops down on
//! overshoot. It ends either on the level-0 node holding the key or on the
//! level-0 node the key would follow, so insertion splices in without a
//! second traversal.
//!
//! # Example
//!
//! ```rust
//! use nexus_skiplist::SkipMap;
//!
//! let mut map = SkipMap::new();
//! map.set(5u64, "five");
//! map.set(3, "three");
//! map.set(8, "eight");
//!
//! assert_eq!(map.get(&3), Some(&"three"));
//! assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![3, 5, 8]);
//!
//! assert_eq!(map.remove(&5), Some("five"));
//! assert!(!map.contains_key(&5));
//! ```

use core::borrow::Borrow;
use core::cmp::Ordering;
use core::fmt;
use core::marker::PhantomData;
use core::ops;

use log::{debug, trace};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand_core::RngCore;
use slab::Slab;

use crate::config::Builder;
use crate::error::{Error, InvariantError};
use crate::iter::{IntoIter, Iter, Keys, Values};
use crate::level::LevelGenerator;
use crate::node::{Entry, Node};
use crate::{Index, Storage};

/// Where a search ended.
enum Search<Idx> {
    /// Level-0 node holding the key.
    Found(Idx),
    /// Level-0 node the key would be inserted after.
    Vacant(Idx),
}

/// A probabilistic ordered map.
///
/// Entries live in level 0 in ascending key order. Each entry is promoted
/// into a random number of express levels above it, giving O(log n)
/// expected search, insertion, and removal.
///
/// # Type Parameters
///
/// - `K`: Key type, must implement `Ord`
/// - `V`: Value type
/// - `R`: Random number generator implementing [`RngCore`], defaults to [`SmallRng`]
/// - `Idx`: Node index type, defaults to `usize`
/// - `S`: Node storage implementing [`Storage`], defaults to `slab::Slab`
///
/// # Concurrency
///
/// All mutation goes through `&mut self`. Iterators borrow the map, so the
/// structure cannot change while an enumeration is in progress. Wrap the
/// map in a lock to share it across threads.
pub struct SkipMap<K, V, R = SmallRng, Idx: Index = usize, S = Slab<Node<K, V, Idx>>> {
    storage: S,
    /// Level-0 sentinel.
    head: Idx,
    /// Top-most sentinel.
    top: Idx,
    len: usize,
    levels: LevelGenerator<R>,
    _marker: PhantomData<(K, V)>,
}

impl<K: Ord, V> SkipMap<K, V> {
    /// Creates an empty map seeded from OS entropy.
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_os_rng())
    }

    /// Creates an empty map with a seeded RNG, for reproducible tower shapes.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(SmallRng::seed_from_u64(seed))
    }

    /// Returns a builder for configuring the promotion cap, seed and capacity.
    pub fn builder() -> Builder<K, V> {
        Builder::new()
    }
}

impl<K: Ord, V, R: RngCore> SkipMap<K, V, R> {
    /// Creates an empty map using `rng` for promotion.
    pub fn with_rng(rng: R) -> Self {
        Self::from_parts(LevelGenerator::new(rng), Slab::new())
    }
}

impl<K, V, R, Idx, S> SkipMap<K, V, R, Idx, S>
where
    K: Ord,
    R: RngCore,
    Idx: Index,
    S: Storage<Node<K, V, Idx>, Index = Idx>,
{
    /// Creates an empty map over `storage`.
    ///
    /// Anything already in `storage` is dropped.
    pub fn from_parts(levels: LevelGenerator<R>, mut storage: S) -> Self {
        storage.clear();
        let head = storage.insert(Node::front(0));
        Self {
            storage,
            head,
            top: head,
            len: 0,
            levels,
            _marker: PhantomData,
        }
    }

    /// Returns the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the map holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of levels in the sentinel tower, including level 0.
    ///
    /// Grows as promotions need it and never shrinks, except on [`clear`](Self::clear).
    #[inline]
    pub fn height(&self) -> usize {
        self.node(self.top).level() + 1
    }

    /// Returns the promotion cap.
    #[inline]
    pub fn max_level(&self) -> usize {
        self.levels.max_level()
    }

    /// Reserves node slots for at least `additional` more nodes.
    ///
    /// Each entry takes one node plus one per level it is promoted into,
    /// two on average.
    pub fn reserve(&mut self, additional: usize) {
        self.storage.reserve(additional);
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Returns a reference to the value for `key`, or `None` if absent.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match self.search(key) {
            Search::Found(idx) => self.node(idx).entry().map(|entry| &entry.value),
            Search::Vacant(_) => None,
        }
    }

    /// Returns a mutable reference to the value for `key`, or `None` if absent.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match self.search(key) {
            Search::Found(idx) => self.node_mut(idx).entry_mut().map(|entry| &mut entry.value),
            Search::Vacant(_) => None,
        }
    }

    /// Returns the value for `key`, failing with [`Error::KeyNotFound`] if absent.
    pub fn try_get<Q>(&self, key: &Q) -> Result<&V, Error>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get(key).ok_or(Error::KeyNotFound)
    }

    /// Returns a clone of the value for `key`, or `V::default()` if absent.
    pub fn get_or_default<Q>(&self, key: &Q) -> V
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
        V: Clone + Default,
    {
        self.get(key).cloned().unwrap_or_default()
    }

    /// Returns `true` if the map contains `key`.
    #[inline]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        matches!(self.search(key), Search::Found(_))
    }

    /// Returns the smallest entry.
    pub fn first(&self) -> Option<(&K, &V)> {
        self.entry_at(self.node(self.head).right())
    }

    /// Returns the largest entry.
    ///
    /// Runs along the top-most lane first, so this is O(log n) expected.
    pub fn last(&self) -> Option<(&K, &V)> {
        let mut current = self.top;
        loop {
            let node = self.node(current);
            if node.right().is_some() {
                current = node.right();
            } else if node.down().is_some() {
                current = node.down();
            } else {
                break;
            }
        }
        self.entry_at(current)
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Inserts or updates the entry for `key`.
    ///
    /// An existing entry is replaced in place and its old value returned;
    /// the tower is left as it is. A new entry is spliced into level 0 and
    /// promoted.
    pub fn set(&mut self, key: K, value: V) -> Option<V> {
        match self.search(&key) {
            Search::Found(idx) => {
                trace!("skiplist: replaced entry at node {}", idx.as_usize());
                self.node_mut(idx)
                    .replace_entry(Entry::new(key, value))
                    .map(|old| old.value)
            }
            Search::Vacant(pred) => {
                let idx = self.storage.insert(Node::base(Entry::new(key, value)));
                Node::<K, V, Idx>::link_after(&mut self.storage, pred, idx);
                self.len += 1;

                let levels = self.promote(idx);
                trace!(
                    "skiplist: inserted node {} with {} express levels (len {})",
                    idx.as_usize(),
                    levels,
                    self.len
                );
                None
            }
        }
    }

    /// Alias for [`set`](Self::set).
    #[inline]
    pub fn upsert(&mut self, key: K, value: V) -> Option<V> {
        self.set(key, value)
    }

    /// Removes the entry for `key`, returning its value if it was present.
    ///
    /// The tower is unlinked from level 0 upward and every node released.
    /// Sentinel levels left empty are kept.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let Search::Found(base) = self.search(key) else {
            return None;
        };

        let mut removed = None;
        let mut current = base;
        let mut levels = 0;
        while current.is_some() {
            let up = self.node(current).up();
            Node::<K, V, Idx>::unlink(&mut self.storage, current);
            let node = self.storage.remove(current).expect("invalid node index");
            if let Some(entry) = node.into_entry() {
                removed = Some(entry.value);
            }
            current = up;
            levels += 1;
        }
        self.len -= 1;

        trace!(
            "skiplist: removed node {} spanning {} levels (len {})",
            base.as_usize(),
            levels,
            self.len
        );
        removed
    }

    /// Removes every entry and resets the sentinel tower to a single level.
    pub fn clear(&mut self) {
        debug!(
            "skiplist: clearing {} entries across {} levels",
            self.len,
            self.height()
        );
        self.storage.clear();
        self.head = self.storage.insert(Node::front(0));
        self.top = self.head;
        self.len = 0;
    }

    // ========================================================================
    // Iteration
    // ========================================================================

    /// Returns an iterator over entries in ascending key order.
    ///
    /// Each call starts a fresh walk of level 0.
    #[inline]
    pub fn iter(&self) -> Iter<'_, K, V, Idx, S> {
        Iter::new(&self.storage, self.node(self.head).right(), self.len)
    }

    /// Alias for [`iter`](Self::iter).
    #[inline]
    pub fn entries(&self) -> Iter<'_, K, V, Idx, S> {
        self.iter()
    }

    /// Returns an iterator over keys in ascending order.
    #[inline]
    pub fn keys(&self) -> Keys<'_, K, V, Idx, S> {
        Keys::new(self.iter())
    }

    /// Returns an iterator over values in ascending key order.
    #[inline]
    pub fn values(&self) -> Values<'_, K, V, Idx, S> {
        Values::new(self.iter())
    }

    // ========================================================================
    // Diagnostics
    // ========================================================================

    /// Renders every level as `(front)->(k1,v1)->...->nil`, bottom level first.
    ///
    /// For diagnostics only; the format is not stable.
    pub fn levels(&self) -> Levels<'_, K, V, R, Idx, S> {
        Levels { map: self }
    }

    /// Same as `self.levels().to_string()`.
    pub fn to_debug_string(&self) -> String
    where
        K: fmt::Display,
        V: fmt::Display,
    {
        self.levels().to_string()
    }

    /// Walks the whole graph and reports the first broken invariant.
    ///
    /// Checks the sentinel column, strict key order and link symmetry on
    /// every level, that every tower node sits on a copy of the same key,
    /// that level 0 holds exactly `len()` entries, and that storage holds
    /// no unlinked nodes.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let mut front = self.head;
        let mut below = Idx::NONE;
        let mut level = 0;
        let mut linked = 0;

        while front.is_some() {
            let sentinel = self.node(front);
            if !sentinel.is_front()
                || sentinel.level() != level
                || sentinel.left().is_some()
                || sentinel.down() != below
            {
                return Err(InvariantError::Sentinel { level });
            }

            let mut count = 0;
            let mut prev = front;
            let mut current = sentinel.right();
            while current.is_some() {
                let node = self.node(current);
                let at = |node: Idx| (level, node.as_usize());

                if node.is_front() || node.level() != level {
                    let (level, node) = at(current);
                    return Err(InvariantError::BrokenTower { level, node });
                }
                if node.left() != prev {
                    let (level, node) = at(current);
                    return Err(InvariantError::BrokenLink { level, node });
                }
                if prev != front && self.key_of(prev) >= self.key_of(current) {
                    let (level, node) = at(current);
                    return Err(InvariantError::Unordered { level, node });
                }
                if node.up().is_some() && self.node(node.up()).down() != current {
                    let (level, node) = at(current);
                    return Err(InvariantError::BrokenLink { level, node });
                }

                let tower_ok = if level == 0 {
                    node.entry().is_some() && node.down().is_none()
                } else {
                    node.down().is_some()
                        && self.node(node.down()).up() == current
                        && node.tower_base() == Some(self.base_of(node.down()))
                };
                if !tower_ok {
                    let (level, node) = at(current);
                    return Err(InvariantError::BrokenTower { level, node });
                }

                count += 1;
                prev = current;
                current = node.right();
            }

            linked += count + 1;
            if level == 0 && count != self.len {
                return Err(InvariantError::CountMismatch {
                    expected: self.len,
                    actual: count,
                });
            }

            below = front;
            front = sentinel.up();
            level += 1;
        }

        if below != self.top {
            return Err(InvariantError::Sentinel { level });
        }
        let stored = self.storage.len();
        if stored != linked {
            return Err(InvariantError::Leaked { stored, linked });
        }
        Ok(())
    }

    // ========================================================================
    // Internal helpers
    // ========================================================================

    #[inline]
    fn node(&self, idx: Idx) -> &Node<K, V, Idx> {
        self.storage.get(idx).expect("invalid node index")
    }

    #[inline]
    fn node_mut(&mut self, idx: Idx) -> &mut Node<K, V, Idx> {
        self.storage.get_mut(idx).expect("invalid node index")
    }

    /// Level-0 node for any non-sentinel node.
    #[inline]
    fn base_of(&self, idx: Idx) -> Idx {
        self.node(idx).tower_base().unwrap_or(idx)
    }

    /// Entry shared by every node of a tower.
    #[inline]
    fn entry_of(&self, idx: Idx) -> &Entry<K, V> {
        self.node(self.base_of(idx))
            .entry()
            .expect("sentinel has no entry")
    }

    #[inline]
    fn key_of(&self, idx: Idx) -> &K {
        &self.entry_of(idx).key
    }

    fn entry_at(&self, idx: Idx) -> Option<(&K, &V)> {
        if idx.is_none() {
            return None;
        }
        self.node(idx)
            .entry()
            .map(|entry| (&entry.key, &entry.value))
    }

    /// Drops down on overshoot from the top-most sentinel.
    ///
    /// Ends on the level-0 node holding `key`, or on the level-0 node that
    /// would be its left neighbour.
    fn search<Q>(&self, key: &Q) -> Search<Idx>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.top;
        loop {
            let node = self.node(current);
            let right = node.right();
            let ord = if right.is_none() {
                Ordering::Greater
            } else {
                <K as Borrow<Q>>::borrow(self.key_of(right)).cmp(key)
            };

            match ord {
                Ordering::Less => current = right,
                Ordering::Greater => {
                    if node.down().is_none() {
                        return Search::Vacant(current);
                    }
                    current = node.down();
                }
                Ordering::Equal => return Search::Found(self.base_of(right)),
            }
        }
    }

    /// Builds the tower above a freshly linked level-0 node.
    ///
    /// Returns how many levels were added.
    fn promote(&mut self, base: Idx) -> usize {
        let levels = self.levels.next_level();

        let mut below = base;
        let mut walk = self.node(base).left();
        for level in 1..=levels {
            // Nearest node to the left that reaches the next level up.
            while self.node(walk).up().is_none() && !self.node(walk).is_front() {
                walk = self.node(walk).left();
            }
            if self.node(walk).up().is_none() {
                debug_assert!(walk == self.top);
                self.grow();
            }
            let pred = self.node(walk).up();

            let idx = self.storage.insert(Node::tower(level, base));
            Node::<K, V, Idx>::link_after(&mut self.storage, pred, idx);
            Node::<K, V, Idx>::link_above(&mut self.storage, below, idx);

            below = idx;
            walk = pred;
        }
        levels
    }

    /// Adds one sentinel on top of the tower.
    fn grow(&mut self) {
        let level = self.node(self.top).level() + 1;
        let idx = self.storage.insert(Node::front(level));
        Node::<K, V, Idx>::link_above(&mut self.storage, self.top, idx);
        self.top = idx;
        debug!("skiplist: sentinel tower grew to {} levels", level + 1);
    }

    pub(crate) fn into_parts(self) -> (S, Idx, usize) {
        let first = self.node(self.head).right();
        (self.storage, first, self.len)
    }
}

// ============================================================================
// Debug rendering
// ============================================================================

/// Per-level rendering returned by [`SkipMap::levels`].
pub struct Levels<'a, K, V, R, Idx: Index, S> {
    map: &'a SkipMap<K, V, R, Idx, S>,
}

impl<K, V, R, Idx, S> fmt::Display for Levels<'_, K, V, R, Idx, S>
where
    K: Ord + fmt::Display,
    V: fmt::Display,
    R: RngCore,
    Idx: Index,
    S: Storage<Node<K, V, Idx>, Index = Idx>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let map = self.map;
        let mut front = map.head;
        while front.is_some() {
            f.write_str("(front)->")?;
            let mut current = map.node(front).right();
            while current.is_some() {
                let entry = map.entry_of(current);
                write!(f, "({},{})->", entry.key, entry.value)?;
                current = map.node(current).right();
            }
            f.write_str("nil\n")?;
            front = map.node(front).up();
        }
        Ok(())
    }
}

// ============================================================================
// Trait impls
// ============================================================================

impl<K: Ord, V> Default for SkipMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, R, Idx, S> fmt::Debug for SkipMap<K, V, R, Idx, S>
where
    K: Ord + fmt::Debug,
    V: fmt::Debug,
    R: RngCore,
    Idx: Index,
    S: Storage<Node<K, V, Idx>, Index = Idx>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, R, Idx, S, Q> ops::Index<&Q> for SkipMap<K, V, R, Idx, S>
where
    K: Ord + Borrow<Q>,
    Q: Ord + ?Sized,
    R: RngCore,
    Idx: Index,
    S: Storage<Node<K, V, Idx>, Index = Idx>,
{
    type Output = V;

    /// # Panics
    ///
    /// Panics if `key` is absent.
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<K, V, R, Idx, S> PartialEq for SkipMap<K, V, R, Idx, S>
where
    K: Ord,
    V: PartialEq,
    R: RngCore,
    Idx: Index,
    S: Storage<Node<K, V, Idx>, Index = Idx>,
{
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<K, V, R, Idx, S> Eq for SkipMap<K, V, R, Idx, S>
where
    K: Ord,
    V: Eq,
    R: RngCore,
    Idx: Index,
    S: Storage<Node<K, V, Idx>, Index = Idx>,
{
}

impl<K, V, R, Idx, S> Extend<(K, V)> for SkipMap<K, V, R, Idx, S>
where
    K: Ord,
    R: RngCore,
    Idx: Index,
    S: Storage<Node<K, V, Idx>, Index = Idx>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for SkipMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<'a, K, V, R, Idx, S> IntoIterator for &'a SkipMap<K, V, R, Idx, S>
where
    K: Ord,
    R: RngCore,
    Idx: Index,
    S: Storage<Node<K, V, Idx>, Index = Idx>,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, Idx, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, R, Idx, S> IntoIterator for SkipMap<K, V, R, Idx, S>
where
    K: Ord,
    R: RngCore,
    Idx: Index,
    S: Storage<Node<K, V, Idx>, Index = Idx>,
{
    type Item = (K, V);
    type IntoIter = IntoIter<K, V, Idx, S>;

    fn into_iter(self) -> Self::IntoIter {
        let (storage, first, len) = self.into_parts();
        IntoIter::new(storage, first, len)
    }
}
