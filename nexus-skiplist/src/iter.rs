//! Level-0 iterators over a [`SkipMap`](crate::SkipMap).

use core::iter::FusedIterator;
use core::marker::PhantomData;

use crate::node::Node;
use crate::{Index, Storage};

/// An iterator over key-value pairs in ascending key order.
pub struct Iter<'a, K, V, Idx: Index, S> {
    storage: &'a S,
    current: Idx,
    remaining: usize,
    _marker: PhantomData<(&'a K, &'a V)>,
}

impl<'a, K, V, Idx, S> Iter<'a, K, V, Idx, S>
where
    Idx: Index,
    S: Storage<Node<K, V, Idx>, Index = Idx>,
{
    pub(crate) fn new(storage: &'a S, first: Idx, len: usize) -> Self {
        Self {
            storage,
            current: first,
            remaining: len,
            _marker: PhantomData,
        }
    }
}

impl<'a, K: 'a, V: 'a, Idx: 'a, S> Iterator for Iter<'a, K, V, Idx, S>
where
    Idx: Index,
    S: Storage<Node<K, V, Idx>, Index = Idx>,
{
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.current.is_none() {
            return None;
        }
        let node = self.storage.get(self.current).expect("invalid index");
        self.current = node.right();
        self.remaining -= 1;
        node.entry().map(|entry| (&entry.key, &entry.value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K: 'a, V: 'a, Idx: 'a, S> ExactSizeIterator for Iter<'a, K, V, Idx, S>
where
    Idx: Index,
    S: Storage<Node<K, V, Idx>, Index = Idx>,
{
}

impl<'a, K: 'a, V: 'a, Idx: 'a, S> FusedIterator for Iter<'a, K, V, Idx, S>
where
    Idx: Index,
    S: Storage<Node<K, V, Idx>, Index = Idx>,
{
}

impl<K, V, Idx: Index, S> Clone for Iter<'_, K, V, Idx, S> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage,
            current: self.current,
            remaining: self.remaining,
            _marker: PhantomData,
        }
    }
}

/// An iterator over keys in ascending order.
pub struct Keys<'a, K, V, Idx: Index, S> {
    inner: Iter<'a, K, V, Idx, S>,
}

impl<'a, K, V, Idx: Index, S> Keys<'a, K, V, Idx, S> {
    pub(crate) fn new(inner: Iter<'a, K, V, Idx, S>) -> Self {
        Self { inner }
    }
}

impl<K, V, Idx: Index, S> Clone for Keys<'_, K, V, Idx, S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K: 'a, V: 'a, Idx: 'a, S> Iterator for Keys<'a, K, V, Idx, S>
where
    Idx: Index,
    S: Storage<Node<K, V, Idx>, Index = Idx>,
{
    type Item = &'a K;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K: 'a, V: 'a, Idx: 'a, S> ExactSizeIterator for Keys<'a, K, V, Idx, S>
where
    Idx: Index,
    S: Storage<Node<K, V, Idx>, Index = Idx>,
{
}

impl<'a, K: 'a, V: 'a, Idx: 'a, S> FusedIterator for Keys<'a, K, V, Idx, S>
where
    Idx: Index,
    S: Storage<Node<K, V, Idx>, Index = Idx>,
{
}

/// An iterator over values in ascending key order.
pub struct Values<'a, K, V, Idx: Index, S> {
    inner: Iter<'a, K, V, Idx, S>,
}

impl<'a, K, V, Idx: Index, S> Values<'a, K, V, Idx, S> {
    pub(crate) fn new(inner: Iter<'a, K, V, Idx, S>) -> Self {
        Self { inner }
    }
}

impl<K, V, Idx: Index, S> Clone for Values<'_, K, V, Idx, S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K: 'a, V: 'a, Idx: 'a, S> Iterator for Values<'a, K, V, Idx, S>
where
    Idx: Index,
    S: Storage<Node<K, V, Idx>, Index = Idx>,
{
    type Item = &'a V;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K: 'a, V: 'a, Idx: 'a, S> ExactSizeIterator for Values<'a, K, V, Idx, S>
where
    Idx: Index,
    S: Storage<Node<K, V, Idx>, Index = Idx>,
{
}

impl<'a, K: 'a, V: 'a, Idx: 'a, S> FusedIterator for Values<'a, K, V, Idx, S>
where
    Idx: Index,
    S: Storage<Node<K, V, Idx>, Index = Idx>,
{
}

/// An owning iterator over key-value pairs in ascending key order.
///
/// Entries are moved out of storage as they are yielded. Tower nodes and
/// anything not yet yielded are dropped with the iterator.
pub struct IntoIter<K, V, Idx: Index, S> {
    storage: S,
    current: Idx,
    remaining: usize,
    _marker: PhantomData<(K, V)>,
}

impl<K, V, Idx, S> IntoIter<K, V, Idx, S>
where
    Idx: Index,
    S: Storage<Node<K, V, Idx>, Index = Idx>,
{
    pub(crate) fn new(storage: S, first: Idx, len: usize) -> Self {
        Self {
            storage,
            current: first,
            remaining: len,
            _marker: PhantomData,
        }
    }
}

impl<K, V, Idx, S> Iterator for IntoIter<K, V, Idx, S>
where
    Idx: Index,
    S: Storage<Node<K, V, Idx>, Index = Idx>,
{
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.current.is_none() {
            return None;
        }
        let node = self.storage.remove(self.current).expect("invalid index");
        self.current = node.right();
        self.remaining -= 1;
        node.into_entry().map(|entry| (entry.key, entry.value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V, Idx, S> ExactSizeIterator for IntoIter<K, V, Idx, S>
where
    Idx: Index,
    S: Storage<Node<K, V, Idx>, Index = Idx>,
{
}

impl<K, V, Idx, S> FusedIterator for IntoIter<K, V, Idx, S>
where
    Idx: Index,
    S: Storage<Node<K, V, Idx>, Index = Idx>,
{
}
