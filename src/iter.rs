use crate::node::{Link, NodeArena};
use std::iter::FusedIterator;

/// Level 0 walk over a [`SkipList`](crate::SkipList), in ascending key order.
pub struct Iter<'a, K, V> {
    arena: &'a NodeArena<K, V>,
    node: Link,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(arena: &'a NodeArena<K, V>, node: Link) -> Self {
        Self { arena, node }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.arena.get(self.node?);
        self.node = node.next(0);
        Some((node.key(), node.value()))
    }
}

impl<'a, K, V> FusedIterator for Iter<'a, K, V> {}
