use crate::iter::Iter;
use crate::level::LevelGenerator;
use crate::node::{Link, Node, NodeArena, NodeId};
use crate::options::{SkipListOptions, MAX_LEVEL_LIMIT};
use arrayvec::ArrayVec;
use rand::prelude::StdRng;
use rand::{Rng, SeedableRng};
use std::borrow::Borrow;
use std::fmt::{Debug, Formatter};

/// Where a traversal stands: on the head sentinel or on a node.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Pos {
    Head,
    Node(NodeId),
}

type Prevs = ArrayVec<Pos, MAX_LEVEL_LIMIT>;

/// An ordered map backed by a probabilistic skip list.
///
/// Nodes are stored in an index arena; every node owns one forward link per
/// level it takes part in. The head sentinel is the `head` link vector, whose
/// length is the current height of the list.
///
/// The list is not synchronized. Shared use across threads needs an external
/// lock around every call.
pub struct SkipList<K, V, R = StdRng> {
    arena: NodeArena<K, V>,
    head: Vec<Link>,
    levels: LevelGenerator<R>,
    len: usize,
}

impl<K, V> SkipList<K, V, StdRng> {
    /// Creates an empty list with the default options and an entropy seeded
    /// generator.
    pub fn new() -> Self {
        let opts = SkipListOptions::default();
        Self::from_parts(
            StdRng::from_entropy(),
            opts.max_level,
            opts.probability,
        )
    }

    pub fn with_options(opts: SkipListOptions) -> crate::Result<Self> {
        opts.validate()?;
        let rand = match opts.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self::from_parts(rand, opts.max_level, opts.probability))
    }
}

impl<K, V> Default for SkipList<K, V, StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, R> SkipList<K, V, R> {
    fn from_parts(rand: R, max_level: usize, probability: f64) -> Self {
        Self {
            arena: NodeArena::new(),
            head: vec![],
            levels: LevelGenerator::new(rand, max_level, probability),
            len: 0,
        }
    }

    /// Number of live keys.
    pub fn size(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current height of the list, `0` when empty.
    pub fn level(&self) -> usize {
        self.head.len()
    }

    /// Highest level a node can be drawn with.
    pub fn max_level(&self) -> usize {
        self.levels.max_level()
    }

    /// Drops every entry. The level generator keeps its state.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.head.clear();
        self.len = 0;
    }

    pub fn first(&self) -> Option<(&K, &V)> {
        self.head
            .first()
            .copied()
            .flatten()
            .map(|id| self.entry(id))
    }

    pub fn last(&self) -> Option<(&K, &V)> {
        match self.find_last() {
            Pos::Head => None,
            Pos::Node(id) => Some(self.entry(id)),
        }
    }

    /// Entries in ascending key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.arena, self.head.first().copied().flatten())
    }

    fn entry(&self, id: NodeId) -> (&K, &V) {
        let node = self.arena.get(id);
        (node.key(), node.value())
    }

    fn next(&self, pos: Pos, level: usize) -> Link {
        match pos {
            Pos::Head => self.head[level],
            Pos::Node(id) => self.arena.get(id).next(level),
        }
    }

    fn set_next(&mut self, pos: Pos, level: usize, link: Link) {
        match pos {
            Pos::Head => self.head[level] = link,
            Pos::Node(id) => self.arena.get_mut(id).set_next(level, link),
        }
    }

    fn find_last(&self) -> Pos {
        let mut current = Pos::Head;
        for level in (0..self.level()).rev() {
            while let Some(next) = self.next(current, level) {
                current = Pos::Node(next);
            }
        }
        current
    }
}

impl<K, V, R> SkipList<K, V, R>
where
    K: Ord,
{
    pub fn search<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_equal(key).map(|id| self.arena.get(id).value())
    }

    pub fn search_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let id = self.find_equal(key)?;
        Some(self.arena.get_mut(id).value_mut())
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_equal(key).is_some()
    }

    /// Entries with a key greater than or equal to `key`, in ascending order.
    pub fn iter_from<Q>(&self, key: &Q) -> Iter<'_, K, V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Iter::new(&self.arena, self.find_greater_or_equal(key))
    }

    fn key_lt<Q>(&self, id: NodeId, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Borrow::<Q>::borrow(self.arena.get(id).key()) < key
    }

    fn key_eq<Q>(&self, id: NodeId, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Borrow::<Q>::borrow(self.arena.get(id).key()) == key
    }

    /// Walks down from the top level and returns the last position before
    /// `key` on every level, indexed by level, together with the level 0
    /// successor of that position.
    fn find_prevs<Q>(&self, key: &Q) -> (Prevs, Link)
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut prevs: Prevs = (0..self.level()).map(|_| Pos::Head).collect();
        let mut current = Pos::Head;
        for level in (0..self.level()).rev() {
            while let Some(next) = self.next(current, level) {
                if !self.key_lt(next, key) {
                    break;
                }
                current = Pos::Node(next);
            }
            prevs[level] = current;
        }
        let succ = if self.head.is_empty() {
            None
        } else {
            self.next(current, 0)
        };
        (prevs, succ)
    }

    fn find_greater_or_equal<Q>(&self, key: &Q) -> Link
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = Pos::Head;
        let mut found = None;
        for level in (0..self.level()).rev() {
            found = None;
            while let Some(next) = self.next(current, level) {
                if !self.key_lt(next, key) {
                    found = Some(next);
                    break;
                }
                current = Pos::Node(next);
            }
        }
        found
    }

    fn find_equal<Q>(&self, key: &Q) -> Link
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_greater_or_equal(key)
            .filter(|id| self.key_eq(*id, key))
    }
}

impl<K, V, R> SkipList<K, V, R>
where
    K: Ord,
    R: Rng,
{
    /// Creates an empty list drawing node levels from `rand`. The seed in
    /// `opts` is ignored.
    pub fn with_rng(opts: SkipListOptions, rand: R) -> crate::Result<Self> {
        opts.validate()?;
        Ok(Self::from_parts(rand, opts.max_level, opts.probability))
    }

    /// Inserts `value` under `key`, replacing and returning the previous value
    /// when the key is already present.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let (mut prevs, succ) = self.find_prevs(&key);
        if let Some(id) = succ {
            let node = self.arena.get_mut(id);
            if *node.key() == key {
                return Some(node.set_value(value));
            }
        }

        let height = self.levels.random_level();
        let current_height = self.level();
        if height > current_height {
            self.head.resize(height, None);
            prevs.extend((current_height..height).map(|_| Pos::Head));
        }

        let id = self.arena.alloc(Node::new(key, value, height));
        for (level, prev) in prevs.iter().take(height).enumerate() {
            let next = self.next(*prev, level);
            self.arena.get_mut(id).set_next(level, next);
            self.set_next(*prev, level, Some(id));
        }

        self.len += 1;
        None
    }

    /// Removes `key`, returning its value if it was present.
    pub fn delete<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let (prevs, succ) = self.find_prevs(key);
        let target = succ.filter(|id| self.key_eq(*id, key))?;

        let height = self.arena.get(target).level();
        for (level, prev) in prevs.iter().take(height).enumerate() {
            if self.next(*prev, level) == Some(target) {
                let next = self.arena.get(target).next(level);
                self.set_next(*prev, level, next);
            }
        }
        let node = self.arena.release(target);

        while let Some(None) = self.head.last() {
            self.head.pop();
        }
        self.len -= 1;
        Some(node.into_value())
    }
}

impl<K, V, R> Extend<(K, V)> for SkipList<K, V, R>
where
    K: Ord,
    R: Rng,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<'a, K, V, R> IntoIterator for &'a SkipList<K, V, R> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, R> Debug for SkipList<K, V, R>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
impl<K, V, R> SkipList<K, V, R>
where
    K: Ord + Debug,
{
    /// Node ids on `level`, in chain order.
    fn chain(&self, level: usize) -> Vec<NodeId> {
        let mut ids = vec![];
        let mut current = self.head[level];
        while let Some(id) = current {
            ids.push(id);
            current = self.arena.get(id).next(level);
        }
        ids
    }

    pub(crate) fn assert_invariants(&self) {
        use std::collections::HashSet;

        if self.head.is_empty() {
            assert_eq!(self.len, 0);
            assert_eq!(self.arena.len(), 0);
            return;
        }
        assert!(self.head.last().copied().flatten().is_some(), "empty top level");

        let base = self.chain(0);
        assert_eq!(base.len(), self.len);
        assert_eq!(self.arena.len(), self.len);
        let max_node_level = base
            .iter()
            .map(|id| self.arena.get(*id).level())
            .max()
            .unwrap_or(0);
        assert_eq!(max_node_level, self.level());

        let mut below: HashSet<NodeId> = base.iter().copied().collect();
        for level in 0..self.level() {
            let chain = self.chain(level);
            for pair in chain.windows(2) {
                let (a, b) = (self.arena.get(pair[0]), self.arena.get(pair[1]));
                assert!(a.key() < b.key(), "{:?} !< {:?} at {}", a.key(), b.key(), level);
            }
            for id in &chain {
                assert!(below.contains(id), "level {} skips a lower level", level);
                assert!(self.arena.get(*id).level() > level);
            }
            let expected = base
                .iter()
                .filter(|id| self.arena.get(**id).level() > level)
                .count();
            assert_eq!(chain.len(), expected, "gap at level {}", level);
            below = chain.into_iter().collect();
        }
    }
}
