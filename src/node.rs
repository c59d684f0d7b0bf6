pub(crate) type NodeId = usize;

/// Forward link at one level. `None` is the end of that level's chain.
pub(crate) type Link = Option<NodeId>;

#[derive(Debug)]
pub(crate) struct Node<K, V> {
    key: K,
    value: V,
    skips: Vec<Link>,
}

impl<K, V> Node<K, V> {
    pub(crate) fn new(key: K, value: V, level: usize) -> Self {
        Self {
            key,
            value,
            skips: vec![None; level],
        }
    }

    pub(crate) fn key(&self) -> &K {
        &self.key
    }

    pub(crate) fn value(&self) -> &V {
        &self.value
    }

    pub(crate) fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    pub(crate) fn set_value(&mut self, value: V) -> V {
        std::mem::replace(&mut self.value, value)
    }

    pub(crate) fn level(&self) -> usize {
        self.skips.len()
    }

    pub(crate) fn next(&self, n: usize) -> Link {
        self.skips[n]
    }

    pub(crate) fn set_next(&mut self, n: usize, node: Link) {
        self.skips[n] = node
    }

    pub(crate) fn into_value(self) -> V {
        self.value
    }
}

/// Slot storage owning every node of a list. Links between nodes are slot
/// indices, so a released slot must be unlinked from all levels first.
#[derive(Debug)]
pub(crate) struct NodeArena<K, V> {
    slots: Vec<Option<Node<K, V>>>,
    free: Vec<NodeId>,
}

impl<K, V> NodeArena<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            slots: vec![],
            free: vec![],
        }
    }

    pub(crate) fn alloc(&mut self, node: Node<K, V>) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                self.slots[id] = Some(node);
                id
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        }
    }

    /// Panics if `id` is not a live slot.
    pub(crate) fn release(&mut self, id: NodeId) -> Node<K, V> {
        let node = self.slots[id].take().expect("release of a free arena slot");
        self.free.push(id);
        node
    }

    /// Panics if `id` is not a live slot.
    pub(crate) fn get(&self, id: NodeId) -> &Node<K, V> {
        self.slots[id].as_ref().expect("dangling node link")
    }

    /// Panics if `id` is not a live slot.
    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut Node<K, V> {
        self.slots[id].as_mut().expect("dangling node link")
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}
