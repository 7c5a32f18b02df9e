use alloc::vec::Vec;
use core::fmt::Debug;
use core::iter::FusedIterator;

use crate::Key;
use crate::Value;

/// Handle of a node inside a bucket's arena.
type NodeIndex = usize;

#[derive(Clone)]
struct Node {
    key: Key,
    value: Value,
    prev: Option<NodeIndex>,
    next: Option<NodeIndex>,
}

#[derive(Clone)]
enum Slot {
    Occupied(Node),
    Vacant { next_free: Option<NodeIndex> },
}

/// A chain of `(key, value)` entries stored as a doubly linked list.
///
/// Nodes are owned by an arena private to the bucket and linked by index, so
/// unlinking a node is O(1) once it has been found and dropping the bucket
/// releases every node. Vacated slots are kept on a free list and reused by
/// later inserts.
///
/// New entries are prepended, and lookups scan from the head, so when the same
/// key is inserted more than once the most recent entry shadows the older ones.
///
/// # Examples
///
/// ```rust
/// use chained_hash::bucket::Bucket;
///
/// let mut bucket = Bucket::new();
/// bucket.insert(1, 10);
/// bucket.insert(1, 11);
/// assert_eq!(bucket.get(1), Some(11));
///
/// assert_eq!(bucket.remove(1), Some(11));
/// assert_eq!(bucket.get(1), Some(10));
/// ```
#[derive(Clone, Default)]
pub struct Bucket {
    slots: Vec<Slot>,
    head: Option<NodeIndex>,
    tail: Option<NodeIndex>,
    free: Option<NodeIndex>,
    len: usize,
}

impl Debug for Bucket {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl Bucket {
    /// Creates an empty bucket. Does not allocate.
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            head: None,
            tail: None,
            free: None,
            len: 0,
        }
    }

    /// Returns the number of entries in the chain.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the chain holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Prepends a new entry to the chain. No uniqueness check is performed.
    pub fn insert(&mut self, key: Key, value: Value) {
        let node = Node {
            key,
            value,
            prev: None,
            next: self.head,
        };
        let index = self.alloc(node);

        match self.head {
            Some(old_head) => self.node_mut(old_head).prev = Some(index),
            None => self.tail = Some(index),
        }
        self.head = Some(index);
        self.len += 1;
    }

    /// Removes the first entry matching `key`, scanning from the head, and
    /// returns its value. Returns `None` and leaves the chain untouched if no
    /// entry matches.
    pub fn remove(&mut self, key: Key) -> Option<Value> {
        let index = self.find(key)?;
        self.unlink(index);
        Some(self.release(index).value)
    }

    /// Returns the value of the first entry matching `key`, scanning from the
    /// head.
    pub fn get(&self, key: Key) -> Option<Value> {
        self.find(key).map(|index| self.node(index).value)
    }

    /// Returns `true` if any entry in the chain has `key`.
    pub fn contains_key(&self, key: Key) -> bool {
        self.find(key).is_some()
    }

    /// Drops every node and resets the chain to empty.
    ///
    /// The arena's allocation is retained.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.head = None;
        self.tail = None;
        self.free = None;
        self.len = 0;
    }

    /// Returns an iterator over the entries, from head to tail.
    ///
    /// The iterator is double-ended; `rev()` walks the `prev` links from the
    /// tail back to the head.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            bucket: self,
            front: self.head,
            back: self.tail,
            remaining: self.len,
        }
    }

    fn find(&self, key: Key) -> Option<NodeIndex> {
        let mut cursor = self.head;
        while let Some(index) = cursor {
            let node = self.node(index);
            if node.key == key {
                return Some(index);
            }
            cursor = node.next;
        }
        None
    }

    fn unlink(&mut self, index: NodeIndex) {
        let (prev, next) = {
            let node = self.node(index);
            (node.prev, node.next)
        };

        match prev {
            Some(prev) => self.node_mut(prev).next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => self.node_mut(next).prev = prev,
            None => self.tail = prev,
        }
        self.len -= 1;
    }

    fn alloc(&mut self, node: Node) -> NodeIndex {
        match self.free {
            Some(index) => {
                if let Slot::Vacant { next_free } = self.slots[index] {
                    self.free = next_free;
                }
                self.slots[index] = Slot::Occupied(node);
                index
            }
            None => {
                self.slots.push(Slot::Occupied(node));
                self.slots.len() - 1
            }
        }
    }

    fn release(&mut self, index: NodeIndex) -> Node {
        let slot = core::mem::replace(
            &mut self.slots[index],
            Slot::Vacant {
                next_free: self.free,
            },
        );
        self.free = Some(index);
        if self.len == 0 {
            // Nothing is linked any more, so the whole arena can be recycled.
            self.slots.clear();
            self.free = None;
        }
        match slot {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => unreachable!("released a vacant slot"),
        }
    }

    #[inline(always)]
    fn node(&self, index: NodeIndex) -> &Node {
        match &self.slots[index] {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => unreachable!("linked to a vacant slot"),
        }
    }

    #[inline(always)]
    fn node_mut(&mut self, index: NodeIndex) -> &mut Node {
        match &mut self.slots[index] {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => unreachable!("linked to a vacant slot"),
        }
    }

    /// Walks the links in both directions and panics if they disagree with
    /// each other or with `len`.
    #[cfg(test)]
    pub(crate) fn assert_links(&self) {
        let mut forward = Vec::new();
        let mut prev = None;
        let mut cursor = self.head;
        while let Some(index) = cursor {
            let node = self.node(index);
            assert_eq!(node.prev, prev, "broken prev link at slot {index}");
            forward.push(index);
            prev = Some(index);
            cursor = node.next;
        }
        assert_eq!(prev, self.tail, "tail does not end the forward walk");
        assert_eq!(forward.len(), self.len);

        let mut backward = Vec::new();
        let mut cursor = self.tail;
        while let Some(index) = cursor {
            backward.push(index);
            cursor = self.node(index).prev;
        }
        backward.reverse();
        assert_eq!(forward, backward);

        let occupied = self
            .slots
            .iter()
            .filter(|slot| matches!(slot, Slot::Occupied(_)))
            .count();
        assert_eq!(occupied, self.len, "leaked arena slots");
    }
}

/// An iterator over the `(key, value)` entries of a [`Bucket`].
///
/// This struct is created by [`Bucket::iter`].
#[derive(Clone)]
pub struct Iter<'a> {
    bucket: &'a Bucket,
    front: Option<NodeIndex>,
    back: Option<NodeIndex>,
    remaining: usize,
}

impl Iterator for Iter<'_> {
    type Item = (Key, Value);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.bucket.node(self.front?);
        self.front = node.next;
        self.remaining -= 1;
        Some((node.key, node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.bucket.node(self.back?);
        self.back = node.prev;
        self.remaining -= 1;
        Some((node.key, node.value))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}
