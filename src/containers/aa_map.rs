//! Ordered map backed by an Andersson (AA) balanced binary search tree
//!
//! Nodes live in a slab indexed by `u32` ids with a `NIL` sentinel; a free
//! list threaded through vacant slots recycles ids, so long-lived maps do
//! not fragment their arena. Each node stores a non-owning parent id, which
//! gives iteration and rebalancing upward walks without recursion or an
//! explicit stack.
//!
//! Key ordering is supplied through [`KeyCompare`]; [`OrdCompare`] covers
//! `K: Ord` and [`ByOrder`] adapts a strict-weak-ordering closure, mirroring
//! the heap's ordering policy.
//!
//! The AA invariants maintained after every mutation:
//!
//! 1. every leaf has level 1
//! 2. a left child's level is exactly one less than its parent's
//! 3. a right child's level equals or is one less than its parent's
//! 4. a right grandchild's level is strictly less than its grandparent's
//!
//! `skew` (right rotation removing a horizontal left link) and `split`
//! (left rotation removing two consecutive horizontal right links) restore
//! the invariants bottom-up along the search path.

use crate::containers::heap::ByOrder;
use crate::containers::raw_store::TryClone;
use crate::error::{DskitError, Result};
use std::cmp::Ordering;
use std::fmt;
use std::mem;

/// Sentinel id for "no node"; conceptually level 0
const NIL: u32 = u32::MAX;

/// Three-way key ordering policy for [`AaMap`].
///
/// The relation must be a strict weak ordering; keys comparing `Equal` are
/// treated as the same key.
pub trait KeyCompare<K> {
    /// Order `a` relative to `b`
    fn compare(&self, a: &K, b: &K) -> Ordering;
}

/// Default ordering through `K: Ord`
#[derive(Debug, Default, Clone, Copy)]
pub struct OrdCompare;

impl<K: Ord> KeyCompare<K> for OrdCompare {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

impl<K, F: Fn(&K, &K) -> bool> KeyCompare<K> for ByOrder<F> {
    /// Derive the three-way ordering from a less-than predicate
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        if (self.0)(a, b) {
            Ordering::Less
        } else if (self.0)(b, a) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }
}

struct Node<K, V> {
    key: K,
    value: V,
    left: u32,
    right: u32,
    parent: u32,
    level: u32,
}

enum Slot<K, V> {
    Occupied(Node<K, V>),
    /// Next id on the free list
    Vacant(u32),
}

/// Ordered key-value map with `O(log n)` insert, lookup and removal
///
/// # Examples
///
/// ```rust
/// use dskit::AaMap;
///
/// let mut map = AaMap::new();
/// map.insert("b", 2)?;
/// map.insert("a", 1)?;
/// map.insert("c", 3)?;
///
/// assert_eq!(map.get(&"b"), Some(&2));
/// assert_eq!(map.first(), Some((&"a", &1)));
/// let keys: Vec<_> = map.iter().map(|(k, _)| *k).collect();
/// assert_eq!(keys, vec!["a", "b", "c"]);
/// # Ok::<(), dskit::DskitError>(())
/// ```
pub struct AaMap<K, V, C = OrdCompare> {
    slots: Vec<Slot<K, V>>,
    free_head: u32,
    root: u32,
    /// Cached minimum node for O(1) `first`
    leftmost: u32,
    len: usize,
    cmp: C,
}

impl<K: Ord, V> AaMap<K, V> {
    /// Create an empty map ordered through `K: Ord`
    pub fn new() -> Self {
        Self::with_comparator(OrdCompare)
    }

    /// Create an empty map with slab capacity for `cap` nodes
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            slots: Vec::with_capacity(cap),
            free_head: NIL,
            root: NIL,
            leftmost: NIL,
            len: 0,
            cmp: OrdCompare,
        }
    }
}

impl<K, V, C: KeyCompare<K>> AaMap<K, V, C> {
    /// Create an empty map with an explicit ordering policy
    pub fn with_comparator(cmp: C) -> Self {
        Self {
            slots: Vec::new(),
            free_head: NIL,
            root: NIL,
            leftmost: NIL,
            len: 0,
            cmp,
        }
    }

    /// Number of entries
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when the map holds no entries
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    fn node(&self, id: u32) -> &Node<K, V> {
        match &self.slots[id as usize] {
            Slot::Occupied(node) => node,
            Slot::Vacant(_) => unreachable!("vacant slot reached through a live link"),
        }
    }

    #[inline]
    fn node_mut(&mut self, id: u32) -> &mut Node<K, V> {
        match &mut self.slots[id as usize] {
            Slot::Occupied(node) => node,
            Slot::Vacant(_) => unreachable!("vacant slot reached through a live link"),
        }
    }

    /// Level of a node; NIL counts as level 0
    #[inline]
    fn level(&self, id: u32) -> u32 {
        if id == NIL {
            0
        } else {
            self.node(id).level
        }
    }

    #[inline]
    fn left(&self, id: u32) -> u32 {
        self.node(id).left
    }

    #[inline]
    fn right(&self, id: u32) -> u32 {
        self.node(id).right
    }

    #[inline]
    fn parent(&self, id: u32) -> u32 {
        self.node(id).parent
    }

    /// Redirect the child link that pointed to `old` so it points to `new`.
    /// A NIL parent means `old` was the root.
    fn relink(&mut self, parent: u32, old: u32, new: u32) {
        if parent == NIL {
            self.root = new;
        } else if self.left(parent) == old {
            self.node_mut(parent).left = new;
        } else {
            self.node_mut(parent).right = new;
        }
        if new != NIL {
            self.node_mut(new).parent = parent;
        }
    }

    /// Remove a horizontal left link by rotating right; returns the subtree
    /// root after the rotation
    fn skew(&mut self, t: u32) -> u32 {
        let l = self.left(t);
        if l == NIL || self.level(l) != self.level(t) {
            return t;
        }
        let parent = self.parent(t);
        let lr = self.right(l);
        self.node_mut(t).left = lr;
        if lr != NIL {
            self.node_mut(lr).parent = t;
        }
        self.node_mut(l).right = t;
        self.node_mut(t).parent = l;
        self.relink(parent, t, l);
        l
    }

    /// Remove two consecutive horizontal right links by rotating left and
    /// promoting the middle node; returns the subtree root after the rotation
    fn split(&mut self, t: u32) -> u32 {
        let r = self.right(t);
        if r == NIL || self.right(r) == NIL || self.level(self.right(r)) != self.level(t) {
            return t;
        }
        let parent = self.parent(t);
        let rl = self.left(r);
        self.node_mut(t).right = rl;
        if rl != NIL {
            self.node_mut(rl).parent = t;
        }
        self.node_mut(r).left = t;
        self.node_mut(t).parent = r;
        self.relink(parent, t, r);
        self.node_mut(r).level += 1;
        r
    }

    /// Take an id from the free list or append a fresh slot
    fn alloc_node(&mut self, key: K, value: V, parent: u32) -> Result<u32> {
        let node = Node {
            key,
            value,
            left: NIL,
            right: NIL,
            parent,
            level: 1,
        };
        if self.free_head != NIL {
            let id = self.free_head;
            match self.slots[id as usize] {
                Slot::Vacant(next) => self.free_head = next,
                Slot::Occupied(_) => unreachable!("free list points at an occupied slot"),
            }
            self.slots[id as usize] = Slot::Occupied(node);
            return Ok(id);
        }
        if self.slots.len() >= NIL as usize {
            return Err(DskitError::out_of_memory(self.slots.len()));
        }
        let id = self.slots.len() as u32;
        self.slots.push(Slot::Occupied(node));
        Ok(id)
    }

    /// Return payload to the caller and thread the slot onto the free list
    fn free_node(&mut self, id: u32) -> (K, V) {
        let slot = mem::replace(&mut self.slots[id as usize], Slot::Vacant(self.free_head));
        self.free_head = id;
        match slot {
            Slot::Occupied(node) => (node.key, node.value),
            Slot::Vacant(_) => unreachable!("freeing a vacant slot"),
        }
    }

    fn find(&self, key: &K) -> u32 {
        let mut id = self.root;
        while id != NIL {
            let node = self.node(id);
            id = match self.cmp.compare(key, &node.key) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return id,
            };
        }
        NIL
    }

    fn leftmost_of(&self, mut id: u32) -> u32 {
        while self.left(id) != NIL {
            id = self.left(id);
        }
        id
    }

    fn rightmost_of(&self, mut id: u32) -> u32 {
        while self.right(id) != NIL {
            id = self.right(id);
        }
        id
    }

    /// In-order successor, or NIL past the maximum
    fn successor(&self, id: u32) -> u32 {
        if self.right(id) != NIL {
            return self.leftmost_of(self.right(id));
        }
        let mut cur = id;
        let mut up = self.parent(id);
        while up != NIL && self.right(up) == cur {
            cur = up;
            up = self.parent(up);
        }
        up
    }

    /// In-order predecessor, or NIL before the minimum
    fn predecessor(&self, id: u32) -> u32 {
        if self.left(id) != NIL {
            return self.rightmost_of(self.left(id));
        }
        let mut cur = id;
        let mut up = self.parent(id);
        while up != NIL && self.left(up) == cur {
            cur = up;
            up = self.parent(up);
        }
        up
    }

    /// Borrow the value for `key`
    pub fn get(&self, key: &K) -> Option<&V> {
        let id = self.find(key);
        if id == NIL {
            None
        } else {
            Some(&self.node(id).value)
        }
    }

    /// Mutably borrow the value for `key`
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let id = self.find(key);
        if id == NIL {
            None
        } else {
            Some(&mut self.node_mut(id).value)
        }
    }

    /// True when the map holds an entry for `key`
    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key) != NIL
    }

    /// Minimum entry, through the cached leftmost id
    pub fn first(&self) -> Option<(&K, &V)> {
        if self.leftmost == NIL {
            return None;
        }
        let node = self.node(self.leftmost);
        Some((&node.key, &node.value))
    }

    /// Maximum entry
    pub fn last(&self) -> Option<(&K, &V)> {
        if self.root == NIL {
            return None;
        }
        let node = self.node(self.rightmost_of(self.root));
        Some((&node.key, &node.value))
    }

    /// Insert `key` if absent.
    ///
    /// Returns a borrow of the stored value and `true` when the key was
    /// newly inserted. An existing entry blocks the insertion: its value is
    /// kept, the supplied `value` is dropped, and the call returns the
    /// existing borrow with `false`. The error case is slab exhaustion
    /// (more than `u32::MAX - 1` nodes).
    pub fn insert(&mut self, key: K, value: V) -> Result<(&mut V, bool)> {
        // Descend to the insertion point, remembering the attachment parent
        let mut parent = NIL;
        let mut id = self.root;
        let mut went_left = false;
        while id != NIL {
            let node = self.node(id);
            match self.cmp.compare(&key, &node.key) {
                Ordering::Less => {
                    parent = id;
                    went_left = true;
                    id = node.left;
                }
                Ordering::Greater => {
                    parent = id;
                    went_left = false;
                    id = node.right;
                }
                Ordering::Equal => {
                    return Ok((&mut self.node_mut(id).value, false));
                }
            }
        }

        let new_id = self.alloc_node(key, value, parent)?;
        if parent == NIL {
            self.root = new_id;
        } else if went_left {
            self.node_mut(parent).left = new_id;
        } else {
            self.node_mut(parent).right = new_id;
        }
        if self.leftmost == NIL || (went_left && parent == self.leftmost) {
            self.leftmost = new_id;
        }
        self.len += 1;

        // Restore the AA invariants along the whole search path
        let mut cur = parent;
        while cur != NIL {
            let sub = self.skew(cur);
            let sub = self.split(sub);
            cur = self.parent(sub);
        }

        Ok((&mut self.node_mut(new_id).value, true))
    }

    /// Remove the entry for `key`, returning its value
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let mut id = self.find(key);
        if id == NIL {
            return None;
        }

        // Reduce to at most one child by swapping payloads with the
        // in-order successor; the successor has no left child, so the
        // physical unlink below stays a single-splice operation
        if self.left(id) != NIL && self.right(id) != NIL {
            let succ = self.leftmost_of(self.right(id));
            // Split borrows through raw pointers; distinct ids, so the
            // two &mut Node never alias
            debug_assert_ne!(id, succ);
            let a: *mut Node<K, V> = self.node_mut(id);
            let b: *mut Node<K, V> = self.node_mut(succ);
            // SAFETY: id != succ, both point at occupied slots
            unsafe {
                mem::swap(&mut (*a).key, &mut (*b).key);
                mem::swap(&mut (*a).value, &mut (*b).value);
            }
            id = succ;
        }

        let child = if self.left(id) != NIL {
            self.left(id)
        } else {
            self.right(id)
        };
        let parent = self.parent(id);
        self.relink(parent, id, child);
        let (_key, value) = self.free_node(id);
        self.len -= 1;

        // Walk the unlink path back to the root, shrinking levels and
        // re-applying skew/split (three skews and two splits cover every
        // violation a level decrease can introduce)
        let mut cur = parent;
        while cur != NIL {
            let should = self.level(self.left(cur)).min(self.level(self.right(cur))) + 1;
            if should < self.level(cur) {
                self.node_mut(cur).level = should;
                let right = self.right(cur);
                if right != NIL && self.level(right) > should {
                    self.node_mut(right).level = should;
                }
            }
            let sub = self.skew(cur);
            let r = self.right(sub);
            if r != NIL {
                let r = self.skew(r);
                let rr = self.right(r);
                if rr != NIL {
                    self.skew(rr);
                }
            }
            let sub = self.split(sub);
            let r = self.right(sub);
            if r != NIL {
                self.split(r);
            }
            cur = self.parent(sub);
        }

        self.leftmost = if self.root == NIL {
            NIL
        } else {
            self.leftmost_of(self.root)
        };
        Some(value)
    }

    /// Drop every entry, keeping the slab allocation
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_head = NIL;
        self.root = NIL;
        self.leftmost = NIL;
        self.len = 0;
    }

    /// In-order, double-ended iterator over entries
    pub fn iter(&self) -> Iter<'_, K, V, C> {
        let back = if self.root == NIL {
            NIL
        } else {
            self.rightmost_of(self.root)
        };
        Iter {
            map: self,
            front: self.leftmost,
            back,
            remaining: self.len,
        }
    }

    /// In-order iterator over keys
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> {
        self.iter().map(|(k, _)| k)
    }

    /// In-order iterator over values
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> {
        self.iter().map(|(_, v)| v)
    }

    /// Validation hook for tests: panics unless every AA level invariant,
    /// ordering relation, parent link and cached id is intact. Returns the
    /// number of nodes visited.
    #[doc(hidden)]
    pub fn check_invariants(&self) -> usize {
        fn walk<K, V, C: KeyCompare<K>>(map: &AaMap<K, V, C>, id: u32, parent: u32) -> usize {
            if id == NIL {
                return 0;
            }
            let node = map.node(id);
            assert_eq!(node.parent, parent, "parent link mismatch");
            if node.left == NIL && node.right == NIL {
                assert_eq!(node.level, 1, "leaf must sit at level 1");
            }
            if node.left != NIL {
                assert_eq!(
                    map.cmp.compare(&map.node(node.left).key, &node.key),
                    Ordering::Less,
                    "left child out of order"
                );
                assert_eq!(
                    map.level(node.left),
                    node.level - 1,
                    "left child must be one level down"
                );
            }
            if node.right != NIL {
                assert_eq!(
                    map.cmp.compare(&map.node(node.right).key, &node.key),
                    Ordering::Greater,
                    "right child out of order"
                );
                let rl = map.level(node.right);
                assert!(
                    rl == node.level || rl == node.level - 1,
                    "right child level out of range"
                );
                assert!(
                    map.level(map.right(node.right)) < node.level,
                    "two consecutive horizontal right links"
                );
            }
            1 + walk(map, node.left, id) + walk(map, node.right, id)
        }

        let count = walk(self, self.root, NIL);
        assert_eq!(count, self.len, "len does not match node count");
        if self.root != NIL {
            assert_eq!(
                self.leftmost,
                self.leftmost_of(self.root),
                "stale leftmost cache"
            );
        } else {
            assert_eq!(self.leftmost, NIL);
        }
        count
    }
}

impl<K: TryClone, V: TryClone, C: KeyCompare<K> + Clone> AaMap<K, V, C> {
    /// Fallible deep clone preserving the slab layout and free list.
    ///
    /// A failing element clone drops the partial copy whole; `self` is
    /// never modified.
    pub fn try_clone(&self) -> Result<Self> {
        let mut slots = Vec::with_capacity(self.slots.len());
        for slot in &self.slots {
            slots.push(match slot {
                Slot::Occupied(node) => Slot::Occupied(Node {
                    key: node.key.try_clone()?,
                    value: node.value.try_clone()?,
                    left: node.left,
                    right: node.right,
                    parent: node.parent,
                    level: node.level,
                }),
                Slot::Vacant(next) => Slot::Vacant(*next),
            });
        }
        Ok(Self {
            slots,
            free_head: self.free_head,
            root: self.root,
            leftmost: self.leftmost,
            len: self.len,
            cmp: self.cmp.clone(),
        })
    }
}

impl<K, V, C: KeyCompare<K> + Default> Default for AaMap<K, V, C> {
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C: KeyCompare<K>> fmt::Debug for AaMap<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C: KeyCompare<K> + Default> FromIterator<(K, V)> for AaMap<K, V, C> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::with_comparator(C::default());
        for (key, value) in iter {
            // Only fails on u32 slab exhaustion, which FromIterator
            // cannot report; matches Vec's abort-on-overflow posture
            if map.insert(key, value).is_err() {
                panic!("map slab exhausted during collect");
            }
        }
        map
    }
}

/// Double-ended in-order iterator over an [`AaMap`]
pub struct Iter<'a, K, V, C = OrdCompare> {
    map: &'a AaMap<K, V, C>,
    front: u32,
    back: u32,
    remaining: usize,
}

impl<'a, K, V, C: KeyCompare<K>> Iterator for Iter<'a, K, V, C> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.map.node(self.front);
        self.remaining -= 1;
        if self.remaining > 0 {
            self.front = self.map.successor(self.front);
        }
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V, C: KeyCompare<K>> DoubleEndedIterator for Iter<'a, K, V, C> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.map.node(self.back);
        self.remaining -= 1;
        if self.remaining > 0 {
            self.back = self.map.predecessor(self.back);
        }
        Some((&node.key, &node.value))
    }
}

impl<'a, K, V, C: KeyCompare<K>> ExactSizeIterator for Iter<'a, K, V, C> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut map = AaMap::new();
        assert!(map.is_empty());

        let (_, fresh) = map.insert(2, "two").unwrap();
        assert!(fresh);
        let (_, fresh) = map.insert(1, "one").unwrap();
        assert!(fresh);
        let (_, fresh) = map.insert(3, "three").unwrap();
        assert!(fresh);

        assert_eq!(map.len(), 3);
        assert_eq!(map.get(&1), Some(&"one"));
        assert_eq!(map.get(&2), Some(&"two"));
        assert_eq!(map.get(&3), Some(&"three"));
        assert_eq!(map.get(&4), None);
        map.check_invariants();
    }

    #[test]
    fn test_insert_keeps_existing_value() {
        let mut map = AaMap::new();
        map.insert(7, 1).unwrap();
        let (value, fresh) = map.insert(7, 2).unwrap();
        assert!(!fresh);
        // The existing entry blocks the insertion; its value survives
        assert_eq!(*value, 1);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&7), Some(&1));
        map.check_invariants();
    }

    #[test]
    fn test_ascending_insert_stays_balanced() {
        let mut map = AaMap::new();
        for i in 0..1000 {
            map.insert(i, i * 10).unwrap();
            map.check_invariants();
        }
        for i in 0..1000 {
            assert_eq!(map.get(&i), Some(&(i * 10)));
        }
        // Level bounds the height; a balanced 1000-node AA tree stays shallow
        assert!(map.level(map.root) <= 11);
    }

    #[test]
    fn test_descending_insert_stays_balanced() {
        let mut map = AaMap::new();
        for i in (0..500).rev() {
            map.insert(i, ()).unwrap();
            map.check_invariants();
        }
        assert_eq!(map.first(), Some((&0, &())));
        assert_eq!(map.last(), Some((&499, &())));
    }

    #[test]
    fn test_remove() {
        let mut map = AaMap::new();
        for i in 0..100 {
            map.insert(i, i).unwrap();
        }
        // Remove odds, verifying balance after every unlink
        for i in (1..100).step_by(2) {
            assert_eq!(map.remove(&i), Some(i));
            map.check_invariants();
        }
        assert_eq!(map.len(), 50);
        for i in 0..100 {
            assert_eq!(map.contains_key(&i), i % 2 == 0);
        }
        assert_eq!(map.remove(&1), None);
    }

    #[test]
    fn test_remove_root_repeatedly() {
        let mut map = AaMap::new();
        for i in 0..64 {
            map.insert(i, ()).unwrap();
        }
        while map.root != NIL {
            let root_key = *map.iter().map(|(k, _)| k).nth(map.len / 2).unwrap();
            map.remove(&root_key);
            map.check_invariants();
        }
        assert!(map.is_empty());
    }

    #[test]
    fn test_first_last_and_leftmost_cache() {
        let mut map = AaMap::new();
        assert_eq!(map.first(), None);
        assert_eq!(map.last(), None);

        for i in [5, 3, 8, 1, 9] {
            map.insert(i, ()).unwrap();
        }
        assert_eq!(map.first(), Some((&1, &())));
        assert_eq!(map.last(), Some((&9, &())));

        map.remove(&1);
        assert_eq!(map.first(), Some((&3, &())));
        map.check_invariants();
    }

    #[test]
    fn test_iter_in_order_and_reversed() {
        let mut map = AaMap::new();
        for i in [4, 2, 9, 1, 7, 3] {
            map.insert(i, i * 100).unwrap();
        }
        let forward: Vec<_> = map.keys().copied().collect();
        assert_eq!(forward, vec![1, 2, 3, 4, 7, 9]);
        let backward: Vec<_> = map.keys().rev().copied().collect();
        assert_eq!(backward, vec![9, 7, 4, 3, 2, 1]);
        assert_eq!(map.iter().len(), 6);
    }

    #[test]
    fn test_closure_comparator_orders_the_map() {
        // Reverse numeric order through the less-than predicate
        let mut map = AaMap::with_comparator(ByOrder(|a: &i32, b: &i32| a > b));
        for i in [4, 2, 9, 1, 7] {
            map.insert(i, ()).unwrap();
            map.check_invariants();
        }
        let keys: Vec<_> = map.keys().copied().collect();
        assert_eq!(keys, vec![9, 7, 4, 2, 1]);
        assert_eq!(map.first(), Some((&9, &())));
        assert_eq!(map.last(), Some((&1, &())));

        // Equality is derived from the predicate, not from Eq
        let (_, fresh) = map.insert(7, ()).unwrap();
        assert!(!fresh);
        assert_eq!(map.len(), 5);

        assert_eq!(map.remove(&9), Some(()));
        map.check_invariants();
        assert_eq!(map.first(), Some((&7, &())));
    }

    #[test]
    fn test_id_recycling() {
        let mut map = AaMap::new();
        for i in 0..10 {
            map.insert(i, ()).unwrap();
        }
        let slab_size = map.slots.len();
        for i in 0..10 {
            map.remove(&i);
        }
        for i in 10..20 {
            map.insert(i, ()).unwrap();
        }
        // Recycled ids, no slab growth
        assert_eq!(map.slots.len(), slab_size);
        map.check_invariants();
    }

    #[test]
    fn test_get_mut() {
        let mut map = AaMap::new();
        map.insert("k", 1).unwrap();
        *map.get_mut(&"k").unwrap() += 10;
        assert_eq!(map.get(&"k"), Some(&11));
    }

    #[test]
    fn test_clear() {
        let mut map: AaMap<i32, i32> = (0..50).map(|i| (i, i)).collect();
        assert_eq!(map.len(), 50);
        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.first(), None);
        map.insert(1, 1).unwrap();
        assert_eq!(map.len(), 1);
        map.check_invariants();
    }

    #[test]
    fn test_try_clone() {
        let map: AaMap<i32, String> = (0..20).map(|i| (i, i.to_string())).collect();
        let cloned = map.try_clone().unwrap();
        assert_eq!(cloned.len(), map.len());
        for (k, v) in map.iter() {
            assert_eq!(cloned.get(k), Some(v));
        }
        cloned.check_invariants();
    }
}
