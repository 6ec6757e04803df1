//! Binary heap over the raw backing store
//!
//! Array-encoded complete binary tree: children of index `i` live at
//! `2i + 1` and `2i + 2`. The ordering predicate is supplied through
//! [`HeapOrder`]; [`MinFirst`] and [`MaxFirst`] cover the `Ord` cases and
//! [`ByOrder`] wraps an arbitrary strict-weak-ordering closure.

use crate::containers::raw_store::{RawStore, TryClone};
use crate::error::{DskitError, Result};
use std::fmt;

/// Ordering predicate for [`Heap`].
///
/// `before(a, b)` returns true when `a` must sit closer to the top of the
/// heap than `b`. The relation must be a strict weak ordering.
pub trait HeapOrder<T> {
    /// True when `a` dominates `b` (must be nearer the heap top)
    fn before(&self, a: &T, b: &T) -> bool;
}

/// Min-heap ordering: the smallest element is at the top
#[derive(Debug, Default, Clone, Copy)]
pub struct MinFirst;

impl<T: Ord> HeapOrder<T> for MinFirst {
    #[inline]
    fn before(&self, a: &T, b: &T) -> bool {
        a < b
    }
}

/// Max-heap ordering: the largest element is at the top
#[derive(Debug, Default, Clone, Copy)]
pub struct MaxFirst;

impl<T: Ord> HeapOrder<T> for MaxFirst {
    #[inline]
    fn before(&self, a: &T, b: &T) -> bool {
        a > b
    }
}

/// Adapter turning a `Fn(&T, &T) -> bool` predicate into a [`HeapOrder`]
#[derive(Debug, Clone, Copy)]
pub struct ByOrder<F>(pub F);

impl<T, F: Fn(&T, &T) -> bool> HeapOrder<T> for ByOrder<F> {
    #[inline]
    fn before(&self, a: &T, b: &T) -> bool {
        (self.0)(a, b)
    }
}

/// Heap with the smallest element on top
pub type MinHeap<T> = Heap<T, MinFirst>;
/// Heap with the largest element on top
pub type MaxHeap<T> = Heap<T, MaxFirst>;

/// Binary heap with a configurable ordering predicate
///
/// # Examples
///
/// ```rust
/// use dskit::MinHeap;
///
/// let mut heap = MinHeap::new();
/// heap.push(3)?;
/// heap.push(1)?;
/// heap.push(2)?;
/// assert_eq!(heap.top()?, &1);
/// assert_eq!(heap.pop()?, 1);
/// assert_eq!(heap.pop()?, 2);
/// # Ok::<(), dskit::DskitError>(())
/// ```
pub struct Heap<T, O = MinFirst> {
    store: RawStore<T>,
    order: O,
}

impl<T, O: HeapOrder<T> + Default> Heap<T, O> {
    /// Create an empty heap with the default-constructed ordering
    pub fn new() -> Self {
        Self {
            store: RawStore::new(),
            order: O::default(),
        }
    }

    /// Create an empty heap with the given capacity
    pub fn with_capacity(cap: usize) -> Result<Self> {
        Ok(Self {
            store: RawStore::with_capacity(cap)?,
            order: O::default(),
        })
    }
}

impl<T, O: HeapOrder<T>> Heap<T, O> {
    /// Create an empty heap with an explicit ordering predicate
    pub fn with_order(order: O) -> Self {
        Self {
            store: RawStore::new(),
            order,
        }
    }

    /// Bulk-build a heap from a slice.
    ///
    /// Fallibly clones the elements (rollback on failure), then sifts down
    /// from the last internal node through the root.
    pub fn from_slice(source: &[T], order: O) -> Result<Self>
    where
        T: TryClone,
    {
        let mut heap = Self {
            store: RawStore::try_from_slice(source)?,
            order,
        };
        heap.rebuild();
        Ok(heap)
    }

    /// Number of elements
    #[inline]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// True when the heap holds no elements
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Allocated capacity
    #[inline]
    pub fn capacity(&self) -> usize {
        self.store.capacity()
    }

    /// Reference to the dominant element
    pub fn top(&self) -> Result<&T> {
        self.store
            .get(0)
            .ok_or_else(|| DskitError::container_empty("heap"))
    }

    /// Insert a value, growing the store if at capacity, then sift up
    pub fn push(&mut self, value: T) -> Result<()> {
        self.store.push(value)?;
        self.sift_up(self.len() - 1);
        Ok(())
    }

    /// Remove and return the dominant element.
    ///
    /// The last element moves into the root slot, the vacated slot is
    /// destroyed, then the root sifts down.
    pub fn pop(&mut self) -> Result<T> {
        let len = self.len();
        if len == 0 {
            return Err(DskitError::container_empty("heap"));
        }
        self.store.swap(0, len - 1);
        let value = self.store.pop().ok_or_else(|| {
            // Unreachable: len was checked above
            DskitError::container_empty("heap")
        })?;
        self.sift_down(0);
        Ok(value)
    }

    /// Destroy all elements, keeping the allocation
    pub fn clear(&mut self) {
        self.store.clear();
    }

    /// Restore the heap property over the whole store
    fn rebuild(&mut self) {
        let len = self.len();
        if len < 2 {
            return;
        }
        // Last internal node is the parent of the last leaf
        let mut i = (len - 2) / 2;
        loop {
            self.sift_down(i);
            if i == 0 {
                break;
            }
            i -= 1;
        }
    }

    /// Swap a node with its parent while it dominates the parent
    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            let data = self.store.as_slice();
            if !self.order.before(&data[index], &data[parent]) {
                break;
            }
            self.store.swap(index, parent);
            index = parent;
        }
    }

    /// Swap a node downward with its dominant child until it dominates both
    fn sift_down(&mut self, mut index: usize) {
        let len = self.len();
        loop {
            let left = 2 * index + 1;
            let right = 2 * index + 2;
            let mut best = index;
            let data = self.store.as_slice();
            if left < len && self.order.before(&data[left], &data[best]) {
                best = left;
            }
            if right < len && self.order.before(&data[right], &data[best]) {
                best = right;
            }
            if best == index {
                break;
            }
            self.store.swap(index, best);
            index = best;
        }
    }

    #[cfg(test)]
    fn is_valid(&self) -> bool {
        let data = self.store.as_slice();
        (1..data.len()).all(|i| !self.order.before(&data[i], &data[(i - 1) / 2]))
    }
}

impl<T: TryClone, O: HeapOrder<T> + Clone> Heap<T, O> {
    /// Fallible clone with rollback on element failure
    pub fn try_clone(&self) -> Result<Self> {
        Ok(Self {
            store: self.store.try_clone()?,
            order: self.order.clone(),
        })
    }
}

impl<T, O: HeapOrder<T> + Default> Default for Heap<T, O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug, O> fmt::Debug for Heap<T, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.store.as_slice()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_heap_order() {
        let mut heap = MinHeap::new();
        for v in [5, 3, 8, 1, 9, 2] {
            heap.push(v).unwrap();
            assert!(heap.is_valid());
        }
        let mut drained = Vec::new();
        while let Ok(v) = heap.pop() {
            drained.push(v);
        }
        assert_eq!(drained, vec![1, 2, 3, 5, 8, 9]);
    }

    #[test]
    fn test_max_heap_order() {
        let mut heap = MaxHeap::new();
        for v in [5, 3, 8, 1, 9, 2] {
            heap.push(v).unwrap();
        }
        assert_eq!(heap.pop().unwrap(), 9);
        assert_eq!(heap.pop().unwrap(), 8);
        assert_eq!(heap.top().unwrap(), &5);
    }

    #[test]
    fn test_empty_heap_errors() {
        let mut heap: MinHeap<i32> = MinHeap::new();
        assert!(heap.top().is_err());
        assert!(heap.pop().is_err());
    }

    #[test]
    fn test_top_tracks_minimum_through_mixed_ops() {
        let mut heap = MinHeap::new();
        heap.push(10).unwrap();
        heap.push(4).unwrap();
        assert_eq!(heap.top().unwrap(), &4);
        heap.push(7).unwrap();
        assert_eq!(heap.pop().unwrap(), 4);
        assert_eq!(heap.top().unwrap(), &7);
        heap.push(1).unwrap();
        assert_eq!(heap.top().unwrap(), &1);
    }

    #[test]
    fn test_from_slice_bulk_build() {
        let heap = MinHeap::from_slice(&[9, 4, 7, 1, 8, 2, 3], MinFirst).unwrap();
        assert!(heap.is_valid());
        assert_eq!(heap.top().unwrap(), &1);
        assert_eq!(heap.len(), 7);
    }

    #[test]
    fn test_from_slice_two_elements_fixes_root() {
        // Guards against a bulk build that skips sifting index 0
        let mut heap = MinHeap::from_slice(&[2, 1], MinFirst).unwrap();
        assert_eq!(heap.pop().unwrap(), 1);
        assert_eq!(heap.pop().unwrap(), 2);
    }

    #[test]
    fn test_closure_order() {
        // Order pairs by their second component
        let mut heap = Heap::with_order(ByOrder(|a: &(i32, i32), b: &(i32, i32)| a.1 < b.1));
        heap.push((1, 30)).unwrap();
        heap.push((2, 10)).unwrap();
        heap.push((3, 20)).unwrap();
        assert_eq!(heap.pop().unwrap(), (2, 10));
        assert_eq!(heap.pop().unwrap(), (3, 20));
    }

    #[test]
    fn test_duplicates() {
        let mut heap = MinHeap::new();
        for v in [2, 2, 1, 1, 3, 3] {
            heap.push(v).unwrap();
        }
        let mut drained = Vec::new();
        while let Ok(v) = heap.pop() {
            drained.push(v);
        }
        assert_eq!(drained, vec![1, 1, 2, 2, 3, 3]);
    }

    #[test]
    fn test_try_clone() {
        let mut heap = MinHeap::new();
        for v in [4, 2, 6] {
            heap.push(v).unwrap();
        }
        let cloned = heap.try_clone().unwrap();
        assert_eq!(cloned.len(), 3);
        assert_eq!(cloned.top().unwrap(), &2);
    }
}
