//! Segment tree for associative range queries with point updates
//!
//! Stores the combined value of every power-of-two aligned range in a flat
//! `4n` array, giving `O(log n)` `query` and `update` after an `O(n)` build.
//! The combining operation must be associative and must treat the supplied
//! neutral element as an identity (`combine(x, neutral) == x`); sums,
//! minima, maxima and gcds all qualify.

use crate::error::{check_bounds, check_range, DskitError, Result};

/// Range-query structure over a fixed-length sequence
///
/// # Examples
///
/// ```rust
/// use dskit::SegmentTree;
///
/// let tree = SegmentTree::build(&[5, 2, 8, 1, 9], 0, |a, b| a + b)?;
/// assert_eq!(tree.query(1, 3)?, 11); // 2 + 8 + 1
/// assert_eq!(tree.query(0, 4)?, 25);
/// # Ok::<(), dskit::DskitError>(())
/// ```
pub struct SegmentTree<T, F> {
    nodes: Vec<T>,
    neutral: T,
    combine: F,
    len: usize,
}

impl<T, F> SegmentTree<T, F>
where
    T: Clone,
    F: Fn(&T, &T) -> T,
{
    /// Build from a non-empty slice; an empty slice is rejected
    pub fn build(values: &[T], neutral: T, combine: F) -> Result<Self> {
        if values.is_empty() {
            return Err(DskitError::invalid_data(
                "cannot build a segment tree over an empty sequence",
            ));
        }
        let len = values.len();
        let mut tree = Self {
            nodes: vec![neutral.clone(); 4 * len],
            neutral,
            combine,
            len,
        };
        tree.build_node(1, 0, len - 1, values);
        Ok(tree)
    }

    fn build_node(&mut self, node: usize, lo: usize, hi: usize, values: &[T]) {
        if lo == hi {
            self.nodes[node] = values[lo].clone();
            return;
        }
        let mid = lo + (hi - lo) / 2;
        self.build_node(2 * node, lo, mid, values);
        self.build_node(2 * node + 1, mid + 1, hi, values);
        self.nodes[node] = (self.combine)(&self.nodes[2 * node], &self.nodes[2 * node + 1]);
    }

    /// Length of the underlying sequence
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false; an empty tree cannot be built
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Combined value over the inclusive index range `[left, right]`
    pub fn query(&self, left: usize, right: usize) -> Result<T> {
        check_range(left, right, self.len)?;
        Ok(self.query_node(1, 0, self.len - 1, left, right))
    }

    fn query_node(&self, node: usize, lo: usize, hi: usize, left: usize, right: usize) -> T {
        if right < lo || hi < left {
            return self.neutral.clone();
        }
        if left <= lo && hi <= right {
            return self.nodes[node].clone();
        }
        let mid = lo + (hi - lo) / 2;
        let a = self.query_node(2 * node, lo, mid, left, right);
        let b = self.query_node(2 * node + 1, mid + 1, hi, left, right);
        (self.combine)(&a, &b)
    }

    /// Replace the element at `index`, recombining every covering node
    pub fn update(&mut self, index: usize, value: T) -> Result<()> {
        check_bounds(index, self.len)?;
        self.update_node(1, 0, self.len - 1, index, &value);
        Ok(())
    }

    fn update_node(&mut self, node: usize, lo: usize, hi: usize, index: usize, value: &T) {
        if lo == hi {
            self.nodes[node] = value.clone();
            return;
        }
        let mid = lo + (hi - lo) / 2;
        if index <= mid {
            self.update_node(2 * node, lo, mid, index, value);
        } else {
            self.update_node(2 * node + 1, mid + 1, hi, index, value);
        }
        self.nodes[node] = (self.combine)(&self.nodes[2 * node], &self.nodes[2 * node + 1]);
    }
}
