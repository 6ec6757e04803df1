//! Stack: thin LIFO wrapper over [`RawStore`]
//!
//! Besides the usual `push`/`pop`/`top`, the stack exposes `bottom()`, which
//! the two-stack queue needs for O(1) `front`/`back` when one of its stacks
//! is empty.

use crate::containers::raw_store::{RawStore, TryClone};
use crate::error::{DskitError, Result};
use std::fmt;

/// LIFO stack over a raw capacity-tracked buffer
///
/// # Examples
///
/// ```rust
/// use dskit::Stack;
///
/// let mut stack = Stack::new();
/// stack.push(1)?;
/// stack.push(2)?;
/// assert_eq!(stack.top()?, &2);
/// assert_eq!(stack.pop()?, 2);
/// # Ok::<(), dskit::DskitError>(())
/// ```
pub struct Stack<T> {
    store: RawStore<T>,
}

impl<T> Stack<T> {
    /// Create an empty stack with no allocation
    #[inline]
    pub fn new() -> Self {
        Self {
            store: RawStore::new(),
        }
    }

    /// Create an empty stack with the given capacity
    pub fn with_capacity(cap: usize) -> Result<Self> {
        Ok(Self {
            store: RawStore::with_capacity(cap)?,
        })
    }

    /// Number of elements
    #[inline]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// True when the stack holds no elements
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Allocated capacity
    #[inline]
    pub fn capacity(&self) -> usize {
        self.store.capacity()
    }

    /// Push a value, growing the backing store if needed
    pub fn push(&mut self, value: T) -> Result<()> {
        self.store.push(value)
    }

    /// Remove and return the most recently pushed value
    pub fn pop(&mut self) -> Result<T> {
        self.store
            .pop()
            .ok_or_else(|| DskitError::container_empty("stack"))
    }

    /// Reference to the most recently pushed value
    pub fn top(&self) -> Result<&T> {
        self.store
            .get(self.len().wrapping_sub(1))
            .ok_or_else(|| DskitError::container_empty("stack"))
    }

    /// Reference to the oldest value (the bottom of the stack)
    pub fn bottom(&self) -> Result<&T> {
        self.store
            .get(0)
            .ok_or_else(|| DskitError::container_empty("stack"))
    }

    /// Destroy all elements, keeping the allocation
    pub fn clear(&mut self) {
        self.store.clear();
    }

    /// View the stack bottom-to-top as a slice
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self.store.as_slice()
    }
}

impl<T: TryClone> Stack<T> {
    /// Fallible clone with rollback on element failure
    pub fn try_clone(&self) -> Result<Self> {
        Ok(Self {
            store: self.store.try_clone()?,
        })
    }
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Stack<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}
