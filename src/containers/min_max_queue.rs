//! Two-stack FIFO queue with an optional running-extremum summary
//!
//! The queue is two stacks: pushes land on `push_stack`, pops drain
//! `pop_stack`, and when `pop_stack` runs dry the whole `push_stack` is
//! transferred across (reversing order). Each element moves between stacks
//! at most once, so push and pop are amortized O(1).
//!
//! Every stack entry carries a [`RunningStat`] summary of that entry and
//! everything below it *in the same stack*. The unit summary `()` makes a
//! plain FIFO; [`MinMax`] tracks the running minimum and maximum, giving the
//! O(1) [`MinMaxQueue::max_diff`] query.

use crate::containers::raw_store::TryClone;
use crate::containers::stack::Stack;
use crate::error::{DskitError, Result};
use std::fmt;
use std::ops::Sub;

/// Per-entry running summary of a stack's contents.
///
/// `of` summarizes a single value; `fold` extends the summary below the new
/// top of the stack with the value being pushed.
pub trait RunningStat<T>: Sized {
    /// Summary of a single value
    fn of(value: &T) -> Self;
    /// Summary of `value` pushed on top of a stack summarized by `prev`
    fn fold(prev: &Self, value: &T) -> Self;
}

/// No-op summary for plain FIFO queues
impl<T> RunningStat<T> for () {
    #[inline]
    fn of(_: &T) -> Self {}
    #[inline]
    fn fold(_: &Self, _: &T) -> Self {}
}

/// Running minimum and maximum of a stack segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinMax<T> {
    /// Smallest value in the summarized segment
    pub min: T,
    /// Largest value in the summarized segment
    pub max: T,
}

impl<T: Clone + Ord> RunningStat<T> for MinMax<T> {
    fn of(value: &T) -> Self {
        Self {
            min: value.clone(),
            max: value.clone(),
        }
    }

    fn fold(prev: &Self, value: &T) -> Self {
        Self {
            min: if prev.min < *value {
                prev.min.clone()
            } else {
                value.clone()
            },
            max: if prev.max > *value {
                prev.max.clone()
            } else {
                value.clone()
            },
        }
    }
}

impl<T: TryClone> TryClone for MinMax<T> {
    fn try_clone(&self) -> Result<Self> {
        Ok(Self {
            min: self.min.try_clone()?,
            max: self.max.try_clone()?,
        })
    }
}

/// FIFO queue tracking the running min/max of its contents
pub type MinMaxQueue<T> = TwoStackQueue<T, MinMax<T>>;

/// FIFO queue composed of two stacks
///
/// # Examples
///
/// ```rust
/// use dskit::TwoStackQueue;
///
/// let mut queue: TwoStackQueue<i32> = TwoStackQueue::new();
/// queue.push(1)?;
/// queue.push(2)?;
/// assert_eq!(queue.pop()?, 1);
/// assert_eq!(queue.front()?, &2);
/// # Ok::<(), dskit::DskitError>(())
/// ```
pub struct TwoStackQueue<T, S = ()> {
    len: usize,
    push_stack: Stack<(T, S)>,
    pop_stack: Stack<(T, S)>,
}

impl<T, S: RunningStat<T>> TwoStackQueue<T, S> {
    /// Create an empty queue with no allocation
    pub fn new() -> Self {
        Self {
            len: 0,
            push_stack: Stack::new(),
            pop_stack: Stack::new(),
        }
    }

    /// Create an empty queue with the given per-stack capacity
    pub fn with_capacity(cap: usize) -> Result<Self> {
        Ok(Self {
            len: 0,
            push_stack: Stack::with_capacity(cap)?,
            pop_stack: Stack::with_capacity(cap)?,
        })
    }

    /// Number of queued elements
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when the queue holds no elements
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Enqueue a value, folding it into the push stack's running summary
    pub fn push(&mut self, value: T) -> Result<()> {
        let stat = match self.push_stack.top() {
            Ok((_, prev)) => S::fold(prev, &value),
            Err(_) => S::of(&value),
        };
        self.push_stack.push((value, stat))?;
        self.len += 1;
        Ok(())
    }

    /// Dequeue the oldest value
    pub fn pop(&mut self) -> Result<T> {
        if self.len == 0 {
            return Err(DskitError::container_empty("queue"));
        }
        if self.pop_stack.is_empty() {
            self.transfer()?;
        }
        let (value, _) = self.pop_stack.pop()?;
        self.len -= 1;
        Ok(value)
    }

    /// Reference to the oldest value
    pub fn front(&self) -> Result<&T> {
        if self.len == 0 {
            return Err(DskitError::container_empty("queue"));
        }
        let (value, _) = if self.pop_stack.is_empty() {
            self.push_stack.bottom()?
        } else {
            self.pop_stack.top()?
        };
        Ok(value)
    }

    /// Reference to the most recently pushed value
    pub fn back(&self) -> Result<&T> {
        if self.len == 0 {
            return Err(DskitError::container_empty("queue"));
        }
        let (value, _) = if self.push_stack.is_empty() {
            self.pop_stack.bottom()?
        } else {
            self.push_stack.top()?
        };
        Ok(value)
    }

    /// Destroy all elements, keeping the allocations
    pub fn clear(&mut self) {
        self.push_stack.clear();
        self.pop_stack.clear();
        self.len = 0;
    }

    /// Move the entire push stack into the pop stack, reversing order.
    ///
    /// Summaries are recomputed against the pop stack's own running values;
    /// the two stacks' summaries are independent.
    fn transfer(&mut self) -> Result<()> {
        debug_assert!(self.pop_stack.is_empty());
        while let Ok((value, _)) = self.push_stack.pop() {
            let stat = match self.pop_stack.top() {
                Ok((_, prev)) => S::fold(prev, &value),
                Err(_) => S::of(&value),
            };
            self.pop_stack.push((value, stat))?;
        }
        Ok(())
    }
}

impl<T, S: RunningStat<T>> Default for TwoStackQueue<T, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TryClone, S: TryClone> TwoStackQueue<T, S> {
    /// Fallible clone with rollback on element failure
    pub fn try_clone(&self) -> Result<Self> {
        Ok(Self {
            len: self.len,
            push_stack: self.push_stack.try_clone()?,
            pop_stack: self.pop_stack.try_clone()?,
        })
    }
}

impl<T> TwoStackQueue<T, MinMax<T>>
where
    T: Clone + Ord + Sub,
{
    /// Difference between the largest and smallest queued values.
    ///
    /// Combines the top-of-stack summaries of both stacks; each summarizes
    /// only its own stack. O(1).
    pub fn max_diff(&self) -> Result<<T as Sub>::Output> {
        if self.len == 0 {
            return Err(DskitError::container_empty("queue"));
        }
        let push_top = self.push_stack.top().ok().map(|(_, s)| s);
        let pop_top = self.pop_stack.top().ok().map(|(_, s)| s);
        let (min, max) = match (push_top, pop_top) {
            (Some(a), Some(b)) => (
                if a.min < b.min { &a.min } else { &b.min },
                if a.max > b.max { &a.max } else { &b.max },
            ),
            (Some(a), None) => (&a.min, &a.max),
            (None, Some(b)) => (&b.min, &b.max),
            (None, None) => unreachable!("len > 0 with both stacks empty"),
        };
        Ok(max.clone() - min.clone())
    }
}

impl<T: fmt::Debug, S> fmt::Debug for TwoStackQueue<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // FIFO order: pop stack top-to-bottom, then push stack bottom-to-top
        f.debug_list()
            .entries(self.pop_stack.as_slice().iter().rev().map(|(v, _)| v))
            .entries(self.push_stack.as_slice().iter().map(|(v, _)| v))
            .finish()
    }
}
