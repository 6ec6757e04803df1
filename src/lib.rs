//! # dskit: Data Structures on Explicitly Managed Memory
//!
//! This crate provides a family of container types built directly on raw
//! allocations rather than on `Vec`, with uniform error reporting and a
//! fallible-duplication model for element types whose copies can fail.
//!
//! ## Key Features
//!
//! - **Raw Backing Store**: [`RawStore<T>`] owns a contiguous allocation
//!   with explicit growth and strong rollback on failed element clones
//! - **Fallible Duplication**: the [`TryClone`] trait marks copy operations
//!   that may fail; container clones roll back cleanly when one does
//! - **Ordering Adaptors**: [`Heap`] takes min-first, max-first or
//!   closure-driven orderings through the [`HeapOrder`] policy trait
//! - **Running Summaries**: [`TwoStackQueue`] folds a [`RunningStat`] over
//!   its contents, giving [`MinMaxQueue`] O(1) min/max of a sliding window
//! - **Circular Buffers**: a fixed inline ring that overwrites its oldest
//!   element and a growable ring that relinearizes on growth
//! - **Balanced Map**: [`AaMap`] keeps an Andersson tree on a `u32` slab
//!   with recycled ids, a cached minimum, and a pluggable key ordering
//!   through [`KeyCompare`]
//! - **Range Queries**: [`SegmentTree`] answers associative range queries
//!   with point updates in logarithmic time
//!
//! ## Quick Start
//!
//! ```rust
//! use dskit::{AaMap, MinHeap, MinMaxQueue, Stack};
//!
//! let mut stack = Stack::new();
//! stack.push(42)?;
//! assert_eq!(stack.top()?, &42);
//!
//! let mut heap = MinHeap::new();
//! heap.push(7)?;
//! heap.push(3)?;
//! assert_eq!(heap.pop()?, 3);
//!
//! let mut window: MinMaxQueue<i32> = MinMaxQueue::new();
//! for v in [3, 1, 4] {
//!     window.push(v)?;
//! }
//! assert_eq!(window.max_diff()?, 3);
//!
//! let mut map = AaMap::new();
//! map.insert("answer", 42)?;
//! assert_eq!(map.get(&"answer"), Some(&42));
//! # Ok::<(), dskit::DskitError>(())
//! ```

#![warn(missing_docs)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod containers;
pub mod error;

pub use containers::{
    AaMap, AaMapIter, ByOrder, FixedRingQueue, GrowRingQueue, Heap, HeapOrder, KeyCompare,
    MaxFirst, MaxHeap, MinFirst, MinHeap, MinMax, MinMaxQueue, OrdCompare, RawStore, RingIter,
    RunningStat, SegmentTree, Stack, TryClone, TwoStackQueue,
};
pub use error::{DskitError, Result};
