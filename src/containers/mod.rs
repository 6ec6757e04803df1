//! Container types built on raw, explicitly managed memory
//!
//! Every structure here sits on the same foundations: [`RawStore<T>`] for
//! contiguous growable storage and the [`TryClone`] trait as the fallible
//! duplication seam.
//!
//! ## Sequence adaptors
//!
//! - **`Stack<T>`** - LIFO stack over a raw store
//! - **`Heap<T, O>`** - binary heap with a pluggable ordering policy
//! - **`TwoStackQueue<T, S>`** - FIFO queue from two stacks, carrying
//!   running per-element summaries (see [`MinMaxQueue`])
//! - **`FixedRingQueue<T, N>`** - inline circular buffer that overwrites
//!   its oldest element when full
//! - **`GrowRingQueue<T>`** - heap circular buffer with doubling growth
//!
//! ## Ordered structures
//!
//! - **`AaMap<K, V>`** - balanced ordered map (Andersson tree on a slab)
//! - **`SegmentTree<T, F>`** - associative range queries with point updates

mod aa_map;
mod heap;
mod min_max_queue;
mod raw_store;
mod ring_queue;
mod segment_tree;
mod stack;

pub use aa_map::{AaMap, Iter as AaMapIter, KeyCompare, OrdCompare};
pub use heap::{ByOrder, Heap, HeapOrder, MaxFirst, MaxHeap, MinFirst, MinHeap};
pub use min_max_queue::{MinMax, MinMaxQueue, RunningStat, TwoStackQueue};
pub use raw_store::{RawStore, TryClone};
pub use ring_queue::{FixedRingQueue, GrowRingQueue, RingIter};
pub use segment_tree::SegmentTree;
pub use stack::Stack;
