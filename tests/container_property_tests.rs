//! Property-based testing for the container types
//!
//! Each container is driven by randomized operation sequences and checked
//! against the equivalent std collection as a model, plus its own
//! structural invariants where it has them.

use proptest::prelude::*;
use std::collections::{BTreeMap, BinaryHeap, VecDeque};

use dskit::{
    AaMap, FixedRingQueue, GrowRingQueue, MaxFirst, MaxHeap, MinMaxQueue, SegmentTree, Stack,
};

// =============================================================================
// PROPERTY TEST GENERATORS
// =============================================================================

/// Map operations mirrored against a `BTreeMap` model
#[derive(Debug, Clone)]
enum MapOp {
    Insert(i32, i64),
    Remove(i32),
    Get(i32),
}

fn map_ops_strategy() -> impl Strategy<Value = Vec<MapOp>> {
    prop::collection::vec(
        prop_oneof![
            (-50i32..50, any::<i64>()).prop_map(|(k, v)| MapOp::Insert(k, v)),
            (-50i32..50).prop_map(MapOp::Remove),
            (-50i32..50).prop_map(MapOp::Get),
        ],
        0..200,
    )
}

// =============================================================================
// STACK PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn prop_stack_matches_vec(values in prop::collection::vec(any::<i32>(), 0..100)) {
        let mut stack = Stack::new();
        let mut model = Vec::new();

        for &v in &values {
            stack.push(v).unwrap();
            model.push(v);
            prop_assert_eq!(stack.top().unwrap(), model.last().unwrap());
        }
        prop_assert_eq!(stack.as_slice(), model.as_slice());

        while let Ok(v) = stack.pop() {
            prop_assert_eq!(Some(v), model.pop());
        }
        prop_assert!(model.is_empty());
    }
}

// =============================================================================
// HEAP PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn prop_heap_matches_binary_heap(values in prop::collection::vec(any::<i32>(), 0..200)) {
        let mut heap = MaxHeap::new();
        let mut model = BinaryHeap::new();

        for &v in &values {
            heap.push(v).unwrap();
            model.push(v);
            prop_assert_eq!(heap.top().ok(), model.peek());
        }

        // Draining both must produce the same non-increasing sequence
        while let Some(expected) = model.pop() {
            prop_assert_eq!(heap.pop().unwrap(), expected);
        }
        prop_assert!(heap.is_empty());
    }

    #[test]
    fn prop_heap_from_slice_sorts(values in prop::collection::vec(any::<i32>(), 1..100)) {
        let mut heap = MaxHeap::from_slice(&values, MaxFirst).unwrap();
        let mut drained = Vec::with_capacity(values.len());
        while let Ok(v) = heap.pop() {
            drained.push(v);
        }
        let mut expected = values.clone();
        expected.sort_unstable_by(|a, b| b.cmp(a));
        prop_assert_eq!(drained, expected);
    }
}

// =============================================================================
// TWO-STACK QUEUE PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn prop_min_max_queue_matches_deque(
        ops in prop::collection::vec(prop_oneof![
            (-1_000_000i32..1_000_000).prop_map(Some),
            Just(None),
        ], 0..200)
    ) {
        let mut queue = MinMaxQueue::new();
        let mut model: VecDeque<i32> = VecDeque::new();

        for op in ops {
            match op {
                Some(v) => {
                    queue.push(v).unwrap();
                    model.push_back(v);
                }
                None => {
                    prop_assert_eq!(queue.pop().ok(), model.pop_front());
                }
            }

            prop_assert_eq!(queue.len(), model.len());
            prop_assert_eq!(queue.front().ok(), model.front());
            prop_assert_eq!(queue.back().ok(), model.back());

            if !model.is_empty() {
                let min = *model.iter().min().unwrap();
                let max = *model.iter().max().unwrap();
                prop_assert_eq!(queue.max_diff().unwrap(), max - min);
            } else {
                prop_assert!(queue.max_diff().is_err());
            }
        }
    }
}

// =============================================================================
// RING QUEUE PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn prop_fixed_ring_keeps_newest(values in prop::collection::vec(any::<i32>(), 0..100)) {
        const CAP: usize = 8;
        let mut queue: FixedRingQueue<i32, CAP> = FixedRingQueue::new();
        for &v in &values {
            queue.push(v);
        }

        // The queue must hold exactly the last CAP values, in order
        let expected: Vec<i32> = values.iter().rev().take(CAP).rev().copied().collect();
        prop_assert_eq!(queue.iter().copied().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn prop_grow_ring_matches_deque(
        ops in prop::collection::vec(prop_oneof![
            any::<i32>().prop_map(Some),
            Just(None),
        ], 0..300)
    ) {
        let mut queue = GrowRingQueue::new();
        let mut model: VecDeque<i32> = VecDeque::new();

        for op in ops {
            match op {
                Some(v) => {
                    queue.push(v).unwrap();
                    model.push_back(v);
                }
                None => {
                    prop_assert_eq!(queue.pop().ok(), model.pop_front());
                }
            }
            prop_assert_eq!(queue.len(), model.len());
            prop_assert_eq!(queue.front().ok(), model.front());
            prop_assert_eq!(queue.back().ok(), model.back());
        }

        prop_assert!(queue.iter().eq(model.iter()));
    }
}

// =============================================================================
// AA MAP PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn prop_map_matches_btreemap(ops in map_ops_strategy()) {
        let mut map = AaMap::new();
        let mut model = BTreeMap::new();

        for op in ops {
            match op {
                MapOp::Insert(k, v) => {
                    let existed = model.contains_key(&k);
                    let (stored, fresh) = map.insert(k, v).unwrap();
                    // An existing entry blocks the insertion and keeps its value
                    prop_assert_eq!(fresh, !existed);
                    prop_assert_eq!(*stored, *model.entry(k).or_insert(v));
                }
                MapOp::Remove(k) => {
                    prop_assert_eq!(map.remove(&k), model.remove(&k));
                }
                MapOp::Get(k) => {
                    prop_assert_eq!(map.get(&k), model.get(&k));
                }
            }

            // Level, ordering, parent-link and cache invariants after every op
            map.check_invariants();
            prop_assert_eq!(map.len(), model.len());
            prop_assert_eq!(map.first(), model.first_key_value());
            prop_assert_eq!(map.last(), model.last_key_value());
        }

        // Iteration order must agree with the ordered model, both ways
        prop_assert!(map.iter().eq(model.iter()));
        prop_assert!(map.iter().rev().eq(model.iter().rev()));
    }
}

// =============================================================================
// SEGMENT TREE PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn prop_segment_tree_matches_naive_sums(
        mut values in prop::collection::vec(-1000i64..1000, 1..64),
        updates in prop::collection::vec((0usize..64, -1000i64..1000), 0..20),
        queries in prop::collection::vec((0usize..64, 0usize..64), 1..20),
    ) {
        let mut tree = SegmentTree::build(&values, 0i64, |a, b| a + b).unwrap();

        for (i, v) in updates {
            let i = i % values.len();
            tree.update(i, v).unwrap();
            values[i] = v;
        }

        for (a, b) in queries {
            let a = a % values.len();
            let b = b % values.len();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let expected: i64 = values[lo..=hi].iter().sum();
            prop_assert_eq!(tree.query(lo, hi).unwrap(), expected);
        }
    }
}
