//! Circular buffer queues
//!
//! Two variants share the modular-index layout but differ in policy:
//!
//! - [`FixedRingQueue<T, N>`] keeps its storage inline (const-generic
//!   capacity, no heap allocation) and, when full, **overwrites the oldest
//!   element** — a deliberate bounded-producer policy, not an error.
//! - [`GrowRingQueue<T>`] lives on the heap and doubles its capacity when
//!   full, relinearizing the circular contents to index 0 of the fresh
//!   buffer before inserting.
//!
//! Live elements occupy the capacity-modular index range
//! `[head, head + len)`.

use crate::containers::raw_store::TryClone;
use crate::error::{DskitError, Result};
use std::alloc::{self, Layout};
use std::fmt;
use std::mem::{self, MaybeUninit};
use std::ptr::{self, NonNull};

/// Fixed-capacity inline circular queue that overwrites when full
///
/// # Examples
///
/// ```rust
/// use dskit::FixedRingQueue;
///
/// let mut queue: FixedRingQueue<i32, 3> = FixedRingQueue::new();
/// for v in [1, 2, 3, 4] {
///     queue.push(v);
/// }
/// // 1 was overwritten
/// assert_eq!(queue.front()?, &2);
/// assert_eq!(queue.back()?, &4);
/// # Ok::<(), dskit::DskitError>(())
/// ```
pub struct FixedRingQueue<T, const N: usize> {
    buffer: [MaybeUninit<T>; N],
    head: usize,
    len: usize,
}

impl<T, const N: usize> FixedRingQueue<T, N> {
    /// Create an empty queue; all storage is inline
    pub fn new() -> Self {
        Self {
            buffer: [const { MaybeUninit::uninit() }; N],
            head: 0,
            len: 0,
        }
    }

    /// Capacity (the const parameter `N`)
    #[inline]
    pub fn capacity(&self) -> usize {
        N
    }

    /// Number of live elements
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when the queue holds no elements
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// True when a further push would overwrite the oldest element
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == N
    }

    /// Append a value; when full, the oldest element is dropped in place
    /// and both ends advance
    pub fn push(&mut self, value: T) {
        if N == 0 {
            // Zero-capacity queue holds nothing; the value is dropped
            return;
        }
        let tail = (self.head + self.len) % N;
        if self.len == N {
            // tail == head when full; the oldest element dies here
            unsafe {
                // SAFETY: the slot at head holds a live element
                ptr::drop_in_place(self.buffer[tail].as_mut_ptr());
                self.buffer[tail].as_mut_ptr().write(value);
            }
            self.head = (self.head + 1) % N;
        } else {
            // SAFETY: slot at tail is uninitialized when not full
            unsafe {
                self.buffer[tail].as_mut_ptr().write(value);
            }
            self.len += 1;
        }
    }

    /// Remove and return the oldest element
    pub fn pop(&mut self) -> Result<T> {
        if self.len == 0 {
            return Err(DskitError::container_empty("ring queue"));
        }
        // SAFETY: the slot at head holds a live element
        let value = unsafe { self.buffer[self.head].as_ptr().read() };
        self.head = (self.head + 1) % N;
        self.len -= 1;
        Ok(value)
    }

    /// Reference to the oldest element
    pub fn front(&self) -> Result<&T> {
        if self.len == 0 {
            return Err(DskitError::container_empty("ring queue"));
        }
        // SAFETY: the slot at head holds a live element
        Ok(unsafe { self.buffer[self.head].assume_init_ref() })
    }

    /// Reference to the newest element
    pub fn back(&self) -> Result<&T> {
        if self.len == 0 {
            return Err(DskitError::container_empty("ring queue"));
        }
        let back = (self.head + self.len - 1) % N;
        // SAFETY: the slot holds a live element
        Ok(unsafe { self.buffer[back].assume_init_ref() })
    }

    /// Destroy all live elements
    pub fn clear(&mut self) {
        for i in 0..self.len {
            let idx = (self.head + i) % N;
            // SAFETY: [head, head + len) modular slots are live
            unsafe {
                ptr::drop_in_place(self.buffer[idx].as_mut_ptr());
            }
        }
        self.head = 0;
        self.len = 0;
    }

    /// Iterate the live elements oldest-first
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        (0..self.len).map(move |i| {
            let idx = (self.head + i) % N;
            // SAFETY: [head, head + len) modular slots are live
            unsafe { self.buffer[idx].assume_init_ref() }
        })
    }
}

impl<T, const N: usize> Default for FixedRingQueue<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> Drop for FixedRingQueue<T, N> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T: fmt::Debug, const N: usize> fmt::Debug for FixedRingQueue<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Growable heap-resident circular queue
///
/// Doubles capacity when full; the old circular layout is relinearized into
/// the fresh buffer starting at index 0 before the new element is inserted.
///
/// # Examples
///
/// ```rust
/// use dskit::GrowRingQueue;
///
/// let mut queue = GrowRingQueue::new();
/// for v in 0..100 {
///     queue.push(v)?;
/// }
/// assert_eq!(queue.pop()?, 0);
/// assert_eq!(queue.len(), 99);
/// # Ok::<(), dskit::DskitError>(())
/// ```
pub struct GrowRingQueue<T> {
    ptr: Option<NonNull<T>>,
    cap: usize,
    head: usize,
    len: usize,
}

impl<T> GrowRingQueue<T> {
    /// Create an empty queue with no allocation
    pub fn new() -> Self {
        Self {
            ptr: None,
            cap: 0,
            head: 0,
            len: 0,
        }
    }

    /// Create an empty queue with the given capacity
    pub fn with_capacity(cap: usize) -> Result<Self> {
        if cap == 0 {
            return Ok(Self::new());
        }
        let ptr = Self::allocate(cap)?;
        Ok(Self {
            ptr: Some(ptr),
            cap,
            head: 0,
            len: 0,
        })
    }

    /// Zero-sized element types get a dangling buffer and no allocation
    fn allocate(cap: usize) -> Result<NonNull<T>> {
        if mem::size_of::<T>() == 0 {
            return Ok(NonNull::dangling());
        }
        let layout = Layout::array::<T>(cap)
            .map_err(|_| DskitError::out_of_memory(cap.saturating_mul(mem::size_of::<T>())))?;
        // SAFETY: layout has non-zero size for cap > 0 and non-zero-sized T
        let raw = unsafe { alloc::alloc(layout) as *mut T };
        NonNull::new(raw).ok_or_else(|| DskitError::out_of_memory(layout.size()))
    }

    /// Release a buffer obtained from [`Self::allocate`]; no-op for
    /// zero-sized element types
    unsafe fn deallocate(ptr: NonNull<T>, cap: usize) {
        if mem::size_of::<T>() == 0 || cap == 0 {
            return;
        }
        let layout = Layout::array::<T>(cap).unwrap();
        // SAFETY: caller guarantees `ptr` was allocated with this layout
        unsafe { alloc::dealloc(ptr.as_ptr() as *mut u8, layout) };
    }

    /// Number of live elements
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when the queue holds no elements
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Allocated capacity
    #[inline]
    pub fn capacity(&self) -> usize {
        self.cap
    }

    #[inline]
    fn buf(&self) -> *mut T {
        match self.ptr {
            Some(ptr) => ptr.as_ptr(),
            None => ptr::null_mut(),
        }
    }

    /// Double the capacity (0 -> 1), relinearizing live elements to index 0.
    ///
    /// Elements relocate with a bitwise move; the old buffer is released
    /// only after both segments have moved, so an allocation failure leaves
    /// the queue unchanged.
    fn grow(&mut self) -> Result<()> {
        let new_cap = if self.cap == 0 { 1 } else { self.cap * 2 };
        let new_ptr = Self::allocate(new_cap)?;
        if let Some(old) = self.ptr {
            let first = self.len.min(self.cap - self.head);
            let second = self.len - first;
            unsafe {
                // SAFETY: [head, head + first) is live and in-bounds
                ptr::copy_nonoverlapping(old.as_ptr().add(self.head), new_ptr.as_ptr(), first);
                // SAFETY: wrapped segment [0, second) is live
                ptr::copy_nonoverlapping(old.as_ptr(), new_ptr.as_ptr().add(first), second);
                // SAFETY: elements moved out; only the allocation remains
                Self::deallocate(old, self.cap);
            }
        }
        self.ptr = Some(new_ptr);
        self.cap = new_cap;
        self.head = 0;
        Ok(())
    }

    /// Append a value, growing the buffer when full
    pub fn push(&mut self, value: T) -> Result<()> {
        if self.len == self.cap {
            self.grow()?;
        }
        let tail = (self.head + self.len) % self.cap;
        // SAFETY: slot at tail is uninitialized (len < cap after grow)
        unsafe {
            self.buf().add(tail).write(value);
        }
        self.len += 1;
        Ok(())
    }

    /// Remove and return the oldest element
    pub fn pop(&mut self) -> Result<T> {
        if self.len == 0 {
            return Err(DskitError::container_empty("ring queue"));
        }
        // SAFETY: the slot at head holds a live element
        let value = unsafe { self.buf().add(self.head).read() };
        self.head = (self.head + 1) % self.cap;
        self.len -= 1;
        Ok(value)
    }

    /// Reference to the oldest element
    pub fn front(&self) -> Result<&T> {
        if self.len == 0 {
            return Err(DskitError::container_empty("ring queue"));
        }
        // SAFETY: the slot at head holds a live element
        Ok(unsafe { &*self.buf().add(self.head) })
    }

    /// Reference to the newest element
    pub fn back(&self) -> Result<&T> {
        if self.len == 0 {
            return Err(DskitError::container_empty("ring queue"));
        }
        let back = (self.head + self.len - 1) % self.cap;
        // SAFETY: the slot holds a live element
        Ok(unsafe { &*self.buf().add(back) })
    }

    /// Destroy all live elements, keeping the allocation
    pub fn clear(&mut self) {
        for i in 0..self.len {
            let idx = (self.head + i) % self.cap;
            // SAFETY: [head, head + len) modular slots are live
            unsafe {
                ptr::drop_in_place(self.buf().add(idx));
            }
        }
        self.head = 0;
        self.len = 0;
    }

    /// Iterate the live elements oldest-first
    pub fn iter(&self) -> RingIter<'_, T> {
        RingIter {
            queue: self,
            pos: 0,
        }
    }
}

impl<T: TryClone> GrowRingQueue<T> {
    /// Fallible clone with rollback on element failure.
    ///
    /// Clones into a fresh linearized queue; on a failing element the
    /// partial clone is dropped whole before the error propagates, leaving
    /// `self` untouched.
    pub fn try_clone(&self) -> Result<Self> {
        let mut out = Self::with_capacity(self.cap)?;
        for item in self.iter() {
            out.push(item.try_clone()?)?;
        }
        Ok(out)
    }
}

impl<T> Default for GrowRingQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for GrowRingQueue<T> {
    fn drop(&mut self) {
        self.clear();
        if let Some(ptr) = self.ptr {
            // SAFETY: buffer came from allocate(cap), all elements dropped
            unsafe { Self::deallocate(ptr, self.cap) };
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for GrowRingQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for GrowRingQueue<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for GrowRingQueue<T> {}

// SAFETY: GrowRingQueue owns its buffer exclusively; Send/Sync follow T
unsafe impl<T: Send> Send for GrowRingQueue<T> {}
unsafe impl<T: Sync> Sync for GrowRingQueue<T> {}

/// Oldest-first iterator over a [`GrowRingQueue`]
pub struct RingIter<'a, T> {
    queue: &'a GrowRingQueue<T>,
    pos: usize,
}

impl<'a, T> Iterator for RingIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos == self.queue.len {
            return None;
        }
        let idx = (self.queue.head + self.pos) % self.queue.cap;
        self.pos += 1;
        // SAFETY: [head, head + len) modular slots are live
        Some(unsafe { &*self.queue.buf().add(idx) })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.queue.len - self.pos;
        (remaining, Some(remaining))
    }
}

impl<'a, T> ExactSizeIterator for RingIter<'a, T> {}
