//! RawStore: capacity-tracked raw buffer with manual element lifetimes
//!
//! `RawStore<T>` is the backing-store discipline shared by the stack, heap
//! and growable ring queue: slots `[0, len)` hold constructed values, slots
//! `[len, cap)` are uninitialized memory. Growth relocates live elements
//! with a bitwise move into a fresh buffer and releases the old one only
//! afterwards, so a failed allocation leaves the store untouched.
//!
//! Duplication goes through [`TryClone`], a fallible clone seam: if cloning
//! element `k` fails, the `[0, k)` elements already constructed in the
//! destination are destroyed and the destination buffer released before the
//! error propagates. The source is never mutated.

use crate::error::{DskitError, Result};
use std::alloc::{self, Layout};
use std::fmt;
use std::mem;
use std::ptr::{self, NonNull};
use std::slice;

/// Fallible clone.
///
/// Containers duplicate their elements through this trait instead of
/// [`Clone`] so that element types whose copy operation can fail (including
/// failure-injecting test harness types) propagate the error instead of
/// panicking, and so the container can roll back partially built state.
pub trait TryClone: Sized {
    /// Attempt to clone `self`.
    fn try_clone(&self) -> Result<Self>;
}

macro_rules! impl_try_clone_infallible {
    ($($t:ty),* $(,)?) => {
        $(
            impl TryClone for $t {
                #[inline]
                fn try_clone(&self) -> Result<Self> {
                    Ok(self.clone())
                }
            }
        )*
    };
}

impl_try_clone_infallible!(
    (), u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64, bool, char,
    String
);

impl<T: TryClone> TryClone for Option<T> {
    fn try_clone(&self) -> Result<Self> {
        match self {
            Some(v) => Ok(Some(v.try_clone()?)),
            None => Ok(None),
        }
    }
}

impl<A: TryClone, B: TryClone> TryClone for (A, B) {
    fn try_clone(&self) -> Result<Self> {
        Ok((self.0.try_clone()?, self.1.try_clone()?))
    }
}

/// Owns a partially constructed buffer during a fallible copy.
///
/// On drop, destroys the `built` prefix and releases the buffer. The happy
/// path defuses the guard with [`mem::forget`] once every element is in
/// place, transferring ownership to the store being assembled.
struct BuildGuard<T> {
    ptr: *mut T,
    built: usize,
    cap: usize,
}

impl<T> Drop for BuildGuard<T> {
    fn drop(&mut self) {
        unsafe {
            for i in 0..self.built {
                // SAFETY: exactly `built` elements were constructed at [0, built)
                ptr::drop_in_place(self.ptr.add(i));
            }
            if mem::size_of::<T>() > 0 && self.cap > 0 {
                let layout = Layout::array::<T>(self.cap).unwrap();
                // SAFETY: `ptr` was allocated with this layout
                alloc::dealloc(self.ptr as *mut u8, layout);
            }
        }
    }
}

/// Capacity-tracked raw buffer with manual element lifetime management
///
/// # Examples
///
/// ```rust
/// use dskit::RawStore;
///
/// let mut store = RawStore::new();
/// store.push(42)?;
/// store.push(84)?;
/// assert_eq!(store.as_slice(), &[42, 84]);
/// # Ok::<(), dskit::DskitError>(())
/// ```
pub struct RawStore<T> {
    ptr: Option<NonNull<T>>,
    len: usize,
    cap: usize,
}

impl<T> RawStore<T> {
    /// Create a new empty store with no allocation
    #[inline]
    pub fn new() -> Self {
        Self {
            ptr: None,
            len: 0,
            cap: 0,
        }
    }

    /// Create a store with the specified capacity
    pub fn with_capacity(cap: usize) -> Result<Self> {
        if cap == 0 {
            return Ok(Self::new());
        }
        let ptr = Self::allocate(cap)?;
        Ok(Self {
            ptr: Some(ptr),
            len: 0,
            cap,
        })
    }

    /// Reserve uninitialized memory for `cap` elements; never constructs any.
    /// Zero-sized element types get a dangling buffer and no allocation.
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

    /// Number of constructed elements
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when no elements are constructed
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of allocated slots
    #[inline]
    pub fn capacity(&self) -> usize {
        self.cap
    }

    #[inline]
    fn as_ptr(&self) -> *const T {
        match self.ptr {
            Some(ptr) => ptr.as_ptr(),
            None => ptr::null(),
        }
    }

    #[inline]
    fn as_mut_ptr(&mut self) -> *mut T {
        match self.ptr {
            Some(ptr) => ptr.as_ptr(),
            None => ptr::null_mut(),
        }
    }

    /// View the constructed elements as a slice
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        if self.len == 0 {
            &[]
        } else {
            // SAFETY: [0, len) are constructed
            unsafe { slice::from_raw_parts(self.as_ptr(), self.len) }
        }
    }

    /// View the constructed elements as a mutable slice
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        if self.len == 0 {
            &mut []
        } else {
            let len = self.len;
            // SAFETY: [0, len) are constructed, exclusively borrowed
            unsafe { slice::from_raw_parts_mut(self.as_mut_ptr(), len) }
        }
    }

    /// Reference to the element at `index`, if constructed
    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    /// Mutable reference to the element at `index`, if constructed
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.as_mut_slice().get_mut(index)
    }

    /// Swap the elements at `i` and `j`
    #[inline]
    pub fn swap(&mut self, i: usize, j: usize) {
        self.as_mut_slice().swap(i, j);
    }

    /// Ensure room for at least `additional` more elements
    pub fn reserve(&mut self, additional: usize) -> Result<()> {
        let required = self
            .len
            .checked_add(additional)
            .ok_or_else(|| DskitError::out_of_memory(usize::MAX))?;
        if required <= self.cap {
            return Ok(());
        }
        // Doubling growth, 0 -> 1, for amortized O(1) push
        let target = required.max(self.cap.saturating_mul(2)).max(1);
        self.grow_to(target)
    }

    /// Relocate every live element into a fresh buffer of `new_cap` slots.
    ///
    /// The old buffer is released only after all elements have moved; an
    /// allocation failure leaves the store unchanged.
    fn grow_to(&mut self, new_cap: usize) -> Result<()> {
        debug_assert!(new_cap >= self.len);
        let new_ptr = Self::allocate(new_cap)?;
        if let Some(old) = self.ptr {
            unsafe {
                // SAFETY: both buffers are distinct allocations sized for len
                ptr::copy_nonoverlapping(old.as_ptr(), new_ptr.as_ptr(), self.len);
                // SAFETY: old buffer came from allocate(cap); its elements
                // now live in the new buffer, so no drops here
                Self::deallocate(old, self.cap);
            }
        }
        self.ptr = Some(new_ptr);
        self.cap = new_cap;
        Ok(())
    }

    /// Placement-construct `value` after the last element, growing if needed
    pub fn push(&mut self, value: T) -> Result<()> {
        if self.len == self.cap {
            self.reserve(1)?;
        }
        unsafe {
            // SAFETY: slot `len` is within capacity and uninitialized
            ptr::write(self.as_mut_ptr().add(self.len), value);
        }
        self.len += 1;
        Ok(())
    }

    /// Remove and return the last element
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            None
        } else {
            self.len -= 1;
            // SAFETY: slot `len` was the last constructed element
            Some(unsafe { ptr::read(self.as_ptr().add(self.len)) })
        }
    }

    /// Destroy all constructed elements, keeping the allocation
    pub fn clear(&mut self) {
        for i in 0..self.len {
            unsafe {
                // SAFETY: [0, len) are constructed; each dropped exactly once
                ptr::drop_in_place(self.as_mut_ptr().add(i));
            }
        }
        self.len = 0;
    }
}

impl<T: TryClone> RawStore<T> {
    /// Build a store by fallibly cloning a slice.
    ///
    /// If cloning element `k` fails, the `[0, k)` destination elements are
    /// destroyed and the buffer released before the error propagates.
    pub fn try_from_slice(source: &[T]) -> Result<Self> {
        if source.is_empty() {
            return Ok(Self::new());
        }
        let cap = source.len();
        let ptr = Self::allocate(cap)?;
        let mut guard = BuildGuard {
            ptr: ptr.as_ptr(),
            built: 0,
            cap,
        };
        for item in source {
            let cloned = item.try_clone()?;
            unsafe {
                // SAFETY: `built` < cap, slot uninitialized
                ptr::write(guard.ptr.add(guard.built), cloned);
            }
            guard.built += 1;
        }
        let len = guard.built;
        mem::forget(guard);
        Ok(Self {
            ptr: Some(ptr),
            len,
            cap,
        })
    }

    /// Fallible clone with the same capacity as `self`.
    ///
    /// Strong failure safety: on error the destination is fully rolled back
    /// and `self` is untouched.
    pub fn try_clone(&self) -> Result<Self> {
        if self.cap == 0 {
            return Ok(Self::new());
        }
        let ptr = Self::allocate(self.cap)?;
        let mut guard = BuildGuard {
            ptr: ptr.as_ptr(),
            built: 0,
            cap: self.cap,
        };
        for item in self.as_slice() {
            let cloned = item.try_clone()?;
            unsafe {
                // SAFETY: `built` < cap, slot uninitialized
                ptr::write(guard.ptr.add(guard.built), cloned);
            }
            guard.built += 1;
        }
        let len = guard.built;
        mem::forget(guard);
        Ok(Self {
            ptr: Some(ptr),
            len,
            cap: self.cap,
        })
    }
}

impl<T> Default for RawStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for RawStore<T> {
    fn drop(&mut self) {
        self.clear();
        if let Some(ptr) = self.ptr {
            // SAFETY: buffer came from allocate(cap), all elements dropped
            unsafe { Self::deallocate(ptr, self.cap) };
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for RawStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

// SAFETY: RawStore<T> owns its buffer exclusively; Send/Sync follow T
unsafe impl<T: Send> Send for RawStore<T> {}
unsafe impl<T: Sync> Sync for RawStore<T> {}
