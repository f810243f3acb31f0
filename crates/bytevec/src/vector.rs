//! The growable byte-element vector.

use std::fmt;

use smallvec::SmallVec;

use crate::alloc::{ByteAllocator, SystemAllocator};
use crate::error::VecError;
use crate::policy::GrowthPolicy;
use crate::raw::RawBuf;

/// An element copied out of a vector.
///
/// Elements up to 16 bytes are held inline without a heap allocation.
pub type Element = SmallVec<[u8; 16]>;

/// Growable contiguous buffer of fixed-size byte elements.
///
/// Holds `len` elements of `elem_size` bytes in a buffer with room for
/// `capacity` elements. All memory comes from the allocator captured at
/// construction. Elements are opaque: they are copied verbatim and
/// never constructed or dropped.
///
/// References returned by [`get`](Self::get) borrow the vector, so the
/// borrow checker rejects any use across a call that could relocate the
/// buffer.
pub struct ByteVec<A: ByteAllocator = SystemAllocator> {
    buf: RawBuf,
    len: usize,
    cap: usize,
    elem_size: usize,
    policy: GrowthPolicy,
    alloc: A,
}

impl ByteVec<SystemAllocator> {
    /// Create a vector on the process-wide allocator with the default
    /// growth policy.
    pub fn new(elem_size: usize) -> Result<Self, VecError> {
        Self::with_allocator(SystemAllocator, elem_size)
    }
}

impl<A: ByteAllocator> ByteVec<A> {
    /// Create a vector that takes its memory from `alloc`.
    pub fn with_allocator(alloc: A, elem_size: usize) -> Result<Self, VecError> {
        Self::with_policy(alloc, elem_size, GrowthPolicy::default())
    }

    /// Create a vector with an explicit growth policy.
    ///
    /// Allocates `policy.initial_capacity` elements up front (nothing
    /// when it is zero).
    pub fn with_policy(alloc: A, elem_size: usize, policy: GrowthPolicy) -> Result<Self, VecError> {
        if elem_size == 0 {
            return Err(VecError::ZeroElementSize);
        }
        policy.validate()?;

        let mut vec = Self {
            buf: RawBuf::empty(),
            len: 0,
            cap: 0,
            elem_size,
            policy,
            alloc,
        };
        vec.set_capacity(vec.policy.initial_capacity)?;
        log::debug!(
            "vector created: elem_size={elem_size}, capacity={}",
            vec.cap
        );
        Ok(vec)
    }

    /// Release the buffer and zero length and capacity.
    ///
    /// Idempotent. The vector stays usable: a later growing operation
    /// allocates a fresh buffer through the same allocator.
    pub fn destroy(&mut self) {
        if self.buf.is_allocated() {
            log::debug!("vector destroyed: released {} bytes", self.buf.bytes());
        }
        self.buf.release(&self.alloc);
        self.len = 0;
        self.cap = 0;
    }

    /// Number of elements in use.
    pub fn len(&self) -> usize {
        self.len
    }

    /// `true` when the vector holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of elements the buffer has room for.
    pub fn capacity(&self) -> usize {
        self.cap
    }

    /// Byte size of one element.
    pub fn elem_size(&self) -> usize {
        self.elem_size
    }

    /// The growth policy captured at construction.
    pub fn policy(&self) -> &GrowthPolicy {
        &self.policy
    }

    /// The allocator captured at construction.
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    /// `true` when no buffer is held (destroyed, or zero capacity).
    pub fn is_unallocated(&self) -> bool {
        !self.buf.is_allocated()
    }

    /// Grow capacity geometrically until it is at least `min_capacity`.
    ///
    /// No-op when the capacity already suffices. Growth from an empty
    /// buffer starts at the policy's seed capacity.
    pub fn grow(&mut self, min_capacity: usize) -> Result<(), VecError> {
        let new_cap = self
            .policy
            .next_capacity(self.cap, min_capacity)
            .ok_or(VecError::CapacityOverflow)?;
        self.set_capacity(new_cap)
    }

    /// Ensure room for at least `min_capacity` elements, allocating
    /// exactly that many when growing.
    pub fn reserve(&mut self, min_capacity: usize) -> Result<(), VecError> {
        if self.cap >= min_capacity {
            return Ok(());
        }
        self.set_capacity(min_capacity)
    }

    /// Set the capacity to exactly `capacity` elements.
    ///
    /// Destructive: when `capacity < len` the trailing elements are
    /// discarded. `resize(0)` releases the buffer.
    pub fn resize(&mut self, capacity: usize) -> Result<(), VecError> {
        self.set_capacity(capacity)?;
        if self.len > capacity {
            log::debug!("resize truncated length {} -> {capacity}", self.len);
            self.len = capacity;
        }
        Ok(())
    }

    /// Drop spare capacity.
    pub fn shrink_to_fit(&mut self) -> Result<(), VecError> {
        self.resize(self.len)
    }

    /// Forget all elements, keeping the buffer.
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Append an element.
    pub fn push(&mut self, elem: &[u8]) -> Result<(), VecError> {
        self.check_elem(elem)?;
        self.grow_for_one()?;
        self.buf.write(self.offset(self.len), elem);
        self.len += 1;
        Ok(())
    }

    /// Remove and return the last element.
    pub fn pop(&mut self) -> Result<Element, VecError> {
        let last = self.len.checked_sub(1).ok_or(VecError::Underflow)?;
        let elem = Element::from_slice(self.slot(last));
        self.len = last;
        Ok(elem)
    }

    /// Remove the last element, copying it into `into`.
    pub fn pop_into(&mut self, into: &mut [u8]) -> Result<(), VecError> {
        self.check_elem(into)?;
        let last = self.len.checked_sub(1).ok_or(VecError::Underflow)?;
        into.copy_from_slice(self.slot(last));
        self.len = last;
        Ok(())
    }

    /// Insert `elem` at index `at`, shifting later elements right.
    ///
    /// Accepts `at == len` (equivalent to [`push`](Self::push)).
    pub fn insert(&mut self, elem: &[u8], at: usize) -> Result<(), VecError> {
        self.check_elem(elem)?;
        self.check_insert_index(at)?;
        self.grow_for_one()?;
        self.buf
            .copy_within(self.offset(at)..self.offset(self.len), self.offset(at + 1));
        self.buf.write(self.offset(at), elem);
        self.len += 1;
        Ok(())
    }

    /// Insert `elem` at index `at` in O(1).
    ///
    /// The element previously at `at` moves to the end, so order is not
    /// preserved.
    pub fn insert_fast(&mut self, elem: &[u8], at: usize) -> Result<(), VecError> {
        self.check_elem(elem)?;
        self.check_insert_index(at)?;
        self.grow_for_one()?;
        if at < self.len {
            self.buf
                .copy_within(self.offset(at)..self.offset(at + 1), self.offset(self.len));
        }
        self.buf.write(self.offset(at), elem);
        self.len += 1;
        Ok(())
    }

    /// Remove the element at `at`, shifting later elements left.
    pub fn remove(&mut self, at: usize) -> Result<(), VecError> {
        self.check_remove_index(at)?;
        self.buf
            .copy_within(self.offset(at + 1)..self.offset(self.len), self.offset(at));
        self.len -= 1;
        Ok(())
    }

    /// Remove the element at `at` in O(1) by moving the last element
    /// into its slot.
    pub fn remove_fast(&mut self, at: usize) -> Result<(), VecError> {
        self.check_remove_index(at)?;
        let last = self.len - 1;
        if at != last {
            self.buf
                .copy_within(self.offset(last)..self.offset(self.len), self.offset(at));
        }
        self.len = last;
        Ok(())
    }

    /// Bytes of the element at `at`, or `None` when out of range.
    pub fn get(&self, at: usize) -> Option<&[u8]> {
        (at < self.len).then(|| self.slot(at))
    }

    /// Mutable bytes of the element at `at`, or `None` when out of range.
    pub fn get_mut(&mut self, at: usize) -> Option<&mut [u8]> {
        if at >= self.len {
            return None;
        }
        let range = self.offset(at)..self.offset(at + 1);
        Some(self.buf.slice_mut(range))
    }

    /// All elements as one contiguous byte slice.
    pub fn as_bytes(&self) -> &[u8] {
        self.buf.slice(0..self.offset(self.len))
    }

    /// Mutable view of all elements.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        let end = self.offset(self.len);
        self.buf.slice_mut(0..end)
    }

    /// Base address of the buffer, for relocation checks.
    pub fn buffer_addr(&self) -> Option<usize> {
        self.buf.addr()
    }

    fn slot(&self, at: usize) -> &[u8] {
        self.buf.slice(self.offset(at)..self.offset(at + 1))
    }

    /// Byte offset of slot `at`. Never overflows for `at <= cap`, since
    /// `cap * elem_size` bytes were successfully allocated.
    fn offset(&self, at: usize) -> usize {
        at * self.elem_size
    }

    fn grow_for_one(&mut self) -> Result<(), VecError> {
        let target = self.len.checked_add(1).ok_or(VecError::CapacityOverflow)?;
        self.grow(target)
    }

    /// Reallocate to exactly `capacity` elements. Leaves all state
    /// untouched on failure.
    fn set_capacity(&mut self, capacity: usize) -> Result<(), VecError> {
        if capacity == self.cap && self.buf.is_allocated() == (capacity > 0) {
            return Ok(());
        }
        let bytes = capacity
            .checked_mul(self.elem_size)
            .ok_or(VecError::CapacityOverflow)?;
        self.buf.reallocate(&self.alloc, bytes)?;
        log::trace!("capacity {} -> {capacity} elements", self.cap);
        self.cap = capacity;
        Ok(())
    }

    fn check_elem(&self, elem: &[u8]) -> Result<(), VecError> {
        if elem.len() != self.elem_size {
            return Err(VecError::ElementSizeMismatch {
                expected: self.elem_size,
                actual: elem.len(),
            });
        }
        Ok(())
    }

    fn check_insert_index(&self, at: usize) -> Result<(), VecError> {
        if at > self.len {
            return Err(VecError::IndexOutOfRange {
                index: at,
                len: self.len,
            });
        }
        Ok(())
    }

    fn check_remove_index(&self, at: usize) -> Result<(), VecError> {
        if self.len == 0 {
            return Err(VecError::Underflow);
        }
        if at >= self.len {
            return Err(VecError::IndexOutOfRange {
                index: at,
                len: self.len,
            });
        }
        Ok(())
    }
}

impl<A: ByteAllocator> Drop for ByteVec<A> {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl<A: ByteAllocator> fmt::Debug for ByteVec<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteVec")
            .field("len", &self.len)
            .field("capacity", &self.cap)
            .field("elem_size", &self.elem_size)
            .finish_non_exhaustive()
    }
}
