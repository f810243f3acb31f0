//! Typed view over a [`ByteVec`].
//!
//! [`TypedVec<T>`] stores plain-old-data values (`T: bytemuck::Pod`) in a
//! byte vector whose element size is `size_of::<T>()`. Since `Pod` types
//! have no drop glue and every bit pattern is valid, byte-wise copying
//! is exactly the value semantics the vector provides.

use std::marker::PhantomData;
use std::mem;

use bytemuck::Pod;

use crate::alloc::{ByteAllocator, SystemAllocator, BUFFER_ALIGN};
use crate::error::VecError;
use crate::policy::GrowthPolicy;
use crate::vector::ByteVec;

/// A [`ByteVec`] holding values of type `T`.
pub struct TypedVec<T: Pod, A: ByteAllocator = SystemAllocator> {
    inner: ByteVec<A>,
    _marker: PhantomData<T>,
}

impl<T: Pod> TypedVec<T, SystemAllocator> {
    /// Create a typed vector on the process-wide allocator.
    pub fn new() -> Result<Self, VecError> {
        Self::with_allocator(SystemAllocator)
    }
}

impl<T: Pod, A: ByteAllocator> TypedVec<T, A> {
    /// Create a typed vector that takes its memory from `alloc`.
    pub fn with_allocator(alloc: A) -> Result<Self, VecError> {
        Self::with_policy(alloc, GrowthPolicy::default())
    }

    /// Create a typed vector with an explicit growth policy.
    ///
    /// Fails for zero-sized `T` and for alignments above
    /// [`BUFFER_ALIGN`].
    pub fn with_policy(alloc: A, policy: GrowthPolicy) -> Result<Self, VecError> {
        if mem::align_of::<T>() > BUFFER_ALIGN {
            return Err(VecError::UnsupportedAlignment {
                align: mem::align_of::<T>(),
                max: BUFFER_ALIGN,
            });
        }
        let inner = ByteVec::with_policy(alloc, mem::size_of::<T>(), policy)?;
        Ok(Self {
            inner,
            _marker: PhantomData,
        })
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// `true` when no values are stored.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Number of values the buffer has room for.
    pub fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    /// See [`ByteVec::grow`].
    pub fn grow(&mut self, min_capacity: usize) -> Result<(), VecError> {
        self.inner.grow(min_capacity)
    }

    /// See [`ByteVec::reserve`].
    pub fn reserve(&mut self, min_capacity: usize) -> Result<(), VecError> {
        self.inner.reserve(min_capacity)
    }

    /// See [`ByteVec::resize`].
    pub fn resize(&mut self, capacity: usize) -> Result<(), VecError> {
        self.inner.resize(capacity)
    }

    /// See [`ByteVec::destroy`].
    pub fn destroy(&mut self) {
        self.inner.destroy();
    }

    /// Forget all values, keeping the buffer.
    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// Append a value.
    pub fn push(&mut self, value: T) -> Result<(), VecError> {
        self.inner.push(bytemuck::bytes_of(&value))
    }

    /// Remove and return the last value.
    pub fn pop(&mut self) -> Result<T, VecError> {
        let mut out = T::zeroed();
        self.inner.pop_into(bytemuck::bytes_of_mut(&mut out))?;
        Ok(out)
    }

    /// Order-preserving insert.
    pub fn insert(&mut self, value: T, at: usize) -> Result<(), VecError> {
        self.inner.insert(bytemuck::bytes_of(&value), at)
    }

    /// O(1) insert; the displaced value moves to the end.
    pub fn insert_fast(&mut self, value: T, at: usize) -> Result<(), VecError> {
        self.inner.insert_fast(bytemuck::bytes_of(&value), at)
    }

    /// Order-preserving remove.
    pub fn remove(&mut self, at: usize) -> Result<(), VecError> {
        self.inner.remove(at)
    }

    /// O(1) remove; the last value fills the hole.
    pub fn remove_fast(&mut self, at: usize) -> Result<(), VecError> {
        self.inner.remove_fast(at)
    }

    /// The value at `at`, or `None` when out of range.
    pub fn get(&self, at: usize) -> Option<&T> {
        // Slot offsets are multiples of size_of::<T>() from a
        // BUFFER_ALIGN-aligned base, hence aligned for T.
        self.inner.get(at).map(|bytes| bytemuck::from_bytes(bytes))
    }

    /// Mutable access to the value at `at`.
    pub fn get_mut(&mut self, at: usize) -> Option<&mut T> {
        self.inner.get_mut(at).map(|bytes| bytemuck::from_bytes_mut(bytes))
    }

    /// All values as a slice.
    pub fn as_slice(&self) -> &[T] {
        if self.inner.is_empty() {
            return &[];
        }
        bytemuck::cast_slice(self.inner.as_bytes())
    }

    /// The underlying byte vector.
    pub fn as_byte_vec(&self) -> &ByteVec<A> {
        &self.inner
    }

    /// Unwrap into the underlying byte vector.
    pub fn into_inner(self) -> ByteVec<A> {
        self.inner
    }
}
