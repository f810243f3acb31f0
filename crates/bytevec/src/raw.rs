//! Owned raw byte buffer.
//!
//! [`RawBuf`] is the only place in the crate that touches raw pointers
//! into vector storage. It tracks an *initialized watermark*: bytes
//! `[0, initialized)` have been written at least once, and only those
//! may be viewed as slices. Every accessor checks its range against the
//! watermark and the allocation size, so misuse panics instead of
//! reading uninitialized or out-of-bounds memory.
//!
//! The buffer does not know its allocator; the owning vector passes it
//! to [`RawBuf::reallocate`] and [`RawBuf::release`]. Dropping a
//! `RawBuf` without releasing it leaks the block.

#![allow(unsafe_code)]

use std::ops::Range;
use std::ptr::{self, NonNull};

use crate::alloc::{buffer_layout, ByteAllocator};
use crate::error::VecError;

pub(crate) struct RawBuf {
    ptr: Option<NonNull<u8>>,
    /// Size of the live allocation in bytes (0 when `ptr` is `None`).
    bytes: usize,
    /// Bytes `[0, initialized)` have been written.
    initialized: usize,
}

// SAFETY: `RawBuf` exclusively owns its block; shared access only
// produces `&[u8]` and mutation requires `&mut self`.
unsafe impl Send for RawBuf {}
// SAFETY: see above; `&RawBuf` exposes read-only byte slices.
unsafe impl Sync for RawBuf {}

impl RawBuf {
    pub(crate) const fn empty() -> Self {
        Self {
            ptr: None,
            bytes: 0,
            initialized: 0,
        }
    }

    /// Size of the allocation in bytes.
    pub(crate) fn bytes(&self) -> usize {
        self.bytes
    }

    pub(crate) fn is_allocated(&self) -> bool {
        self.ptr.is_some()
    }

    /// Base address of the allocation, if any. Only meaningful for
    /// identity comparisons.
    pub(crate) fn addr(&self) -> Option<usize> {
        self.ptr.map(|p| p.as_ptr() as usize)
    }

    /// Resize the allocation to exactly `new_bytes` bytes.
    ///
    /// `new_bytes == 0` releases the block. On error the buffer is left
    /// exactly as it was.
    pub(crate) fn reallocate<A: ByteAllocator>(
        &mut self,
        alloc: &A,
        new_bytes: usize,
    ) -> Result<(), VecError> {
        if new_bytes == self.bytes {
            return Ok(());
        }
        if new_bytes == 0 {
            self.release(alloc);
            return Ok(());
        }
        let new_layout = buffer_layout(new_bytes).ok_or(VecError::CapacityOverflow)?;

        let new_ptr = match self.ptr {
            None => alloc.allocate(new_layout),
            Some(old_ptr) => {
                let old_layout = buffer_layout(self.bytes).ok_or(VecError::CapacityOverflow)?;
                // SAFETY: `old_ptr` was obtained from `alloc` for
                // `old_layout` and is still live; `new_bytes` is non-zero
                // and `new_layout` proved it is in range.
                unsafe { alloc.reallocate(old_ptr, old_layout, new_bytes) }
            }
        };
        let Some(new_ptr) = new_ptr else {
            log::warn!("allocator refused request for {new_bytes} bytes");
            return Err(VecError::AllocationFailure {
                requested_bytes: new_bytes,
            });
        };

        log::trace!(
            "buffer reallocated: {} -> {} bytes (relocated: {})",
            self.bytes,
            new_bytes,
            self.ptr != Some(new_ptr)
        );
        self.ptr = Some(new_ptr);
        self.bytes = new_bytes;
        self.initialized = self.initialized.min(new_bytes);
        Ok(())
    }

    /// Return the block to `alloc`. No-op when nothing is allocated.
    pub(crate) fn release<A: ByteAllocator>(&mut self, alloc: &A) {
        if let Some(ptr) = self.ptr.take() {
            // Every live allocation was created through `buffer_layout`.
            if let Some(layout) = buffer_layout(self.bytes) {
                // SAFETY: `ptr` was obtained from `alloc` for `layout`
                // and `take()` guarantees it is released only once.
                unsafe { alloc.deallocate(ptr, layout) };
            }
        }
        self.bytes = 0;
        self.initialized = 0;
    }

    /// View initialized bytes.
    ///
    /// # Panics
    ///
    /// Panics if `range` extends past the initialized watermark.
    pub(crate) fn slice(&self, range: Range<usize>) -> &[u8] {
        self.check_initialized(&range);
        match self.ptr {
            // SAFETY: `range` lies within `[0, initialized)`, which is
            // inside the live allocation and fully written.
            Some(base) if !range.is_empty() => unsafe {
                std::slice::from_raw_parts(base.as_ptr().add(range.start), range.len())
            },
            _ => &[],
        }
    }

    /// Mutably view initialized bytes.
    ///
    /// # Panics
    ///
    /// Panics if `range` extends past the initialized watermark.
    pub(crate) fn slice_mut(&mut self, range: Range<usize>) -> &mut [u8] {
        self.check_initialized(&range);
        match self.ptr {
            // SAFETY: as in `slice`; `&mut self` guarantees exclusivity.
            Some(base) if !range.is_empty() => unsafe {
                std::slice::from_raw_parts_mut(base.as_ptr().add(range.start), range.len())
            },
            _ => &mut [],
        }
    }

    /// Copy `src` into the buffer at byte `offset`.
    ///
    /// # Panics
    ///
    /// Panics if the write would leave a gap after the initialized
    /// watermark or run past the allocation.
    pub(crate) fn write(&mut self, offset: usize, src: &[u8]) {
        if src.is_empty() {
            return;
        }
        let end = self.check_writable(offset, src.len());
        let base = self.base();
        // SAFETY: `[offset, end)` lies inside the live allocation and a
        // caller-provided slice cannot alias memory we exclusively own.
        unsafe { ptr::copy_nonoverlapping(src.as_ptr(), base.as_ptr().add(offset), src.len()) };
        self.initialized = self.initialized.max(end);
    }

    /// Copy the initialized bytes in `src` to byte offset `dst`.
    /// The ranges may overlap.
    ///
    /// # Panics
    ///
    /// Panics if `src` is not initialized, or the destination would leave
    /// a gap after the watermark or run past the allocation.
    pub(crate) fn copy_within(&mut self, src: Range<usize>, dst: usize) {
        if src.is_empty() {
            return;
        }
        self.check_initialized(&src);
        let end = self.check_writable(dst, src.len());
        let base = self.base();
        // SAFETY: both ranges lie inside the live allocation; `ptr::copy`
        // handles overlap.
        unsafe {
            ptr::copy(
                base.as_ptr().add(src.start),
                base.as_ptr().add(dst),
                src.len(),
            )
        };
        self.initialized = self.initialized.max(end);
    }

    fn base(&self) -> NonNull<u8> {
        match self.ptr {
            Some(ptr) => ptr,
            None => panic!("access to unallocated buffer"),
        }
    }

    fn check_initialized(&self, range: &Range<usize>) {
        assert!(
            range.start <= range.end && range.end <= self.initialized,
            "byte range {range:?} exceeds initialized watermark {}",
            self.initialized
        );
    }

    fn check_writable(&self, offset: usize, len: usize) -> usize {
        let end = offset
            .checked_add(len)
            .filter(|&end| end <= self.bytes)
            .unwrap_or_else(|| {
                panic!(
                    "write of {len} bytes at {offset} exceeds allocation of {} bytes",
                    self.bytes
                )
            });
        assert!(
            offset <= self.initialized,
            "write at {offset} leaves a gap after watermark {}",
            self.initialized
        );
        end
    }
}
