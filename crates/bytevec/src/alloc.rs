//! Pluggable allocation strategy.
//!
//! A [`ByteAllocator`] is the allocate/free/reallocate triple a vector
//! captures at construction. Every capacity change of a vector routes
//! through it, so the same vector logic runs on the process-wide heap
//! ([`SystemAllocator`]) or on any caller-supplied arena, pool or
//! tracking allocator.

#![allow(unsafe_code)]

use std::alloc::Layout;
use std::ptr::NonNull;

/// Alignment of every buffer a vector requests, in bytes.
///
/// Matches the guarantee of the platform `malloc` on 64-bit targets, so
/// any element type with an alignment up to this value can be viewed in
/// place.
pub const BUFFER_ALIGN: usize = 16;

/// Source of raw memory for a vector.
///
/// Vectors only ever request non-zero sizes with alignment
/// [`BUFFER_ALIGN`], and only hand back blocks they obtained from the
/// same allocator.
///
/// # Safety
///
/// Implementors must guarantee that:
///
/// - a `Some(ptr)` returned by [`allocate`](Self::allocate) or
///   [`reallocate`](Self::reallocate) points to a block valid for reads
///   and writes of the requested size, aligned to `layout.align()`, and
///   not aliased by any other live block;
/// - [`reallocate`](Self::reallocate) preserves the first
///   `min(old.size(), new_size)` bytes, and on `None` leaves the original
///   block untouched and still owned by the caller;
/// - a block stays valid until it is passed to
///   [`deallocate`](Self::deallocate) or a successful
///   [`reallocate`](Self::reallocate).
pub unsafe trait ByteAllocator {
    /// Allocate a block described by `layout`. `None` signals failure.
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>>;

    /// Release a block.
    ///
    /// # Safety
    ///
    /// `ptr` must have been returned by this allocator for `layout` and
    /// not yet released.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);

    /// Resize a block to `new_size` bytes with the same alignment.
    ///
    /// # Safety
    ///
    /// `ptr` must have been returned by this allocator for `old` and not
    /// yet released. `new_size` must be non-zero and, rounded up to
    /// `old.align()`, must not overflow `isize`.
    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        old: Layout,
        new_size: usize,
    ) -> Option<NonNull<u8>>;
}

// SAFETY: forwards every call to `A`, which upholds the contract.
unsafe impl<A: ByteAllocator + ?Sized> ByteAllocator for &A {
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> {
        (**self).allocate(layout)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: the caller's obligations are the same for `A`.
        unsafe { (**self).deallocate(ptr, layout) }
    }

    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        old: Layout,
        new_size: usize,
    ) -> Option<NonNull<u8>> {
        // SAFETY: the caller's obligations are the same for `A`.
        unsafe { (**self).reallocate(ptr, old, new_size) }
    }
}

/// The process-wide allocator (`std::alloc`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SystemAllocator;

// SAFETY: `std::alloc` provides exactly the guarantees the trait asks for.
unsafe impl ByteAllocator for SystemAllocator {
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> {
        if layout.size() == 0 {
            return None;
        }
        // SAFETY: `layout` has a non-zero size (checked above).
        NonNull::new(unsafe { std::alloc::alloc(layout) })
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: the caller guarantees `ptr` came from `allocate` or
        // `reallocate` with `layout`.
        unsafe { std::alloc::dealloc(ptr.as_ptr(), layout) }
    }

    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        old: Layout,
        new_size: usize,
    ) -> Option<NonNull<u8>> {
        // SAFETY: the caller guarantees `ptr` is live for `old` and that
        // `new_size` is non-zero and in range.
        NonNull::new(unsafe { std::alloc::realloc(ptr.as_ptr(), old, new_size) })
    }
}

/// Layout of a buffer of `bytes` bytes at [`BUFFER_ALIGN`].
///
/// `None` when `bytes` exceeds the platform limit for a single object.
pub(crate) fn buffer_layout(bytes: usize) -> Option<Layout> {
    Layout::from_size_align(bytes, BUFFER_ALIGN).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_allocate_is_aligned() {
        let layout = buffer_layout(40).unwrap();
        let ptr = SystemAllocator.allocate(layout).unwrap();
        assert_eq!(ptr.as_ptr() as usize % BUFFER_ALIGN, 0);
        unsafe { SystemAllocator.deallocate(ptr, layout) };
    }

    #[test]
    fn system_reallocate_preserves_prefix() {
        let layout = buffer_layout(4).unwrap();
        let ptr = SystemAllocator.allocate(layout).unwrap();
        unsafe {
            ptr.as_ptr().copy_from_nonoverlapping([1u8, 2, 3, 4].as_ptr(), 4);
            let grown = SystemAllocator.reallocate(ptr, layout, 1024).unwrap();
            let prefix = std::slice::from_raw_parts(grown.as_ptr(), 4);
            assert_eq!(prefix, &[1, 2, 3, 4]);
            SystemAllocator.deallocate(grown, buffer_layout(1024).unwrap());
        }
    }

    #[test]
    fn zero_size_request_is_refused() {
        let layout = buffer_layout(0).unwrap();
        assert!(SystemAllocator.allocate(layout).is_none());
    }

    #[test]
    fn oversized_layout_is_rejected() {
        assert!(buffer_layout(usize::MAX).is_none());
    }

    #[test]
    fn reference_forwards_to_allocator() {
        let alloc = SystemAllocator;
        let by_ref: &SystemAllocator = &alloc;
        let layout = buffer_layout(8).unwrap();
        let ptr = by_ref.allocate(layout).unwrap();
        unsafe { by_ref.deallocate(ptr, layout) };
    }
}
