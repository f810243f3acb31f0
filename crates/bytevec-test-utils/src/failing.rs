//! Fault-injecting allocator.

use std::alloc::Layout;
use std::cell::Cell;
use std::ptr::NonNull;

use bytevec::{ByteAllocator, SystemAllocator};

/// Forwards to an inner allocator until its budget of successful
/// allocate/reallocate calls is spent, then refuses every request.
///
/// `deallocate` is always forwarded so vectors can still clean up.
pub struct FailingAllocator<A: ByteAllocator = SystemAllocator> {
    inner: A,
    /// Remaining successful calls; `None` means unlimited.
    budget: Cell<Option<usize>>,
    refused: Cell<usize>,
}

impl FailingAllocator<SystemAllocator> {
    /// Allow `successes` calls, then fail.
    pub fn fail_after(successes: usize) -> Self {
        let alloc = Self::wrapping(SystemAllocator);
        alloc.set_budget(Some(successes));
        alloc
    }
}

impl<A: ByteAllocator> FailingAllocator<A> {
    /// Wrap `inner` with an unlimited budget.
    pub fn wrapping(inner: A) -> Self {
        Self {
            inner,
            budget: Cell::new(None),
            refused: Cell::new(0),
        }
    }

    /// Replace the remaining budget.
    pub fn set_budget(&self, budget: Option<usize>) {
        self.budget.set(budget);
    }

    /// Refuse every request from now on.
    pub fn fail_now(&self) {
        self.set_budget(Some(0));
    }

    /// Number of requests refused so far.
    pub fn refused(&self) -> usize {
        self.refused.get()
    }

    fn permit(&self) -> bool {
        match self.budget.get() {
            None => true,
            Some(0) => {
                self.refused.set(self.refused.get() + 1);
                false
            }
            Some(n) => {
                self.budget.set(Some(n - 1));
                true
            }
        }
    }
}

// SAFETY: successful calls are forwarded to `inner`; refusals return
// `None` without touching the original block.
#[allow(unsafe_code)]
unsafe impl<A: ByteAllocator> ByteAllocator for FailingAllocator<A> {
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> {
        if !self.permit() {
            return None;
        }
        self.inner.allocate(layout)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: the caller's obligations are forwarded to `inner`.
        unsafe { self.inner.deallocate(ptr, layout) }
    }

    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        old: Layout,
        new_size: usize,
    ) -> Option<NonNull<u8>> {
        if !self.permit() {
            return None;
        }
        // SAFETY: the caller's obligations are forwarded to `inner`.
        unsafe { self.inner.reallocate(ptr, old, new_size) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(unsafe_code)]
    fn refuses_after_budget() {
        let layout = Layout::from_size_align(8, bytevec::BUFFER_ALIGN).unwrap();
        let alloc = FailingAllocator::fail_after(1);
        let ptr = alloc.allocate(layout).unwrap();
        assert!(alloc.allocate(layout).is_none());
        assert!(unsafe { alloc.reallocate(ptr, layout, 16) }.is_none());
        assert_eq!(alloc.refused(), 2);
        unsafe { alloc.deallocate(ptr, layout) };
    }

    #[test]
    #[allow(unsafe_code)]
    fn unlimited_by_default() {
        let layout = Layout::from_size_align(8, bytevec::BUFFER_ALIGN).unwrap();
        let alloc = FailingAllocator::wrapping(SystemAllocator);
        for _ in 0..10 {
            let ptr = alloc.allocate(layout).unwrap();
            unsafe { alloc.deallocate(ptr, layout) };
        }
        assert_eq!(alloc.refused(), 0);
    }
}
