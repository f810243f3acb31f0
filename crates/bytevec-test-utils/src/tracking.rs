//! Call-counting allocator with leak detection.

use std::alloc::Layout;
use std::cell::{Cell, RefCell};
use std::ptr::NonNull;

use bytevec::{ByteAllocator, SystemAllocator};
use indexmap::IndexMap;

/// Counters collected by a [`TrackingAllocator`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AllocStats {
    pub allocations: usize,
    pub reallocations: usize,
    pub deallocations: usize,
    /// Requests the wrapped allocator refused.
    pub failures: usize,
    pub live_bytes: usize,
    pub peak_bytes: usize,
}

/// Wraps an allocator and records every call.
///
/// Live blocks are kept in insertion order (address -> size), so leak
/// reports list the oldest block first.
pub struct TrackingAllocator<A: ByteAllocator = SystemAllocator> {
    inner: A,
    stats: Cell<AllocStats>,
    live: RefCell<IndexMap<usize, usize>>,
}

impl TrackingAllocator<SystemAllocator> {
    pub fn new() -> Self {
        Self::wrapping(SystemAllocator)
    }
}

impl Default for TrackingAllocator<SystemAllocator> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: ByteAllocator> TrackingAllocator<A> {
    pub fn wrapping(inner: A) -> Self {
        Self {
            inner,
            stats: Cell::new(AllocStats::default()),
            live: RefCell::new(IndexMap::new()),
        }
    }

    /// Snapshot of the counters.
    pub fn stats(&self) -> AllocStats {
        self.stats.get()
    }

    /// Number of blocks handed out and not yet released.
    pub fn live_allocations(&self) -> usize {
        self.live.borrow().len()
    }

    /// Size of the live block at `addr`, if any.
    pub fn live_size(&self, addr: usize) -> Option<usize> {
        self.live.borrow().get(&addr).copied()
    }

    /// Panic if any block is still live.
    pub fn assert_no_leaks(&self) {
        let live = self.live.borrow();
        assert!(
            live.is_empty(),
            "{} leaked block(s): {:?}",
            live.len(),
            live.iter().collect::<Vec<_>>()
        );
    }

    fn update(&self, f: impl FnOnce(&mut AllocStats)) {
        let mut stats = self.stats.get();
        f(&mut stats);
        stats.peak_bytes = stats.peak_bytes.max(stats.live_bytes);
        self.stats.set(stats);
    }

    fn track(&self, ptr: NonNull<u8>, bytes: usize) {
        self.live.borrow_mut().insert(ptr.as_ptr() as usize, bytes);
        self.update(|s| s.live_bytes += bytes);
    }

    fn untrack(&self, ptr: NonNull<u8>) {
        let bytes = self
            .live
            .borrow_mut()
            .shift_remove(&(ptr.as_ptr() as usize))
            .unwrap_or_else(|| panic!("release of untracked block {ptr:p}"));
        self.update(|s| s.live_bytes -= bytes);
    }
}

// SAFETY: every call is forwarded unchanged to `inner`; the bookkeeping
// never touches the blocks themselves.
#[allow(unsafe_code)]
unsafe impl<A: ByteAllocator> ByteAllocator for TrackingAllocator<A> {
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> {
        let Some(ptr) = self.inner.allocate(layout) else {
            self.update(|s| s.failures += 1);
            return None;
        };
        self.update(|s| s.allocations += 1);
        self.track(ptr, layout.size());
        Some(ptr)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        self.untrack(ptr);
        self.update(|s| s.deallocations += 1);
        // SAFETY: the caller's obligations are forwarded to `inner`.
        unsafe { self.inner.deallocate(ptr, layout) }
    }

    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        old: Layout,
        new_size: usize,
    ) -> Option<NonNull<u8>> {
        // SAFETY: the caller's obligations are forwarded to `inner`.
        let Some(new_ptr) = (unsafe { self.inner.reallocate(ptr, old, new_size) }) else {
            self.update(|s| s.failures += 1);
            return None;
        };
        self.untrack(ptr);
        self.update(|s| s.reallocations += 1);
        self.track(new_ptr, new_size);
        Some(new_ptr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(bytes: usize) -> Layout {
        Layout::from_size_align(bytes, bytevec::BUFFER_ALIGN).unwrap()
    }

    #[test]
    #[allow(unsafe_code)]
    fn counts_and_balances_calls() {
        let alloc = TrackingAllocator::new();
        let ptr = alloc.allocate(layout(32)).unwrap();
        assert_eq!(alloc.stats().live_bytes, 32);

        let ptr = unsafe { alloc.reallocate(ptr, layout(32), 128) }.unwrap();
        assert_eq!(alloc.stats().live_bytes, 128);
        assert_eq!(alloc.stats().peak_bytes, 128);
        assert_eq!(alloc.live_allocations(), 1);

        unsafe { alloc.deallocate(ptr, layout(128)) };
        let stats = alloc.stats();
        assert_eq!(
            (stats.allocations, stats.reallocations, stats.deallocations),
            (1, 1, 1)
        );
        assert_eq!(stats.live_bytes, 0);
        alloc.assert_no_leaks();
    }

    #[test]
    #[should_panic(expected = "leaked block")]
    fn leak_is_reported() {
        let alloc = TrackingAllocator::new();
        let _ = alloc.allocate(layout(8)).unwrap();
        alloc.assert_no_leaks();
    }
}
