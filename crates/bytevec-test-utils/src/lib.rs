//! Test utilities for bytevec development.
//!
//! Provides instrumented [`ByteAllocator`](bytevec::ByteAllocator)
//! implementations: [`TrackingAllocator`] records every call and the set
//! of live blocks, [`FailingAllocator`] refuses requests once a budget
//! of successful calls is spent. Both wrap another allocator and are
//! meant to be lent to a vector by reference so the test can inspect
//! them afterwards.

#![deny(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

mod failing;
mod tracking;

pub use failing::FailingAllocator;
pub use tracking::{AllocStats, TrackingAllocator};
