//! Growable vector of fixed-size opaque byte elements.
//!
//! A [`ByteVec`] stores `len` elements of `elem_size` bytes each in one
//! contiguous buffer obtained from a caller-supplied [`ByteAllocator`].
//! Elements are plain bytes copied verbatim: there are no construction,
//! destruction or move hooks.
//!
//! # Architecture
//!
//! ```text
//! TypedVec<T: Pod> (optional typed view)
//! └── ByteVec<A> (length, element size, growth policy)
//!     └── RawBuf (bytes + initialized watermark, all unsafe code)
//!         └── A: ByteAllocator (SystemAllocator, arena, tracker, ...)
//! ```
//!
//! # Mutation flavours
//!
//! - **Order-preserving:** [`ByteVec::insert`] and [`ByteVec::remove`]
//!   shift the tail by one slot. O(len - at).
//! - **Fast:** [`ByteVec::insert_fast`] and [`ByteVec::remove_fast`]
//!   swap with the last slot. O(1), order is not preserved.
//!
//! Every fallible operation is atomic: when the allocator refuses a
//! request the vector keeps its previous length, capacity and contents.
//!
//! # Unsafe code
//!
//! The crate denies `unsafe` everywhere except `alloc.rs` (the system
//! allocator bridge) and `raw.rs` (the owned byte buffer). Every unsafe
//! block carries a `// SAFETY:` comment.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod alloc;
pub mod error;
pub mod policy;
mod raw;
pub mod typed;
pub mod vector;

// Public re-exports for the primary API surface.
pub use alloc::{ByteAllocator, SystemAllocator, BUFFER_ALIGN};
pub use error::{PolicyError, VecError};
pub use policy::GrowthPolicy;
pub use typed::TypedVec;
pub use vector::{ByteVec, Element};
