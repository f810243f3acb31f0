//! Benchmark fixtures for bytevec.
//!
//! - [`filled`]: a vector of `n` elements of a given size
//! - [`index_sequence`]: deterministic pseudo-random positions via seed

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use bytevec::{ByteAllocator, ByteVec, VecError};

/// Build a vector holding `n` elements of `elem_size` bytes on `alloc`.
///
/// Element `i` is filled with the byte `i as u8`.
pub fn filled<A: ByteAllocator>(
    alloc: A,
    elem_size: usize,
    n: usize,
) -> Result<ByteVec<A>, VecError> {
    let mut vec = ByteVec::with_allocator(alloc, elem_size)?;
    vec.reserve(n)?;
    let mut elem = vec![0u8; elem_size];
    for i in 0..n {
        elem.fill(i as u8);
        vec.push(&elem)?;
    }
    Ok(vec)
}

/// `count` positions, each in `0..=len + k` for the k-th position, so
/// that every position is a valid insertion index after `k` inserts.
pub fn index_sequence(len: usize, count: usize, seed: u64) -> Vec<usize> {
    (0..count)
        .map(|k| {
            let h = seed
                .wrapping_mul(6364136223846793005)
                .wrapping_add((k as u64).wrapping_mul(1442695040888963407));
            ((h >> 17) % (len + k + 1) as u64) as usize
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytevec::SystemAllocator;

    #[test]
    fn filled_has_requested_contents() {
        let vec = filled(SystemAllocator, 3, 300).unwrap();
        assert_eq!(vec.len(), 300);
        assert_eq!(vec.get(257).unwrap(), &[1, 1, 1]);
    }

    #[test]
    fn index_sequence_stays_in_range() {
        let idx = index_sequence(10, 50, 42);
        for (k, &i) in idx.iter().enumerate() {
            assert!(i <= 10 + k, "index {i} out of range at step {k}");
        }
    }

    #[test]
    fn index_sequence_long_run_does_not_overflow() {
        let idx = index_sequence(1_000, 10_000, u64::MAX);
        assert_eq!(idx.len(), 10_000);
        assert!(idx.iter().enumerate().all(|(k, &i)| i <= 1_000 + k));
    }

    #[test]
    fn index_sequence_deterministic() {
        assert_eq!(index_sequence(100, 20, 7), index_sequence(100, 20, 7));
    }
}
