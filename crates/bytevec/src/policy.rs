//! Capacity growth policy.

use crate::error::PolicyError;

/// Controls how a vector's capacity evolves.
///
/// Validated when a vector is constructed; immutable afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrowthPolicy {
    /// Capacity (in elements) allocated at construction.
    ///
    /// Default: `8 * size_of::<usize>()`, i.e. 64 on 64-bit targets.
    /// Zero defers the first allocation to the first growing operation.
    pub initial_capacity: usize,

    /// Multiplier applied to the capacity until it covers a request.
    ///
    /// Default: 2. Must be at least 2.
    pub growth_factor: usize,

    /// Seed capacity used when growing from an empty buffer.
    ///
    /// Default: 1. Must be non-zero, otherwise growth from zero stalls.
    pub min_capacity: usize,
}

impl GrowthPolicy {
    /// Default initial capacity: one element per bit of a pointer.
    pub const DEFAULT_INITIAL_CAPACITY: usize = usize::BITS as usize;

    /// Default growth factor.
    pub const DEFAULT_GROWTH_FACTOR: usize = 2;

    /// Default seed capacity for growth from zero.
    pub const DEFAULT_MIN_CAPACITY: usize = 1;

    /// Create a policy with default values.
    pub const fn new() -> Self {
        Self {
            initial_capacity: Self::DEFAULT_INITIAL_CAPACITY,
            growth_factor: Self::DEFAULT_GROWTH_FACTOR,
            min_capacity: Self::DEFAULT_MIN_CAPACITY,
        }
    }

    /// Replace the initial capacity.
    pub const fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    /// Replace the growth factor.
    pub const fn with_growth_factor(mut self, growth_factor: usize) -> Self {
        self.growth_factor = growth_factor;
        self
    }

    /// Replace the seed capacity.
    pub const fn with_min_capacity(mut self, min_capacity: usize) -> Self {
        self.min_capacity = min_capacity;
        self
    }

    /// Check that growth always makes progress.
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.growth_factor < 2 {
            return Err(PolicyError::GrowthFactorTooSmall {
                factor: self.growth_factor,
            });
        }
        if self.min_capacity == 0 {
            return Err(PolicyError::ZeroMinCapacity);
        }
        Ok(())
    }

    /// Smallest capacity reachable from `current` by repeated
    /// multiplication that is at least `target`.
    ///
    /// Returns `current` unchanged when it already covers `target`, and
    /// `None` on arithmetic overflow. Assumes a validated policy.
    pub fn next_capacity(&self, current: usize, target: usize) -> Option<usize> {
        if current >= target {
            return Some(current);
        }
        let mut cap = current.max(self.min_capacity);
        while cap < target {
            cap = cap.checked_mul(self.growth_factor)?;
        }
        Some(cap)
    }
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_initial_capacity_is_eight_per_pointer_byte() {
        let policy = GrowthPolicy::default();
        assert_eq!(
            policy.initial_capacity,
            8 * std::mem::size_of::<usize>()
        );
        assert_eq!(policy.growth_factor, 2);
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn growth_doubles_until_target() {
        let policy = GrowthPolicy::new();
        assert_eq!(policy.next_capacity(64, 65), Some(128));
        assert_eq!(policy.next_capacity(64, 129), Some(256));
        assert_eq!(policy.next_capacity(64, 64), Some(64));
    }

    #[test]
    fn growth_from_zero_uses_seed() {
        let policy = GrowthPolicy::new();
        assert_eq!(policy.next_capacity(0, 1), Some(1));
        assert_eq!(policy.next_capacity(0, 5), Some(8));

        let seeded = GrowthPolicy::new().with_min_capacity(4);
        assert_eq!(seeded.next_capacity(0, 1), Some(4));
    }

    #[test]
    fn growth_overflow_is_reported() {
        let policy = GrowthPolicy::new();
        assert_eq!(policy.next_capacity(usize::MAX / 2 + 1, usize::MAX), None);
    }

    #[test]
    fn factor_one_rejected() {
        let policy = GrowthPolicy::new().with_growth_factor(1);
        assert_eq!(
            policy.validate(),
            Err(PolicyError::GrowthFactorTooSmall { factor: 1 })
        );
    }

    #[test]
    fn zero_seed_rejected() {
        let policy = GrowthPolicy::new().with_min_capacity(0);
        assert_eq!(policy.validate(), Err(PolicyError::ZeroMinCapacity));
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn next_capacity_covers_target(
                current in 0usize..10_000,
                target in 0usize..1_000_000,
                factor in 2usize..5,
            ) {
                let policy = GrowthPolicy::new().with_growth_factor(factor);
                let cap = policy.next_capacity(current, target).unwrap();
                prop_assert!(cap >= target);
                prop_assert!(cap >= current);
            }
        }
    }
}
