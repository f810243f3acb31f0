//! Vector error types.

use std::error::Error;
use std::fmt;

/// Errors that can occur during vector operations.
///
/// A failed operation never modifies the vector: length, capacity and
/// contents are exactly as before the call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VecError {
    /// The allocator returned no memory for a request.
    AllocationFailure {
        /// Size of the refused request in bytes.
        requested_bytes: usize,
    },
    /// `pop` or `remove` on an empty vector.
    Underflow,
    /// Index outside the valid range for the operation.
    IndexOutOfRange {
        /// The rejected index.
        index: usize,
        /// Vector length at the time of the call.
        len: usize,
    },
    /// The requested capacity does not fit in `usize` bytes.
    CapacityOverflow,
    /// An element argument whose length is not the vector's element size.
    ElementSizeMismatch {
        /// The vector's element size in bytes.
        expected: usize,
        /// Length of the supplied element.
        actual: usize,
    },
    /// A vector was constructed with an element size of zero.
    ZeroElementSize,
    /// A typed view was requested for a type whose alignment exceeds
    /// the buffer alignment.
    UnsupportedAlignment {
        /// Alignment of the requested type.
        align: usize,
        /// Largest supported alignment.
        max: usize,
    },
    /// The growth policy failed validation.
    InvalidPolicy(PolicyError),
}

impl fmt::Display for VecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllocationFailure { requested_bytes } => {
                write!(f, "allocation failed: requested {requested_bytes} bytes")
            }
            Self::Underflow => write!(f, "vector underflow: no elements to remove"),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range for length {len}")
            }
            Self::CapacityOverflow => write!(f, "capacity overflow"),
            Self::ElementSizeMismatch { expected, actual } => {
                write!(
                    f,
                    "element size mismatch: expected {expected} bytes, got {actual}"
                )
            }
            Self::ZeroElementSize => write!(f, "element size must be non-zero"),
            Self::UnsupportedAlignment { align, max } => {
                write!(f, "alignment {align} exceeds supported maximum {max}")
            }
            Self::InvalidPolicy(reason) => write!(f, "invalid growth policy: {reason}"),
        }
    }
}

impl Error for VecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidPolicy(reason) => Some(reason),
            _ => None,
        }
    }
}

impl From<PolicyError> for VecError {
    fn from(e: PolicyError) -> Self {
        Self::InvalidPolicy(e)
    }
}

/// Reasons a [`GrowthPolicy`](crate::GrowthPolicy) is rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PolicyError {
    /// Growth factor below 2 cannot make progress.
    GrowthFactorTooSmall {
        /// The rejected factor.
        factor: usize,
    },
    /// A zero seed capacity cannot make progress from an empty buffer.
    ZeroMinCapacity,
}

impl fmt::Display for PolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GrowthFactorTooSmall { factor } => {
                write!(f, "growth factor {factor} is below the minimum of 2")
            }
            Self::ZeroMinCapacity => write!(f, "minimum capacity must be at least 1"),
        }
    }
}

impl Error for PolicyError {}
