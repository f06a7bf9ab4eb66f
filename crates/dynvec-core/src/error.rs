//! Error types for the dynvec workspace.
//!
//! Two layers: [`AllocError`] for raw storage requests made to an
//! allocator, and [`ArrayError`] for operations on a dynamic array, which
//! wraps allocation failures in [`ArrayError::AllocationFailure`].

use std::error::Error;
use std::fmt;

use crate::id::Origin;

/// Failure to obtain raw storage from an allocator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AllocError {
    /// The requested element count does not fit in an allocation
    /// (byte size overflows `isize::MAX`).
    CapacityOverflow {
        /// Number of elements requested.
        count: usize,
        /// Size of one element in bytes.
        elem_size: usize,
    },
    /// The underlying memory source could not satisfy the request.
    OutOfMemory {
        /// Number of bytes requested.
        bytes: usize,
    },
    /// A budgeted allocator has too little budget left.
    BudgetExceeded {
        /// Number of bytes requested.
        requested: usize,
        /// Bytes still available in the budget.
        remaining: usize,
    },
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityOverflow { count, elem_size } => {
                write!(
                    f,
                    "capacity overflow: {count} elements of {elem_size} bytes"
                )
            }
            Self::OutOfMemory { bytes } => write!(f, "out of memory allocating {bytes} bytes"),
            Self::BudgetExceeded {
                requested,
                remaining,
            } => {
                write!(
                    f,
                    "allocation budget exceeded: requested {requested} bytes, {remaining} remaining"
                )
            }
        }
    }
}

impl Error for AllocError {}

/// Why a cursor was rejected by the array it was presented to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CursorFault {
    /// The cursor was issued by a different array.
    ForeignInstance {
        /// Where the cursor came from.
        cursor: Origin,
        /// The array it was presented to.
        array: Origin,
    },
    /// The array's buffer has been replaced since the cursor was issued.
    Stale {
        /// Where the cursor came from.
        cursor: Origin,
        /// The array's current origin.
        array: Origin,
    },
    /// The position lies outside the range the operation accepts.
    OutOfRange {
        /// Position the cursor designates.
        index: usize,
        /// Array length at the time of the check.
        len: usize,
    },
}

impl fmt::Display for CursorFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ForeignInstance { cursor, array } => {
                write!(f, "cursor from {cursor} used on {array}")
            }
            Self::Stale { cursor, array } => {
                write!(f, "stale cursor from {cursor}, array is now {array}")
            }
            Self::OutOfRange { index, len } => {
                write!(f, "position {index} out of range for length {len}")
            }
        }
    }
}

/// Errors from dynamic array operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArrayError {
    /// Raw storage could not be obtained. Never retried.
    AllocationFailure(AllocError),
    /// Copy or move between arrays whose allocators are not
    /// interchangeable.
    IncompatibleAllocator,
    /// A cursor argument does not belong to, or is out of range for,
    /// the target array.
    InvalidIterator {
        /// What was wrong with the cursor.
        reason: CursorFault,
    },
    /// The operation needs at least one element.
    EmptyContainer,
    /// Checked element access past the live range.
    OutOfBounds {
        /// Index that was requested.
        index: usize,
        /// Array length at the time of the access.
        len: usize,
    },
}

impl fmt::Display for ArrayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllocationFailure(e) => write!(f, "allocation failed: {e}"),
            Self::IncompatibleAllocator => {
                write!(f, "allocators are not interchangeable")
            }
            Self::InvalidIterator { reason } => write!(f, "invalid iterator: {reason}"),
            Self::EmptyContainer => write!(f, "container is empty"),
            Self::OutOfBounds { index, len } => {
                write!(f, "index {index} out of bounds for length {len}")
            }
        }
    }
}

impl Error for ArrayError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::AllocationFailure(e) => Some(e),
            _ => None,
        }
    }
}

impl From<AllocError> for ArrayError {
    fn from(e: AllocError) -> Self {
        Self::AllocationFailure(e)
    }
}

impl From<CursorFault> for ArrayError {
    fn from(reason: CursorFault) -> Self {
        Self::InvalidIterator { reason }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::{Generation, InstanceId};

    #[test]
    fn alloc_error_converts_and_keeps_source() {
        let inner = AllocError::OutOfMemory { bytes: 64 };
        let err: ArrayError = inner.into();
        assert_eq!(err, ArrayError::AllocationFailure(inner));
        let source = err.source().expect("allocation failure has a source");
        assert_eq!(source.to_string(), "out of memory allocating 64 bytes");
    }

    #[test]
    fn non_allocation_errors_have_no_source() {
        assert!(ArrayError::EmptyContainer.source().is_none());
        assert!(ArrayError::IncompatibleAllocator.source().is_none());
    }

    #[test]
    fn cursor_fault_display_mentions_both_origins() {
        let id = InstanceId::next();
        let fault = CursorFault::Stale {
            cursor: Origin::new(id, Generation(1)),
            array: Origin::new(id, Generation(2)),
        };
        let msg = ArrayError::from(fault).to_string();
        assert!(msg.starts_with("invalid iterator: stale cursor"));
        assert!(msg.contains("gen 1"));
        assert!(msg.contains("gen 2"));
    }

    #[test]
    fn budget_message_reports_remaining() {
        let e = AllocError::BudgetExceeded {
            requested: 100,
            remaining: 40,
        };
        assert_eq!(
            e.to_string(),
            "allocation budget exceeded: requested 100 bytes, 40 remaining"
        );
    }

    #[test]
    fn out_of_bounds_display() {
        let e = ArrayError::OutOfBounds { index: 5, len: 3 };
        assert_eq!(e.to_string(), "index 5 out of bounds for length 3");
    }
}
