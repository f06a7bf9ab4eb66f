//! dynvec: an allocator-aware growable array with generation-checked cursors.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all dynvec sub-crates. For most users, adding `dynvec` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use dynvec::prelude::*;
//!
//! let mut arr = DynArray::from_elem(10, 5).unwrap();
//! let copy = arr.clone();
//! for v in [15, 6, 3] {
//!     arr.push_back(v).unwrap();
//! }
//! assert_eq!(arr.len(), 13);
//! assert_eq!(&arr[10..], &[15, 6, 3]);
//! assert_eq!(copy.len(), 10);
//!
//! // Cursors survive mutation but are checked on every use.
//! let begin = arr.begin();
//! assert_eq!(begin.get(&arr), Ok(&5));
//! arr.clear();
//! assert!(matches!(begin.get(&arr), Err(ArrayError::InvalidIterator { .. })));
//!
//! // Storage can come from a bounded pool.
//! let pool = BudgetAllocator::with_limit(64);
//! let mut small = DynArray::new_in(pool.clone());
//! small.push_back(1u64).unwrap();
//! assert_eq!(pool.used(), 8);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `dynvec-core` | Errors, instance ids, generations |
//! | [`alloc`] | `dynvec-alloc` | `Allocator` trait, `Global`, `BudgetAllocator` |
//! | [`array`] | `dynvec-array` | `DynArray`, cursors, iterators |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Errors and identity types (`dynvec-core`).
///
/// Contains [`types::ArrayError`], [`types::AllocError`] and the
/// [`types::Origin`] that cursors are checked against.
pub use dynvec_core as types;

/// Allocator policies (`dynvec-alloc`).
///
/// The [`alloc::Allocator`] trait is the extension point for custom memory
/// policies; [`alloc::Global`] and [`alloc::BudgetAllocator`] are provided.
pub use dynvec_alloc as alloc;

/// The growable array and its cursors (`dynvec-array`).
///
/// See [`array::DynArray`] for the container and [`array::cursor`] for the
/// invalidation rules.
pub use dynvec_array as array;

/// Common imports for typical dynvec usage.
///
/// ```rust
/// use dynvec::prelude::*;
/// ```
pub mod prelude {
    // Container and cursors
    pub use dynvec_array::{
        ConstCursor, ConstReverseCursor, Cursor, DynArray, MutPosition, Position, Reverse,
        ReverseCursor,
    };

    // Allocators
    pub use dynvec_alloc::{Allocator, BudgetAllocator, BudgetConfig, Global};

    // Errors
    pub use dynvec_core::{AllocError, ArrayError};
}
