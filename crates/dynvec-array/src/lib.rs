//! Allocator-aware growable array for dynvec.
//!
//! [`DynArray`] is a contiguous, growable sequence whose storage comes
//! from a pluggable [`Allocator`](dynvec_alloc::Allocator). Appends grow
//! the buffer geometrically, so a run of `n` appends costs amortized O(1)
//! each.
//!
//! # Layout
//!
//! ```text
//! DynArray<T, A>
//! ├── Option<Storage<T>>   buffer (None until the first allocation)
//! ├── len                  live prefix of the buffer
//! ├── A                    allocator value
//! └── Origin               instance id + buffer generation
//!     └── Cursor / ConstCursor / Reverse<_>   issued under an Origin
//! ```
//!
//! # Cursors
//!
//! Besides borrowing iterators, the array hands out index-based cursors
//! that survive mutation and can be passed back to
//! [`insert`](DynArray::insert) and [`erase`](DynArray::erase). Each
//! cursor remembers the [`Origin`](dynvec_core::Origin) it was issued
//! under; once the array reallocates, clears, swaps or is assigned to,
//! older cursors are rejected with [`ArrayError::InvalidIterator`].
//!
//! # Safety
//!
//! This crate contains `unsafe` code to manage the partially initialized
//! buffer. Every `unsafe` block carries a `// SAFETY:` comment.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod array;
mod cmp;
pub mod cursor;
pub mod into_iter;
pub mod reverse;

pub use array::{DynArray, GROWTH_FACTOR, MIN_NON_ZERO_CAPACITY};
pub use cursor::{ConstCursor, Cursor, MutPosition, Position};
pub use dynvec_core::ArrayError;
pub use into_iter::IntoIter;
pub use reverse::{ConstReverseCursor, Reverse, ReverseCursor};
