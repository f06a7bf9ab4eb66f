//! Core types for the dynvec container workspace.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! error taxonomy shared by the allocator and the dynamic array, and the
//! identity types ([`InstanceId`], [`Generation`], [`Origin`]) that let
//! positional cursors detect when the buffer they were issued for is gone.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;

pub use error::{AllocError, ArrayError, CursorFault};
pub use id::{Generation, InstanceId, Origin};
