//! Allocator policies and typed storage handles for dynvec.
//!
//! An [`Allocator`] hands out raw, correctly aligned storage for a number
//! of elements and takes it back again. Storage is returned as a
//! [`Storage<T>`] handle that remembers the layout it was allocated with,
//! so releasing it never depends on the caller echoing the element count.
//!
//! # Provided allocators
//!
//! ```text
//! Allocator (trait)
//! ├── Global          stateless, wraps the process allocator
//! └── BudgetAllocator state-carrying, draws from a shared byte budget
//!     └── BudgetConfig
//! ```
//!
//! Construction and destruction of elements also go through the allocator
//! ([`Allocator::construct`], [`Allocator::destroy`]) so that instrumented
//! allocators can observe element lifetimes.
//!
//! # Safety
//!
//! This crate contains `unsafe` code for the raw memory boundary. Every
//! `unsafe` block carries a `// SAFETY:` comment.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod allocator;
pub mod budget;
pub mod config;
pub mod global;

pub use allocator::{array_layout, Allocator, Storage};
pub use budget::BudgetAllocator;
pub use config::BudgetConfig;
pub use dynvec_core::AllocError;
pub use global::Global;
