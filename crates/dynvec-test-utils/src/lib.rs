//! Test utilities for dynvec development.
//!
//! Provides instrumented [`Allocator`] implementations that record every
//! request, and tracked element values (see [`fixtures`]) that count how
//! many instances are alive:
//!
//! - [`CountingAllocator`]: wraps [`Global`] and keeps a ledger of
//!   outstanding allocations plus construct/destroy counts.
//! - [`FailingAllocator`]: succeeds a fixed number of times, then reports
//!   out-of-memory.

#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod fixtures;

use std::alloc::Layout;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::ptr::NonNull;
use std::rc::Rc;

use dynvec_alloc::{Allocator, Global};
use dynvec_core::AllocError;
use indexmap::IndexMap;

pub use fixtures::{LiveCounter, Tracked};

#[derive(Default)]
struct Ledger {
    /// Live allocations in the order they were made, keyed by address.
    outstanding: IndexMap<usize, Layout>,
    allocations: usize,
    deallocations: usize,
    constructs: usize,
    destroys: usize,
    peak_bytes: usize,
}

impl Ledger {
    fn live_bytes(&self) -> usize {
        self.outstanding.values().map(Layout::size).sum()
    }
}

/// Allocator that records every request it serves.
///
/// Clones share one ledger and are compatible with each other; two
/// separately created counting allocators are not.
#[derive(Clone, Default)]
pub struct CountingAllocator {
    ledger: Rc<RefCell<Ledger>>,
}

impl CountingAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Successful byte-level allocations so far.
    pub fn allocations(&self) -> usize {
        self.ledger.borrow().allocations
    }

    /// Byte-level deallocations so far.
    pub fn deallocations(&self) -> usize {
        self.ledger.borrow().deallocations
    }

    /// Allocations not yet released.
    pub fn outstanding(&self) -> usize {
        self.ledger.borrow().outstanding.len()
    }

    /// Bytes held by allocations not yet released.
    pub fn outstanding_bytes(&self) -> usize {
        self.ledger.borrow().live_bytes()
    }

    /// Largest number of bytes held at once.
    pub fn peak_bytes(&self) -> usize {
        self.ledger.borrow().peak_bytes
    }

    /// Values placed into storage through [`Allocator::construct`].
    pub fn constructs(&self) -> usize {
        self.ledger.borrow().constructs
    }

    /// Values dropped in place through [`Allocator::destroy`] or
    /// [`Allocator::destroy_range`].
    ///
    /// Values moved out of a container (popped, removed, iterated by
    /// value) are not destroyed by the allocator and are not counted.
    pub fn destroys(&self) -> usize {
        self.ledger.borrow().destroys
    }

    /// Panics unless every allocation has been released.
    #[track_caller]
    pub fn assert_no_leaks(&self) {
        let ledger = self.ledger.borrow();
        assert!(
            ledger.outstanding.is_empty(),
            "{} allocation(s) leaked: {:?}",
            ledger.outstanding.len(),
            ledger
                .outstanding
                .iter()
                .map(|(addr, layout)| format!("{addr:#x} ({} bytes)", layout.size()))
                .collect::<Vec<_>>()
        );
    }
}

impl fmt::Debug for CountingAllocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ledger = self.ledger.borrow();
        f.debug_struct("CountingAllocator")
            .field("allocations", &ledger.allocations)
            .field("deallocations", &ledger.deallocations)
            .field("outstanding", &ledger.outstanding.len())
            .field("constructs", &ledger.constructs)
            .field("destroys", &ledger.destroys)
            .finish()
    }
}

impl Allocator for CountingAllocator {
    fn allocate_bytes(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        let ptr = Global.allocate_bytes(layout)?;
        let mut ledger = self.ledger.borrow_mut();
        ledger.allocations += 1;
        ledger.outstanding.insert(ptr.as_ptr() as usize, layout);
        let live = ledger.live_bytes();
        ledger.peak_bytes = ledger.peak_bytes.max(live);
        Ok(ptr)
    }

    unsafe fn deallocate_bytes(&self, ptr: NonNull<u8>, layout: Layout) {
        {
            let mut ledger = self.ledger.borrow_mut();
            match ledger.outstanding.shift_remove(&(ptr.as_ptr() as usize)) {
                Some(recorded) => assert_eq!(
                    recorded, layout,
                    "deallocation layout differs from allocation layout"
                ),
                None => panic!("deallocating {:p}, which is not outstanding", ptr.as_ptr()),
            }
            ledger.deallocations += 1;
        }
        // SAFETY: the ledger confirmed `ptr` came from `Global` through
        // this allocator with this layout.
        unsafe { Global.deallocate_bytes(ptr, layout) }
    }

    fn is_compatible(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.ledger, &other.ledger)
    }

    unsafe fn construct<T>(&self, slot: *mut T, value: T) {
        self.ledger.borrow_mut().constructs += 1;
        // SAFETY: upheld by the caller.
        unsafe { slot.write(value) }
    }

    unsafe fn destroy<T>(&self, slot: *mut T) {
        self.ledger.borrow_mut().destroys += 1;
        // SAFETY: upheld by the caller.
        unsafe { slot.drop_in_place() }
    }

    unsafe fn destroy_range<T>(&self, slice: *mut [T]) {
        self.ledger.borrow_mut().destroys += slice.len();
        // SAFETY: upheld by the caller.
        unsafe { slice.drop_in_place() }
    }
}

/// Allocator that fails deterministically after a number of successes.
///
/// Useful for checking that containers leave their state untouched when
/// an allocation fails part-way through an operation. Requests are served
/// by an inner [`CountingAllocator`], so leaks can still be checked after
/// a failure. Clones share the success budget.
#[derive(Clone, Debug)]
pub struct FailingAllocator {
    inner: CountingAllocator,
    remaining: Rc<Cell<usize>>,
}

impl FailingAllocator {
    /// Create an allocator that serves `succeed_count` requests, then fails.
    pub fn new(succeed_count: usize) -> Self {
        Self {
            inner: CountingAllocator::new(),
            remaining: Rc::new(Cell::new(succeed_count)),
        }
    }

    /// Allow `n` more successful requests.
    pub fn refill(&self, n: usize) {
        self.remaining.set(n);
    }

    /// Successful requests left before failures start.
    pub fn remaining(&self) -> usize {
        self.remaining.get()
    }

    /// The ledger of the requests that succeeded.
    pub fn counting(&self) -> &CountingAllocator {
        &self.inner
    }
}

impl Allocator for FailingAllocator {
    fn allocate_bytes(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        match self.remaining.get() {
            0 => Err(AllocError::OutOfMemory {
                bytes: layout.size(),
            }),
            n => {
                self.remaining.set(n - 1);
                self.inner.allocate_bytes(layout)
            }
        }
    }

    unsafe fn deallocate_bytes(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: every pointer handed out came from `inner`.
        unsafe { self.inner.deallocate_bytes(ptr, layout) }
    }

    fn is_compatible(&self, other: &Self) -> bool {
        self.inner.is_compatible(&other.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counting_allocator_balances() {
        let alloc = CountingAllocator::new();
        let storage = alloc.allocate::<u64>(4).unwrap();
        assert_eq!(alloc.outstanding(), 1);
        assert_eq!(alloc.outstanding_bytes(), 32);
        // SAFETY: storage came from `alloc`.
        unsafe { alloc.deallocate(storage) };
        assert_eq!(alloc.allocations(), 1);
        assert_eq!(alloc.deallocations(), 1);
        assert_eq!(alloc.peak_bytes(), 32);
        alloc.assert_no_leaks();
    }

    #[test]
    #[should_panic(expected = "leaked")]
    fn leak_is_reported() {
        let alloc = CountingAllocator::new();
        let storage = alloc.allocate::<u8>(1).unwrap();
        std::mem::forget(storage);
        alloc.assert_no_leaks();
    }

    #[test]
    fn separate_ledgers_are_incompatible() {
        let a = CountingAllocator::new();
        assert!(a.is_compatible(&a.clone()));
        assert!(!a.is_compatible(&CountingAllocator::new()));
    }

    #[test]
    fn failing_allocator_fails_after_budget() {
        let alloc = FailingAllocator::new(1);
        let first = alloc.allocate::<u32>(2).unwrap();
        assert_eq!(
            alloc.allocate::<u32>(2).unwrap_err(),
            AllocError::OutOfMemory { bytes: 8 }
        );
        // SAFETY: storage came from `alloc`.
        unsafe { alloc.deallocate(first) };
        alloc.counting().assert_no_leaks();
    }
}
