//! A state-carrying allocator that draws from a shared byte budget.
//!
//! [`BudgetAllocator`] wraps [`Global`] and refuses requests that would
//! push the pool's outstanding bytes past its configured limit. Clones
//! share the pool, and only allocators sharing a pool are compatible, so
//! storage can never be returned to a budget it was not charged to.

use std::alloc::Layout;
use std::cell::Cell;
use std::fmt;
use std::ptr::NonNull;
use std::rc::Rc;

use dynvec_core::AllocError;
use log::{trace, warn};

use crate::allocator::Allocator;
use crate::config::BudgetConfig;
use crate::global::Global;

struct BudgetPool {
    limit: usize,
    used: Cell<usize>,
    peak: Cell<usize>,
}

/// Allocator charging every allocation against a shared byte budget.
///
/// Single-threaded: the pool is reference-counted with `Rc`.
#[derive(Clone)]
pub struct BudgetAllocator {
    pool: Rc<BudgetPool>,
}

impl BudgetAllocator {
    /// Create a fresh pool with the given configuration.
    pub fn new(config: BudgetConfig) -> Self {
        Self {
            pool: Rc::new(BudgetPool {
                limit: config.limit_bytes,
                used: Cell::new(0),
                peak: Cell::new(0),
            }),
        }
    }

    /// Create a fresh pool with the given byte limit.
    pub fn with_limit(limit_bytes: usize) -> Self {
        Self::new(BudgetConfig::new(limit_bytes))
    }

    /// The pool's byte limit.
    pub fn limit(&self) -> usize {
        self.pool.limit
    }

    /// Bytes currently outstanding.
    pub fn used(&self) -> usize {
        self.pool.used.get()
    }

    /// Bytes still available.
    pub fn remaining(&self) -> usize {
        self.pool.limit - self.pool.used.get()
    }

    /// Highest number of bytes ever outstanding at once.
    pub fn peak(&self) -> usize {
        self.pool.peak.get()
    }
}

impl Default for BudgetAllocator {
    fn default() -> Self {
        Self::new(BudgetConfig::default())
    }
}

impl fmt::Debug for BudgetAllocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BudgetAllocator")
            .field("limit", &self.limit())
            .field("used", &self.used())
            .field("peak", &self.peak())
            .finish()
    }
}

impl Allocator for BudgetAllocator {
    fn allocate_bytes(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        let requested = layout.size();
        let remaining = self.remaining();
        if requested > remaining {
            warn!("budget allocator rejected {requested} bytes, {remaining} remaining");
            return Err(AllocError::BudgetExceeded {
                requested,
                remaining,
            });
        }
        let ptr = Global.allocate_bytes(layout)?;
        let used = self.pool.used.get() + requested;
        self.pool.used.set(used);
        if used > self.pool.peak.get() {
            self.pool.peak.set(used);
        }
        trace!("budget charge: {requested} bytes, {used} of {} used", self.pool.limit);
        Ok(ptr)
    }

    unsafe fn deallocate_bytes(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: the caller guarantees `ptr` came from `allocate_bytes`
        // on this pool, which obtained it from `Global` with this layout.
        unsafe { Global.deallocate_bytes(ptr, layout) };
        let used = self.pool.used.get().saturating_sub(layout.size());
        self.pool.used.set(used);
        trace!("budget refund: {} bytes, {used} used", layout.size());
    }

    fn is_compatible(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.pool, &other.pool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charges_and_refunds_the_pool() {
        let alloc = BudgetAllocator::with_limit(1024);
        let storage = alloc.allocate::<u64>(16).unwrap();
        assert_eq!(alloc.used(), 128);
        assert_eq!(alloc.remaining(), 896);
        // SAFETY: storage came from this pool.
        unsafe { alloc.deallocate(storage) };
        assert_eq!(alloc.used(), 0);
        assert_eq!(alloc.peak(), 128);
    }

    #[test]
    fn rejects_requests_past_the_limit() {
        let alloc = BudgetAllocator::with_limit(100);
        let err = alloc.allocate::<u8>(101).unwrap_err();
        assert_eq!(
            err,
            AllocError::BudgetExceeded {
                requested: 101,
                remaining: 100,
            }
        );
        assert_eq!(alloc.used(), 0);
    }

    #[test]
    fn clones_share_the_budget() {
        let a = BudgetAllocator::with_limit(64);
        let b = a.clone();
        let storage = a.allocate::<u8>(48).unwrap();
        assert_eq!(b.remaining(), 16);
        assert!(b.allocate::<u8>(17).is_err());
        // SAFETY: `b` shares `a`'s pool.
        unsafe { b.deallocate(storage) };
        assert_eq!(a.used(), 0);
    }

    #[test]
    fn separate_pools_are_incompatible() {
        let a = BudgetAllocator::with_limit(64);
        let b = BudgetAllocator::with_limit(64);
        assert!(a.is_compatible(&a.clone()));
        assert!(!a.is_compatible(&b));
    }

    #[test]
    fn zero_sized_requests_are_free() {
        let alloc = BudgetAllocator::with_limit(0);
        let storage = alloc.allocate::<u32>(0).unwrap();
        assert_eq!(alloc.used(), 0);
        // SAFETY: storage came from this pool.
        unsafe { alloc.deallocate(storage) };
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn used_never_exceeds_limit(
                limit in 0usize..4096,
                sizes in proptest::collection::vec(1usize..512, 1..32),
            ) {
                let alloc = BudgetAllocator::with_limit(limit);
                let mut held = Vec::new();
                for size in sizes {
                    if let Ok(storage) = alloc.allocate::<u8>(size) {
                        held.push(storage);
                    }
                    prop_assert!(alloc.used() <= limit);
                }
                let total: usize = held.iter().map(|s| s.count()).sum();
                prop_assert_eq!(alloc.used(), total);
                for storage in held {
                    // SAFETY: every handle came from this pool.
                    unsafe { alloc.deallocate(storage) };
                }
                prop_assert_eq!(alloc.used(), 0);
            }
        }
    }
}
