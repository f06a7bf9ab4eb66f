//! The stateless process-allocator policy.

use std::alloc::{self, Layout};
use std::ptr::{self, NonNull};

use dynvec_core::AllocError;
use log::trace;

use crate::allocator::Allocator;

/// Stateless allocator backed by the process's global allocator.
///
/// Zero-sized; every `Global` value is interchangeable with every other.
/// Out-of-memory is reported as [`AllocError::OutOfMemory`] instead of
/// aborting the process.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Global;

/// A non-null pointer aligned to `layout.align()` that owns nothing.
pub(crate) fn dangling_for(layout: Layout) -> NonNull<u8> {
    NonNull::new(ptr::without_provenance_mut(layout.align())).unwrap_or(NonNull::dangling())
}

impl Allocator for Global {
    fn allocate_bytes(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        if layout.size() == 0 {
            return Ok(dangling_for(layout));
        }
        // SAFETY: `layout` has a non-zero size.
        let raw = unsafe { alloc::alloc(layout) };
        let ptr = NonNull::new(raw).ok_or(AllocError::OutOfMemory {
            bytes: layout.size(),
        })?;
        trace!(
            "global alloc: {} bytes align {} at {:p}",
            layout.size(),
            layout.align(),
            ptr
        );
        Ok(ptr)
    }

    unsafe fn deallocate_bytes(&self, ptr: NonNull<u8>, layout: Layout) {
        if layout.size() == 0 {
            return;
        }
        trace!("global dealloc: {} bytes at {:p}", layout.size(), ptr);
        // SAFETY: the caller guarantees `ptr` came from `alloc` with this
        // layout and has not been released.
        unsafe { alloc::dealloc(ptr.as_ptr(), layout) }
    }

    fn is_compatible(&self, _other: &Self) -> bool {
        true
    }
}
