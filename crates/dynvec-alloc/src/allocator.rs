//! The [`Allocator`] trait and the [`Storage`] handle it produces.

use std::alloc::Layout;
use std::fmt;
use std::marker::PhantomData;
use std::mem;
use std::ptr::{self, NonNull};

use dynvec_core::AllocError;

/// Layout of `count` contiguous `T`s.
///
/// Fails with [`AllocError::CapacityOverflow`] when the byte size would
/// exceed `isize::MAX`.
pub fn array_layout<T>(count: usize) -> Result<Layout, AllocError> {
    Layout::array::<T>(count).map_err(|_| AllocError::CapacityOverflow {
        count,
        elem_size: mem::size_of::<T>(),
    })
}

/// Raw storage for a fixed number of `T`s, obtained from an [`Allocator`].
///
/// The handle owns the allocation but not the elements in it: slots start
/// uninitialized and the holder tracks which ones are live. A `Storage` is
/// neither `Clone` nor `Copy`, and [`Allocator::deallocate`] consumes it,
/// so a single allocation cannot be released twice. Dropping a `Storage`
/// without handing it back leaks the allocation.
#[must_use = "storage must be returned to its allocator"]
pub struct Storage<T> {
    ptr: NonNull<T>,
    count: usize,
    layout: Layout,
    _owns: PhantomData<T>,
}

// SAFETY: `Storage` is a unique owner of its allocation, like `Box<[T]>`.
unsafe impl<T: Send> Send for Storage<T> {}
// SAFETY: shared access to the handle only exposes the raw pointer.
unsafe impl<T: Sync> Sync for Storage<T> {}

impl<T> Storage<T> {
    /// A handle that owns no memory. Used for zero-byte requests.
    fn dangling(count: usize, layout: Layout) -> Self {
        Self {
            ptr: NonNull::dangling(),
            count,
            layout,
            _owns: PhantomData,
        }
    }

    /// Pointer to the first slot.
    pub fn as_ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Number of element slots.
    pub fn count(&self) -> usize {
        self.count
    }

    /// The layout this storage was allocated with.
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Whether this handle is backed by real memory.
    pub fn is_backed(&self) -> bool {
        self.layout.size() != 0
    }
}

impl<T> fmt::Debug for Storage<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Storage")
            .field("ptr", &self.ptr)
            .field("count", &self.count)
            .field("bytes", &self.layout.size())
            .finish()
    }
}

/// A memory policy for element storage.
///
/// Implementors provide the two byte-level primitives and an equality
/// predicate; the typed operations are provided on top of them.
///
/// # Compatibility
///
/// Two allocator values are compatible when storage obtained from one may
/// be released through the other. Stateless allocators are always
/// compatible with themselves; state-carrying allocators are compatible
/// only when they share state. Containers refuse to copy or move elements
/// between incompatible allocators.
pub trait Allocator: Clone {
    /// Obtain `layout.size()` bytes aligned to `layout.align()`.
    ///
    /// Callers of the typed API never pass zero-sized layouts; direct
    /// callers that do get a dangling, well-aligned pointer back.
    fn allocate_bytes(&self, layout: Layout) -> Result<NonNull<u8>, AllocError>;

    /// Release memory obtained from [`Allocator::allocate_bytes`].
    ///
    /// # Safety
    ///
    /// `ptr` must have been returned by `allocate_bytes` on this allocator
    /// or a compatible one, with the same `layout`, and not released since.
    unsafe fn deallocate_bytes(&self, ptr: NonNull<u8>, layout: Layout);

    /// Whether storage from `self` can be released through `other` and
    /// vice versa.
    fn is_compatible(&self, other: &Self) -> bool;

    /// Largest element count a single allocation of `T` may hold.
    fn max_count<T>(&self) -> usize {
        match mem::size_of::<T>() {
            0 => usize::MAX,
            size => isize::MAX as usize / size,
        }
    }

    /// Allocate uninitialized storage for exactly `count` elements.
    ///
    /// Never runs constructors. Zero-byte requests (zero `count` or a
    /// zero-sized `T`) succeed without touching the byte primitive.
    fn allocate<T>(&self, count: usize) -> Result<Storage<T>, AllocError> {
        let layout = array_layout::<T>(count)?;
        if layout.size() == 0 {
            return Ok(Storage::dangling(count, layout));
        }
        let ptr = self.allocate_bytes(layout)?;
        Ok(Storage {
            ptr: ptr.cast(),
            count,
            layout,
            _owns: PhantomData,
        })
    }

    /// Release storage previously returned by [`Allocator::allocate`].
    ///
    /// Live elements in the storage are not dropped; destroy them first.
    ///
    /// # Safety
    ///
    /// `storage` must come from this allocator or a compatible one.
    unsafe fn deallocate<T>(&self, storage: Storage<T>) {
        if storage.is_backed() {
            // SAFETY: the storage came from `allocate` on a compatible
            // allocator, which obtained it from `allocate_bytes` with
            // exactly this layout.
            unsafe { self.deallocate_bytes(storage.ptr.cast(), storage.layout) }
        }
    }

    /// Move `value` into the uninitialized slot at `slot`.
    ///
    /// # Safety
    ///
    /// `slot` must be valid for writes, aligned, and not hold a live
    /// element.
    unsafe fn construct<T>(&self, slot: *mut T, value: T) {
        // SAFETY: upheld by the caller.
        unsafe { slot.write(value) }
    }

    /// Run the drop glue of the live element at `slot`.
    ///
    /// # Safety
    ///
    /// `slot` must hold a live element, which is dead afterwards.
    unsafe fn destroy<T>(&self, slot: *mut T) {
        // SAFETY: upheld by the caller.
        unsafe { ptr::drop_in_place(slot) }
    }

    /// Run the drop glue of every element in `slice`.
    ///
    /// # Safety
    ///
    /// Every slot in `slice` must hold a live element.
    unsafe fn destroy_range<T>(&self, slice: *mut [T]) {
        // SAFETY: upheld by the caller.
        unsafe { ptr::drop_in_place(slice) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Global;

    #[test]
    fn array_layout_rejects_overflow() {
        let err = array_layout::<u64>(usize::MAX).unwrap_err();
        assert_eq!(
            err,
            AllocError::CapacityOverflow {
                count: usize::MAX,
                elem_size: 8,
            }
        );
    }

    #[test]
    fn zero_count_storage_is_unbacked() {
        let storage = Global.allocate::<u32>(0).unwrap();
        assert_eq!(storage.count(), 0);
        assert!(!storage.is_backed());
        // SAFETY: storage came from `Global`.
        unsafe { Global.deallocate(storage) };
    }

    #[test]
    fn zero_sized_types_never_touch_memory() {
        let storage = Global.allocate::<()>(1_000_000).unwrap();
        assert_eq!(storage.count(), 1_000_000);
        assert!(!storage.is_backed());
        // SAFETY: storage came from `Global`.
        unsafe { Global.deallocate(storage) };
    }

    #[test]
    fn storage_remembers_its_layout() {
        let storage = Global.allocate::<u64>(10).unwrap();
        assert_eq!(storage.layout(), Layout::array::<u64>(10).unwrap());
        assert_eq!(storage.as_ptr() as usize % mem::align_of::<u64>(), 0);
        // SAFETY: storage came from `Global`.
        unsafe { Global.deallocate(storage) };
    }

    #[test]
    fn construct_and_destroy_round_trip() {
        let storage = Global.allocate::<String>(2).unwrap();
        // SAFETY: both slots are in bounds and uninitialized, and each is
        // destroyed exactly once before the storage is released.
        unsafe {
            Global.construct(storage.as_ptr(), "a".to_string());
            Global.construct(storage.as_ptr().add(1), "b".to_string());
            assert_eq!(*storage.as_ptr().add(1), "b");
            Global.destroy(storage.as_ptr());
            Global.destroy_range(ptr::slice_from_raw_parts_mut(storage.as_ptr().add(1), 1));
            Global.deallocate(storage);
        }
    }

    #[test]
    fn max_count_scales_with_element_size() {
        assert_eq!(Global.max_count::<u8>(), isize::MAX as usize);
        assert_eq!(Global.max_count::<u32>(), isize::MAX as usize / 4);
        assert_eq!(Global.max_count::<()>(), usize::MAX);
    }

    #[test]
    fn oversized_request_is_an_error_not_a_panic() {
        let result = Global.allocate::<u64>(Global.max_count::<u64>() + 1);
        assert!(matches!(result, Err(AllocError::CapacityOverflow { .. })));
    }
}
