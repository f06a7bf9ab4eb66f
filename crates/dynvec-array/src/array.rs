//! The growable contiguous array.
//!
//! [`DynArray`] owns a single [`Storage`] obtained from its allocator and
//! tracks how many of its slots hold live elements:
//!
//! ```text
//!   buffer (capacity = 8)
//!   ┌────┬────┬────┬────┬────┬────┬────┬────┐
//!   │ e0 │ e1 │ e2 │ e3 │ e4 │ ·· │ ·· │ ·· │
//!   └────┴────┴────┴────┴────┴────┴────┴────┘
//!   ◄──────── live (len = 5) ─────►◄ uninit ►
//! ```
//!
//! Appends that find the buffer full double the capacity (starting at 1),
//! so `n` appends cost O(n) element moves in total. Every change of buffer
//! identity bumps the array's [`Generation`], which is how stale cursors
//! are detected.

use std::fmt;
use std::mem;
use std::ops::{Index, IndexMut};
use std::ptr::{self, NonNull};
use std::slice::{self, SliceIndex};

use dynvec_alloc::{AllocError, Allocator, Global, Storage};
use dynvec_core::{ArrayError, CursorFault, Generation, InstanceId, Origin};
use log::debug;

use crate::cursor::{same_origin, ConstCursor, Cursor, MutPosition, Position};
use crate::reverse::{ConstReverseCursor, Reverse, ReverseCursor};

/// Capacity of the first allocation made by an append.
pub const MIN_NON_ZERO_CAPACITY: usize = 1;

/// Factor by which a full buffer grows on append.
pub const GROWTH_FACTOR: usize = 2;

/// A contiguous growable array of `T` backed by an [`Allocator`].
///
/// # Element access
///
/// `array[i]` panics when `i >= len()`, like every Rust index operation.
/// [`get`](Self::get) and the cursor accessors are the checked forms;
/// [`get_unchecked`](Self::get_unchecked) is the unchecked one.
///
/// # Invalidation
///
/// Operations that replace or release the buffer invalidate every
/// previously issued cursor; see the [`cursor`](crate::cursor) module.
/// Borrowing iterators and references are protected by the borrow
/// checker instead.
pub struct DynArray<T, A: Allocator = Global> {
    buf: Option<Storage<T>>,
    len: usize,
    alloc: A,
    instance: InstanceId,
    generation: Generation,
}

impl<T> DynArray<T, Global> {
    /// Empty array. Does not allocate.
    pub fn new() -> Self {
        Self::new_in(Global)
    }

    /// Empty array with room for `capacity` elements.
    ///
    /// The storage is allocated eagerly but no element is created:
    /// `len()` is 0 afterwards. Use [`from_elem`](Self::from_elem) for a
    /// populated array.
    pub fn with_capacity(capacity: usize) -> Result<Self, ArrayError> {
        Self::with_capacity_in(capacity, Global)
    }

    /// `len` clones of `value`, with capacity exactly `len`.
    pub fn from_elem(len: usize, value: T) -> Result<Self, ArrayError>
    where
        T: Clone,
    {
        Self::from_elem_in(len, value, Global)
    }

    /// A copy of `items`.
    pub fn from_slice(items: &[T]) -> Result<Self, ArrayError>
    where
        T: Clone,
    {
        Self::from_slice_in(items, Global)
    }
}

impl<T, A: Allocator> DynArray<T, A> {
    /// Empty array bound to `alloc`. Does not allocate.
    pub fn new_in(alloc: A) -> Self {
        Self {
            buf: None,
            len: 0,
            alloc,
            instance: InstanceId::next(),
            generation: Generation::INITIAL,
        }
    }

    /// Empty array bound to `alloc` with `capacity` slots reserved.
    pub fn with_capacity_in(capacity: usize, alloc: A) -> Result<Self, ArrayError> {
        let mut array = Self::new_in(alloc);
        if capacity > 0 {
            array.buf = Some(array.alloc.allocate::<T>(capacity)?);
        }
        Ok(array)
    }

    /// `len` clones of `value` in storage from `alloc`.
    pub fn from_elem_in(len: usize, value: T, alloc: A) -> Result<Self, ArrayError>
    where
        T: Clone,
    {
        let mut array = Self::with_capacity_in(len, alloc)?;
        if len > 0 {
            for _ in 1..len {
                // SAFETY: capacity is `len` and fewer than `len` slots are live.
                unsafe { array.write_next(value.clone()) };
            }
            // SAFETY: exactly one free slot remains.
            unsafe { array.write_next(value) };
        }
        Ok(array)
    }

    /// A copy of `items` in storage from `alloc`.
    pub fn from_slice_in(items: &[T], alloc: A) -> Result<Self, ArrayError>
    where
        T: Clone,
    {
        let mut array = Self::with_capacity_in(items.len(), alloc)?;
        for item in items {
            // SAFETY: capacity is `items.len()`.
            unsafe { array.write_next(item.clone()) };
        }
        Ok(array)
    }

    // ── Inspection ──────────────────────────────────────────────

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Number of slots backed by storage.
    pub fn capacity(&self) -> usize {
        self.buf.as_ref().map_or(0, Storage::count)
    }

    /// Whether the array holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Largest length the allocator could ever back.
    pub fn max_size(&self) -> usize {
        self.alloc.max_count::<T>()
    }

    /// The allocator this array draws from.
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    /// This array's instance and current buffer generation.
    pub fn origin(&self) -> Origin {
        Origin::new(self.instance, self.generation)
    }

    /// Current buffer generation.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Pointer to the first slot; dangling when nothing is allocated.
    pub fn as_ptr(&self) -> *const T {
        self.slot_ptr()
    }

    /// Mutable pointer to the first slot; dangling when nothing is
    /// allocated.
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.slot_ptr()
    }

    fn slot_ptr(&self) -> *mut T {
        match &self.buf {
            Some(storage) => storage.as_ptr(),
            None => NonNull::dangling().as_ptr(),
        }
    }

    /// The live elements.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: the first `len` slots are live and the pointer is
        // non-null and aligned even when nothing is allocated.
        unsafe { slice::from_raw_parts(self.slot_ptr(), self.len) }
    }

    /// The live elements, mutably.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as in `as_slice`, and `&mut self` guarantees exclusivity.
        unsafe { slice::from_raw_parts_mut(self.slot_ptr(), self.len) }
    }

    /// Borrowing iterator, front to back. `.rev()` walks back to front.
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Mutably borrowing iterator.
    pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
        self.as_mut_slice().iter_mut()
    }

    // ── Element access ──────────────────────────────────────────

    /// Element at `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    /// Mutable element at `index`, or `None` past the end.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.as_mut_slice().get_mut(index)
    }

    /// Element at `index` without a bounds check.
    ///
    /// # Safety
    ///
    /// `index` must be less than `len()`.
    pub unsafe fn get_unchecked(&self, index: usize) -> &T {
        debug_assert!(index < self.len);
        // SAFETY: upheld by the caller.
        unsafe { &*self.slot_ptr().add(index) }
    }

    /// Mutable element at `index` without a bounds check.
    ///
    /// # Safety
    ///
    /// `index` must be less than `len()`.
    pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut T {
        debug_assert!(index < self.len);
        // SAFETY: upheld by the caller.
        unsafe { &mut *self.slot_ptr().add(index) }
    }

    /// First element.
    pub fn front(&self) -> Option<&T> {
        self.as_slice().first()
    }

    /// Last element.
    pub fn back(&self) -> Option<&T> {
        self.as_slice().last()
    }

    /// First element, mutably.
    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.as_mut_slice().first_mut()
    }

    /// Last element, mutably.
    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.as_mut_slice().last_mut()
    }

    // ── Cursors ─────────────────────────────────────────────────

    /// Cursor to the first element.
    pub fn begin(&self) -> Cursor<T> {
        Cursor::new(self.origin(), 0)
    }

    /// Cursor one past the last element.
    pub fn end(&self) -> Cursor<T> {
        Cursor::new(self.origin(), self.len)
    }

    /// Read-only cursor to the first element.
    pub fn cbegin(&self) -> ConstCursor<T> {
        ConstCursor::new(self.origin(), 0)
    }

    /// Read-only cursor one past the last element.
    pub fn cend(&self) -> ConstCursor<T> {
        ConstCursor::new(self.origin(), self.len)
    }

    /// Reverse cursor to the last element.
    pub fn rbegin(&self) -> ReverseCursor<T> {
        Reverse::new(self.end())
    }

    /// Reverse cursor one before the first element.
    pub fn rend(&self) -> ReverseCursor<T> {
        Reverse::new(self.begin())
    }

    /// Read-only reverse cursor to the last element.
    pub fn crbegin(&self) -> ConstReverseCursor<T> {
        Reverse::new(self.cend())
    }

    /// Read-only reverse cursor one before the first element.
    pub fn crend(&self) -> ConstReverseCursor<T> {
        Reverse::new(self.cbegin())
    }

    /// The element a cursor designates.
    ///
    /// Fails with [`ArrayError::InvalidIterator`] for a stale or foreign
    /// cursor and [`ArrayError::OutOfBounds`] for one at or past `end`.
    pub fn get_at<P>(&self, pos: P) -> Result<&T, ArrayError>
    where
        P: Position<Elem = T>,
    {
        let index = self.resolve(pos)?;
        // SAFETY: `resolve` checked `index < len`.
        Ok(unsafe { self.get_unchecked(index) })
    }

    /// The element a mutable cursor designates, mutably.
    pub fn get_at_mut<P>(&mut self, pos: P) -> Result<&mut T, ArrayError>
    where
        P: MutPosition<Elem = T>,
    {
        let index = self.resolve(pos)?;
        // SAFETY: `resolve` checked `index < len`.
        Ok(unsafe { self.get_unchecked_mut(index) })
    }

    /// Borrowing iterator over the half-open cursor range `[first, last)`.
    pub fn iter_range<P>(&self, first: P, last: P) -> Result<slice::Iter<'_, T>, ArrayError>
    where
        P: Into<ConstCursor<T>>,
    {
        let (first, last) = (first.into(), last.into());
        let start = self.check_position(first.origin(), first.index(), true)?;
        let end = self.check_position(last.origin(), last.index(), true)?;
        if start > end {
            return Err(CursorFault::OutOfRange {
                index: start,
                len: self.len,
            }
            .into());
        }
        Ok(self.as_slice()[start..end].iter())
    }

    fn resolve<P: Position<Elem = T>>(&self, pos: P) -> Result<usize, ArrayError> {
        same_origin(pos.origin(), self.origin())?;
        let index = pos.element_index();
        if index >= self.len {
            return Err(ArrayError::OutOfBounds {
                index,
                len: self.len,
            });
        }
        Ok(index)
    }

    /// Validates a position argument. `allow_end` admits `index == len`.
    fn check_position(
        &self,
        origin: Origin,
        index: usize,
        allow_end: bool,
    ) -> Result<usize, ArrayError> {
        same_origin(origin, self.origin())?;
        let in_range = if allow_end {
            index <= self.len
        } else {
            index < self.len
        };
        if !in_range {
            return Err(CursorFault::OutOfRange {
                index,
                len: self.len,
            }
            .into());
        }
        Ok(index)
    }

    // ── Storage management ──────────────────────────────────────

    /// Ensure capacity is at least `target`.
    ///
    /// No-op when `target <= capacity()`. Otherwise reallocates to exactly
    /// `target` slots and relocates the live elements; `len()` and element
    /// order are unchanged. Invalidates all cursors when it reallocates.
    pub fn reserve(&mut self, target: usize) -> Result<(), ArrayError> {
        if target <= self.capacity() {
            return Ok(());
        }
        self.relocate(target)
    }

    /// Release unused capacity. An empty array releases its buffer.
    pub fn shrink_to_fit(&mut self) -> Result<(), ArrayError> {
        if self.capacity() == self.len {
            return Ok(());
        }
        if self.len == 0 {
            self.release();
            return Ok(());
        }
        self.relocate(self.len)
    }

    /// Grow so that `required` elements fit, doubling at least.
    fn grow_to_fit(&mut self, required: usize) -> Result<(), ArrayError> {
        let cap = self.capacity();
        if required <= cap {
            return Ok(());
        }
        let doubled = cap.checked_mul(GROWTH_FACTOR).ok_or(AllocError::CapacityOverflow {
            count: cap,
            elem_size: mem::size_of::<T>(),
        })?;
        self.relocate(required.max(doubled).max(MIN_NON_ZERO_CAPACITY))
    }

    /// Move every live element into fresh storage of `new_cap` slots.
    fn relocate(&mut self, new_cap: usize) -> Result<(), ArrayError> {
        debug_assert!(new_cap >= self.len);
        let fresh = self.alloc.allocate::<T>(new_cap)?;
        let old_cap = self.capacity();
        if let Some(old) = self.buf.take() {
            // SAFETY: the first `len` slots of `old` are live, `fresh` has
            // room for at least `len`, and the two allocations are
            // distinct. The elements are moved bitwise, so `old` holds no
            // live elements afterwards.
            unsafe {
                ptr::copy_nonoverlapping(old.as_ptr(), fresh.as_ptr(), self.len);
                self.alloc.deallocate(old);
            }
        }
        self.buf = Some(fresh);
        self.bump_generation();
        debug!(
            "dynarray {}: relocated {} elements, capacity {} -> {}, gen {}",
            self.instance, self.len, old_cap, new_cap, self.generation
        );
        Ok(())
    }

    /// Destroy every element and release the buffer.
    fn release(&mut self) {
        self.truncate(0);
        if let Some(storage) = self.buf.take() {
            let cap = storage.count();
            // SAFETY: the storage came from `self.alloc` and holds no live
            // elements after `truncate(0)`.
            unsafe { self.alloc.deallocate(storage) };
            self.bump_generation();
            debug!(
                "dynarray {}: released capacity {}, gen {}",
                self.instance, cap, self.generation
            );
        }
    }

    fn bump_generation(&mut self) {
        self.generation = self.generation.next();
    }

    /// Construct `value` in the first free slot.
    ///
    /// # Safety
    ///
    /// `len < capacity()` must hold.
    unsafe fn write_next(&mut self, value: T) {
        debug_assert!(self.len < self.capacity());
        // SAFETY: slot `len` is in bounds and uninitialized.
        unsafe { self.alloc.construct(self.slot_ptr().add(self.len), value) };
        self.len += 1;
    }

    // ── Mutation ────────────────────────────────────────────────

    /// Append `value`.
    ///
    /// A full buffer grows to `max(1, 2 * capacity)` first, which
    /// invalidates all cursors. On failure the array is unchanged and
    /// `value` is dropped.
    pub fn push_back(&mut self, value: T) -> Result<(), ArrayError> {
        if self.len == self.capacity() {
            self.grow_to_fit(self.len + 1)?;
        }
        // SAFETY: the branch above guarantees a free slot.
        unsafe { self.write_next(value) };
        Ok(())
    }

    /// Remove the last element and hand it back.
    ///
    /// Fails with [`ArrayError::EmptyContainer`] when there is none.
    pub fn pop_back(&mut self) -> Result<T, ArrayError> {
        if self.len == 0 {
            return Err(ArrayError::EmptyContainer);
        }
        self.len -= 1;
        // SAFETY: slot `len` was live and is now outside the live range,
        // so ownership moves to the caller exactly once.
        Ok(unsafe { ptr::read(self.slot_ptr().add(self.len)) })
    }

    /// Append clones of every element of `items`.
    pub fn extend_from_slice(&mut self, items: &[T]) -> Result<(), ArrayError>
    where
        T: Clone,
    {
        let required = self
            .len
            .checked_add(items.len())
            .ok_or(AllocError::CapacityOverflow {
                count: usize::MAX,
                elem_size: mem::size_of::<T>(),
            })?;
        self.grow_to_fit(required)?;
        for item in items {
            // SAFETY: capacity covers `required`.
            unsafe { self.write_next(item.clone()) };
        }
        Ok(())
    }

    /// Insert `value` before `pos`; `end()` appends.
    ///
    /// The position is validated before anything else happens: a stale
    /// or foreign cursor, or one past `end()`, fails with
    /// [`ArrayError::InvalidIterator`] and leaves the array untouched.
    /// Returns a cursor to the inserted element, issued under the array's
    /// current generation.
    ///
    /// Positions are forward cursors. To insert so the new element comes
    /// right after a [`Reverse`](crate::Reverse) cursor `r` in reverse
    /// order, pass `r.base()`.
    pub fn insert<P>(&mut self, pos: P, value: T) -> Result<Cursor<T>, ArrayError>
    where
        P: Into<ConstCursor<T>>,
    {
        let pos = pos.into();
        let index = self.check_position(pos.origin(), pos.index(), true)?;
        if self.len == self.capacity() {
            self.grow_to_fit(self.len + 1)?;
        }
        // SAFETY: `index <= len < capacity`. The tail `[index, len)` is
        // shifted one slot back into the free slot at `len`, leaving slot
        // `index` logically uninitialized for the construct.
        unsafe {
            let slot = self.slot_ptr().add(index);
            ptr::copy(slot, slot.add(1), self.len - index);
            self.alloc.construct(slot, value);
        }
        self.len += 1;
        Ok(Cursor::new(self.origin(), index))
    }

    /// Destroy the element at `pos` and close the gap.
    ///
    /// Fails with [`ArrayError::InvalidIterator`] unless `pos` lies in
    /// `[begin, end)` of this array's current generation. Returns a cursor
    /// to the element that followed the erased one.
    ///
    /// Positions are forward cursors. The element a
    /// [`Reverse`](crate::Reverse) cursor `r` designates sits at
    /// `r.base() - 1isize`.
    pub fn erase<P>(&mut self, pos: P) -> Result<Cursor<T>, ArrayError>
    where
        P: Into<ConstCursor<T>>,
    {
        let pos = pos.into();
        let index = self.check_position(pos.origin(), pos.index(), false)?;
        let tail = self.len - index - 1;
        // The tail is outside the live range while the destructor runs.
        self.len = index;
        // SAFETY: slot `index` is live; after destroying it, the `tail`
        // live elements behind it are moved down by one.
        unsafe {
            let slot = self.slot_ptr().add(index);
            self.alloc.destroy(slot);
            ptr::copy(slot.add(1), slot, tail);
        }
        self.len = index + tail;
        Ok(Cursor::new(self.origin(), index))
    }

    /// Remove the element at `index`, close the gap, and hand it back.
    pub fn remove(&mut self, index: usize) -> Result<T, ArrayError> {
        if index >= self.len {
            return Err(ArrayError::OutOfBounds {
                index,
                len: self.len,
            });
        }
        // SAFETY: slot `index` is live; its value is moved out and the
        // tail is moved down over it.
        unsafe {
            let slot = self.slot_ptr().add(index);
            let value = ptr::read(slot);
            ptr::copy(slot.add(1), slot, self.len - index - 1);
            self.len -= 1;
            Ok(value)
        }
    }

    /// Destroy elements past `len`, keeping the buffer.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return;
        }
        let tail = self.len - len;
        self.len = len;
        // SAFETY: the `tail` slots after `len` were live and are now
        // outside the live range, so they are destroyed exactly once.
        unsafe {
            let tail = ptr::slice_from_raw_parts_mut(self.slot_ptr().add(len), tail);
            self.alloc.destroy_range(tail);
        }
    }

    /// Destroy every element and release the buffer.
    ///
    /// Afterwards `len()` and `capacity()` are both 0 and every cursor is
    /// invalidated. Use [`truncate(0)`](Self::truncate) to keep the
    /// buffer for reuse.
    pub fn clear(&mut self) {
        self.release();
    }

    /// Set the length to `len`, cloning `value` into new slots.
    pub fn resize(&mut self, len: usize, value: T) -> Result<(), ArrayError>
    where
        T: Clone,
    {
        if len <= self.len {
            self.truncate(len);
            return Ok(());
        }
        self.reserve(len)?;
        while self.len + 1 < len {
            // SAFETY: capacity is at least `len`.
            unsafe { self.write_next(value.clone()) };
        }
        // SAFETY: one free slot remains below `len`.
        unsafe { self.write_next(value) };
        Ok(())
    }

    /// Set the length to `len`, filling new slots from `f`.
    pub fn resize_with<F>(&mut self, len: usize, mut f: F) -> Result<(), ArrayError>
    where
        F: FnMut() -> T,
    {
        if len <= self.len {
            self.truncate(len);
            return Ok(());
        }
        self.reserve(len)?;
        while self.len < len {
            // SAFETY: capacity is at least `len`.
            unsafe { self.write_next(f()) };
        }
        Ok(())
    }

    // ── Copy and move ───────────────────────────────────────────

    /// Deep copy with the same capacity, in a clone of this array's
    /// allocator.
    pub fn try_clone(&self) -> Result<Self, ArrayError>
    where
        T: Clone,
    {
        self.clone_with(self.alloc.clone())
    }

    /// Deep copy into storage from `alloc`.
    ///
    /// Fails with [`ArrayError::IncompatibleAllocator`] when `alloc` is
    /// not interchangeable with this array's allocator.
    pub fn try_clone_in(&self, alloc: A) -> Result<Self, ArrayError>
    where
        T: Clone,
    {
        if !alloc.is_compatible(&self.alloc) {
            return Err(ArrayError::IncompatibleAllocator);
        }
        self.clone_with(alloc)
    }

    fn clone_with(&self, alloc: A) -> Result<Self, ArrayError>
    where
        T: Clone,
    {
        let mut copy = Self::with_capacity_in(self.capacity(), alloc)?;
        for item in self.as_slice() {
            // SAFETY: the copy has this array's capacity, which covers `len`.
            unsafe { copy.write_next(item.clone()) };
        }
        Ok(copy)
    }

    /// Copy assignment: replace this array's contents with a copy of
    /// `source`.
    ///
    /// The copy is built before the old contents are released, so a
    /// failure (or a panicking `clone`) leaves this array unchanged.
    pub fn assign(&mut self, source: &Self) -> Result<(), ArrayError>
    where
        T: Clone,
    {
        if !self.alloc.is_compatible(&source.alloc) {
            return Err(ArrayError::IncompatibleAllocator);
        }
        let copy = source.clone_with(self.alloc.clone())?;
        self.adopt(copy);
        Ok(())
    }

    /// Move assignment: release this array's contents and take over
    /// `source`'s buffer, which is left empty.
    pub fn move_assign(&mut self, source: &mut Self) -> Result<(), ArrayError> {
        if !self.alloc.is_compatible(&source.alloc) {
            return Err(ArrayError::IncompatibleAllocator);
        }
        let taken = source.take();
        self.adopt(taken);
        Ok(())
    }

    /// Move construction: a new array that owns this array's buffer.
    ///
    /// O(1). This array is left empty (length and capacity 0) and remains
    /// usable. The new array has its own instance identity, so cursors
    /// issued by this array do not carry over.
    pub fn take(&mut self) -> Self {
        let mut moved = Self::new_in(self.alloc.clone());
        moved.buf = self.buf.take();
        moved.len = mem::replace(&mut self.len, 0);
        if moved.buf.is_some() {
            self.bump_generation();
        }
        moved
    }

    /// Exchange buffers, lengths and allocators with `other` in O(1).
    ///
    /// Cursors of both arrays are invalidated.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(&mut self.buf, &mut other.buf);
        mem::swap(&mut self.len, &mut other.len);
        mem::swap(&mut self.alloc, &mut other.alloc);
        self.bump_generation();
        other.bump_generation();
    }

    /// Release the current contents and take over `other`'s buffer.
    fn adopt(&mut self, mut other: Self) {
        self.release();
        self.buf = other.buf.take();
        self.len = mem::replace(&mut other.len, 0);
        self.bump_generation();
        debug!(
            "dynarray {}: adopted buffer of capacity {}, gen {}",
            self.instance,
            self.capacity(),
            self.generation
        );
    }

    /// Take the buffer apart for an owning iterator.
    pub(crate) fn into_raw_parts(mut self) -> (Option<Storage<T>>, usize, A) {
        let buf = self.buf.take();
        let len = mem::replace(&mut self.len, 0);
        (buf, len, self.alloc.clone())
    }
}

/// Panic with the message of an allocation-related failure.
///
/// Used by trait implementations that cannot return a `Result`.
#[cold]
#[track_caller]
pub(crate) fn allocation_panic(err: ArrayError) -> ! {
    panic!("dynarray: {err}")
}

impl<T, A: Allocator> Drop for DynArray<T, A> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<T, A: Allocator + Default> Default for DynArray<T, A> {
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

/// # Panics
///
/// `clone` panics if the copy cannot be allocated. `clone_from` also
/// panics if the two arrays' allocators are incompatible.
impl<T: Clone, A: Allocator> Clone for DynArray<T, A> {
    fn clone(&self) -> Self {
        self.try_clone().unwrap_or_else(|e| allocation_panic(e))
    }

    fn clone_from(&mut self, source: &Self) {
        if let Err(e) = self.assign(source) {
            allocation_panic(e);
        }
    }
}

impl<T, A: Allocator, I: SliceIndex<[T]>> Index<I> for DynArray<T, A> {
    type Output = I::Output;

    fn index(&self, index: I) -> &Self::Output {
        &self.as_slice()[index]
    }
}

impl<T, A: Allocator, I: SliceIndex<[T]>> IndexMut<I> for DynArray<T, A> {
    fn index_mut(&mut self, index: I) -> &mut Self::Output {
        &mut self.as_mut_slice()[index]
    }
}

impl<T, A: Allocator> AsRef<[T]> for DynArray<T, A> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, A: Allocator> AsMut<[T]> for DynArray<T, A> {
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: fmt::Debug, A: Allocator> fmt::Debug for DynArray<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
