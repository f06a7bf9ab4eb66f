//! Owning iteration and conversions from other collections.

use std::fmt;
use std::iter::FusedIterator;
use std::ptr;
use std::slice;

use dynvec_alloc::{Allocator, Global, Storage};

use crate::array::{allocation_panic, DynArray};

/// Owning iterator over the elements of a [`DynArray`].
///
/// Elements not yet yielded are dropped, and the buffer returned to its
/// allocator, when the iterator is dropped.
pub struct IntoIter<T, A: Allocator = Global> {
    buf: Option<Storage<T>>,
    alloc: A,
    start: usize,
    end: usize,
}

impl<T, A: Allocator> IntoIter<T, A> {
    /// The elements not yet yielded.
    pub fn as_slice(&self) -> &[T] {
        match &self.buf {
            // SAFETY: slots `[start, end)` are live.
            Some(buf) => unsafe {
                slice::from_raw_parts(buf.as_ptr().add(self.start), self.end - self.start)
            },
            None => &[],
        }
    }

    fn slot(&self, index: usize) -> *mut T {
        match &self.buf {
            // SAFETY: callers pass an index inside the buffer.
            Some(buf) => unsafe { buf.as_ptr().add(index) },
            None => ptr::null_mut(),
        }
    }
}

impl<T, A: Allocator> Iterator for IntoIter<T, A> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        let slot = self.slot(self.start);
        self.start += 1;
        // SAFETY: the slot was live and now lies outside `[start, end)`,
        // so it is read exactly once.
        Some(unsafe { ptr::read(slot) })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.end - self.start;
        (n, Some(n))
    }
}

impl<T, A: Allocator> DoubleEndedIterator for IntoIter<T, A> {
    fn next_back(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        self.end -= 1;
        // SAFETY: as in `next`.
        Some(unsafe { ptr::read(self.slot(self.end)) })
    }
}

impl<T, A: Allocator> ExactSizeIterator for IntoIter<T, A> {}

impl<T, A: Allocator> FusedIterator for IntoIter<T, A> {}

impl<T, A: Allocator> Drop for IntoIter<T, A> {
    fn drop(&mut self) {
        let Some(buf) = self.buf.take() else {
            return;
        };
        let (start, remaining) = (self.start, self.end - self.start);
        self.start = self.end;
        // SAFETY: the unyielded slots are live and destroyed once; the
        // storage came from `self.alloc`.
        unsafe {
            let rest = ptr::slice_from_raw_parts_mut(buf.as_ptr().add(start), remaining);
            self.alloc.destroy_range(rest);
            self.alloc.deallocate(buf);
        }
    }
}

impl<T: fmt::Debug, A: Allocator> fmt::Debug for IntoIter<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}

impl<T, A: Allocator> IntoIterator for DynArray<T, A> {
    type Item = T;
    type IntoIter = IntoIter<T, A>;

    fn into_iter(self) -> IntoIter<T, A> {
        let (buf, len, alloc) = self.into_raw_parts();
        IntoIter {
            buf,
            alloc,
            start: 0,
            end: len,
        }
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a DynArray<T, A> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> slice::Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a mut DynArray<T, A> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> slice::IterMut<'a, T> {
        self.iter_mut()
    }
}

/// # Panics
///
/// Panics if storage for the elements cannot be allocated.
impl<T, A: Allocator> Extend<T> for DynArray<T, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        if let Some(target) = self.len().checked_add(lower) {
            if let Err(e) = self.reserve(target) {
                allocation_panic(e);
            }
        }
        for item in iter {
            if let Err(e) = self.push_back(item) {
                allocation_panic(e);
            }
        }
    }
}

impl<'a, T: Copy + 'a, A: Allocator> Extend<&'a T> for DynArray<T, A> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

/// # Panics
///
/// Panics if storage for the elements cannot be allocated.
impl<T, A: Allocator + Default> FromIterator<T> for DynArray<T, A> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut array = Self::new_in(A::default());
        array.extend(iter);
        array
    }
}

/// Moves the elements of a `Vec` into a fresh buffer.
impl<T> From<Vec<T>> for DynArray<T> {
    fn from(v: Vec<T>) -> Self {
        v.into_iter().collect()
    }
}

impl<T, const N: usize> From<[T; N]> for DynArray<T> {
    fn from(items: [T; N]) -> Self {
        items.into_iter().collect()
    }
}

impl<T: Clone> From<&[T]> for DynArray<T> {
    fn from(items: &[T]) -> Self {
        Self::from_slice(items).unwrap_or_else(|e| allocation_panic(e))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    struct DropCount(Rc<Cell<usize>>);

    impl Drop for DropCount {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn yields_in_order_both_ends() {
        let arr = DynArray::from([1, 2, 3, 4]);
        let mut it = arr.into_iter();
        assert_eq!(it.len(), 4);
        assert_eq!(it.next(), Some(1));
        assert_eq!(it.next_back(), Some(4));
        assert_eq!(it.as_slice(), &[2, 3]);
        assert_eq!(it.collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn dropping_partially_consumed_iterator_drops_rest() {
        let drops = Rc::new(Cell::new(0));
        let mut arr = DynArray::new();
        for _ in 0..5 {
            arr.push_back(DropCount(drops.clone())).unwrap();
        }
        let mut it = arr.into_iter();
        drop(it.next());
        drop(it.next_back());
        assert_eq!(drops.get(), 2);
        drop(it);
        assert_eq!(drops.get(), 5);
    }

    #[test]
    fn empty_array_iterates_nothing() {
        let arr: DynArray<String> = DynArray::new();
        assert_eq!(arr.into_iter().next(), None);
    }

    #[test]
    fn borrowing_iteration() {
        let mut arr = DynArray::from(vec![1, 2, 3]);
        for v in &mut arr {
            *v *= 10;
        }
        let seen: Vec<i32> = (&arr).into_iter().copied().collect();
        assert_eq!(seen, vec![10, 20, 30]);
        let back: Vec<i32> = arr.iter().rev().copied().collect();
        assert_eq!(back, vec![30, 20, 10]);
    }

    #[test]
    fn collect_and_extend() {
        let mut arr: DynArray<u32> = (0..4).collect();
        arr.extend([4, 5]);
        arr.extend(&[6u32, 7]);
        assert_eq!(arr, [0, 1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn from_slice_clones() {
        let src = ["a".to_string(), "b".to_string()];
        let arr = DynArray::from(&src[..]);
        assert_eq!(arr, src);
    }
}
