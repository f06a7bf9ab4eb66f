//! Positional cursors into a [`DynArray`].
//!
//! A cursor is the random-access iterator of the container: an element
//! index plus the [`Origin`] (array instance and buffer generation) it was
//! issued under. Cursors do not borrow the array, so they can be held
//! across mutations and passed back into [`DynArray::insert`] and
//! [`DynArray::erase`].
//!
//! # Invalidation
//!
//! A cursor is valid exactly as long as the generation of the array that
//! issued it is unchanged. Every operation that replaces or releases the
//! buffer (growth, [`DynArray::reserve`] past capacity, [`DynArray::clear`],
//! copy and move assignment, swap) bumps the generation and thereby
//! invalidates every cursor issued before it. Using a stale cursor is a
//! caller bug; it is reported as [`ArrayError::InvalidIterator`] instead
//! of touching released memory.
//!
//! Stepping is unchecked: moving a cursor past `end` or before `begin`
//! wraps silently and is only detected when the cursor is used.
//!
//! ```text
//!  begin()                       end()
//!    │                             │
//!    ▼                             ▼
//!  ┌─────┬─────┬─────┬─────┬─────┐
//!  │  0  │  1  │  2  │  3  │  4  │
//!  └─────┴─────┴─────┴─────┴─────┘
//!  ▲                             ▲
//!  │                             │
//! rend()                      rbegin()   (reverse base positions)
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use dynvec_alloc::Allocator;
use dynvec_core::{ArrayError, CursorFault, Origin};

use crate::array::DynArray;

/// Shared behaviour of every cursor kind.
///
/// Implemented by [`Cursor`], [`ConstCursor`] and their [`Reverse`]
/// adapters. `step` and `distance_from` are expressed in the cursor's own
/// direction of travel.
///
/// [`Reverse`]: crate::reverse::Reverse
pub trait Position: Copy {
    /// Element type of the array the cursor walks.
    type Elem;

    /// The array instance and generation this cursor was issued under.
    fn origin(&self) -> Origin;

    /// Index of the element the cursor designates.
    ///
    /// Wraps: a cursor stepped before the first element reports a huge
    /// index, which every checked access rejects.
    fn element_index(&self) -> usize;

    /// The cursor moved `n` steps in its direction of travel.
    #[must_use]
    fn step(self, n: isize) -> Self;

    /// Signed number of steps from `other` to `self`.
    ///
    /// Fails with [`ArrayError::InvalidIterator`] when the two cursors
    /// were not issued under the same origin.
    fn distance_from(self, other: Self) -> Result<isize, ArrayError>;

    /// Dereference: the element this cursor designates.
    fn get<A: Allocator>(self, array: &DynArray<Self::Elem, A>) -> Result<&Self::Elem, ArrayError> {
        array.get_at(self)
    }

    /// Subscript from cursor: the element `n` steps away.
    fn at<A: Allocator>(
        self,
        array: &DynArray<Self::Elem, A>,
        n: isize,
    ) -> Result<&Self::Elem, ArrayError> {
        array.get_at(self.step(n))
    }

    /// Whether `array` issued this cursor and has not reallocated since.
    fn is_valid_for<A: Allocator>(&self, array: &DynArray<Self::Elem, A>) -> bool {
        self.origin() == array.origin()
    }
}

/// Cursors that may be used to mutate the element they designate.
pub trait MutPosition: Position {
    /// Mutable dereference.
    fn get_mut<A: Allocator>(
        self,
        array: &mut DynArray<Self::Elem, A>,
    ) -> Result<&mut Self::Elem, ArrayError> {
        array.get_at_mut(self)
    }

    /// Mutable subscript from cursor.
    fn at_mut<A: Allocator>(
        self,
        array: &mut DynArray<Self::Elem, A>,
        n: isize,
    ) -> Result<&mut Self::Elem, ArrayError> {
        array.get_at_mut(self.step(n))
    }
}

/// Checks that two cursors share an origin.
pub(crate) fn same_origin(a: Origin, b: Origin) -> Result<(), ArrayError> {
    if a.instance != b.instance {
        return Err(CursorFault::ForeignInstance {
            cursor: a,
            array: b,
        }
        .into());
    }
    if a.generation != b.generation {
        return Err(CursorFault::Stale {
            cursor: a,
            array: b,
        }
        .into());
    }
    Ok(())
}

/// Forward cursor through which elements may be mutated.
///
/// Obtained from [`DynArray::begin`] and [`DynArray::end`], or returned by
/// [`DynArray::insert`] and [`DynArray::erase`].
pub struct Cursor<T> {
    origin: Origin,
    index: usize,
    _elem: PhantomData<fn() -> T>,
}

/// Forward read-only cursor.
///
/// Obtained from [`DynArray::cbegin`] and [`DynArray::cend`], or by
/// widening a [`Cursor`] with `From`. There is no conversion back.
pub struct ConstCursor<T> {
    origin: Origin,
    index: usize,
    _elem: PhantomData<fn() -> T>,
}

macro_rules! forward_cursor {
    ($name:ident) => {
        impl<T> $name<T> {
            pub(crate) fn new(origin: Origin, index: usize) -> Self {
                Self {
                    origin,
                    index,
                    _elem: PhantomData,
                }
            }

            /// Index of the designated element.
            pub fn index(&self) -> usize {
                self.index
            }

            /// Signed element count from `other` to `self`.
            pub fn offset_from(self, other: Self) -> Result<isize, ArrayError> {
                self.distance_from(other)
            }
        }

        impl<T> Position for $name<T> {
            type Elem = T;

            fn origin(&self) -> Origin {
                self.origin
            }

            fn element_index(&self) -> usize {
                self.index
            }

            fn step(self, n: isize) -> Self {
                Self::new(self.origin, self.index.wrapping_add_signed(n))
            }

            fn distance_from(self, other: Self) -> Result<isize, ArrayError> {
                same_origin(self.origin, other.origin)?;
                Ok((self.index as isize).wrapping_sub(other.index as isize))
            }
        }

        impl<T> Clone for $name<T> {
            fn clone(&self) -> Self {
                *self
            }
        }

        impl<T> Copy for $name<T> {}

        impl<T> fmt::Debug for $name<T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("origin", &self.origin)
                    .field("index", &self.index)
                    .finish()
            }
        }

        impl<T> PartialEq for $name<T> {
            fn eq(&self, other: &Self) -> bool {
                self.origin == other.origin && self.index == other.index
            }
        }

        impl<T> Eq for $name<T> {}

        impl<T> Hash for $name<T> {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.origin.hash(state);
                self.index.hash(state);
            }
        }

        /// Cursors from different origins are unordered.
        impl<T> PartialOrd for $name<T> {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                (self.origin == other.origin).then(|| self.index.cmp(&other.index))
            }
        }

        impl<T> Add<isize> for $name<T> {
            type Output = Self;

            fn add(self, n: isize) -> Self {
                self.step(n)
            }
        }

        impl<T> Sub<isize> for $name<T> {
            type Output = Self;

            fn sub(self, n: isize) -> Self {
                self.step(n.wrapping_neg())
            }
        }

        impl<T> AddAssign<isize> for $name<T> {
            fn add_assign(&mut self, n: isize) {
                *self = self.step(n);
            }
        }

        impl<T> SubAssign<isize> for $name<T> {
            fn sub_assign(&mut self, n: isize) {
                *self = self.step(n.wrapping_neg());
            }
        }

        /// Difference of two cursors.
        ///
        /// # Panics
        ///
        /// Panics if the cursors were issued under different origins; use
        /// `offset_from` for the checked form.
        impl<T> Sub for $name<T> {
            type Output = isize;

            fn sub(self, other: Self) -> isize {
                match self.distance_from(other) {
                    Ok(d) => d,
                    Err(e) => panic!("cursor difference: {e}"),
                }
            }
        }
    };
}

forward_cursor!(Cursor);
forward_cursor!(ConstCursor);

impl<T> MutPosition for Cursor<T> {}

impl<T> From<Cursor<T>> for ConstCursor<T> {
    fn from(c: Cursor<T>) -> Self {
        Self::new(c.origin, c.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dynvec_core::{Generation, InstanceId};

    fn origin() -> Origin {
        Origin::new(InstanceId::next(), Generation::INITIAL)
    }

    #[test]
    fn arithmetic_moves_the_index() {
        let c: Cursor<u8> = Cursor::new(origin(), 3);
        assert_eq!((c + 2).index(), 5);
        assert_eq!((c - 3isize).index(), 0);
        let mut d = c;
        d += 1;
        d -= 4;
        assert_eq!(d.index(), 0);
    }

    #[test]
    fn stepping_before_begin_wraps() {
        let c: ConstCursor<u8> = ConstCursor::new(origin(), 0);
        assert_eq!((c - 1isize).index(), usize::MAX);
        assert_eq!((c - 1isize + 1).index(), 0);
    }

    #[test]
    fn difference_is_signed() {
        let o = origin();
        let a: Cursor<u8> = Cursor::new(o, 2);
        let b: Cursor<u8> = Cursor::new(o, 7);
        assert_eq!(b - a, 5);
        assert_eq!(a - b, -5);
        assert_eq!(a.offset_from(b), Ok(-5));
    }

    #[test]
    fn difference_across_arrays_is_rejected() {
        let a: Cursor<u8> = Cursor::new(origin(), 0);
        let b: Cursor<u8> = Cursor::new(origin(), 0);
        assert!(matches!(
            a.offset_from(b),
            Err(ArrayError::InvalidIterator {
                reason: CursorFault::ForeignInstance { .. }
            })
        ));
    }

    #[test]
    fn difference_across_generations_is_stale() {
        let id = InstanceId::next();
        let a: Cursor<u8> = Cursor::new(Origin::new(id, Generation(0)), 0);
        let b: Cursor<u8> = Cursor::new(Origin::new(id, Generation(1)), 0);
        assert!(matches!(
            a.offset_from(b),
            Err(ArrayError::InvalidIterator {
                reason: CursorFault::Stale { .. }
            })
        ));
    }

    #[test]
    #[should_panic(expected = "cursor difference")]
    fn unchecked_difference_panics_on_foreign_cursor() {
        let a: Cursor<u8> = Cursor::new(origin(), 0);
        let b: Cursor<u8> = Cursor::new(origin(), 0);
        let _ = a - b;
    }

    #[test]
    fn ordering_only_within_one_origin() {
        let o = origin();
        let a: ConstCursor<u8> = ConstCursor::new(o, 1);
        let b: ConstCursor<u8> = ConstCursor::new(o, 4);
        assert!(a < b);
        let foreign: ConstCursor<u8> = ConstCursor::new(origin(), 4);
        assert_eq!(a.partial_cmp(&foreign), None);
    }

    #[test]
    fn widening_keeps_position() {
        let o = origin();
        let c: Cursor<u8> = Cursor::new(o, 9);
        let k: ConstCursor<u8> = c.into();
        assert_eq!(k.index(), 9);
        assert_eq!(k.origin(), o);
    }
}
