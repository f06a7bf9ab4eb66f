//! Reverse adapter over forward cursors.
//!
//! [`Reverse`] wraps a forward cursor (its *base*) and designates the
//! element just before it, so `Reverse::new(end)` designates the last
//! element and `Reverse::new(begin)` is the reverse end. Advancing a
//! reverse cursor retreats its base.

use std::cmp::Ordering;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use dynvec_core::{ArrayError, Origin};

use crate::cursor::{ConstCursor, Cursor, MutPosition, Position};

/// Walks the range of its base cursor back to front.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Reverse<C> {
    base: C,
}

/// Mutable reverse cursor, from [`DynArray::rbegin`](crate::DynArray::rbegin).
pub type ReverseCursor<T> = Reverse<Cursor<T>>;

/// Read-only reverse cursor, from [`DynArray::crbegin`](crate::DynArray::crbegin).
pub type ConstReverseCursor<T> = Reverse<ConstCursor<T>>;

impl<C: Position> Reverse<C> {
    /// Reverse cursor designating the element before `base`.
    pub fn new(base: C) -> Self {
        Self { base }
    }

    /// The underlying forward cursor, one past the designated element.
    pub fn base(self) -> C {
        self.base
    }

    /// Signed step count from `other` to `self`, in reverse direction.
    pub fn offset_from(self, other: Self) -> Result<isize, ArrayError> {
        self.distance_from(other)
    }
}

impl<C: Position> Position for Reverse<C> {
    type Elem = C::Elem;

    fn origin(&self) -> Origin {
        self.base.origin()
    }

    fn element_index(&self) -> usize {
        self.base.element_index().wrapping_sub(1)
    }

    fn step(self, n: isize) -> Self {
        Self::new(self.base.step(n.wrapping_neg()))
    }

    fn distance_from(self, other: Self) -> Result<isize, ArrayError> {
        other.base.distance_from(self.base)
    }
}

impl<C: MutPosition> MutPosition for Reverse<C> {}

impl<T> From<ReverseCursor<T>> for ConstReverseCursor<T> {
    fn from(r: ReverseCursor<T>) -> Self {
        Reverse::new(r.base.into())
    }
}

impl<C: Position + PartialOrd> PartialOrd for Reverse<C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        other.base.partial_cmp(&self.base)
    }
}

impl<C: Position> Add<isize> for Reverse<C> {
    type Output = Self;

    fn add(self, n: isize) -> Self {
        self.step(n)
    }
}

impl<C: Position> Sub<isize> for Reverse<C> {
    type Output = Self;

    fn sub(self, n: isize) -> Self {
        self.step(n.wrapping_neg())
    }
}

impl<C: Position> AddAssign<isize> for Reverse<C> {
    fn add_assign(&mut self, n: isize) {
        *self = self.step(n);
    }
}

impl<C: Position> SubAssign<isize> for Reverse<C> {
    fn sub_assign(&mut self, n: isize) {
        *self = self.step(n.wrapping_neg());
    }
}

/// # Panics
///
/// Panics if the cursors were issued under different origins.
impl<C: Position> Sub for Reverse<C> {
    type Output = isize;

    fn sub(self, other: Self) -> isize {
        match self.distance_from(other) {
            Ok(d) => d,
            Err(e) => panic!("cursor difference: {e}"),
        }
    }
}
