//! Equality, ordering and hashing.
//!
//! Arrays compare by their live elements only: capacity, allocator and
//! buffer identity never take part. Ordering is lexicographic, so a proper
//! prefix sorts before the longer array.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use dynvec_alloc::Allocator;

use crate::array::DynArray;

impl<T, U, A1, A2> PartialEq<DynArray<U, A2>> for DynArray<T, A1>
where
    T: PartialEq<U>,
    A1: Allocator,
    A2: Allocator,
{
    fn eq(&self, other: &DynArray<U, A2>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq, A: Allocator> Eq for DynArray<T, A> {}

macro_rules! eq_against {
    ($($rhs:ty),* $(,)?) => {
        $(
            impl<T, U, A: Allocator> PartialEq<$rhs> for DynArray<T, A>
            where
                T: PartialEq<U>,
            {
                fn eq(&self, other: &$rhs) -> bool {
                    self.as_slice() == &other[..]
                }
            }
        )*
    };
}

eq_against!([U], &[U], &mut [U], Vec<U>);

impl<T, U, A: Allocator, const N: usize> PartialEq<[U; N]> for DynArray<T, A>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &[U; N]) -> bool {
        self.as_slice() == &other[..]
    }
}

impl<T, U, A: Allocator, const N: usize> PartialEq<&[U; N]> for DynArray<T, A>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &&[U; N]) -> bool {
        self.as_slice() == &other[..]
    }
}

impl<T: PartialOrd, A1: Allocator, A2: Allocator> PartialOrd<DynArray<T, A2>>
    for DynArray<T, A1>
{
    fn partial_cmp(&self, other: &DynArray<T, A2>) -> Option<Ordering> {
        self.as_slice().partial_cmp(other.as_slice())
    }
}

impl<T: Ord, A: Allocator> Ord for DynArray<T, A> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

impl<T: Hash, A: Allocator> Hash for DynArray<T, A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}
