//! Identity types used to detect stale cursors.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique [`InstanceId`] allocation.
static INSTANCE_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique per-instance identifier for a dynamic array.
///
/// Allocated from a monotonic atomic counter via [`InstanceId::next`].
/// Two distinct arrays always have different IDs, even if one is dropped
/// and the next is constructed at the same address. Cursors record the ID
/// of the array they were issued by, so a cursor handed to a different
/// array is rejected instead of silently indexing the wrong buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(u64);

impl InstanceId {
    /// Allocate a fresh, unique instance ID.
    ///
    /// Each call returns a new ID that has never been returned before
    /// within this process. Thread-safe.
    pub fn next() -> Self {
        Self(INSTANCE_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw counter value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Buffer generation of a dynamic array.
///
/// Starts at zero and is bumped every time the array's buffer identity
/// changes: growth, explicit reserve past capacity, release, copy or move
/// assignment, swap. A cursor is valid exactly as long as the generation it
/// captured still matches the array's.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(pub u64);

impl Generation {
    /// The generation every array starts in.
    pub const INITIAL: Self = Self(0);

    /// The generation that follows this one.
    ///
    /// Wraps on overflow; 2^64 reallocations of one array is not a
    /// reachable state.
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Generation {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// The array instance and buffer generation a cursor was issued under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Origin {
    /// Array that issued the cursor.
    pub instance: InstanceId,
    /// Buffer generation at issue time.
    pub generation: Generation,
}

impl Origin {
    /// Create an origin for the given instance and generation.
    pub fn new(instance: InstanceId, generation: Generation) -> Self {
        Self {
            instance,
            generation,
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "array {} gen {}", self.instance, self.generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_ids_are_unique() {
        let a = InstanceId::next();
        let b = InstanceId::next();
        assert_ne!(a, b);
        assert!(b > a);
    }

    #[test]
    fn generation_advances_by_one() {
        let g = Generation::INITIAL;
        assert_eq!(g.next(), Generation(1));
        assert_eq!(g.next().next(), Generation(2));
    }

    #[test]
    fn generation_wraps_instead_of_panicking() {
        assert_eq!(Generation(u64::MAX).next(), Generation(0));
    }

    #[test]
    fn origin_equality_needs_both_parts() {
        let id = InstanceId::next();
        let a = Origin::new(id, Generation(3));
        assert_eq!(a, Origin::new(id, Generation(3)));
        assert_ne!(a, Origin::new(id, Generation(4)));
        assert_ne!(a, Origin::new(InstanceId::next(), Generation(3)));
    }

    #[test]
    fn display_formats() {
        let o = Origin::new(InstanceId(7), Generation(2));
        assert_eq!(o.to_string(), "array #7 gen 2");
    }
}
