//! Tracked element values.
//!
//! A [`LiveCounter`] hands out [`Tracked`] values and counts how many of
//! them (clones included) are alive. After a container is dropped the
//! count must return to zero; anything else is a leak or a double drop.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

#[derive(Default)]
struct Counts {
    live: Cell<isize>,
    clones: Cell<usize>,
    panic_after: Cell<Option<usize>>,
}

/// Shared counter for [`Tracked`] values.
#[derive(Clone, Default)]
pub struct LiveCounter {
    counts: Rc<Counts>,
}

impl LiveCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap `value` so its lifetime is counted.
    pub fn track<T>(&self, value: T) -> Tracked<T> {
        self.counts.live.set(self.counts.live.get() + 1);
        Tracked {
            value,
            counts: Rc::clone(&self.counts),
        }
    }

    /// Tracked values currently alive. Negative after a double drop.
    pub fn live(&self) -> isize {
        self.counts.live.get()
    }

    /// Successful clones so far.
    pub fn clones(&self) -> usize {
        self.counts.clones.get()
    }

    /// Make the clone after the next `n` successful ones panic.
    pub fn panic_on_clone_after(&self, n: usize) {
        self.counts.panic_after.set(Some(n));
    }
}

impl fmt::Debug for LiveCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveCounter")
            .field("live", &self.live())
            .field("clones", &self.clones())
            .finish()
    }
}

/// A value whose construction, cloning and dropping is counted.
pub struct Tracked<T> {
    pub value: T,
    counts: Rc<Counts>,
}

impl<T: Clone> Clone for Tracked<T> {
    fn clone(&self) -> Self {
        if let Some(n) = self.counts.panic_after.get() {
            if n == 0 {
                self.counts.panic_after.set(None);
                panic!("tracked clone failure");
            }
            self.counts.panic_after.set(Some(n - 1));
        }
        self.counts.live.set(self.counts.live.get() + 1);
        self.counts.clones.set(self.counts.clones.get() + 1);
        Self {
            value: self.value.clone(),
            counts: Rc::clone(&self.counts),
        }
    }
}

impl<T> Drop for Tracked<T> {
    fn drop(&mut self) {
        self.counts.live.set(self.counts.live.get() - 1);
    }
}

impl<T: fmt::Debug> fmt::Debug for Tracked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}

impl<T: PartialEq> PartialEq for Tracked<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}
