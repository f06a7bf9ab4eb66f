//! Benchmark workloads and utilities for dynvec.
//!
//! - [`filled`]: an array of `0..n` built by appends.
//! - [`insertion_positions`]: deterministic random insert positions via seed.
//! - [`churn`]: an insert/erase mix driven by those positions.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use dynvec_alloc::Allocator;
use dynvec_array::{ArrayError, DynArray};
use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Build an array holding `0..n`, grown one append at a time.
pub fn filled(n: usize) -> Result<DynArray<u64>, ArrayError> {
    let mut arr = DynArray::new();
    for i in 0..n as u64 {
        arr.push_back(i)?;
    }
    Ok(arr)
}

/// Generate `n` insertion positions for an array that starts empty.
///
/// The `i`-th position lies in `[0, i]`, so inserting in order never
/// points past the end. Same seed, same positions.
pub fn insertion_positions(n: usize, seed: u64) -> Vec<usize> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n)
        .map(|len| (rng.next_u64() % (len as u64 + 1)) as usize)
        .collect()
}

/// Insert at every position in `positions`, then erase from the front
/// until half the elements remain. Returns the final length.
pub fn churn<A: Allocator>(
    arr: &mut DynArray<u64, A>,
    positions: &[usize],
) -> Result<usize, ArrayError> {
    let base = arr.len();
    for (i, &at) in positions.iter().enumerate() {
        let at = (at + base).min(arr.len());
        arr.insert(arr.cbegin() + at as isize, i as u64)?;
    }
    while arr.len() > (base + positions.len()) / 2 {
        arr.erase(arr.cbegin())?;
    }
    Ok(arr.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_are_in_range_and_reproducible() {
        let a = insertion_positions(200, 7);
        let b = insertion_positions(200, 7);
        assert_eq!(a, b);
        for (len, &at) in a.iter().enumerate() {
            assert!(at <= len);
        }
        assert_ne!(a, insertion_positions(200, 8));
    }

    #[test]
    fn churn_halves_the_array() {
        let mut arr = filled(10).unwrap();
        let positions = insertion_positions(30, 1);
        assert_eq!(churn(&mut arr, &positions).unwrap(), 20);
    }
}
