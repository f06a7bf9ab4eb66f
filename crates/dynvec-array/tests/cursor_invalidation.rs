//! Integration test: cursor validity across buffer-identity changes.
//!
//! Every operation that replaces or releases the buffer must turn older
//! cursors stale, and every stale or foreign cursor must be rejected with
//! `InvalidIterator` instead of touching memory.

use dynvec_array::{ArrayError, ConstCursor, DynArray, MutPosition, Position};
use dynvec_core::CursorFault;

fn is_stale(err: ArrayError) -> bool {
    matches!(
        err,
        ArrayError::InvalidIterator {
            reason: CursorFault::Stale { .. }
        }
    )
}

fn full(n: usize) -> DynArray<usize> {
    let mut arr = DynArray::with_capacity(n).unwrap();
    for i in 0..n {
        arr.push_back(i).unwrap();
    }
    arr
}

#[test]
fn reallocating_push_invalidates_begin() {
    let mut arr = full(4);
    assert_eq!(arr.len(), arr.capacity());
    let begin = arr.begin();
    assert_eq!(begin.get(&arr), Ok(&0));

    arr.push_back(4).unwrap();
    assert!(!begin.is_valid_for(&arr));
    assert!(is_stale(begin.get(&arr).unwrap_err()));
    assert_eq!(arr.begin().get(&arr), Ok(&0));
}

#[test]
fn push_within_capacity_keeps_cursors() {
    let mut arr = full(2);
    arr.reserve(8).unwrap();
    let c = arr.begin() + 1;
    arr.push_back(2).unwrap();
    assert!(c.is_valid_for(&arr));
    assert_eq!(c.get(&arr), Ok(&1));
}

fn assert_invalidates(name: &str, op: impl FnOnce(&mut DynArray<usize>)) {
    let mut arr = full(4);
    let cursor = arr.cbegin();
    op(&mut arr);
    assert!(!cursor.is_valid_for(&arr), "{name} kept cursor valid");
    assert!(
        matches!(cursor.get(&arr), Err(ArrayError::InvalidIterator { .. })),
        "{name} allowed a stale dereference"
    );
}

#[test]
fn every_identity_change_invalidates() {
    assert_invalidates("reserve", |a| a.reserve(64).unwrap());
    assert_invalidates("clear", |a| a.clear());
    assert_invalidates("shrink_to_fit", |a| {
        a.reserve(64).unwrap();
        let c = a.cbegin();
        a.shrink_to_fit().unwrap();
        assert!(!c.is_valid_for(a));
    });
    assert_invalidates("assign", |a| a.assign(&full(2)).unwrap());
    assert_invalidates("move_assign", |a| a.move_assign(&mut full(3)).unwrap());
    assert_invalidates("swap", |a| a.swap(&mut full(1)));
    assert_invalidates("clone_from", |a| a.clone_from(&full(5)));
}

#[test]
fn take_invalidates_the_source_cursors() {
    let mut a = full(3);
    let c = a.begin();
    let b = a.take();
    assert!(!c.is_valid_for(&a));
    assert!(!c.is_valid_for(&b));
    assert_eq!(b.len(), 3);
}

#[test]
fn stale_cursor_is_refused_by_insert_and_erase() {
    let mut arr = full(1);
    let stale = arr.end();
    arr.push_back(1).unwrap();
    assert!(is_stale(arr.insert(stale, 9).unwrap_err()));
    assert!(is_stale(arr.erase(stale - 1isize).unwrap_err()));
    assert_eq!(arr, [0, 1]);
}

#[test]
fn insert_returns_fresh_cursor_after_growth() {
    let mut arr = full(2);
    let at = arr.insert(arr.begin() + 1, 100).unwrap();
    assert!(at.is_valid_for(&arr));
    assert_eq!(at.get(&arr), Ok(&100));
    assert_eq!(arr, [0, 100, 1]);
}

#[test]
fn dereference_past_end_is_out_of_bounds() {
    let arr = full(3);
    assert_eq!(
        arr.end().get(&arr),
        Err(ArrayError::OutOfBounds { index: 3, len: 3 })
    );
    assert!(matches!(
        arr.rend().get(&arr),
        Err(ArrayError::OutOfBounds { .. })
    ));
}

#[test]
fn cursors_walk_forward_and_backward() {
    let mut arr = full(5);
    let forward: Vec<usize> = (0..5)
        .map(|n| *arr.cbegin().at(&arr, n).unwrap())
        .collect();
    assert_eq!(forward, vec![0, 1, 2, 3, 4]);

    let mut r = arr.crbegin();
    let mut backward = Vec::new();
    while r != arr.crend() {
        backward.push(*r.get(&arr).unwrap());
        r += 1;
    }
    assert_eq!(backward, vec![4, 3, 2, 1, 0]);

    let last = arr.rbegin();
    *last.get_mut(&mut arr).unwrap() = 40;
    *arr.begin().at_mut(&mut arr, 2).unwrap() = 20;
    assert_eq!(arr, [0, 1, 20, 3, 40]);
    assert_eq!(arr.end() - arr.begin(), 5);
    assert_eq!(arr.rend() - arr.rbegin(), 5);
}

#[test]
fn iter_range_bridges_cursor_pairs() {
    let arr = full(6);
    let mid: Vec<usize> = arr
        .iter_range(arr.cbegin() + 2, arr.cend() - 1isize)
        .unwrap()
        .copied()
        .collect();
    assert_eq!(mid, vec![2, 3, 4]);
    assert!(arr.iter_range(arr.cend(), arr.cbegin()).is_err());
}

#[test]
fn reversed_range_reports_array_length() {
    let arr = full(6);
    assert_eq!(
        arr.iter_range(arr.cend(), arr.cbegin()).unwrap_err(),
        ArrayError::InvalidIterator {
            reason: CursorFault::OutOfRange { index: 6, len: 6 }
        }
    );
    assert_eq!(
        arr.iter_range(arr.cbegin() + 4, arr.cbegin() + 1).unwrap_err(),
        ArrayError::InvalidIterator {
            reason: CursorFault::OutOfRange { index: 4, len: 6 }
        }
    );
}

#[test]
fn reverse_base_is_one_past() {
    let arr = full(3);
    let r = arr.rbegin();
    assert_eq!(r.base(), arr.end());
    let widened: ConstCursor<usize> = r.base().into();
    assert_eq!(widened, arr.cend());
}

#[test]
fn reverse_cursor_positions_map_through_base() {
    let mut arr = full(4);
    arr.reserve(8).unwrap();

    // rbegin + 1 designates element 2.
    let r = arr.rbegin() + 1;
    assert_eq!(r.get(&arr), Ok(&2));
    let next = arr.erase(r.base() - 1isize).unwrap();
    assert_eq!(arr, [0, 1, 3]);
    assert_eq!(next.get(&arr), Ok(&3));

    // Inserting at base puts the new value right after `r` in reverse order.
    let r = arr.rbegin() + 1;
    assert_eq!(r.get(&arr), Ok(&1));
    arr.insert(r.base(), 9).unwrap();
    assert_eq!(arr, [0, 1, 9, 3]);
    let rev: Vec<usize> = arr.iter().rev().copied().collect();
    assert_eq!(rev, vec![3, 9, 1, 0]);
}

#[test]
fn foreign_cursor_is_rejected() {
    let a = full(3);
    let b = full(3);
    assert!(matches!(
        a.begin().get(&b),
        Err(ArrayError::InvalidIterator {
            reason: CursorFault::ForeignInstance { .. }
        })
    ));
}
