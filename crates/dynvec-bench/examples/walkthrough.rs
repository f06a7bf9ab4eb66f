//! Walkthrough of the dynvec API.
//!
//! Demonstrates: sized construction → appends → copy and move → cursors
//! and invalidation → insert/erase → comparisons → budgeted allocation.

use dynvec_alloc::BudgetAllocator;
use dynvec_array::{ArrayError, DynArray, Position};

fn show<T: std::fmt::Debug>(label: &str, arr: &DynArray<T, impl dynvec_alloc::Allocator>) {
    println!(
        "  {label:<10} len={:<3} cap={:<3} {:?}",
        arr.len(),
        arr.capacity(),
        arr
    );
}

fn main() -> Result<(), ArrayError> {
    println!("=== dynvec walkthrough ===\n");

    // --- Construction and growth ---
    println!("Construction and growth");
    let mut vec = DynArray::from_elem(10, 5)?;
    show("sized", &vec);
    let copy = vec.try_clone()?;
    for v in [15, 6, 3] {
        vec.push_back(v)?;
    }
    show("pushed", &vec);
    show("copy", &copy);

    let mut grow = DynArray::new();
    let mut last_cap = grow.capacity();
    for i in 0..20 {
        grow.push_back(i)?;
        if grow.capacity() != last_cap {
            println!("  push #{i:<2} grew capacity {last_cap} -> {}", grow.capacity());
            last_cap = grow.capacity();
        }
    }

    // --- Move ---
    println!("\nMove");
    let moved = vec.take();
    show("source", &vec);
    show("moved", &moved);

    // --- Cursors ---
    println!("\nCursors");
    let mut arr = DynArray::from_slice(&[1, 2, 3, 4])?;
    let begin = arr.begin();
    println!("  *begin = {}", begin.get(&arr)?);
    let mut backwards = Vec::new();
    let mut r = arr.crbegin();
    while r != arr.crend() {
        backwards.push(*r.get(&arr)?);
        r += 1;
    }
    println!("  rbegin..rend: {backwards:?}");
    arr.push_back(5)?;
    match begin.get(&arr) {
        Err(e) => println!("  after reallocation: {e}"),
        Ok(v) => println!("  after reallocation: still {v}"),
    }

    // --- Insert / erase ---
    println!("\nInsert and erase");
    let at = arr.insert(arr.begin() + 2, 99)?;
    show("insert", &arr);
    arr.erase(at)?;
    show("erase", &arr);
    println!("  pop_back -> {}", arr.pop_back()?);
    arr.clear();
    println!("  clear    -> len={} cap={}", arr.len(), arr.capacity());
    println!("  pop_back -> {}", arr.pop_back().unwrap_err());

    // --- Comparisons ---
    println!("\nComparisons");
    let a = DynArray::from_slice(&[1, 2, 3])?;
    let b = DynArray::from_slice(&[1, 2, 4])?;
    let c = DynArray::from_slice(&[1, 2])?;
    println!("  {a:?} < {b:?}: {}", a < b);
    println!("  {c:?} < {a:?}: {}", c < a);
    println!("  {a:?} == {:?}: {}", a.try_clone()?, a == a.try_clone()?);

    // --- Budgeted allocation ---
    println!("\nBudgeted allocation");
    let pool = BudgetAllocator::with_limit(256);
    let mut bounded = DynArray::new_in(pool.clone());
    let err = loop {
        if let Err(e) = bounded.push_back(0u64) {
            break e;
        }
    };
    println!("  stopped at len={} cap={}: {err}", bounded.len(), bounded.capacity());
    println!("  pool used {} of {} bytes, peak {}", pool.used(), pool.limit(), pool.peak());

    println!("\n=== Done ===");
    Ok(())
}
