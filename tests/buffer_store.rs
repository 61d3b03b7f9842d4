// tests/buffer_store.rs

use ocr_reduce::buffer::{BufferId, BufferStore};
use ocr_reduce::errors::ReduceError;

#[test]
fn allocate_registers_buffer_per_pair() {
    let store = BufferStore::new();
    assert!(store.is_empty());

    let a = store.allocate(0, 8).unwrap();
    let b = store.allocate(1, 8).unwrap();

    assert_eq!(store.len(), 2);
    assert_eq!(a.id(), BufferId(0));
    assert_eq!(b.id(), BufferId(1));
    assert!(store.get(0).unwrap().same_buffer(&a));
    assert!(!a.same_buffer(&b));
    assert!(store.get(7).is_none());
}

#[test]
fn guard_operations_fold_and_accumulate() {
    let store = BufferStore::new();
    let a = store.allocate(0, 4).unwrap();
    let b = store.allocate(1, 4).unwrap();

    {
        let mut g = a.acquire().unwrap();
        g.fill_prefix(4, 1.0).unwrap();
        g.fold_halves(2).unwrap();
    }
    {
        let mut g = b.acquire().unwrap();
        g.fill_prefix(4, 2.0).unwrap();
        g.fold_halves(2).unwrap();
    }
    {
        let mut acc = a.acquire().unwrap();
        let src = b.acquire().unwrap();
        acc.accumulate(&src, 2).unwrap();
    }

    assert_eq!(a.snapshot(2).unwrap(), vec![6.0, 6.0]);
    assert_eq!(b.snapshot(4).unwrap(), vec![4.0, 4.0, 2.0, 2.0]);
}

#[test]
fn second_holder_gets_buffer_busy() {
    let store = BufferStore::new();
    let a = store.allocate(3, 2).unwrap();
    let alias = store.get(3).unwrap();

    let _held = a.acquire().unwrap();
    match alias.acquire() {
        Err(ReduceError::BufferBusy(id)) => assert_eq!(id, BufferId(3)),
        Err(e) => panic!("Expected BufferBusy, got: {:?}", e),
        Ok(_) => panic!("Expected BufferBusy, got a second guard"),
    }
}

#[test]
fn out_of_range_access_is_a_length_error() {
    let store = BufferStore::new();
    let a = store.allocate(0, 4).unwrap();
    let mut g = a.acquire().unwrap();

    match g.fold_halves(3) {
        Err(ReduceError::BufferLength { len, needed, .. }) => {
            assert_eq!(len, 4);
            assert_eq!(needed, 6);
        }
        other => panic!("Expected BufferLength, got: {:?}", other),
    }
    assert!(g.prefix(5).is_err());
    assert!(g.fill_prefix(5, 1.0).is_err());
}

#[test]
fn absurd_allocation_fails_cleanly() {
    let store = BufferStore::new();
    match store.allocate(0, usize::MAX) {
        Err(ReduceError::Allocation { pair, len }) => {
            assert_eq!(pair, 0);
            assert_eq!(len, usize::MAX);
        }
        other => panic!("Expected Allocation, got: {:?}", other),
    }
    assert!(store.is_empty());
}
