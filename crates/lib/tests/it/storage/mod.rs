use std::sync::Arc;
use std::thread;

use arbordb::collection::Map;
use arbordb::core::{Context, Identifier};
use arbordb::dshash;
use arbordb::scalar::{Int, Str};
use arbordb::storage::{self, InMemory, PhysicalStorage};

use crate::helpers::str_int_map;

#[test]
fn test_set_returns_structural_identifier() {
    let store = InMemory::new();
    let mut ctx = Context::background();
    let map = str_int_map(&[("a", 1)]);
    let expected = dshash::identifier(&map).unwrap();
    let id = store.set(&mut ctx, Arc::new(map)).unwrap();
    assert_eq!(id, expected);
    assert_eq!(id.kind(), "dshash-sha256");
}

#[test]
fn test_get_as_expected_type() {
    let store = InMemory::new();
    let mut ctx = Context::background();
    let id = store.set(&mut ctx, Arc::new(str_int_map(&[("a", 1)]))).unwrap();

    let map = storage::get_as::<Map<Str, Int>>(&store, &mut ctx, &id).unwrap();
    assert_eq!(*map, str_int_map(&[("a", 1)]));
}

#[test]
fn test_get_as_wrong_type() {
    let store = InMemory::new();
    let mut ctx = Context::background();
    let id = store.set(&mut ctx, Arc::new(Int(5))).unwrap();

    let err = storage::get_as::<Str>(&store, &mut ctx, &id).unwrap_err();
    assert!(err.is_type_mismatch());
    let message = err.to_string();
    assert!(message.contains("Str"), "{message}");
    assert!(message.contains("Int"), "{message}");
}

#[test]
fn test_get_missing_identifier() {
    let store = InMemory::new();
    let err = store
        .get(&mut Context::background(), &Identifier::new("dshash-sha256", "ff"))
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.module(), "storage");
}

#[test]
fn test_equal_values_share_one_slot() {
    let store = InMemory::new();
    let mut ctx = Context::background();
    let first = store.set(&mut ctx, Arc::new(str_int_map(&[("a", 1), ("b", 2)]))).unwrap();
    let second = store.set(&mut ctx, Arc::new(str_int_map(&[("b", 2), ("a", 1)]))).unwrap();
    assert_eq!(first, second);
    assert_eq!(store.len(), 1);
}

#[test]
fn test_concurrent_writers_and_readers() {
    let store = Arc::new(InMemory::new());
    let handles: Vec<_> = (0..8)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let mut ctx = Context::background();
                let mut ids = Vec::new();
                for i in 0..50 {
                    ids.push(store.set(&mut ctx, Arc::new(Int(t * 1_000 + i))).unwrap());
                }
                for id in &ids {
                    store.get(&mut ctx, id).unwrap();
                }
                ids.len()
            })
        })
        .collect();
    let total: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
    assert_eq!(total, 400);
    assert_eq!(store.len(), 400);
    assert_eq!(store.all_ids().len(), 400);
}
