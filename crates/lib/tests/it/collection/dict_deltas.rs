use std::collections::HashMap;
use std::ops::ControlFlow;
use std::sync::Arc;

use arbordb::collection::{self, Dict, DictRemove, DictSet, Map};
use arbordb::core::{Context, Expression};
use arbordb::dshash;
use arbordb::scalar::{Int, Str};
use proptest::prelude::*;

use crate::helpers::{dict, str_int_map};

fn collect(ctx: &mut Context, dict: &dyn Dict<Str, Int>) -> Vec<(Str, Int)> {
    let mut out = Vec::new();
    dict.iter_dict(ctx, &mut |_, k, v| {
        out.push((k.clone(), *v));
        Ok(ControlFlow::Continue(()))
    })
    .unwrap();
    out
}

#[test]
fn test_set_overrides_base() {
    let mut ctx = Context::background();
    let base = dict(&[("a", 1), ("b", 2)]);
    let edited = collection::set(base.clone(), Str::from("a"), Int(10));

    assert_eq!(edited.get(&mut ctx, &Str::from("a")).unwrap(), Int(10));
    assert_eq!(edited.get(&mut ctx, &Str::from("b")).unwrap(), Int(2));
    assert_eq!(edited.size(&mut ctx).unwrap(), 2);
    // The base is untouched.
    assert_eq!(base.get(&mut ctx, &Str::from("a")).unwrap(), Int(1));
}

#[test]
fn test_remove_hides_key() {
    let mut ctx = Context::background();
    let edited = collection::remove(dict(&[("a", 1), ("b", 2)]), Str::from("a"));

    assert!(!edited.exists(&mut ctx, &Str::from("a")).unwrap());
    let err = edited.get(&mut ctx, &Str::from("a")).unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(edited.size(&mut ctx).unwrap(), 1);
}

#[test]
fn test_removing_absent_key_keeps_size() {
    let mut ctx = Context::background();
    let edited = collection::remove(dict(&[("a", 1)]), Str::from("zzz"));
    assert_eq!(edited.size(&mut ctx).unwrap(), 1);
}

#[test]
fn test_iteration_keeps_base_order_then_new_keys() {
    let mut ctx = Context::background();
    let base = dict(&[("a", 1), ("b", 2), ("c", 3)]);
    let base_entries = collect(&mut ctx, base.as_ref());

    let edited = collection::set(base, base_entries[1].0.clone(), Int(20));
    let edited = collection::set(edited, Str::from("d"), Int(4));
    let edited = collection::remove(edited, base_entries[0].0.clone());

    assert_eq!(
        collect(&mut ctx, edited.as_ref()),
        vec![
            (base_entries[1].0.clone(), Int(20)),
            base_entries[2].clone(),
            (Str::from("d"), Int(4)),
        ]
    );
}

#[test]
fn test_iteration_stops_early() {
    let mut ctx = Context::background();
    let edited = collection::set(dict(&[("a", 1), ("b", 2)]), Str::from("c"), Int(3));
    let mut seen = 0;
    edited
        .iter_dict(&mut ctx, &mut |_, _, _| {
            seen += 1;
            Ok(ControlFlow::Break(()))
        })
        .unwrap();
    assert_eq!(seen, 1);
}

#[test]
fn test_delta_hashes_like_flat_map() {
    let delta = DictSet::new(dict(&[("a", 1)]), Str::from("b"), Int(2));
    let flat = str_int_map(&[("a", 1), ("b", 2)]);
    assert_eq!(dshash::hash(&delta).unwrap(), dshash::hash(&flat).unwrap());

    let removed = DictRemove::new(Arc::new(flat), Str::from("b"));
    assert_eq!(
        dshash::hash(&removed).unwrap(),
        dshash::hash(&str_int_map(&[("a", 1)])).unwrap()
    );
}

#[test]
fn test_display_and_edit_introspection() {
    let delta = DictSet::new(dict(&[]), Str::from("k"), Int(1));
    assert_eq!(delta.to_string(), "DictSet(Map{}, k, 1)");
    assert_eq!(delta.edit().map(|e| e.key().clone()), Some(Str::from("k")));
    assert!(dict(&[]).edit().is_none());
}

#[test]
fn test_map_display_ignores_insertion_order() {
    let mut forward = Map::new();
    for i in 0..32 {
        forward.0.insert(Str::from(format!("k{i}")), Int(i));
    }
    let mut backward = Map::new();
    for i in (0..32).rev() {
        backward.0.insert(Str::from(format!("k{i}")), Int(i));
    }
    assert_eq!(forward, backward);
    assert_eq!(forward.to_string(), backward.to_string());

    let over_forward = DictSet::new(Arc::new(forward), Str::from("x"), Int(-1));
    let over_backward = DictSet::new(Arc::new(backward), Str::from("x"), Int(-1));
    assert_eq!(over_forward.to_string(), over_backward.to_string());
}

#[test]
fn test_try_cast_to_dict() {
    let mut ctx = Context::background();
    let value: Arc<dyn Expression> =
        Arc::new(DictSet::new(dict(&[("a", 1)]), Str::from("b"), Int(2)));
    let as_dict = collection::as_dict::<Str, Int>(value).unwrap();
    assert_eq!(as_dict.size(&mut ctx).unwrap(), 2);

    let wrong_type: Arc<dyn Expression> = Arc::new(str_int_map(&[]));
    assert!(collection::as_dict::<Str, Str>(wrong_type).is_none());

    let not_a_dict: Arc<dyn Expression> = Arc::new(Int(3));
    assert!(collection::as_dict::<Str, Int>(not_a_dict).is_none());
}

#[derive(Debug, Clone)]
enum Edit {
    Set(u8, i64),
    Remove(u8),
}

fn edit_strategy() -> impl Strategy<Value = Edit> {
    prop_oneof![
        (0u8..16, any::<i64>()).prop_map(|(k, v)| Edit::Set(k, v)),
        (0u8..16).prop_map(Edit::Remove),
    ]
}

proptest! {
    #[test]
    fn prop_delta_chain_matches_eager_map(
        base in prop::collection::hash_map(0u8..16, any::<i64>(), 0..8),
        edits in prop::collection::vec(edit_strategy(), 0..64),
    ) {
        let mut ctx = Context::background();
        let key = |k: u8| Str::from(format!("k{k}"));

        let mut expected: HashMap<Str, Int> =
            base.iter().map(|(&k, &v)| (key(k), Int(v))).collect();
        let mut chain: Arc<dyn Dict<Str, Int>> = Arc::new(Map(expected.clone()));
        for edit in &edits {
            match *edit {
                Edit::Set(k, v) => {
                    expected.insert(key(k), Int(v));
                    chain = collection::set(chain, key(k), Int(v));
                }
                Edit::Remove(k) => {
                    expected.remove(&key(k));
                    chain = collection::remove(chain, key(k));
                }
            }
        }

        prop_assert_eq!(chain.size(&mut ctx).unwrap(), expected.len());
        for k in 0..16u8 {
            let k = key(k);
            prop_assert_eq!(chain.exists(&mut ctx, &k).unwrap(), expected.contains_key(&k));
            match expected.get(&k) {
                Some(v) => prop_assert_eq!(chain.get(&mut ctx, &k).unwrap(), *v),
                None => prop_assert!(chain.get(&mut ctx, &k).unwrap_err().is_not_found()),
            }
        }

        let iterated = collect(&mut ctx, chain.as_ref());
        prop_assert_eq!(iterated.len(), expected.len());
        let iterated: HashMap<Str, Int> = iterated.into_iter().collect();
        prop_assert_eq!(&iterated, &expected);

        let flat = collection::to_map(&mut ctx, chain.as_ref()).unwrap();
        prop_assert_eq!(flat, Map(expected.clone()));
        prop_assert_eq!(
            dshash::hash(chain.as_ref()).unwrap(),
            dshash::hash(&Map(expected)).unwrap()
        );
    }
}
