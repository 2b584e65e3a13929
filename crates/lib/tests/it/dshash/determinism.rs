use std::collections::{BTreeMap, HashMap};

use arbordb::dshash::{self, Opaque};
use arbordb::structural_record;
use proptest::prelude::*;
use rand::seq::SliceRandom;

use crate::helpers::{digest_hex, distinct_pair, empty_branch, self_loop, shared_pair};

struct Account {
    name: String,
    balance: i64,
}
structural_record!(Account { name => "Name", balance => "Balance" });

// Same logical shape, fields declared in the opposite order.
struct AccountReordered {
    balance: i64,
    name: String,
}
structural_record!(AccountReordered { balance => "Balance", name => "Name" });

struct AccountWithNote {
    name: String,
    balance: i64,
    note: Option<String>,
}
structural_record!(AccountWithNote { name => "Name", balance => "Balance", note => "Note" });

struct AccountWithCallback {
    name: String,
    balance: i64,
    on_change: Opaque<fn()>,
}
structural_record!(AccountWithCallback {
    name => "Name",
    balance => "Balance",
    on_change => "OnChange"
});

#[test]
fn test_hashing_twice_is_stable() {
    let value = Account {
        name: "alice".to_string(),
        balance: 10,
    };
    assert_eq!(digest_hex(&value), digest_hex(&value));
}

#[test]
fn test_field_declaration_order_is_irrelevant() {
    let a = Account {
        name: "alice".to_string(),
        balance: 10,
    };
    let b = AccountReordered {
        balance: 10,
        name: "alice".to_string(),
    };
    assert_eq!(digest_hex(&a), digest_hex(&b));
}

#[test]
fn test_zero_fields_are_omitted() {
    let plain = Account {
        name: "alice".to_string(),
        balance: 10,
    };
    let unset = AccountWithNote {
        name: "alice".to_string(),
        balance: 10,
        note: None,
    };
    let set = AccountWithNote {
        name: "alice".to_string(),
        balance: 10,
        note: Some("vip".to_string()),
    };
    assert_eq!(digest_hex(&plain), digest_hex(&unset));
    assert_ne!(digest_hex(&plain), digest_hex(&set));

    // A zero balance hashes like a record without the field at all.
    let zero = Account {
        name: "alice".to_string(),
        balance: 0,
    };
    let empty_note = AccountWithNote {
        name: "alice".to_string(),
        balance: 0,
        note: None,
    };
    assert_eq!(digest_hex(&zero), digest_hex(&empty_note));
}

#[test]
fn test_opaque_fields_are_omitted() {
    fn noop() {}
    let plain = Account {
        name: "bob".to_string(),
        balance: 3,
    };
    let with_callback = AccountWithCallback {
        name: "bob".to_string(),
        balance: 3,
        on_change: Opaque(noop as fn()),
    };
    assert_eq!(digest_hex(&plain), digest_hex(&with_callback));
}

#[test]
fn test_map_insertion_order_is_irrelevant() {
    let mut entries: Vec<(String, i64)> = (0..64).map(|i| (format!("key-{i}"), i)).collect();
    let reference: HashMap<String, i64> = entries.iter().cloned().collect();
    let expected = digest_hex(&reference);

    let mut rng = rand::thread_rng();
    for _ in 0..8 {
        entries.shuffle(&mut rng);
        let mut shuffled = HashMap::with_capacity(1);
        for (k, v) in &entries {
            shuffled.insert(k.clone(), *v);
        }
        assert_eq!(digest_hex(&shuffled), expected);
    }
}

#[test]
fn test_bytes_differ_from_byte_lists() {
    let raw = serde_bytes::ByteBuf::from(b"abc".to_vec());
    assert_eq!(digest_hex(&raw), digest_hex("abc"));
    assert_ne!(digest_hex(&raw), digest_hex(&b"abc".to_vec()));
}

#[test]
fn test_self_reference_differs_from_empty() {
    let looped = self_loop();
    let empty = empty_branch();
    assert_ne!(digest_hex(&looped), digest_hex(&empty));
    assert_eq!(digest_hex(&looped), digest_hex(&self_loop()));
}

#[test]
fn test_shared_child_hashes_like_duplicated_child() {
    assert_eq!(digest_hex(&shared_pair(5)), digest_hex(&distinct_pair(5)));
    assert_ne!(digest_hex(&shared_pair(5)), digest_hex(&shared_pair(6)));
}

proptest! {
    #[test]
    fn prop_hash_map_and_btree_map_agree(
        entries in prop::collection::hash_map(".{0,8}", any::<i64>(), 0..32)
    ) {
        let ordered: BTreeMap<String, i64> = entries.iter().map(|(k, v)| (k.clone(), *v)).collect();
        prop_assert_eq!(dshash::hash(&entries).unwrap(), dshash::hash(&ordered).unwrap());
    }

    #[test]
    fn prop_distinct_strings_have_distinct_digests(a in ".{0,16}", b in ".{0,16}") {
        prop_assume!(a != b);
        prop_assert_ne!(dshash::hash(a.as_str()).unwrap(), dshash::hash(b.as_str()).unwrap());
    }
}
