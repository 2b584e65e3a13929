use std::sync::Arc;

use arbordb::collection::{Array, DictSet, KV, Map};
use arbordb::constants::{CANONICAL_KIND, DSHASH_KIND};
use arbordb::core::{
    Context, Expression, Identifier, TransformKind, canonical_id, logical_id, physical_id,
};
use arbordb::dshash::{self, Opaque};
use arbordb::scalar::{Int, Str};

use crate::helpers::{distinct_pair, empty_branch, self_loop, shared_pair, str_int_map, strs};

#[test]
fn test_identifier_text_round_trip() {
    let id: Identifier = "canonical-sha256:abc:def".parse().unwrap();
    assert_eq!(id.kind(), "canonical-sha256");
    assert_eq!(id.key(), "abc:def");
    assert_eq!(id.to_string(), "canonical-sha256:abc:def");

    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, "\"canonical-sha256:abc:def\"");
    let back: Identifier = serde_json::from_str(&json).unwrap();
    assert_eq!(back, id);
}

#[test]
fn test_identifier_parse_errors() {
    let err = Identifier::parse("no-separator").unwrap_err();
    assert_eq!(err.module(), "core");
    assert!(Identifier::parse(":key").is_err());
    assert!(Identifier::parse("kind:").is_ok());
}

#[test]
fn test_scalars_answer_their_own_identity() {
    let mut ctx = Context::background();
    assert_eq!(logical_id(&mut ctx, &Int(7)).unwrap().to_string(), "int:7");
    assert_eq!(physical_id(&mut ctx, &Str::from("x")).unwrap().to_string(), "string:x");
    assert_eq!(canonical_id(&mut ctx, &Int(7)).unwrap().to_string(), "int:7");
}

#[test]
fn test_identity_falls_back_to_structural_hash() {
    let mut ctx = Context::background();
    let value = strs(&["a", "b"]);
    let expected = dshash::identifier(&value).unwrap();
    assert_eq!(expected.kind(), DSHASH_KIND);
    assert_eq!(logical_id(&mut ctx, &value).unwrap(), expected);
    assert_eq!(physical_id(&mut ctx, &value).unwrap(), expected);
}

#[test]
fn test_collections_resolve_canonical_lists() {
    let mut ctx = Context::background();
    let array = strs(&["a", "b"]);
    let id = canonical_id(&mut ctx, &array).unwrap();
    assert_eq!(id.kind(), CANONICAL_KIND);

    let reversed = strs(&["b", "a"]);
    assert_ne!(canonical_id(&mut ctx, &reversed).unwrap(), id);
}

#[test]
fn test_map_and_equivalent_delta_share_canonical_id() {
    let mut ctx = Context::background();
    let flat = str_int_map(&[("a", 1), ("b", 2)]);
    let delta = DictSet::new(Arc::new(str_int_map(&[("a", 1)])), Str::from("b"), Int(2));
    assert_eq!(
        canonical_id(&mut ctx, &flat).unwrap(),
        canonical_id(&mut ctx, &delta).unwrap()
    );
}

#[test]
fn test_kv_canonical_form_is_key_then_value() {
    let mut ctx = Context::background();
    let kv = KV::new(Str::from("a"), Int(1));
    let pair: Array<Identifier> =
        vec![Identifier::new("string", "a"), Identifier::new("int", "1")].into();
    assert_eq!(canonical_id(&mut ctx, &kv).unwrap(), canonical_id(&mut ctx, &pair).unwrap());
}

#[test]
fn test_cycle_differs_from_empty() {
    let mut ctx = Context::background();
    let looped = canonical_id(&mut ctx, &self_loop()).unwrap();
    let empty = canonical_id(&mut ctx, &empty_branch()).unwrap();
    assert_ne!(looped, empty);
    assert_eq!(looped, canonical_id(&mut ctx, &self_loop()).unwrap());
}

#[test]
fn test_shared_child_matches_distinct_children() {
    let mut ctx = Context::background();
    assert_eq!(
        canonical_id(&mut ctx, &shared_pair(9)).unwrap(),
        canonical_id(&mut ctx, &distinct_pair(9)).unwrap()
    );
}

#[test]
fn test_opaque_value_is_unsupported() {
    let mut ctx = Context::background();
    let err = canonical_id(&mut ctx, &Opaque(3u8)).unwrap_err();
    assert!(err.is_unsupported_type());
    assert!(!Opaque(3u8).can_apply(TransformKind::CanonicalId));
}

#[test]
fn test_capability_queries() {
    let map: Map<Str, Int> = Map::new();
    assert!(map.can_apply(TransformKind::DictToMap));
    assert!(!map.can_apply(TransformKind::ListToArray));
    assert!(strs(&[]).can_apply(TransformKind::ListToArray));
    assert!(Int(1).can_apply(TransformKind::LogicalId));
}
