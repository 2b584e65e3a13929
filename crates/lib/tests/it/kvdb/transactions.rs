use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use arbordb::collection::Map;
use arbordb::core::{Context, Identifier};
use arbordb::kvdb::{DB, DbConfig, TransactionStatus};
use arbordb::scalar::{Int, Str};
use arbordb::storage::{self, InMemory, PhysicalStorage};

use crate::helpers::setup_db;

#[test]
fn test_fresh_database_reads_empty() {
    let (db, storage) = setup_db();
    assert!(db.root_id().is_empty());
    let txn = db.begin().unwrap();
    assert!(txn.base_root().is_empty());
    assert!(!txn.exists("anything").unwrap());
    assert!(txn.get("anything").unwrap_err().is_not_found());
    assert!(storage.is_empty());
}

#[test]
fn test_commit_publishes_root() {
    let (db, storage) = setup_db();
    let txn = db.begin().unwrap();
    txn.put("name", "arbor").unwrap();
    txn.put("kind", "db").unwrap();
    let root = txn.commit().unwrap();

    assert_eq!(db.root_id(), root);
    assert_eq!(txn.status(), TransactionStatus::Committed);
    assert!(storage.contains(&root));

    let stored =
        storage::get_as::<Map<Str, Str>>(storage.as_ref(), &mut Context::background(), &root)
            .unwrap();
    assert_eq!(stored.len(), 2);

    let next = db.begin().unwrap();
    assert_eq!(next.base_root(), &root);
    assert_eq!(next.get("name").unwrap(), "arbor");
}

#[test]
fn test_commit_is_content_addressed() {
    let (first_db, _) = setup_db();
    let (second_db, _) = setup_db();

    let a = first_db.begin().unwrap();
    a.put("x", "1").unwrap();
    a.put("y", "2").unwrap();

    let b = second_db.begin().unwrap();
    b.put("y", "2").unwrap();
    b.put("z", "3").unwrap();
    b.put("x", "1").unwrap();
    b.delete("z").unwrap();

    assert_eq!(a.commit().unwrap(), b.commit().unwrap());
}

#[test]
fn test_large_transaction() {
    let (db, _) = setup_db();
    let txn = db.begin().unwrap();
    for i in 0..10_000 {
        txn.put(&format!("key{i}"), &format!("value{i}")).unwrap();
    }
    for i in 0..100 {
        txn.delete(&format!("key{i}")).unwrap();
    }
    txn.put("key9999", "last").unwrap();
    txn.commit().unwrap();

    let check = db.begin().unwrap();
    assert!(check.get("key0").unwrap_err().is_not_found());
    assert!(check.get("key99").unwrap_err().is_not_found());
    assert_eq!(check.get("key100").unwrap(), "value100");
    assert_eq!(check.get("key9999").unwrap(), "last");
}

#[test]
fn test_finished_transactions_reject_use() {
    let (db, _) = setup_db();
    let txn = db.begin().unwrap();
    txn.put("a", "1").unwrap();
    txn.commit().unwrap();

    assert!(txn.get("a").is_err());
    assert!(txn.put("b", "2").is_err());
    assert!(txn.commit().is_err());
    assert!(txn.abandon().is_err());
}

#[test]
fn test_abandon_leaves_store_untouched() {
    let (db, storage) = setup_db();
    let txn = db.begin().unwrap();
    txn.put("a", "1").unwrap();
    txn.abandon().unwrap();
    assert!(db.root_id().is_empty());
    assert!(storage.is_empty());

    let dropped = db.begin().unwrap();
    dropped.put("b", "2").unwrap();
    drop(dropped);
    assert!(db.root_id().is_empty());
}

#[test]
fn test_reopen_at_existing_root() {
    let (db, storage) = setup_db();
    let txn = db.begin().unwrap();
    txn.put("a", "1").unwrap();
    let root = txn.commit().unwrap();

    let reopened = DB::with_root(storage, root.clone(), DbConfig::default());
    assert_eq!(reopened.root_id(), root);
    assert_eq!(reopened.begin().unwrap().get("a").unwrap(), "1");
}

#[test]
fn test_begin_rejects_non_dict_root() {
    let storage = Arc::new(InMemory::new());
    let bogus = storage.set(&mut Context::background(), Arc::new(Int(1))).unwrap();
    let db = DB::with_root(storage, bogus, DbConfig::default());
    let err = db.begin().unwrap_err();
    assert!(err.is_type_mismatch());
    assert_eq!(err.module(), "kvdb");
}

#[test]
fn test_begin_with_missing_root() {
    let db = DB::with_root(
        Arc::new(InMemory::new()),
        Identifier::new("dshash-sha256", "00"),
        DbConfig::default(),
    );
    assert!(db.begin().unwrap_err().is_not_found());
}

#[test]
fn test_cancelled_commit_stays_open() {
    let (db, _) = setup_db();
    let stop = Arc::new(AtomicBool::new(false));
    let ctx = Context::with_storage(db.storage().clone()).with_cancel_flag(Arc::clone(&stop));
    let txn = db.begin_with(ctx).unwrap();
    txn.put("a", "1").unwrap();

    stop.store(true, Ordering::Relaxed);
    assert!(txn.commit().unwrap_err().is_canceled());
    assert_eq!(txn.status(), TransactionStatus::Open);
    assert!(db.root_id().is_empty());

    stop.store(false, Ordering::Relaxed);
    txn.commit().unwrap();
    assert!(!db.root_id().is_empty());
}
