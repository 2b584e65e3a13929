use std::sync::{Arc, Barrier};
use std::thread;

use crate::helpers::setup_db;

#[test]
fn test_second_commit_conflicts() {
    let (db, _) = setup_db();
    let first = db.begin().unwrap();
    let second = db.begin().unwrap();
    assert_eq!(first.base_root(), second.base_root());

    first.put("owner", "first").unwrap();
    second.put("owner", "second").unwrap();

    let published = first.commit().unwrap();
    let err = second.commit().unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(db.root_id(), published);
    assert!(second.get("owner").is_err());

    let check = db.begin().unwrap();
    assert_eq!(check.get("owner").unwrap(), "first");
}

#[test]
fn test_retry_after_conflict_succeeds() {
    let (db, _) = setup_db();
    let stale = db.begin().unwrap();
    let winner = db.begin().unwrap();
    winner.put("counter", "1").unwrap();
    winner.commit().unwrap();

    stale.put("counter", "1").unwrap();
    assert!(stale.commit().unwrap_err().is_conflict());

    let retry = db.begin().unwrap();
    let current: u32 = retry.get("counter").unwrap().parse().unwrap();
    retry.put("counter", &(current + 1).to_string()).unwrap();
    retry.commit().unwrap();
    assert_eq!(db.begin().unwrap().get("counter").unwrap(), "2");
}

#[test]
fn test_parallel_increments_lose_no_update() {
    const WORKERS: usize = 4;
    const INCREMENTS: usize = 25;

    let (db, _) = setup_db();
    let seed = db.begin().unwrap();
    seed.put("counter", "0").unwrap();
    seed.commit().unwrap();

    let barrier = Arc::new(Barrier::new(WORKERS));
    let handles: Vec<_> = (0..WORKERS)
        .map(|_| {
            let db = db.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let mut conflicts = 0;
                for _ in 0..INCREMENTS {
                    loop {
                        let txn = db.begin().unwrap();
                        let value: usize = txn.get("counter").unwrap().parse().unwrap();
                        txn.put("counter", &(value + 1).to_string()).unwrap();
                        match txn.commit() {
                            Ok(_) => break,
                            Err(err) if err.is_conflict() => conflicts += 1,
                            Err(err) => panic!("unexpected error: {err}"),
                        }
                    }
                }
                conflicts
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let total: usize = db.begin().unwrap().get("counter").unwrap().parse().unwrap();
    assert_eq!(total, WORKERS * INCREMENTS);
}

#[test]
fn test_shared_transaction_handle_serializes_calls() {
    let (db, _) = setup_db();
    let txn = Arc::new(db.begin().unwrap());
    let handles: Vec<_> = (0..4)
        .map(|t| {
            let txn = Arc::clone(&txn);
            thread::spawn(move || {
                for i in 0..100 {
                    txn.put(&format!("t{t}-{i}"), "v").unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    txn.commit().unwrap();
    let check = db.begin().unwrap();
    assert_eq!(check.get("t3-99").unwrap(), "v");
}
