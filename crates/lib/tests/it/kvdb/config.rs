use std::fs;

use arbordb::core::YieldPolicy;
use arbordb::kvdb::DbConfig;

use crate::helpers::setup_db_with_config;

#[test]
fn test_load_missing_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = DbConfig::load_from_file(dir.path().join("absent.json")).unwrap();
    assert_eq!(config, DbConfig::default());
}

#[test]
fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("arbordb.json");
    fs::write(
        &path,
        r#"{"yield_policy": {"policy": "quota", "every": 64}, "compact_threshold": 32}"#,
    )
    .unwrap();

    let config = DbConfig::load_from_file(&path).unwrap();
    assert_eq!(config.yield_policy, YieldPolicy::Quota { every: 64 });
    assert_eq!(config.compact_threshold, Some(32));
}

#[test]
fn test_load_malformed_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("arbordb.json");
    fs::write(&path, "not json").unwrap();
    let err = DbConfig::load_from_file(&path).unwrap_err();
    assert_eq!(err.module(), "serialize");
}

#[test]
fn test_load_directory_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = DbConfig::load_from_file(dir.path()).unwrap_err();
    assert!(err.is_io_error());
}

#[test]
fn test_config_round_trips_through_json() {
    let config = DbConfig {
        yield_policy: YieldPolicy::Interval { interval_ms: 25 },
        compact_threshold: None,
    };
    let json = serde_json::to_string(&config).unwrap();
    assert_eq!(DbConfig::from_json(&json).unwrap(), config);
}

#[test]
fn test_compacting_database_commits_same_root() {
    let (plain, _) = setup_db_with_config(DbConfig::default());
    let (compacting, _) = setup_db_with_config(DbConfig {
        compact_threshold: Some(16),
        ..DbConfig::default()
    });

    let mut roots = Vec::new();
    for db in [&plain, &compacting] {
        let txn = db.begin().unwrap();
        for i in 0..200 {
            txn.put(&format!("k{}", i % 50), &i.to_string()).unwrap();
            if i % 7 == 0 {
                txn.delete(&format!("k{}", i % 13)).unwrap();
            }
        }
        roots.push(txn.commit().unwrap());
    }
    assert_eq!(roots[0], roots[1]);
}
