use nutrilabel_core::db::open_db_in_memory;
use nutrilabel_core::{storage_info, KeyValueStore, RepoError, SqliteKeyValueStore};

#[test]
fn set_get_and_overwrite() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKeyValueStore::new(&conn);

    assert_eq!(kv.get_item("@k").unwrap(), None);
    kv.set_item("@k", "first").unwrap();
    assert_eq!(kv.get_item("@k").unwrap().as_deref(), Some("first"));
    kv.set_item("@k", "second").unwrap();
    assert_eq!(kv.get_item("@k").unwrap().as_deref(), Some("second"));
}

#[test]
fn remove_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKeyValueStore::new(&conn);

    kv.set_item("@k", "value").unwrap();
    kv.remove_item("@k").unwrap();
    kv.remove_item("@k").unwrap();
    assert_eq!(kv.get_item("@k").unwrap(), None);
}

#[test]
fn blank_keys_are_rejected() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKeyValueStore::new(&conn);

    let err = kv.set_item("  ", "value").unwrap_err();
    assert!(matches!(err, RepoError::InvalidKey(_)));
    assert!(kv.list_keys().unwrap().is_empty());
}

#[test]
fn storage_info_reports_sorted_keys_and_sizes() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKeyValueStore::new(&conn);
    kv.set_item("@b", "1234").unwrap();
    kv.set_item("@a", "12").unwrap();

    let info = storage_info(&kv).unwrap();
    assert_eq!(info.keys, vec!["@a".to_string(), "@b".to_string()]);
    assert_eq!(info.total_bytes, 6);
}
