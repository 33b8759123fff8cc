use nutrilabel_core::db::open_db_in_memory;
use nutrilabel_core::service::app_data::{
    EXPLORE_CACHE_STORAGE_KEY, HISTORY_CACHE_STORAGE_KEY, ONBOARDING_STORAGE_KEY,
};
use nutrilabel_core::{
    clear_all_data, is_onboarding_complete, mark_onboarding_complete, storage_info, EntryStore,
    KeyValueStore, NewEntry, SettingsPatch, SettingsService, SqliteKeyValueStore, UserSettings,
};

#[test]
fn onboarding_flag_round_trips() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKeyValueStore::new(&conn);

    assert!(!is_onboarding_complete(&kv));
    mark_onboarding_complete(&kv).unwrap();
    assert!(is_onboarding_complete(&kv));
    assert_eq!(
        kv.get_item(ONBOARDING_STORAGE_KEY).unwrap().as_deref(),
        Some("true")
    );
}

#[test]
fn onboarding_requires_exact_true() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKeyValueStore::new(&conn);

    kv.set_item(ONBOARDING_STORAGE_KEY, "yes").unwrap();
    assert!(!is_onboarding_complete(&kv));
}

#[test]
fn onboarding_reads_false_when_storage_is_gone() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch("DROP TABLE kv_store;").unwrap();
    let kv = SqliteKeyValueStore::new(&conn);

    assert!(!is_onboarding_complete(&kv));
    assert!(mark_onboarding_complete(&kv).is_err());
}

#[test]
fn clear_all_data_wipes_app_keys_only() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKeyValueStore::new(&conn);

    let mut store = EntryStore::open(kv);
    store
        .add(NewEntry::new("Toast", 80.0, 3.0, 15.0, 1.0))
        .unwrap();
    SettingsService::new(kv)
        .save_settings(&SettingsPatch {
            dark_mode: Some(true),
            ..SettingsPatch::default()
        })
        .unwrap();
    mark_onboarding_complete(&kv).unwrap();
    kv.set_item(HISTORY_CACHE_STORAGE_KEY, "[]").unwrap();
    kv.set_item(EXPLORE_CACHE_STORAGE_KEY, "[]").unwrap();
    kv.set_item("@other_app_key", "keep").unwrap();

    clear_all_data(&kv).unwrap();

    assert_eq!(storage_info(&kv).unwrap().keys, vec!["@other_app_key"]);
    assert!(!is_onboarding_complete(&kv));
    assert_eq!(SettingsService::new(kv).load_settings(), UserSettings::default());
    assert!(EntryStore::open(kv).list().unwrap().is_empty());
}

#[test]
fn clear_all_data_on_empty_store_is_ok() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKeyValueStore::new(&conn);

    clear_all_data(&kv).unwrap();
    assert!(storage_info(&kv).unwrap().keys.is_empty());
}
