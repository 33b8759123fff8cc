use nutrilabel_core::db::open_db_in_memory;
use nutrilabel_core::repo::settings_repo::SETTINGS_STORAGE_KEY;
use nutrilabel_core::{
    DefaultPrepStyle, KeyValueStore, SettingsPatch, SettingsService, SqliteKeyValueStore,
    UserSettings,
};

#[test]
fn missing_settings_yield_defaults() {
    let conn = open_db_in_memory().unwrap();
    let service = SettingsService::new(SqliteKeyValueStore::new(&conn));

    let settings = service.load_settings();
    assert_eq!(settings, UserSettings::default());
    assert!(!settings.use_metric);
    assert_eq!(settings.default_prep_style, DefaultPrepStyle::Ask);
    assert!(settings.notifications_enabled);
}

#[test]
fn corrupt_settings_yield_defaults() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKeyValueStore::new(&conn);
    kv.set_item(SETTINGS_STORAGE_KEY, "[1, 2").unwrap();

    let service = SettingsService::new(kv);
    assert_eq!(service.load_settings(), UserSettings::default());
}

#[test]
fn partial_settings_merge_over_defaults() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKeyValueStore::new(&conn);
    kv.set_item(
        SETTINGS_STORAGE_KEY,
        r#"{"useMetric":true,"defaultPrepStyle":"restaurant","futureFlag":1}"#,
    )
    .unwrap();

    let settings = SettingsService::new(kv).load_settings();
    assert!(settings.use_metric);
    assert_eq!(settings.default_prep_style, DefaultPrepStyle::Restaurant);
    assert!(settings.notifications_enabled);
    assert!(!settings.dark_mode);
}

#[test]
fn mobile_settings_record_keeps_user_values() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKeyValueStore::new(&conn);
    kv.set_item(
        SETTINGS_STORAGE_KEY,
        r#"{"useMetric":true,"defaultPrepStyle":"home","showDetailedView":false,"notificationsEnabled":false,"darkMode":true,"lastSyncedAt":"2025-11-29T10:00:00.000Z"}"#,
    )
    .unwrap();

    let settings = SettingsService::new(kv).load_settings();
    assert!(settings.use_metric);
    assert_eq!(settings.default_prep_style, DefaultPrepStyle::Home);
    assert!(!settings.show_detailed_view);
    assert!(!settings.notifications_enabled);
    assert!(settings.dark_mode);
    assert_eq!(settings.last_synced_at, Some(1_764_410_400_000));
}

#[test]
fn one_bad_field_does_not_discard_the_rest() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKeyValueStore::new(&conn);
    kv.set_item(
        SETTINGS_STORAGE_KEY,
        r#"{"useMetric":true,"darkMode":"yes please","lastSyncedAt":"not a date"}"#,
    )
    .unwrap();

    let settings = SettingsService::new(kv).load_settings();
    assert!(settings.use_metric);
    assert!(!settings.dark_mode);
    assert_eq!(settings.last_synced_at, None);
}

#[test]
fn save_merges_patch_and_stamps_sync_time() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKeyValueStore::new(&conn);
    let service = SettingsService::new(kv);

    service
        .save_settings(&SettingsPatch {
            use_metric: Some(true),
            ..SettingsPatch::default()
        })
        .unwrap();
    let saved = service
        .save_settings(&SettingsPatch {
            default_prep_style: Some(DefaultPrepStyle::Home),
            ..SettingsPatch::default()
        })
        .unwrap();

    assert!(saved.use_metric);
    assert_eq!(saved.default_prep_style, DefaultPrepStyle::Home);
    assert!(saved.last_synced_at.is_some());
    assert_eq!(service.load_settings(), saved);

    let raw = kv.get_item(SETTINGS_STORAGE_KEY).unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["useMetric"], true);
    assert_eq!(json["defaultPrepStyle"], "home");
    assert!(json["lastSyncedAt"].as_str().is_some_and(|at| at.ends_with('Z')));
}

#[test]
fn reset_restores_defaults() {
    let conn = open_db_in_memory().unwrap();
    let service = SettingsService::new(SqliteKeyValueStore::new(&conn));
    service
        .save_settings(&SettingsPatch {
            dark_mode: Some(true),
            ..SettingsPatch::default()
        })
        .unwrap();

    service.reset_settings().unwrap();
    assert_eq!(service.load_settings(), UserSettings::default());
}

#[test]
fn save_failure_is_reported() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch("DROP TABLE kv_store;").unwrap();
    let service = SettingsService::new(SqliteKeyValueStore::new(&conn));

    assert_eq!(service.load_settings(), UserSettings::default());
    assert!(service
        .save_settings(&SettingsPatch {
            use_metric: Some(true),
            ..SettingsPatch::default()
        })
        .is_err());
}
