//! Settings record persistence.
//!
//! # Invariants
//! - The record is stored as one camelCase JSON object under one key.
//! - Fields missing from the stored object, or holding a value of the wrong
//!   type, take their defaults on read; the other fields are kept.

use crate::model::settings::{DefaultPrepStyle, UserSettings};
use crate::model::wire::{read_bool, read_epoch_ms, read_text};
use crate::repo::kv_repo::{KeyValueStore, PersistenceError};
use serde_json::Value;

/// Storage key of the settings record.
pub const SETTINGS_STORAGE_KEY: &str = "@nutrilabel_user_settings";

/// Reads and writes `UserSettings` through a key-value store.
pub struct SettingsRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> SettingsRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// `Ok(None)` when no settings were ever saved.
    ///
    /// # Errors
    /// - `Corrupt` when the stored blob is not a JSON object.
    pub fn load(&self) -> Result<Option<UserSettings>, PersistenceError> {
        let Some(raw) = self.store.get_item(SETTINGS_STORAGE_KEY)? else {
            return Ok(None);
        };
        decode_settings(&raw).map(Some)
    }

    pub fn save(&self, settings: &UserSettings) -> Result<(), PersistenceError> {
        let raw = serde_json::to_string(settings).map_err(PersistenceError::Encode)?;
        self.store.set_item(SETTINGS_STORAGE_KEY, &raw)?;
        Ok(())
    }

    pub fn remove(&self) -> Result<(), PersistenceError> {
        self.store.remove_item(SETTINGS_STORAGE_KEY)?;
        Ok(())
    }
}

/// Merges a stored settings object over the defaults, field by field.
///
/// # Errors
/// - `Corrupt` when `raw` is not JSON or not a JSON object.
pub fn decode_settings(raw: &str) -> Result<UserSettings, PersistenceError> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|err| PersistenceError::Corrupt(format!("settings: {err}")))?;
    let Value::Object(object) = value else {
        return Err(PersistenceError::Corrupt(
            "settings record is not a JSON object".to_string(),
        ));
    };

    let defaults = UserSettings::default();
    Ok(UserSettings {
        use_metric: read_bool(&object, "useMetric").unwrap_or(defaults.use_metric),
        default_prep_style: read_text(&object, &["defaultPrepStyle"])
            .and_then(|value| DefaultPrepStyle::parse(&value))
            .unwrap_or(defaults.default_prep_style),
        show_detailed_view: read_bool(&object, "showDetailedView")
            .unwrap_or(defaults.show_detailed_view),
        notifications_enabled: read_bool(&object, "notificationsEnabled")
            .unwrap_or(defaults.notifications_enabled),
        dark_mode: read_bool(&object, "darkMode").unwrap_or(defaults.dark_mode),
        last_synced_at: read_epoch_ms(&object, "lastSyncedAt"),
    })
}
