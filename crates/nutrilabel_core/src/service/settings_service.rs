//! Settings use-case service.
//!
//! # Invariants
//! - `load_settings` never fails; absent or corrupt data yields defaults.
//! - `save_settings` always writes the full merged record.

use crate::model::entry::now_epoch_ms;
use crate::model::settings::{SettingsPatch, UserSettings};
use crate::repo::kv_repo::{KeyValueStore, PersistenceError};
use crate::repo::settings_repo::SettingsRepository;
use log::{info, warn};

pub struct SettingsService<S: KeyValueStore> {
    repo: SettingsRepository<S>,
}

impl<S: KeyValueStore> SettingsService<S> {
    pub fn new(storage: S) -> Self {
        Self {
            repo: SettingsRepository::new(storage),
        }
    }

    /// Current settings, or defaults when none are stored or readable.
    pub fn load_settings(&self) -> UserSettings {
        match self.repo.load() {
            Ok(Some(settings)) => settings,
            Ok(None) => {
                info!("event=settings_load module=settings status=ok source=defaults");
                UserSettings::default()
            }
            Err(err) => {
                warn!("event=settings_load module=settings status=warn source=defaults error={err}");
                UserSettings::default()
            }
        }
    }

    /// Merges `patch` over the current settings, stamps `last_synced_at`
    /// and persists the result.
    pub fn save_settings(&self, patch: &SettingsPatch) -> Result<UserSettings, PersistenceError> {
        let mut updated = self.load_settings().merged(patch);
        updated.last_synced_at = Some(now_epoch_ms());
        self.repo.save(&updated).map_err(|err| {
            warn!("event=settings_save module=settings status=error error={err}");
            err
        })?;
        info!("event=settings_save module=settings status=ok");
        Ok(updated)
    }

    /// Removes stored settings so the next load yields defaults.
    pub fn reset_settings(&self) -> Result<(), PersistenceError> {
        self.repo.remove()?;
        info!("event=settings_reset module=settings status=ok");
        Ok(())
    }
}
