//! App-wide storage chores: onboarding flag and full reset.
//!
//! # Invariants
//! - Onboarding counts as complete only when its key holds exactly `"true"`.
//! - `clear_all_data` leaves no NutriLabel key behind; unrelated keys survive.

use crate::repo::entry_snapshot::ENTRIES_STORAGE_KEY;
use crate::repo::kv_repo::{KeyValueStore, RepoResult};
use crate::repo::settings_repo::SETTINGS_STORAGE_KEY;
use log::{info, warn};

pub const ONBOARDING_STORAGE_KEY: &str = "@nutrilabel_onboarding_complete";
pub const HISTORY_CACHE_STORAGE_KEY: &str = "@nutrilabel_history_cache";
pub const EXPLORE_CACHE_STORAGE_KEY: &str = "@nutrilabel_explore_cache";

const ONBOARDING_DONE: &str = "true";

const APP_KEYS: [&str; 5] = [
    ENTRIES_STORAGE_KEY,
    SETTINGS_STORAGE_KEY,
    HISTORY_CACHE_STORAGE_KEY,
    EXPLORE_CACHE_STORAGE_KEY,
    ONBOARDING_STORAGE_KEY,
];

/// Unreadable storage reads as "not onboarded".
pub fn is_onboarding_complete(store: &impl KeyValueStore) -> bool {
    match store.get_item(ONBOARDING_STORAGE_KEY) {
        Ok(value) => value.as_deref() == Some(ONBOARDING_DONE),
        Err(err) => {
            warn!("event=onboarding_check module=app_data status=warn error={err}");
            false
        }
    }
}

pub fn mark_onboarding_complete(store: &impl KeyValueStore) -> RepoResult<()> {
    store.set_item(ONBOARDING_STORAGE_KEY, ONBOARDING_DONE)?;
    info!("event=onboarding_complete module=app_data status=ok");
    Ok(())
}

/// Removes entries, settings, caches and the onboarding flag.
///
/// # Errors
/// - First storage failure; keys before it are already removed.
pub fn clear_all_data(store: &impl KeyValueStore) -> RepoResult<()> {
    for key in APP_KEYS {
        store.remove_item(key).map_err(|err| {
            warn!("event=clear_all_data module=app_data status=error key={key} error={err}");
            err
        })?;
    }
    info!(
        "event=clear_all_data module=app_data status=ok keys={}",
        APP_KEYS.len()
    );
    Ok(())
}
