//! Core domain logic for NutriLabel.
//! This crate is the single source of truth for entry and totals invariants.

pub mod analysis;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use analysis::{
    AnalysisError, HttpNutritionAnalyzer, ImageUpload, NutritionAnalyzer, NutritionEstimate,
};
pub use config::CoreConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::entry::{
    epoch_day, normalize_name, now_epoch_ms, EntryId, EntrySource, EntryValidationError,
    NewEntry, NutritionEntry, PrepStyle,
};
pub use model::settings::{DefaultPrepStyle, SettingsPatch, UserSettings};
pub use model::totals::{MacroBreakdown, NutritionTotals};
pub use repo::kv_repo::{
    storage_info, KeyValueStore, PersistenceError, RepoError, RepoResult, SqliteKeyValueStore,
    StorageInfo,
};
pub use service::app_data::{clear_all_data, is_onboarding_complete, mark_onboarding_complete};
pub use service::entry_store::{EntryStore, LoadReport, StoreError, StoreResult, StoreState};
pub use service::history::{
    daily_totals, query_history, totals_for_day, DailyTotals, HistoryOrder, HistoryQuery,
};
pub use service::photo_log::{cancel, confirm, propose, PendingEntry, PhotoLogService};
pub use service::settings_service::SettingsService;

/// Minimal health-check API for shell integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
