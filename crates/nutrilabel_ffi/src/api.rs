//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose entry, history, settings, photo and app-data use-cases to Dart via FRB.
//! - Flatten core types into plain envelopes with a human-readable message.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every entry mutation runs inside one immediate SQLite transaction, so
//!   concurrent callers never lose each other's snapshot writes.
//! - Food names never appear in log lines emitted from here.

use log::warn;
use nutrilabel_core::db::open_db;
use nutrilabel_core::service::history::normalize_history_limit;
use nutrilabel_core::{
    clear_all_data, confirm, core_version as core_version_inner, daily_totals,
    init_logging as init_logging_inner, is_onboarding_complete, mark_onboarding_complete,
    ping as ping_inner, propose, query_history, storage_info as storage_info_inner, CoreConfig,
    DailyTotals, DefaultPrepStyle,
    EntryId, EntryStore, HistoryOrder, HistoryQuery, HttpNutritionAnalyzer, ImageUpload,
    MacroBreakdown, NewEntry, NutritionEntry, NutritionEstimate, NutritionTotals, PendingEntry,
    PhotoLogService, PrepStyle, SettingsPatch, SettingsService, SqliteKeyValueStore,
    UserSettings,
};
use rusqlite::TransactionBehavior;
use std::path::PathBuf;
use std::sync::OnceLock;

static CONFIG: OnceLock<CoreConfig> = OnceLock::new();
static PHOTO_SERVICE: OnceLock<Result<PhotoLogService<HttpNutritionAnalyzer>, String>> =
    OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One logged food record as seen by Dart.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryItem {
    pub id: String,
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
    /// Unix epoch milliseconds.
    pub logged_at: i64,
    /// `home|restaurant|unknown`.
    pub prep_style: String,
    /// `manual|photo`.
    pub source: String,
}

/// Summed nutrition plus the macro pie-chart shares.
#[derive(Debug, Clone, PartialEq)]
pub struct TotalsItem {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
    /// `None` when there are no macro grams to chart.
    pub protein_pct: Option<f64>,
    pub carbs_pct: Option<f64>,
    pub fats_pct: Option<f64>,
}

/// Result envelope for add/remove/confirm.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryActionResponse {
    pub ok: bool,
    /// Created entry, when the operation created one.
    pub entry: Option<EntryItem>,
    pub message: String,
}

impl EntryActionResponse {
    fn success(message: impl Into<String>, entry: Option<EntryItem>) -> Self {
        Self {
            ok: true,
            entry,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            entry: None,
            message: message.into(),
        }
    }
}

/// Full entry list with totals, for the home screen.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryListResponse {
    pub ok: bool,
    pub items: Vec<EntryItem>,
    pub totals: TotalsItem,
    pub message: String,
}

/// Totals-only envelope for the summary card.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryTotalsResponse {
    pub ok: bool,
    pub entry_count: u32,
    pub totals: TotalsItem,
    pub message: String,
}

/// History query result.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryHistoryResponse {
    pub ok: bool,
    pub items: Vec<EntryItem>,
    /// Effective applied limit.
    pub applied_limit: u32,
    pub message: String,
}

/// Totals for one UTC day.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyTotalsItem {
    /// Days since 1970-01-01 UTC.
    pub day: i64,
    pub entry_count: u32,
    pub totals: TotalsItem,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyTotalsResponse {
    pub ok: bool,
    /// Ascending by day.
    pub items: Vec<DailyTotalsItem>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsItem {
    pub use_metric: bool,
    /// `home|restaurant|ask`.
    pub default_prep_style: String,
    pub show_detailed_view: bool,
    pub notifications_enabled: bool,
    pub dark_mode: bool,
    pub last_synced_at: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsResponse {
    pub ok: bool,
    /// Effective settings; defaults when the call failed.
    pub settings: SettingsItem,
    pub message: String,
}

/// Estimate awaiting user confirmation.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingEntryItem {
    pub food_name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
    /// Estimator confidence (0-100), display only.
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhotoAnalyzeResponse {
    pub ok: bool,
    /// Present only on success.
    pub pending: Option<PendingEntryItem>,
    pub message: String,
}

/// Adds one manual entry.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - `prep_style` accepts `home|restaurant|unknown`; `None` means unknown.
/// - `logged_at_ms` defaults to now.
/// - Validation failures return `ok=false` and leave storage untouched.
#[flutter_rust_bridge::frb(sync)]
pub fn entry_add(
    name: String,
    calories: f64,
    protein: f64,
    carbs: f64,
    fats: f64,
    prep_style: Option<String>,
    logged_at_ms: Option<i64>,
) -> EntryActionResponse {
    let prep_style = match parse_prep_style(prep_style.as_deref()) {
        Ok(style) => style,
        Err(err) => return EntryActionResponse::failure(format!("entry_add failed: {err}")),
    };
    let mut request = NewEntry::new(name, calories, protein, carbs, fats).with_prep_style(prep_style);
    if let Some(epoch_ms) = logged_at_ms {
        request = request.logged_at(epoch_ms);
    }

    match with_entry_store(|store| store.add(request).map_err(|err| err.to_string())) {
        Ok(entry) => EntryActionResponse::success("Entry added.", Some(to_entry_item(&entry))),
        Err(err) => EntryActionResponse::failure(format!("entry_add failed: {err}")),
    }
}

/// Removes one entry by id. Unknown ids succeed as a no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn entry_remove(id: String) -> EntryActionResponse {
    let id = EntryId::from(id.trim());
    match with_entry_store(|store| store.remove(&id).map_err(|err| err.to_string())) {
        Ok(true) => EntryActionResponse::success("Entry removed.", None),
        Ok(false) => EntryActionResponse::success("No entry with that id.", None),
        Err(err) => EntryActionResponse::failure(format!("entry_remove failed: {err}")),
    }
}

/// Lists all entries in insertion order together with their totals.
#[flutter_rust_bridge::frb(sync)]
pub fn entry_list() -> EntryListResponse {
    let result = with_entry_store(|store| {
        let entries = store.list().map_err(|err| err.to_string())?;
        Ok((
            entries.iter().map(to_entry_item).collect::<Vec<_>>(),
            NutritionTotals::from_entries(entries),
        ))
    });
    match result {
        Ok((items, totals)) => EntryListResponse {
            ok: true,
            message: format!("{} entries.", items.len()),
            items,
            totals: to_totals_item(&totals),
        },
        Err(err) => EntryListResponse {
            ok: false,
            items: Vec::new(),
            totals: to_totals_item(&NutritionTotals::default()),
            message: format!("entry_list failed: {err}"),
        },
    }
}

/// Totals over every stored entry.
#[flutter_rust_bridge::frb(sync)]
pub fn entry_totals() -> EntryTotalsResponse {
    let result = with_entry_store(|store| {
        let totals = store.totals().map_err(|err| err.to_string())?;
        Ok((store.len(), totals))
    });
    match result {
        Ok((count, totals)) => EntryTotalsResponse {
            ok: true,
            entry_count: count_u32(count),
            totals: to_totals_item(&totals),
            message: String::new(),
        },
        Err(err) => EntryTotalsResponse {
            ok: false,
            entry_count: 0,
            totals: to_totals_item(&NutritionTotals::default()),
            message: format!("entry_totals failed: {err}"),
        },
    }
}

/// Searches history.
///
/// # FFI contract
/// - `search` is case-insensitive; blank matches all.
/// - `limit` defaults to 50 and clamps to 200.
/// - Newest first unless `oldest_first`.
#[flutter_rust_bridge::frb(sync)]
pub fn entry_history(
    search: Option<String>,
    prep_style: Option<String>,
    oldest_first: bool,
    limit: Option<u32>,
) -> EntryHistoryResponse {
    let applied_limit = normalize_history_limit(limit);
    let failure = |message: String| EntryHistoryResponse {
        ok: false,
        items: Vec::new(),
        applied_limit,
        message,
    };

    let prep_style = match prep_style.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => match PrepStyle::parse(raw) {
            Some(style) => Some(style),
            None => return failure(format!("entry_history failed: unknown prep style `{raw}`")),
        },
        None => None,
    };
    let query = HistoryQuery {
        search,
        prep_style,
        order: if oldest_first {
            HistoryOrder::OldestFirst
        } else {
            HistoryOrder::NewestFirst
        },
        limit: Some(applied_limit),
    };

    let result = with_entry_store(|store| {
        let entries = store.list().map_err(|err| err.to_string())?;
        Ok(query_history(entries, &query)
            .into_iter()
            .map(to_entry_item)
            .collect::<Vec<_>>())
    });
    match result {
        Ok(items) => EntryHistoryResponse {
            ok: true,
            message: if items.is_empty() {
                "No results.".to_string()
            } else {
                format!("Found {} result(s).", items.len())
            },
            items,
            applied_limit,
        },
        Err(err) => failure(format!("entry_history failed: {err}")),
    }
}

/// Per-day totals, ascending by UTC day.
#[flutter_rust_bridge::frb(sync)]
pub fn entry_daily_totals() -> DailyTotalsResponse {
    let result = with_entry_store(|store| {
        let entries = store.list().map_err(|err| err.to_string())?;
        Ok(daily_totals(entries)
            .iter()
            .map(to_daily_totals_item)
            .collect::<Vec<_>>())
    });
    match result {
        Ok(items) => DailyTotalsResponse {
            ok: true,
            items,
            message: String::new(),
        },
        Err(err) => DailyTotalsResponse {
            ok: false,
            items: Vec::new(),
            message: format!("entry_daily_totals failed: {err}"),
        },
    }
}

/// Loads settings. Absent or unreadable settings yield defaults with `ok=true`.
#[flutter_rust_bridge::frb(sync)]
pub fn settings_load() -> SettingsResponse {
    match with_settings_service(|service| Ok(service.load_settings())) {
        Ok(settings) => SettingsResponse::success(&settings, ""),
        Err(err) => SettingsResponse::failure(format!("settings_load failed: {err}")),
    }
}

/// Merges the given fields over the stored settings and saves.
///
/// # FFI contract
/// - `None` fields keep their stored value.
/// - `default_prep_style` accepts `home|restaurant|ask`.
#[flutter_rust_bridge::frb(sync)]
pub fn settings_save(
    use_metric: Option<bool>,
    default_prep_style: Option<String>,
    show_detailed_view: Option<bool>,
    notifications_enabled: Option<bool>,
    dark_mode: Option<bool>,
) -> SettingsResponse {
    let default_prep_style = match default_prep_style.as_deref() {
        Some(raw) => match DefaultPrepStyle::parse(raw) {
            Some(style) => Some(style),
            None => {
                return SettingsResponse::failure(format!(
                    "settings_save failed: unknown default prep style `{}`",
                    raw.trim()
                ))
            }
        },
        None => None,
    };
    let patch = SettingsPatch {
        use_metric,
        default_prep_style,
        show_detailed_view,
        notifications_enabled,
        dark_mode,
    };

    match with_settings_service(|service| {
        service.save_settings(&patch).map_err(|err| err.to_string())
    }) {
        Ok(settings) => SettingsResponse::success(&settings, "Settings saved."),
        Err(err) => SettingsResponse::failure(format!("settings_save failed: {err}")),
    }
}

/// Clears stored settings and returns the defaults.
#[flutter_rust_bridge::frb(sync)]
pub fn settings_reset() -> SettingsResponse {
    match with_settings_service(|service| service.reset_settings().map_err(|err| err.to_string()))
    {
        Ok(()) => SettingsResponse::success(&UserSettings::default(), "Settings reset."),
        Err(err) => SettingsResponse::failure(format!("settings_reset failed: {err}")),
    }
}

/// Sends one photo to the estimator and returns the pending estimate.
///
/// # FFI contract
/// - Blocking network call; run off the UI thread.
/// - A second call while one is in flight fails fast with a busy message.
/// - Nothing is stored; confirm with `photo_confirm`.
#[flutter_rust_bridge::frb]
pub fn photo_analyze(file_name: String, image_bytes: Vec<u8>) -> PhotoAnalyzeResponse {
    let service = match photo_service() {
        Ok(service) => service,
        Err(err) => return PhotoAnalyzeResponse::failure(format!("photo_analyze failed: {err}")),
    };
    match service.analyze_photo(&ImageUpload::new(file_name, image_bytes)) {
        Ok(pending) => PhotoAnalyzeResponse {
            ok: true,
            pending: Some(to_pending_item(&pending)),
            message: "Analysis complete.".to_string(),
        },
        Err(err) => PhotoAnalyzeResponse::failure(format!("photo_analyze failed: {err}")),
    }
}

/// Commits a (possibly user-edited) pending estimate as a photo entry.
#[flutter_rust_bridge::frb(sync)]
pub fn photo_confirm(
    food_name: String,
    calories: f64,
    protein: f64,
    carbs: f64,
    fats: f64,
    prep_style: Option<String>,
) -> EntryActionResponse {
    let prep_style = match parse_prep_style(prep_style.as_deref()) {
        Ok(style) => style,
        Err(err) => return EntryActionResponse::failure(format!("photo_confirm failed: {err}")),
    };
    let pending = propose(NutritionEstimate {
        food_name,
        calories,
        protein,
        carbs,
        fats,
        confidence: None,
    })
    .with_prep_style(prep_style);

    match with_entry_store(|store| confirm(store, pending).map_err(|err| err.to_string())) {
        Ok(entry) => EntryActionResponse::success("Entry added.", Some(to_entry_item(&entry))),
        Err(err) => EntryActionResponse::failure(format!("photo_confirm failed: {err}")),
    }
}

/// Whether the user finished onboarding. Storage failures read as `false`.
#[flutter_rust_bridge::frb(sync)]
pub fn onboarding_is_complete() -> bool {
    with_kv_store(|kv| Ok(is_onboarding_complete(&kv))).unwrap_or_else(|err| {
        warn!("event=onboarding_check module=ffi status=warn error={err}");
        false
    })
}

/// Records onboarding completion.
///
/// # FFI contract
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn onboarding_mark_complete() -> String {
    match with_kv_store(|kv| mark_onboarding_complete(&kv).map_err(|err| err.to_string())) {
        Ok(()) => String::new(),
        Err(err) => format!("onboarding_mark_complete failed: {err}"),
    }
}

/// Deletes entries, settings, caches and onboarding state.
///
/// # FFI contract
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn app_clear_all_data() -> String {
    match with_kv_store(|kv| clear_all_data(&kv).map_err(|err| err.to_string())) {
        Ok(()) => String::new(),
        Err(err) => format!("app_clear_all_data failed: {err}"),
    }
}

/// Stored key names and their summed value size, for debug screens.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageInfoResponse {
    pub ok: bool,
    pub keys: Vec<String>,
    pub total_bytes: u64,
    pub message: String,
}

#[flutter_rust_bridge::frb(sync)]
pub fn storage_info() -> StorageInfoResponse {
    match with_kv_store(|kv| storage_info_inner(&kv).map_err(|err| err.to_string())) {
        Ok(info) => StorageInfoResponse {
            ok: true,
            total_bytes: u64::try_from(info.total_bytes).unwrap_or(u64::MAX),
            keys: info.keys,
            message: String::new(),
        },
        Err(err) => StorageInfoResponse {
            ok: false,
            keys: Vec::new(),
            total_bytes: 0,
            message: format!("storage_info failed: {err}"),
        },
    }
}

impl SettingsResponse {
    fn success(settings: &UserSettings, message: &str) -> Self {
        Self {
            ok: true,
            settings: to_settings_item(settings),
            message: message.to_string(),
        }
    }

    fn failure(message: String) -> Self {
        Self {
            ok: false,
            settings: to_settings_item(&UserSettings::default()),
            message,
        }
    }
}

impl PhotoAnalyzeResponse {
    fn failure(message: String) -> Self {
        Self {
            ok: false,
            pending: None,
            message,
        }
    }
}

fn config() -> &'static CoreConfig {
    CONFIG.get_or_init(CoreConfig::from_env)
}

fn resolve_db_path() -> PathBuf {
    config().db_path.clone()
}

fn photo_service() -> Result<&'static PhotoLogService<HttpNutritionAnalyzer>, String> {
    PHOTO_SERVICE
        .get_or_init(|| {
            HttpNutritionAnalyzer::new(config().analyzer_url.clone())
                .map(PhotoLogService::new)
                .map_err(|err| err.to_string())
        })
        .as_ref()
        .map_err(|err| err.clone())
}

fn with_entry_store<T>(
    f: impl FnOnce(&mut EntryStore<SqliteKeyValueStore<'_>>) -> Result<T, String>,
) -> Result<T, String> {
    let mut conn =
        open_db(resolve_db_path()).map_err(|err| format!("entry DB open failed: {err}"))?;
    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(|err| format!("entry DB transaction failed: {err}"))?;

    let value = {
        let mut store = EntryStore::open(SqliteKeyValueStore::new(&tx));
        let value = f(&mut store)?;
        if let Some(err) = store.take_persistence_warning() {
            warn!("event=entry_persist module=ffi status=warn error={err}");
        }
        value
    };

    tx.commit()
        .map_err(|err| format!("entry DB commit failed: {err}"))?;
    Ok(value)
}

fn with_settings_service<T>(
    f: impl FnOnce(&SettingsService<SqliteKeyValueStore<'_>>) -> Result<T, String>,
) -> Result<T, String> {
    let conn = open_db(resolve_db_path()).map_err(|err| format!("settings DB open failed: {err}"))?;
    let service = SettingsService::new(SqliteKeyValueStore::new(&conn));
    f(&service)
}

fn with_kv_store<T>(
    f: impl FnOnce(SqliteKeyValueStore<'_>) -> Result<T, String>,
) -> Result<T, String> {
    let conn = open_db(resolve_db_path()).map_err(|err| format!("storage DB open failed: {err}"))?;
    f(SqliteKeyValueStore::new(&conn))
}

fn parse_prep_style(raw: Option<&str>) -> Result<PrepStyle, String> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        None => Ok(PrepStyle::Unknown),
        Some(value) => {
            PrepStyle::parse(value).ok_or_else(|| format!("unknown prep style `{value}`"))
        }
    }
}

fn count_u32(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}

fn to_entry_item(entry: &NutritionEntry) -> EntryItem {
    EntryItem {
        id: entry.id.to_string(),
        name: entry.name.clone(),
        calories: entry.calories,
        protein: entry.protein,
        carbs: entry.carbs,
        fats: entry.fats,
        logged_at: entry.logged_at,
        prep_style: entry.prep_style.as_str().to_string(),
        source: entry.source.as_str().to_string(),
    }
}

fn to_totals_item(totals: &NutritionTotals) -> TotalsItem {
    let breakdown = MacroBreakdown::from_totals(totals);
    TotalsItem {
        calories: totals.calories,
        protein: totals.protein,
        carbs: totals.carbs,
        fats: totals.fats,
        protein_pct: breakdown.map(|b| b.protein_pct),
        carbs_pct: breakdown.map(|b| b.carbs_pct),
        fats_pct: breakdown.map(|b| b.fats_pct),
    }
}

fn to_daily_totals_item(day: &DailyTotals) -> DailyTotalsItem {
    DailyTotalsItem {
        day: day.day,
        entry_count: count_u32(day.entry_count),
        totals: to_totals_item(&day.totals),
    }
}

fn to_settings_item(settings: &UserSettings) -> SettingsItem {
    SettingsItem {
        use_metric: settings.use_metric,
        default_prep_style: settings.default_prep_style.as_str().to_string(),
        show_detailed_view: settings.show_detailed_view,
        notifications_enabled: settings.notifications_enabled,
        dark_mode: settings.dark_mode,
        last_synced_at: settings.last_synced_at,
    }
}

fn to_pending_item(pending: &PendingEntry) -> PendingEntryItem {
    let estimate = pending.estimate();
    PendingEntryItem {
        food_name: estimate.food_name.clone(),
        calories: estimate.calories,
        protein: estimate.protein,
        carbs: estimate.carbs,
        fats: estimate.fats,
        confidence: estimate.confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, entry_add, entry_daily_totals, entry_history, entry_list, entry_remove,
        entry_totals, init_logging, onboarding_is_complete, onboarding_mark_complete,
        photo_analyze, photo_confirm, ping, settings_load, settings_save, storage_info,
    };
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn entry_add_then_list_and_remove() {
        let name = unique_token("ffi-add");
        let added = entry_add(name.clone(), 140.0, 12.0, 1.0, 10.0, None, None);
        assert!(added.ok, "{}", added.message);
        let entry = added.entry.expect("add should return the entry");
        assert_eq!(entry.name, name);
        assert_eq!(entry.prep_style, "unknown");
        assert_eq!(entry.source, "manual");

        let listed = entry_list();
        assert!(listed.ok, "{}", listed.message);
        assert!(listed.items.iter().any(|item| item.id == entry.id));
        assert!(listed.totals.calories >= 140.0);

        let removed = entry_remove(entry.id.clone());
        assert!(removed.ok, "{}", removed.message);
        assert!(!entry_list().items.iter().any(|item| item.id == entry.id));

        let again = entry_remove(entry.id);
        assert!(again.ok);
    }

    #[test]
    fn entry_add_rejects_invalid_requests() {
        let zero = entry_add("Water".to_string(), 0.0, 0.0, 0.0, 0.0, None, None);
        assert!(!zero.ok);
        assert!(zero.entry.is_none());

        let bad_style = entry_add(
            "Soup".to_string(),
            100.0,
            1.0,
            1.0,
            1.0,
            Some("cafeteria".to_string()),
            None,
        );
        assert!(!bad_style.ok);
        assert!(bad_style.message.contains("prep style"));
    }

    #[test]
    fn entry_history_normalizes_limit_and_finds_entry() {
        let token = unique_token("ffi-history");
        let added = entry_add(
            format!("Restaurant curry {token}"),
            520.0,
            28.0,
            45.0,
            24.0,
            Some("restaurant".to_string()),
            None,
        );
        assert!(added.ok, "{}", added.message);

        let response = entry_history(
            Some(token.to_uppercase()),
            Some("restaurant".to_string()),
            false,
            Some(5_000),
        );
        assert!(response.ok, "{}", response.message);
        assert_eq!(response.applied_limit, 200);
        assert_eq!(response.items.len(), 1);
        assert_eq!(response.items[0].prep_style, "restaurant");
    }

    #[test]
    fn totals_and_daily_totals_report_success() {
        let added = entry_add(
            unique_token("ffi-daily"),
            200.0,
            10.0,
            20.0,
            5.0,
            None,
            Some(1_000),
        );
        assert!(added.ok, "{}", added.message);

        let totals = entry_totals();
        assert!(totals.ok, "{}", totals.message);
        assert!(totals.entry_count >= 1);

        let daily = entry_daily_totals();
        assert!(daily.ok, "{}", daily.message);
        assert!(daily.items.iter().any(|item| item.day == 0));
        assert!(daily.items.windows(2).all(|pair| pair[0].day < pair[1].day));
    }

    #[test]
    fn settings_save_rejects_unknown_prep_style() {
        let response = settings_save(None, Some("sometimes".to_string()), None, None, None);
        assert!(!response.ok);
        assert!(settings_load().ok);
    }

    #[test]
    fn photo_confirm_creates_photo_entry() {
        let response = photo_confirm(
            unique_token("ffi-photo"),
            310.0,
            12.0,
            40.0,
            9.0,
            Some("home".to_string()),
        );
        assert!(response.ok, "{}", response.message);
        let entry = response.entry.expect("confirm should return the entry");
        assert_eq!(entry.source, "photo");
        assert_eq!(entry.prep_style, "home");
    }

    #[test]
    fn photo_analyze_rejects_empty_image_without_network() {
        let response = photo_analyze("empty.jpg".to_string(), Vec::new());
        assert!(!response.ok);
        assert!(response.pending.is_none());
        assert!(response.message.contains("empty"));
    }

    #[test]
    fn onboarding_mark_complete_is_visible_to_readers() {
        assert_eq!(onboarding_mark_complete(), "");
        assert!(onboarding_is_complete());
        assert_eq!(onboarding_mark_complete(), "");
    }

    #[test]
    fn storage_info_lists_entry_snapshot_key() {
        let added = entry_add(unique_token("ffi-storage"), 50.0, 1.0, 2.0, 3.0, None, None);
        assert!(added.ok, "{}", added.message);

        let info = storage_info();
        assert!(info.ok, "{}", info.message);
        assert!(info.keys.iter().any(|key| key == "@nutrilabel_food_entries"));
        assert!(info.total_bytes > 0);
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
