//! User preference record.
//!
//! # Invariants
//! - Any field missing from stored JSON takes its documented default.
//! - Wire names are camelCase to stay readable by the mobile shell.
//! - `lastSyncedAt` is written as an RFC 3339 string, as the mobile shell does.

use crate::model::wire::epoch_ms_to_rfc3339;
use serde::{Serialize, Serializer};

/// Meal style preselected when a new label is requested.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultPrepStyle {
    Home,
    Restaurant,
    /// Ask every time.
    #[default]
    Ask,
}

impl DefaultPrepStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Restaurant => "restaurant",
            Self::Ask => "ask",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "home" => Some(Self::Home),
            "restaurant" => Some(Self::Restaurant),
            "ask" => Some(Self::Ask),
            _ => None,
        }
    }
}

/// Flat settings record persisted under one storage key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    /// `false` = imperial (oz, lb), `true` = metric (g, kg).
    pub use_metric: bool,
    pub default_prep_style: DefaultPrepStyle,
    pub show_detailed_view: bool,
    pub notifications_enabled: bool,
    pub dark_mode: bool,
    /// Epoch milliseconds of the last successful save.
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_synced_at"
    )]
    pub last_synced_at: Option<i64>,
}

fn serialize_synced_at<S: Serializer>(
    value: &Option<i64>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match *value {
        Some(epoch_ms) => match epoch_ms_to_rfc3339(epoch_ms) {
            Some(iso) => serializer.serialize_str(&iso),
            None => serializer.serialize_i64(epoch_ms),
        },
        None => serializer.serialize_none(),
    }
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            use_metric: false,
            default_prep_style: DefaultPrepStyle::Ask,
            show_detailed_view: false,
            notifications_enabled: true,
            dark_mode: false,
            last_synced_at: None,
        }
    }
}

impl UserSettings {
    /// Returns a copy with every `Some` field of `patch` applied.
    pub fn merged(&self, patch: &SettingsPatch) -> Self {
        Self {
            use_metric: patch.use_metric.unwrap_or(self.use_metric),
            default_prep_style: patch.default_prep_style.unwrap_or(self.default_prep_style),
            show_detailed_view: patch.show_detailed_view.unwrap_or(self.show_detailed_view),
            notifications_enabled: patch
                .notifications_enabled
                .unwrap_or(self.notifications_enabled),
            dark_mode: patch.dark_mode.unwrap_or(self.dark_mode),
            last_synced_at: self.last_synced_at,
        }
    }
}

/// Partial settings update. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsPatch {
    pub use_metric: Option<bool>,
    pub default_prep_style: Option<DefaultPrepStyle>,
    pub show_detailed_view: Option<bool>,
    pub notifications_enabled: Option<bool>,
    pub dark_mode: Option<bool>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
