//! Nutrition entry domain model.
//!
//! # Responsibility
//! - Define the canonical record for one logged food item.
//! - Validate creation requests before anything reaches the store.
//!
//! # Invariants
//! - `id` is unique within one store and never reused.
//! - `name` is non-empty after whitespace normalization.
//! - `calories`, `protein`, `carbs` and `fats` are finite and `>= 0`.
//! - A creation request additionally requires `calories > 0`.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Opaque entry identifier.
///
/// New ids are UUID v4 strings. Ids loaded from older snapshots (for example
/// millisecond timestamps) are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(String);

impl EntryId {
    /// Generates a fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Display for EntryId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for EntryId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for EntryId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// How a dish was prepared. Display and filter metadata only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PrepStyle {
    Home,
    Restaurant,
    #[default]
    Unknown,
}

impl PrepStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Restaurant => "restaurant",
            Self::Unknown => "unknown",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "home" => Some(Self::Home),
            "restaurant" => Some(Self::Restaurant),
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }
}

/// Which user flow created an entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum EntrySource {
    /// Typed in through the manual form.
    #[default]
    Manual,
    /// Confirmed from a photo analysis estimate.
    Photo,
}

impl EntrySource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Photo => "photo",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "manual" => Some(Self::Manual),
            "photo" => Some(Self::Photo),
            _ => None,
        }
    }
}

/// One logged food record.
#[derive(Debug, Clone, PartialEq)]
pub struct NutritionEntry {
    pub id: EntryId,
    /// Display name, whitespace-normalized.
    pub name: String,
    /// Kilocalories.
    pub calories: f64,
    /// Grams.
    pub protein: f64,
    /// Grams.
    pub carbs: f64,
    /// Grams.
    pub fats: f64,
    /// Unix epoch milliseconds. `0` for snapshots written before this field existed.
    pub logged_at: i64,
    pub prep_style: PrepStyle,
    pub source: EntrySource,
}

impl NutritionEntry {
    /// Builds a stored entry from an already validated request.
    pub(crate) fn from_request(id: EntryId, request: NewEntry, now_ms: i64) -> Self {
        Self {
            id,
            name: normalize_name(&request.name),
            calories: request.calories,
            protein: request.protein,
            carbs: request.carbs,
            fats: request.fats,
            logged_at: request.logged_at.unwrap_or(now_ms),
            prep_style: request.prep_style,
            source: request.source,
        }
    }

    /// UTC epoch day this entry was logged on.
    pub fn epoch_day(&self) -> i64 {
        epoch_day(self.logged_at)
    }
}

/// Request to create one entry.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
    pub prep_style: PrepStyle,
    pub source: EntrySource,
    /// Epoch milliseconds. `None` means "now" at the time of `add`.
    pub logged_at: Option<i64>,
}

impl NewEntry {
    /// Creates a manual entry request with default metadata.
    pub fn new(
        name: impl Into<String>,
        calories: f64,
        protein: f64,
        carbs: f64,
        fats: f64,
    ) -> Self {
        Self {
            name: name.into(),
            calories,
            protein,
            carbs,
            fats,
            prep_style: PrepStyle::Unknown,
            source: EntrySource::Manual,
            logged_at: None,
        }
    }

    pub fn with_prep_style(mut self, prep_style: PrepStyle) -> Self {
        self.prep_style = prep_style;
        self
    }

    pub fn with_source(mut self, source: EntrySource) -> Self {
        self.source = source;
        self
    }

    pub fn logged_at(mut self, epoch_ms: i64) -> Self {
        self.logged_at = Some(epoch_ms);
        self
    }

    /// Checks creation preconditions.
    ///
    /// # Errors
    /// - `EmptyName` when the name is blank.
    /// - `NonPositiveCalories` when `calories <= 0` or is NaN.
    /// - `InvalidMacro` when any value is negative or not finite.
    pub fn validate(&self) -> Result<(), EntryValidationError> {
        if normalize_name(&self.name).is_empty() {
            return Err(EntryValidationError::EmptyName);
        }
        if self.calories.is_nan() || self.calories <= 0.0 {
            return Err(EntryValidationError::NonPositiveCalories(self.calories));
        }
        for (field, value) in [
            ("calories", self.calories),
            ("protein", self.protein),
            ("carbs", self.carbs),
            ("fats", self.fats),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(EntryValidationError::InvalidMacro { field, value });
            }
        }
        Ok(())
    }
}

/// Rejection reasons for entry creation requests.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryValidationError {
    EmptyName,
    NonPositiveCalories(f64),
    InvalidMacro { field: &'static str, value: f64 },
}

impl Display for EntryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "food name cannot be empty"),
            Self::NonPositiveCalories(value) => {
                write!(f, "calories must be greater than 0, got {value}")
            }
            Self::InvalidMacro { field, value } => {
                write!(f, "{field} must be a finite value >= 0, got {value}")
            }
        }
    }
}

impl Error for EntryValidationError {}

/// Trims a display name and collapses internal whitespace runs to one space.
pub fn normalize_name(value: &str) -> String {
    WHITESPACE_RE.replace_all(value.trim(), " ").into_owned()
}

/// Converts epoch milliseconds to a UTC epoch day number.
pub fn epoch_day(epoch_ms: i64) -> i64 {
    epoch_ms.div_euclid(MILLIS_PER_DAY)
}

pub(crate) const MILLIS_PER_DAY: i64 = 86_400_000;

pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::{epoch_day, normalize_name, EntryValidationError, NewEntry, PrepStyle};

    #[test]
    fn normalize_name_collapses_whitespace() {
        assert_eq!(normalize_name("  scrambled \t\n eggs "), "scrambled eggs");
    }

    #[test]
    fn validate_rejects_nan_calories() {
        let err = NewEntry::new("Soup", f64::NAN, 1.0, 1.0, 1.0)
            .validate()
            .unwrap_err();
        assert!(matches!(err, EntryValidationError::NonPositiveCalories(_)));
    }

    #[test]
    fn validate_rejects_infinite_macro() {
        let err = NewEntry::new("Soup", 100.0, f64::INFINITY, 1.0, 1.0)
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            EntryValidationError::InvalidMacro {
                field: "protein",
                ..
            }
        ));
    }

    #[test]
    fn epoch_day_floors_negative_timestamps() {
        assert_eq!(epoch_day(0), 0);
        assert_eq!(epoch_day(86_399_999), 0);
        assert_eq!(epoch_day(86_400_000), 1);
        assert_eq!(epoch_day(-1), -1);
    }

    #[test]
    fn prep_style_parse_is_case_insensitive() {
        assert_eq!(PrepStyle::parse(" Restaurant "), Some(PrepStyle::Restaurant));
        assert_eq!(PrepStyle::parse("takeout"), None);
    }
}
