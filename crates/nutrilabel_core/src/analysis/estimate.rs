//! Typed nutrition estimate parsed from an estimator payload.
//!
//! Default substitution rules:
//! - name: first non-blank of `foodName`, `name`, `dish_name`, `dishName`,
//!   else `"Unknown Food"`;
//! - macros: number or numeric string, else `0`; negative or non-finite
//!   values become `0`;
//! - confidence: optional `confidence_score` or `confidence`, clamped to
//!   `[0, 100]`.

use super::AnalysisError;
use crate::model::entry::{normalize_name, EntrySource, NewEntry, PrepStyle};
use crate::model::wire::{non_negative, read_number, read_text};
use serde_json::Value;

pub const UNKNOWN_FOOD_NAME: &str = "Unknown Food";

const NAME_KEYS: &[&str] = &["foodName", "name", "dish_name", "dishName"];
const CONFIDENCE_KEYS: &[&str] = &["confidence_score", "confidence", "confidenceScore"];

#[derive(Debug, Clone, PartialEq)]
pub struct NutritionEstimate {
    pub food_name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
    /// Estimator-reported confidence (0-100), display only.
    pub confidence: Option<f64>,
}

impl NutritionEstimate {
    /// Parses an estimator payload.
    ///
    /// # Errors
    /// - `InvalidPayload` when `value` is not a JSON object.
    pub fn from_json(value: &Value) -> Result<Self, AnalysisError> {
        let Value::Object(object) = value else {
            return Err(AnalysisError::InvalidPayload(format!(
                "expected JSON object, got {}",
                json_kind(value)
            )));
        };

        let food_name = read_text(object, NAME_KEYS)
            .map(|name| normalize_name(&name))
            .unwrap_or_else(|| UNKNOWN_FOOD_NAME.to_string());
        let macro_value = |key: &str| non_negative(read_number(object, &[key]).unwrap_or(0.0));

        Ok(Self {
            food_name,
            calories: macro_value("calories"),
            protein: macro_value("protein"),
            carbs: macro_value("carbs"),
            fats: macro_value("fats"),
            confidence: read_number(object, CONFIDENCE_KEYS)
                .filter(|value| value.is_finite())
                .map(|value| value.clamp(0.0, 100.0)),
        })
    }

    /// Creation request for this estimate, marked as photo-derived.
    pub fn to_new_entry(&self, prep_style: PrepStyle) -> NewEntry {
        NewEntry::new(
            self.food_name.clone(),
            self.calories,
            self.protein,
            self.carbs,
            self.fats,
        )
        .with_prep_style(prep_style)
        .with_source(EntrySource::Photo)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
