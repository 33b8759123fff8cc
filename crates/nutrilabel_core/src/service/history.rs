//! History queries over logged entries.
//!
//! # Responsibility
//! - Search, filter and order entries for the history list.
//! - Group entries per UTC day for the daily summary and history chart.
//!
//! # Invariants
//! - Queries never modify or copy the underlying collection.
//! - Entries with equal `logged_at` keep insertion order.

use crate::model::entry::{normalize_name, NutritionEntry, PrepStyle};
use crate::model::totals::NutritionTotals;
use std::collections::BTreeMap;

const HISTORY_DEFAULT_LIMIT: u32 = 50;
const HISTORY_LIMIT_MAX: u32 = 200;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HistoryOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}

/// Filter and pagination options for the history list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryQuery {
    /// Case-insensitive substring of the entry name. Blank matches all.
    pub search: Option<String>,
    pub prep_style: Option<PrepStyle>,
    pub order: HistoryOrder,
    /// Defaults to 50 and clamps to 200. `0` means default.
    pub limit: Option<u32>,
}

/// Totals for one UTC day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyTotals {
    /// UTC epoch day (`logged_at` div 86_400_000).
    pub day: i64,
    pub entry_count: usize,
    pub totals: NutritionTotals,
}

/// Runs a history query and returns matching entries.
pub fn query_history<'a>(
    entries: &'a [NutritionEntry],
    query: &HistoryQuery,
) -> Vec<&'a NutritionEntry> {
    let needle = query
        .search
        .as_deref()
        .map(|text| normalize_name(text).to_lowercase())
        .filter(|text| !text.is_empty());

    let mut matches = entries
        .iter()
        .filter(|entry| {
            needle
                .as_deref()
                .map_or(true, |needle| entry.name.to_lowercase().contains(needle))
        })
        .filter(|entry| {
            query
                .prep_style
                .map_or(true, |style| entry.prep_style == style)
        })
        .collect::<Vec<_>>();

    match query.order {
        HistoryOrder::OldestFirst => matches.sort_by_key(|entry| entry.logged_at),
        HistoryOrder::NewestFirst => {
            matches.sort_by(|left, right| right.logged_at.cmp(&left.logged_at))
        }
    }

    matches.truncate(normalize_history_limit(query.limit) as usize);
    matches
}

/// Groups entries per UTC day, ascending by day.
pub fn daily_totals(entries: &[NutritionEntry]) -> Vec<DailyTotals> {
    let mut by_day: BTreeMap<i64, DailyTotals> = BTreeMap::new();
    for entry in entries {
        let day = entry.epoch_day();
        let bucket = by_day.entry(day).or_insert(DailyTotals {
            day,
            entry_count: 0,
            totals: NutritionTotals::default(),
        });
        bucket.entry_count += 1;
        bucket.totals += entry;
    }
    by_day.into_values().collect()
}

/// Totals of entries logged on one UTC day.
pub fn totals_for_day(entries: &[NutritionEntry], day: i64) -> NutritionTotals {
    NutritionTotals::from_entries(entries.iter().filter(|entry| entry.epoch_day() == day))
}

pub fn normalize_history_limit(limit: Option<u32>) -> u32 {
    match limit {
        Some(0) | None => HISTORY_DEFAULT_LIMIT,
        Some(value) if value > HISTORY_LIMIT_MAX => HISTORY_LIMIT_MAX,
        Some(value) => value,
    }
}
