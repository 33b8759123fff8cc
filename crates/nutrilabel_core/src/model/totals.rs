//! Totals reducer and macro breakdown.
//!
//! # Invariants
//! - Totals of an empty collection are all zero.
//! - Summation is order-insensitive up to floating-point tolerance.

use crate::model::entry::NutritionEntry;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Field-wise sum of a collection of entries. Derived, never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NutritionTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

impl NutritionTotals {
    pub fn new(calories: f64, protein: f64, carbs: f64, fats: f64) -> Self {
        Self {
            calories,
            protein,
            carbs,
            fats,
        }
    }

    /// Reduces entries into totals.
    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = &'a NutritionEntry>,
    {
        entries.into_iter().sum()
    }

    /// Sum of the three macro gram values (calories excluded).
    pub fn macro_grams(&self) -> f64 {
        self.protein + self.carbs + self.fats
    }

    /// Compares every field within `epsilon`.
    pub fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        (self.calories - other.calories).abs() <= epsilon
            && (self.protein - other.protein).abs() <= epsilon
            && (self.carbs - other.carbs).abs() <= epsilon
            && (self.fats - other.fats).abs() <= epsilon
    }
}

impl Add for NutritionTotals {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            calories: self.calories + rhs.calories,
            protein: self.protein + rhs.protein,
            carbs: self.carbs + rhs.carbs,
            fats: self.fats + rhs.fats,
        }
    }
}

impl AddAssign for NutritionTotals {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl AddAssign<&NutritionEntry> for NutritionTotals {
    fn add_assign(&mut self, entry: &NutritionEntry) {
        self.calories += entry.calories;
        self.protein += entry.protein;
        self.carbs += entry.carbs;
        self.fats += entry.fats;
    }
}

impl<'a> Sum<&'a NutritionEntry> for NutritionTotals {
    fn sum<I: Iterator<Item = &'a NutritionEntry>>(iter: I) -> Self {
        iter.fold(Self::default(), |mut acc, entry| {
            acc += entry;
            acc
        })
    }
}

impl Sum for NutritionTotals {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// Macro share of total grams, in percent, as drawn by the macro pie chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacroBreakdown {
    pub protein_pct: f64,
    pub carbs_pct: f64,
    pub fats_pct: f64,
    /// Denominator used for the percentages.
    pub total_grams: f64,
}

impl MacroBreakdown {
    /// Returns `None` when there are no macro grams to chart.
    pub fn from_totals(totals: &NutritionTotals) -> Option<Self> {
        let total_grams = totals.macro_grams();
        if !total_grams.is_finite() || total_grams <= 0.0 {
            return None;
        }
        Some(Self {
            protein_pct: totals.protein / total_grams * 100.0,
            carbs_pct: totals.carbs / total_grams * 100.0,
            fats_pct: totals.fats / total_grams * 100.0,
            total_grams,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{MacroBreakdown, NutritionTotals};

    #[test]
    fn breakdown_is_none_without_grams() {
        let totals = NutritionTotals::new(100.0, 0.0, 0.0, 0.0);
        assert!(MacroBreakdown::from_totals(&totals).is_none());
    }

    #[test]
    fn breakdown_percentages_sum_to_hundred() {
        let totals = NutritionTotals::new(220.0, 15.0, 16.0, 11.0);
        let breakdown = MacroBreakdown::from_totals(&totals).expect("breakdown");
        let sum = breakdown.protein_pct + breakdown.carbs_pct + breakdown.fats_pct;
        assert!((sum - 100.0).abs() < 1e-9);
        assert!((breakdown.total_grams - 42.0).abs() < 1e-9);
        assert!((breakdown.protein_pct - 15.0 / 42.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn totals_sum_folds_partial_totals() {
        let parts = vec![
            NutritionTotals::new(1.0, 2.0, 3.0, 4.0),
            NutritionTotals::new(10.0, 20.0, 30.0, 40.0),
        ];
        let total: NutritionTotals = parts.into_iter().sum();
        assert_eq!(total, NutritionTotals::new(11.0, 22.0, 33.0, 44.0));
    }
}
