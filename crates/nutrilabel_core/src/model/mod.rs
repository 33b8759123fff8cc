//! Domain model for logged food and derived nutrition figures.
//!
//! # Responsibility
//! - Define the canonical entry record and its creation request.
//! - Provide the totals reducer and pie-chart breakdown.
//! - Define the flat user settings record.
//!
//! # Invariants
//! - Every entry is identified by a stable `EntryId`.
//! - Entries are never mutated in place; corrections are delete + recreate.
//! - Totals are derived on every read and never persisted.

pub mod entry;
pub mod settings;
pub mod totals;
pub mod wire;
