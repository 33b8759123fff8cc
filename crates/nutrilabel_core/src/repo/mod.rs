//! Repository layer over durable key-value storage.
//!
//! # Responsibility
//! - Define the key-value storage contract and its SQLite implementation.
//! - Own the JSON snapshot formats and the field-name adapters.
//!
//! # Invariants
//! - Every snapshot write replaces the whole stored value.
//! - Field-name variants are resolved here and never leak inward.

pub mod entry_snapshot;
pub mod kv_repo;
pub mod settings_repo;
