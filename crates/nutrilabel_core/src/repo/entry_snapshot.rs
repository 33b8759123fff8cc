//! Entry collection snapshot codec.
//!
//! # Responsibility
//! - Encode the whole entry collection as one JSON array under one key.
//! - Decode older snapshot shapes into the canonical entry model.
//!
//! # Invariants
//! - Writes always emit the canonical `name` field.
//! - Reads accept `name` or the mobile `foodName` spelling.
//! - Missing macro fields read as `0`; unknown fields are ignored.
//! - Records without an id, or with an id already seen, get a fresh id so
//!   removal by id stays unambiguous. Callers must write regenerated ids
//!   back, otherwise the next load assigns different ones.
//! - Records with a blank name or negative values are skipped, not fatal.

use crate::model::entry::{normalize_name, EntryId, EntrySource, NutritionEntry, PrepStyle};
use crate::model::wire::{read_i64, read_number, read_text, JsonObject};
use crate::repo::kv_repo::{KeyValueStore, PersistenceError};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;

/// Storage key of the entry snapshot.
pub const ENTRIES_STORAGE_KEY: &str = "@nutrilabel_food_entries";

const NAME_KEYS: &[&str] = &["name", "foodName"];

/// Result of decoding one stored snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedSnapshot {
    pub entries: Vec<NutritionEntry>,
    /// Records dropped because they violated entry invariants.
    pub skipped: usize,
    /// Entries whose stored id was missing or duplicated and was replaced.
    pub ids_regenerated: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StoredEntry<'a> {
    id: &'a str,
    name: &'a str,
    calories: f64,
    protein: f64,
    carbs: f64,
    fats: f64,
    logged_at: i64,
    prep_style: &'static str,
    source: &'static str,
}

impl<'a> From<&'a NutritionEntry> for StoredEntry<'a> {
    fn from(entry: &'a NutritionEntry) -> Self {
        Self {
            id: entry.id.as_str(),
            name: entry.name.as_str(),
            calories: entry.calories,
            protein: entry.protein,
            carbs: entry.carbs,
            fats: entry.fats,
            logged_at: entry.logged_at,
            prep_style: entry.prep_style.as_str(),
            source: entry.source.as_str(),
        }
    }
}

/// Reads and writes the entry snapshot through a key-value store.
pub struct EntrySnapshotRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> EntrySnapshotRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Loads the stored snapshot. `Ok(None)` when nothing was ever saved.
    pub fn load(&self) -> Result<Option<DecodedSnapshot>, PersistenceError> {
        match self.store.get_item(ENTRIES_STORAGE_KEY)? {
            Some(raw) => decode_snapshot(&raw).map(Some),
            None => Ok(None),
        }
    }

    /// Replaces the stored snapshot with `entries`.
    pub fn save(&self, entries: &[NutritionEntry]) -> Result<(), PersistenceError> {
        let raw = encode_snapshot(entries)?;
        self.store.set_item(ENTRIES_STORAGE_KEY, &raw)?;
        Ok(())
    }
}

/// Serializes entries in insertion order.
pub fn encode_snapshot(entries: &[NutritionEntry]) -> Result<String, PersistenceError> {
    let stored = entries.iter().map(StoredEntry::from).collect::<Vec<_>>();
    serde_json::to_string(&stored).map_err(PersistenceError::Encode)
}

/// Parses a stored snapshot.
///
/// # Errors
/// - `Corrupt` when the blob is not JSON or not a JSON array.
pub fn decode_snapshot(raw: &str) -> Result<DecodedSnapshot, PersistenceError> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|err| PersistenceError::Corrupt(format!("entry snapshot: {err}")))?;
    let Value::Array(items) = value else {
        return Err(PersistenceError::Corrupt(
            "entry snapshot is not a JSON array".to_string(),
        ));
    };

    let mut seen_ids = HashSet::new();
    let mut entries = Vec::with_capacity(items.len());
    let mut skipped = 0;
    let mut ids_regenerated = 0;
    for item in items {
        let decoded = match item {
            Value::Object(object) => decode_entry(&object, &mut seen_ids),
            _ => None,
        };
        match decoded {
            Some((entry, regenerated)) => {
                ids_regenerated += usize::from(regenerated);
                entries.push(entry);
            }
            None => skipped += 1,
        }
    }

    Ok(DecodedSnapshot {
        entries,
        skipped,
        ids_regenerated,
    })
}

/// Decodes one record; the flag is set when its id was regenerated.
fn decode_entry(
    object: &JsonObject,
    seen_ids: &mut HashSet<String>,
) -> Option<(NutritionEntry, bool)> {
    let name = normalize_name(&read_text(object, NAME_KEYS)?);
    let calories = read_number(object, &["calories"]).unwrap_or(0.0);
    let protein = read_number(object, &["protein"]).unwrap_or(0.0);
    let carbs = read_number(object, &["carbs"]).unwrap_or(0.0);
    let fats = read_number(object, &["fats"]).unwrap_or(0.0);
    if [calories, protein, carbs, fats].iter().any(|v| *v < 0.0) {
        return None;
    }

    let stored_id = read_text(object, &["id"])
        .or_else(|| read_i64(object, &["id"]).map(|value| value.to_string()));
    let (id, regenerated) = match stored_id {
        Some(id) if !seen_ids.contains(&id) => (EntryId::from(id), false),
        _ => (fresh_id(seen_ids), true),
    };
    seen_ids.insert(id.as_str().to_string());

    let entry = NutritionEntry {
        id,
        name,
        calories,
        protein,
        carbs,
        fats,
        logged_at: read_i64(object, &["loggedAt"]).unwrap_or(0),
        prep_style: read_text(object, &["prepStyle"])
            .and_then(|value| PrepStyle::parse(&value))
            .unwrap_or_default(),
        source: read_text(object, &["source"])
            .and_then(|value| EntrySource::parse(&value))
            .unwrap_or_default(),
    };
    Some((entry, regenerated))
}

fn fresh_id(seen_ids: &HashSet<String>) -> EntryId {
    loop {
        let id = EntryId::generate();
        if !seen_ids.contains(id.as_str()) {
            return id;
        }
    }
}
