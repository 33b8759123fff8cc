//! Persistent entry store.
//!
//! # Responsibility
//! - Own the in-memory entry collection for one process.
//! - Mirror every mutation to durable storage as a full snapshot.
//!
//! # Invariants
//! - Insertion order is chronological order and is preserved by reload.
//! - A rejected `add` leaves both memory and storage untouched.
//! - Storage failures never fail an operation: reads degrade to an empty
//!   collection, writes keep memory authoritative and record a warning.
//! - Only `load` is valid while the store is `Loading`.
//! - Ids assigned during `load` are written back, so they survive reopening.

use crate::model::entry::{now_epoch_ms, EntryId, EntryValidationError, NewEntry, NutritionEntry};
use crate::model::totals::NutritionTotals;
use crate::repo::entry_snapshot::EntrySnapshotRepository;
use crate::repo::kv_repo::{KeyValueStore, PersistenceError};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Observable store lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    /// Constructed; the persisted collection has not been read yet.
    Loading,
    /// Steady state.
    Ready,
}

/// Store operation error.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    /// Operation attempted before `load`.
    NotReady,
    Validation(EntryValidationError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotReady => write!(f, "entry store is still loading"),
            Self::Validation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotReady => None,
            Self::Validation(err) => Some(err),
        }
    }
}

impl From<EntryValidationError> for StoreError {
    fn from(value: EntryValidationError) -> Self {
        Self::Validation(value)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Outcome of reading the persisted collection.
#[derive(Debug)]
pub struct LoadReport {
    pub loaded: usize,
    /// Stored records dropped because they violated entry invariants.
    pub skipped: usize,
    /// Set when the stored snapshot was unreadable and the store started empty.
    pub recovered_from: Option<PersistenceError>,
}

/// Single owner of the entry collection.
pub struct EntryStore<S: KeyValueStore> {
    snapshots: EntrySnapshotRepository<S>,
    state: StoreState,
    entries: Vec<NutritionEntry>,
    persistence_warning: Option<PersistenceError>,
}

impl<S: KeyValueStore> EntryStore<S> {
    /// Creates a store in `Loading` state. Call `load` before use.
    pub fn new(storage: S) -> Self {
        Self {
            snapshots: EntrySnapshotRepository::new(storage),
            state: StoreState::Loading,
            entries: Vec::new(),
            persistence_warning: None,
        }
    }

    /// Creates a store and loads the persisted collection.
    pub fn open(storage: S) -> Self {
        let mut store = Self::new(storage);
        store.load();
        store
    }

    pub fn state(&self) -> StoreState {
        self.state
    }

    /// Reads the persisted collection, replacing in-memory state.
    ///
    /// Never fails: absent or unreadable data yields an empty store.
    pub fn load(&mut self) -> LoadReport {
        let report = match self.snapshots.load() {
            Ok(Some(decoded)) => {
                let report = LoadReport {
                    loaded: decoded.entries.len(),
                    skipped: decoded.skipped,
                    recovered_from: None,
                };
                self.entries = decoded.entries;
                if decoded.ids_regenerated > 0 {
                    info!(
                        "event=entries_load module=store status=ok ids_regenerated={}",
                        decoded.ids_regenerated
                    );
                    self.persist();
                }
                report
            }
            Ok(None) => {
                self.entries.clear();
                LoadReport {
                    loaded: 0,
                    skipped: 0,
                    recovered_from: None,
                }
            }
            Err(err) => {
                warn!("event=entries_load module=store status=warn error={err}");
                self.entries.clear();
                LoadReport {
                    loaded: 0,
                    skipped: 0,
                    recovered_from: Some(err),
                }
            }
        };

        if report.skipped > 0 {
            warn!(
                "event=entries_load module=store status=warn skipped={}",
                report.skipped
            );
        }
        info!(
            "event=entries_load module=store status=ok loaded={}",
            report.loaded
        );
        self.state = StoreState::Ready;
        report
    }

    /// Validates, appends and persists one entry.
    ///
    /// # Errors
    /// - `NotReady` before `load`.
    /// - `Validation` when the request violates entry invariants; nothing
    ///   is changed in that case.
    pub fn add(&mut self, request: NewEntry) -> StoreResult<NutritionEntry> {
        self.ensure_ready()?;
        request.validate()?;

        let entry = NutritionEntry::from_request(self.fresh_id(), request, now_epoch_ms());
        self.entries.push(entry.clone());
        info!(
            "event=entry_add module=store status=ok entry_id={} source={} count={}",
            entry.id,
            entry.source.as_str(),
            self.entries.len()
        );
        self.persist();
        Ok(entry)
    }

    /// Removes the entry with `id` if present and persists the collection.
    ///
    /// Returns whether an entry was removed. Unknown ids are a no-op.
    pub fn remove(&mut self, id: &EntryId) -> StoreResult<bool> {
        self.ensure_ready()?;
        let before = self.entries.len();
        self.entries.retain(|entry| &entry.id != id);
        let removed = self.entries.len() != before;
        debug!("event=entry_remove module=store status=ok entry_id={id} removed={removed}");
        self.persist();
        Ok(removed)
    }

    /// Removes every entry and persists the empty collection.
    pub fn clear(&mut self) -> StoreResult<usize> {
        self.ensure_ready()?;
        let removed = self.entries.len();
        self.entries.clear();
        info!("event=entries_clear module=store status=ok removed={removed}");
        self.persist();
        Ok(removed)
    }

    /// Current entries in insertion order.
    pub fn list(&self) -> StoreResult<&[NutritionEntry]> {
        self.ensure_ready()?;
        Ok(&self.entries)
    }

    pub fn get(&self, id: &EntryId) -> StoreResult<Option<&NutritionEntry>> {
        self.ensure_ready()?;
        Ok(self.entries.iter().find(|entry| &entry.id == id))
    }

    /// Totals over `list()`, recomputed on every call.
    pub fn totals(&self) -> StoreResult<NutritionTotals> {
        Ok(NutritionTotals::from_entries(self.list()?))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns and clears the most recent write failure, if any.
    pub fn take_persistence_warning(&mut self) -> Option<PersistenceError> {
        self.persistence_warning.take()
    }

    fn ensure_ready(&self) -> StoreResult<()> {
        match self.state {
            StoreState::Ready => Ok(()),
            StoreState::Loading => Err(StoreError::NotReady),
        }
    }

    fn fresh_id(&self) -> EntryId {
        loop {
            let id = EntryId::generate();
            if self.entries.iter().all(|entry| entry.id != id) {
                return id;
            }
        }
    }

    fn persist(&mut self) {
        match self.snapshots.save(&self.entries) {
            Ok(()) => {
                debug!(
                    "event=entries_save module=store status=ok count={}",
                    self.entries.len()
                );
            }
            Err(err) => {
                warn!("event=entries_save module=store status=warn error={err}");
                self.persistence_warning = Some(err);
            }
        }
    }
}
