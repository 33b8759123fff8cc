//! Photo logging use-case: analyze, propose, then confirm or cancel.
//!
//! # Responsibility
//! - Run one estimator call per submission and parse its payload.
//! - Hold the estimate as a `PendingEntry` until the user decides.
//!
//! # Invariants
//! - Nothing reaches the entry store before `confirm`.
//! - At most one analysis is in flight per service instance.
//! - A failed analysis leaves no pending entry and no store change.

use crate::analysis::{AnalysisError, ImageUpload, NutritionAnalyzer, NutritionEstimate};
use crate::model::entry::{NutritionEntry, PrepStyle};
use crate::repo::kv_repo::KeyValueStore;
use crate::service::entry_store::{EntryStore, StoreResult};
use log::{error, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// Estimate awaiting user confirmation.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingEntry {
    estimate: NutritionEstimate,
    prep_style: PrepStyle,
}

impl PendingEntry {
    pub fn estimate(&self) -> &NutritionEstimate {
        &self.estimate
    }

    pub fn prep_style(&self) -> PrepStyle {
        self.prep_style
    }

    /// Tags the pending entry with a preparation style before confirming.
    pub fn with_prep_style(mut self, prep_style: PrepStyle) -> Self {
        self.prep_style = prep_style;
        self
    }
}

/// Wraps an estimate for confirmation. No side effects.
pub fn propose(estimate: NutritionEstimate) -> PendingEntry {
    PendingEntry {
        estimate,
        prep_style: PrepStyle::Unknown,
    }
}

/// Commits a pending entry through the regular `add` path.
///
/// # Errors
/// - `Validation` when the estimate has no calories or no name.
pub fn confirm<S: KeyValueStore>(
    store: &mut EntryStore<S>,
    pending: PendingEntry,
) -> StoreResult<NutritionEntry> {
    let request = pending.estimate.to_new_entry(pending.prep_style);
    let entry = store.add(request)?;
    info!(
        "event=photo_confirm module=photo status=ok entry_id={}",
        entry.id
    );
    Ok(entry)
}

/// Discards a pending entry.
pub fn cancel(pending: PendingEntry) {
    info!(
        "event=photo_cancel module=photo status=ok has_confidence={}",
        pending.estimate.confidence.is_some()
    );
}

/// Photo analysis front door with an in-flight guard.
pub struct PhotoLogService<A: NutritionAnalyzer> {
    analyzer: A,
    in_flight: AtomicBool,
}

impl<A: NutritionAnalyzer> PhotoLogService<A> {
    pub fn new(analyzer: A) -> Self {
        Self {
            analyzer,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Whether an analysis is currently running.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Sends one image to the analyzer and proposes the parsed estimate.
    ///
    /// # Errors
    /// - `Busy` when another call on this service has not finished.
    /// - `EmptyImage` for a zero-byte upload.
    /// - Analyzer and payload errors unchanged.
    pub fn analyze_photo(&self, image: &ImageUpload) -> Result<PendingEntry, AnalysisError> {
        if image.bytes.is_empty() {
            return Err(AnalysisError::EmptyImage);
        }
        let _guard = InFlightGuard::acquire(&self.in_flight)?;

        let started_at = Instant::now();
        info!(
            "event=photo_analyze module=photo status=start bytes={}",
            image.bytes.len()
        );
        let result = self
            .analyzer
            .analyze(image)
            .and_then(|payload| NutritionEstimate::from_json(&payload));

        match result {
            Ok(estimate) => {
                info!(
                    "event=photo_analyze module=photo status=ok duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(propose(estimate))
            }
            Err(err) => {
                error!(
                    "event=photo_analyze module=photo status=error duration_ms={} error={err}",
                    started_at.elapsed().as_millis()
                );
                Err(err)
            }
        }
    }
}

struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, AnalysisError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| AnalysisError::Busy)?;
        Ok(Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
