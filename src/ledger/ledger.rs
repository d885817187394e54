use std::cmp::Ordering;
use std::sync::{Mutex, MutexGuard};

use tracing::debug;

use crate::error::LedgerError;
use crate::ledger::record::{ComparisonRecord, RankedRecord};

/// Append-only, in-memory list of comparison records.
///
/// One instance lives for the whole process and is shared between request
/// threads; every access goes through the internal mutex. Nothing is
/// persisted.
#[derive(Debug, Default)]
pub struct ResultLedger {
    entries: Mutex<Vec<ComparisonRecord>>,
}

impl ResultLedger {
    pub fn new() -> Self {
        ResultLedger { entries: Mutex::new(Vec::new()) }
    }

    // Entries are only ever pushed whole, so a panic elsewhere cannot leave
    // the vector half-written; a poisoned lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, Vec<ComparisonRecord>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Appends one record.
    pub fn record(&self, entry: ComparisonRecord) {
        let mut entries = self.lock();
        entries.push(entry);
        debug!(total = entries.len(), "recorded comparison");
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copy of all records in insertion order.
    pub fn snapshot(&self) -> Vec<ComparisonRecord> {
        self.lock().clone()
    }

    /// All records sorted by descending SSIM, each with its 1-based rank.
    ///
    /// The sort is stable, so equal scores keep insertion order; NaN scores
    /// rank last. An empty ledger is `LedgerError::Empty`.
    pub fn export_ranked(&self) -> Result<Vec<RankedRecord>, LedgerError> {
        let mut entries = self.snapshot();
        if entries.is_empty() {
            return Err(LedgerError::Empty);
        }
        entries.sort_by(|a, b| descending_score(a.ssim_score, b.ssim_score));
        Ok(entries
            .into_iter()
            .enumerate()
            .map(|(i, record)| RankedRecord { record, rank: i + 1 })
            .collect())
    }
}

fn descending_score(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (true, true) => Ordering::Equal,
    }
}
