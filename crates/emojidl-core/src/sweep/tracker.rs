//! Consecutive-miss tracking over out-of-order completions.

use std::collections::BTreeMap;

/// Result of fetching one id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdOutcome {
    /// Body fetched and written.
    Saved,
    /// Metadata file already on disk; no request made.
    Skipped,
    /// Server returned 404.
    NotFound,
    /// Transport error, unexpected status, or write failure.
    Failed,
}

/// Counts the current run of consecutive `NotFound` ids in id order.
///
/// Completions arrive out of order, so outcomes are buffered until the id
/// sequence is contiguous. `Saved` and `Skipped` reset the run; `Failed`
/// neither extends nor resets it, since the id's existence is unknown.
/// A threshold of 0 never trips.
#[derive(Debug)]
pub struct MissTracker {
    threshold: u64,
    next: u64,
    pending: BTreeMap<u64, IdOutcome>,
    run: u64,
    tripped: bool,
}

impl MissTracker {
    pub fn new(start_id: u64, threshold: u64) -> Self {
        Self {
            threshold,
            next: start_id,
            pending: BTreeMap::new(),
            run: 0,
            tripped: false,
        }
    }

    pub fn record(&mut self, id: u64, outcome: IdOutcome) {
        if id < self.next {
            return;
        }
        self.pending.insert(id, outcome);
        while let Some(o) = self.pending.remove(&self.next) {
            match o {
                IdOutcome::NotFound => self.run += 1,
                IdOutcome::Saved | IdOutcome::Skipped => self.run = 0,
                IdOutcome::Failed => {}
            }
            if self.threshold > 0 && self.run >= self.threshold {
                self.tripped = true;
            }
            self.next += 1;
        }
    }

    /// True once `threshold` consecutive misses have been seen. Stays true.
    pub fn should_stop(&self) -> bool {
        self.tripped
    }

    /// Length of the current miss run over the contiguous prefix.
    pub fn current_run(&self) -> u64 {
        self.run
    }
}
