//! Single-slot hand-off between the pipeline worker and the presenter

use crate::markers::FrameSummary;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

/// Holds at most one unread summary. Publishing over an unread summary
/// replaces it; summaries are snapshots, so the newest one wins.
#[derive(Debug, Default)]
pub struct SummarySlot {
    latest: Mutex<Option<FrameSummary>>,
    replaced: AtomicU64,
}

impl SummarySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `summary`, returning `true` if an unread one was overwritten.
    pub fn publish(&self, summary: FrameSummary) -> bool {
        let previous = self
            .latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(summary);
        let overwrote = previous.is_some();
        if overwrote {
            self.replaced.fetch_add(1, Ordering::Relaxed);
        }
        overwrote
    }

    /// Non-blocking receive. `None` means nothing new since the last take.
    pub fn try_take(&self) -> Option<FrameSummary> {
        self.latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    /// Discard any unread summary.
    pub fn clear(&self) {
        self.try_take();
    }

    /// Number of summaries that were overwritten before being read.
    pub fn replaced_count(&self) -> u64 {
        self.replaced.load(Ordering::Relaxed)
    }
}
