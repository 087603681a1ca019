//! Memoized reports
//!
//! A report is recomputed only when one of its inputs changes: the order
//! feed revision, the view (and its range), or the business day.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::NaiveDate;
use parking_lot::Mutex;
use shared::models::{DashboardMetrics, TimeRange};

/// Which report is cached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportView {
    Overview,
    Analytics(TimeRange),
}

/// Inputs a cached report was computed from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Stamp {
    revision: u64,
    day: NaiveDate,
}

/// One cached report per view
#[derive(Debug, Default)]
pub struct ReportCache {
    entries: Mutex<HashMap<ReportView, (Stamp, Arc<DashboardMetrics>)>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ReportCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached report for `view`, or compute and remember it
    ///
    /// `compute` runs while the cache lock is held and must not call back
    /// into the cache.
    pub fn get_or_compute(
        &self,
        view: ReportView,
        revision: u64,
        day: NaiveDate,
        compute: impl FnOnce() -> DashboardMetrics,
    ) -> Arc<DashboardMetrics> {
        let stamp = Stamp { revision, day };
        let mut entries = self.entries.lock();

        if let Some((cached, report)) = entries.get(&view)
            && *cached == stamp
        {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Arc::clone(report);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(?view, revision, %day, "Recomputing report");
        let report = Arc::new(compute());
        entries.insert(view, (stamp, Arc::clone(&report)));
        report
    }

    /// Drop every cached report
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// (hits, misses) since creation
    pub fn stats(&self) -> (u64, u64) {
        (
            self.hits.load(Ordering::Relaxed),
            self.misses.load(Ordering::Relaxed),
        )
    }
}
