use crate::crawler::LinkOutcome;
use std::sync::atomic::{AtomicU64, Ordering};

/// Aggregate crawl counters
///
/// All counters are monotonic and updated atomically. A link check bumps
/// `links_checked` and exactly one of `ok`/`broken` in the same call, so
/// `links_checked == ok + broken` once no check is in flight.
#[derive(Debug, Default)]
pub struct CrawlCounters {
    pages_crawled: AtomicU64,
    page_errors: AtomicU64,
    links_checked: AtomicU64,
    ok: AtomicU64,
    broken: AtomicU64,
}

/// A point-in-time copy of the counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterSnapshot {
    /// Pages for which a GET was attempted
    pub pages_crawled: u64,
    /// Pages whose GET failed or returned an error status
    pub page_errors: u64,
    /// Links probed for liveness
    pub links_checked: u64,
    /// Probes that found the link working
    pub ok: u64,
    /// Probes that found the link broken
    pub broken: u64,
}

impl CrawlCounters {
    /// Creates zeroed counters
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a page fetch attempt
    pub fn record_page(&self, failed: bool) {
        self.pages_crawled.fetch_add(1, Ordering::Relaxed);
        if failed {
            self.page_errors.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Records the outcome of one link check
    pub fn record_outcome(&self, outcome: &LinkOutcome) {
        self.links_checked.fetch_add(1, Ordering::Relaxed);
        if outcome.is_ok() {
            self.ok.fetch_add(1, Ordering::Relaxed);
        } else {
            self.broken.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Takes a snapshot of all counters
    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            pages_crawled: self.pages_crawled.load(Ordering::Relaxed),
            page_errors: self.page_errors.load(Ordering::Relaxed),
            links_checked: self.links_checked.load(Ordering::Relaxed),
            ok: self.ok.load(Ordering::Relaxed),
            broken: self.broken.load(Ordering::Relaxed),
        }
    }
}
