//! Final crawl report
//!
//! This module holds the end-of-run totals and formats them for display.

use crate::state::CounterSnapshot;
use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// End-of-run totals for one crawl
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlSummary {
    /// The seed URL the crawl started from
    pub seed: String,

    /// Pages for which a GET was attempted
    pub pages_crawled: u64,

    /// Pages that failed to load
    pub page_errors: u64,

    /// Links probed for liveness
    pub links_checked: u64,

    /// Links found working
    pub ok: u64,

    /// Links found broken
    pub broken: u64,

    /// Whether the crawl was cancelled before the queue drained
    pub cancelled: bool,

    /// When the crawl started
    pub started_at: DateTime<Utc>,

    /// When the crawl ended
    pub finished_at: DateTime<Utc>,

    /// Where the broken-link report was written, if anywhere
    pub output_path: Option<PathBuf>,
}

impl CrawlSummary {
    /// Builds a summary from the final counters
    pub fn new(
        seed: impl Into<String>,
        counters: CounterSnapshot,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        cancelled: bool,
    ) -> Self {
        Self {
            seed: seed.into(),
            pages_crawled: counters.pages_crawled,
            page_errors: counters.page_errors,
            links_checked: counters.links_checked,
            ok: counters.ok,
            broken: counters.broken,
            cancelled,
            started_at,
            finished_at,
            output_path: None,
        }
    }

    /// Attaches the report file path
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    /// Wall-clock duration of the crawl in seconds
    pub fn duration_seconds(&self) -> f64 {
        (self.finished_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }

    /// Total records emitted: broken links plus pages that failed to load
    pub fn total_records(&self) -> u64 {
        self.broken + self.page_errors
    }
}

/// Formats the final report
pub fn format_summary(summary: &CrawlSummary) -> String {
    let mut out = String::new();

    if summary.cancelled {
        out.push_str("Crawl cancelled.\n");
    } else {
        out.push_str("Crawl complete.\n");
    }

    out.push_str(&format!("Pages crawled: {}\n", summary.pages_crawled));
    out.push_str(&format!("Links checked: {}\n", summary.links_checked));
    out.push_str(&format!("Working links: {}\n", summary.ok));
    out.push_str(&format!("Broken links: {}\n", summary.broken));
    if summary.page_errors > 0 {
        out.push_str(&format!("Page load errors: {}\n", summary.page_errors));
    }
    out.push_str(&format!("Duration: {:.2}s\n", summary.duration_seconds()));

    if let Some(path) = &summary.output_path {
        out.push_str(&format!(
            "Broken link details saved to: {}\n",
            path.display()
        ));
    }

    out
}

/// Prints the final report to stdout
pub fn print_summary(summary: &CrawlSummary) {
    print!("{}", format_summary(summary));
}
