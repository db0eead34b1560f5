//! Report sink trait and record types
//!
//! This module defines the trait interface for report sinks and the
//! broken-link record they receive.

use crate::output::CrawlSummary;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Prefix for reasons attached to pages that could not be loaded
pub const PAGE_LOAD_ERROR: &str = "PAGE LOAD ERROR";

/// One broken link, as reported
///
/// Records are emitted the moment a link is found broken and are never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokenLinkRecord {
    /// The page on which the link was found
    pub source_page: String,

    /// The resolved link target
    pub broken_link: String,

    /// HTTP status code or error description
    pub reason: String,
}

impl BrokenLinkRecord {
    /// A broken link found on `source_page`
    pub fn link(
        source_page: impl Into<String>,
        broken_link: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            source_page: source_page.into(),
            broken_link: broken_link.into(),
            reason: reason.into(),
        }
    }

    /// A page that failed to load, attributed to itself as source and target
    pub fn page_load_error(page: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        let page = page.into();
        Self {
            source_page: page.clone(),
            broken_link: page,
            reason: format!("{}: {}", PAGE_LOAD_ERROR, cause),
        }
    }

    /// Returns true if this record is for a page that failed to load
    pub fn is_page_load_error(&self) -> bool {
        self.reason.starts_with(PAGE_LOAD_ERROR)
    }
}

/// Trait for report sinks
///
/// A sink receives broken-link records in emission order while the crawl is
/// running, and the final summary once it ends. Implementations must be
/// thread-safe: records may arrive from concurrent writers and must be
/// neither lost nor duplicated.
pub trait ReportSink: Send + Sync {
    /// Records a broken link
    ///
    /// # Arguments
    ///
    /// * `record` - The broken link and its reason
    fn record_broken(&self, record: &BrokenLinkRecord) -> OutputResult<()>;

    /// Finalizes the output, performing any cleanup or final writes
    ///
    /// # Arguments
    ///
    /// * `summary` - The final counters of the crawl
    fn finalize(&self, summary: &CrawlSummary) -> OutputResult<()> {
        let _ = summary;
        Ok(())
    }
}
