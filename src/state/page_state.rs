//! Terminal states of a crawl task
//!
//! Every dequeued `CrawlTask` ends in exactly one of these states.
use std::fmt;

/// Represents how the engine disposed of a single crawl task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageState {
    // ===== Skipped Without Fetching =====
    /// The normalized URL was already fetched earlier in the run
    AlreadyVisited,

    /// The task's depth is beyond the budget for its origin
    DepthExceeded,

    /// The crawl was cancelled before or during the fetch
    Cancelled,

    // ===== Fetched =====
    /// Page was fetched, parsed and its links processed
    Processed,

    /// Page was fetched but is not HTML, so no links were extracted
    NotHtml,

    /// Page fetch failed or returned a non-success status
    LoadFailed,
}

impl PageState {
    /// Returns true if a GET request was issued and completed for the task
    pub fn was_fetched(&self) -> bool {
        matches!(self, Self::Processed | Self::NotHtml | Self::LoadFailed)
    }

    /// Short label used in log output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AlreadyVisited => "already_visited",
            Self::DepthExceeded => "depth_exceeded",
            Self::Cancelled => "cancelled",
            Self::Processed => "processed",
            Self::NotHtml => "not_html",
            Self::LoadFailed => "load_failed",
        }
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
