//! State module for tracking crawl progress
//!
//! This module holds the per-run state owned by the crawl engine.
//!
//! # Components
//!
//! - `CrawlTask`: A page waiting to be fetched, with its depth and origin
//! - `VisitedRegistry`: Deduplicates pages by normalized URL
//! - `CrawlCounters`: Pages crawled and link check outcome totals
//! - `PageState`: How a task was disposed of

mod counters;
mod page_state;
mod task;
mod visited;

// Re-export main types
pub use counters::{CounterSnapshot, CrawlCounters};
pub use page_state::PageState;
pub use task::CrawlTask;
pub use visited::VisitedRegistry;
