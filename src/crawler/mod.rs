//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP page fetching
//! - HEAD-based link liveness checks
//! - HTML parsing and link extraction
//! - Frontier management, depth policy and pacing
//! - Overall crawl coordination

mod checker;
mod coordinator;
mod fetcher;
mod parser;
mod scheduler;

pub use checker::{BrokenReason, LinkChecker, LinkOutcome};
pub use coordinator::{run_crawl, Coordinator};
pub use fetcher::{build_http_client, fetch_page, is_html_content_type, FetchResult};
pub use parser::{extract_links, parse_html, ParsedPage};
pub use scheduler::Scheduler;
