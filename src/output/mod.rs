//! Output module for broken-link reports
//!
//! This module handles:
//! - The `ReportSink` interface the crawl engine emits records to
//! - A CSV sink that appends rows as they are found
//! - An in-memory sink for embedding and tests
//! - The live status line and the final report

mod csv_sink;
mod memory;
mod progress;
mod summary;
mod traits;

pub use csv_sink::{CsvSink, CSV_HEADER};
pub use memory::MemorySink;
pub use progress::{status_line, Progress};
pub use summary::{format_summary, print_summary, CrawlSummary};
pub use traits::{BrokenLinkRecord, OutputError, OutputResult, ReportSink, PAGE_LOAD_ERROR};
