use crate::output::traits::{BrokenLinkRecord, OutputResult, ReportSink};
use crate::output::CrawlSummary;
use std::sync::{Mutex, PoisonError};

/// Keeps records in memory, in emission order
///
/// Useful when the crawl engine is embedded and the caller wants the records
/// as values rather than a file.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<BrokenLinkRecord>>,
    summary: Mutex<Option<CrawlSummary>>,
}

impl MemorySink {
    /// Creates an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of every record received so far
    pub fn records(&self) -> Vec<BrokenLinkRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of records received so far
    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if no record has been received
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The summary passed to `finalize`, if the crawl has ended
    pub fn summary(&self) -> Option<CrawlSummary> {
        self.summary
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ReportSink for MemorySink {
    fn record_broken(&self, record: &BrokenLinkRecord) -> OutputResult<()> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());
        Ok(())
    }

    fn finalize(&self, summary: &CrawlSummary) -> OutputResult<()> {
        *self.summary.lock().unwrap_or_else(PoisonError::into_inner) = Some(summary.clone());
        Ok(())
    }
}
