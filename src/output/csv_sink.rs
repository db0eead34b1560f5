//! CSV report sink
//!
//! The report file is truncated and its header written when the sink is
//! created; each record is appended and flushed immediately so partial
//! results survive a crash.

use crate::output::traits::{BrokenLinkRecord, OutputResult, ReportSink};
use crate::output::CrawlSummary;
use csv::{Terminator, Writer, WriterBuilder};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Header row of the report
pub const CSV_HEADER: [&str; 3] = ["Source Page", "Broken Link", "Error/Status"];

/// Writes broken-link records to a CSV file
pub struct CsvSink {
    path: PathBuf,
    writer: Mutex<Writer<File>>,
}

impl CsvSink {
    /// Creates (or truncates) the report file and writes the header row
    ///
    /// # Arguments
    ///
    /// * `path` - Where the report is written
    ///
    /// # Returns
    ///
    /// * `Ok(CsvSink)` - The file exists and holds the header row
    /// * `Err(OutputError)` - The file could not be created or written
    pub fn create(path: impl AsRef<Path>) -> OutputResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path)?;
        let mut writer = WriterBuilder::new()
            .terminator(Terminator::Any(b'\n'))
            .from_writer(file);

        writer.write_record(CSV_HEADER)?;
        writer.flush()?;

        tracing::debug!("Opened report file {}", path.display());

        Ok(Self {
            path,
            writer: Mutex::new(writer),
        })
    }

    /// The report file path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReportSink for CsvSink {
    fn record_broken(&self, record: &BrokenLinkRecord) -> OutputResult<()> {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writer.write_record([
            record.source_page.as_str(),
            record.broken_link.as_str(),
            record.reason.as_str(),
        ])?;
        writer.flush()?;
        Ok(())
    }

    fn finalize(&self, _summary: &CrawlSummary) -> OutputResult<()> {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writer.flush()?;
        Ok(())
    }
}
