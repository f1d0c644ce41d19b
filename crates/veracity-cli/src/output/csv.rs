//! CSV output adapter.

use std::io::{self, Write};
use std::sync::Mutex;

use anyhow::Result;
use veracity_core::{AnalysisResult, MediaItem, ResultOutput};

/// Header row of the CSV export.
pub const HEADER: &str = "File Name,Trust Score,Authentic,Confidence,Warnings";

/// Separator between warnings inside the quoted warnings cell.
const WARNING_SEPARATOR: &str = "; ";

/// CSV output adapter, one row per analyzed item.
pub struct CsvOutput {
    state: Mutex<CsvState>,
}

struct CsvState {
    writer: Box<dyn Write + Send>,
    header_written: bool,
}

impl CsvOutput {
    /// Creates a new CSV output writing to stdout.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    /// Creates a new CSV output writing to the given writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            state: Mutex::new(CsvState {
                writer,
                header_written: false,
            }),
        }
    }
}

impl CsvState {
    fn ensure_header(&mut self) -> io::Result<()> {
        if !self.header_written {
            writeln!(self.writer, "{HEADER}")?;
            self.header_written = true;
        }
        Ok(())
    }
}

/// Formats one data row.
fn row(name: &str, result: &AnalysisResult) -> String {
    format!(
        "{},{},{},{},{}",
        quote(name),
        result.trust_score(),
        result.is_authentic(),
        result.confidence(),
        quote(&result.warnings().join(WARNING_SEPARATOR)),
    )
}

/// Wraps a cell in double quotes, doubling embedded quotes.
fn quote(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}

impl ResultOutput for CsvOutput {
    #[allow(clippy::significant_drop_tightening)]
    fn write(&self, media: &MediaItem, result: &AnalysisResult) -> Result<()> {
        let mut state = self
            .state
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;
        state.ensure_header()?;
        writeln!(state.writer, "{}", row(&media.name, result))?;
        Ok(())
    }

    #[allow(clippy::significant_drop_tightening)]
    fn flush(&self) -> Result<()> {
        let mut state = self
            .state
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;
        state.ensure_header()?;
        state.writer.flush()?;
        Ok(())
    }
}
