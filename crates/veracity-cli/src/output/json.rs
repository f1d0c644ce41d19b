//! JSON output adapter.

use std::io::{self, Write};
use std::sync::Mutex;

use anyhow::Result;
use veracity_core::{AnalysisResult, MediaItem, ResultOutput};

/// How results are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonLayout {
    /// One JSON object per line, written as results arrive.
    Lines,
    /// A single array written on flush.
    Array {
        /// Indent the array.
        pretty: bool,
    },
}

/// JSON / JSON Lines output adapter.
pub struct JsonOutput {
    writer: Mutex<Box<dyn Write + Send>>,
    layout: JsonLayout,
    pending: Mutex<Vec<AnalysisResult>>,
}

impl JsonOutput {
    /// Creates a new JSON output writing to stdout.
    #[must_use]
    pub fn stdout(layout: JsonLayout) -> Self {
        Self::new(Box::new(io::stdout()), layout)
    }

    /// Creates a new JSON output writing to the given writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>, layout: JsonLayout) -> Self {
        Self {
            writer: Mutex::new(writer),
            layout,
            pending: Mutex::new(Vec::new()),
        }
    }

    fn write_line(&self, line: &str) -> Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;
        writeln!(writer, "{line}")?;
        Ok(())
    }
}

impl ResultOutput for JsonOutput {
    fn write(&self, _media: &MediaItem, result: &AnalysisResult) -> Result<()> {
        match self.layout {
            JsonLayout::Lines => self.write_line(&serde_json::to_string(result)?),
            JsonLayout::Array { .. } => {
                self.pending
                    .lock()
                    .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?
                    .push(result.clone());
                Ok(())
            }
        }
    }

    fn flush(&self) -> Result<()> {
        if let JsonLayout::Array { pretty } = self.layout {
            let results = std::mem::take(
                &mut *self
                    .pending
                    .lock()
                    .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?,
            );
            let json = if pretty {
                serde_json::to_string_pretty(&results)?
            } else {
                serde_json::to_string(&results)?
            };
            self.write_line(&json)?;
        }

        self.writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?
            .flush()?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::output::testing::{analyzed, SharedBuffer};

    #[test]
    fn test_lines_written_immediately() {
        let buffer = SharedBuffer::default();
        let output = JsonOutput::new(Box::new(buffer.clone()), JsonLayout::Lines);
        let (media, result) = analyzed("a.jpg", 0.9);

        output.write(&media, &result).unwrap();
        let text = buffer.contents();
        assert_eq!(text.lines().count(), 1);

        let parsed: serde_json::Value = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(parsed["trustScore"], 90);
        assert_eq!(parsed["mediaId"], media.id.to_string());
    }

    #[test]
    fn test_array_written_on_flush() {
        let buffer = SharedBuffer::default();
        let output = JsonOutput::new(
            Box::new(buffer.clone()),
            JsonLayout::Array { pretty: false },
        );
        let (first_media, first) = analyzed("a.jpg", 0.9);
        let (second_media, second) = analyzed("b.jpg", 0.2);

        output.write(&first_media, &first).unwrap();
        output.write(&second_media, &second).unwrap();
        assert!(buffer.contents().is_empty());

        output.flush().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(buffer.contents().trim()).unwrap();
        let array = parsed.as_array().unwrap();
        assert_eq!(array.len(), 2);
        assert_eq!(array[1]["isAuthentic"], false);
    }

    #[test]
    fn test_empty_array() {
        let buffer = SharedBuffer::default();
        let output = JsonOutput::new(Box::new(buffer.clone()), JsonLayout::Array { pretty: true });
        output.flush().unwrap();
        assert_eq!(buffer.contents().trim(), "[]");
    }
}
