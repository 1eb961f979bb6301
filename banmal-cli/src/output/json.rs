//! JSON output formatter

use super::OutputFormatter;
use anyhow::Result;
use banmal_core::DocumentAnalysis;
use std::io::Write;

/// JSON formatter - outputs every document as one JSON array
pub struct JsonFormatter<W: Write> {
    writer: W,
    documents: Vec<DocumentAnalysis>,
    pretty: bool,
}

impl<W: Write> JsonFormatter<W> {
    /// Create a new JSON formatter
    pub fn new(writer: W, pretty: bool) -> Self {
        Self {
            writer,
            documents: Vec::new(),
            pretty,
        }
    }
}

impl<W: Write + Send> OutputFormatter for JsonFormatter<W> {
    fn write_document(&mut self, analysis: &DocumentAnalysis) -> Result<()> {
        self.documents.push(analysis.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, &self.documents)?;
        } else {
            serde_json::to_writer(&mut self.writer, &self.documents)?;
        }
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}
