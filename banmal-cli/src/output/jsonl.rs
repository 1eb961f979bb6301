//! JSON Lines output formatter

use super::OutputFormatter;
use anyhow::Result;
use banmal_core::DocumentAnalysis;
use std::io::Write;

/// One JSON object per document per line
pub struct JsonLinesFormatter<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesFormatter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write + Send> OutputFormatter for JsonLinesFormatter<W> {
    fn write_document(&mut self, analysis: &DocumentAnalysis) -> Result<()> {
        serde_json::to_writer(&mut self.writer, analysis)?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
