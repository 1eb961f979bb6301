//! Plain text output formatter

use super::OutputFormatter;
use anyhow::Result;
use banmal_core::DocumentAnalysis;
use std::io::Write;

/// Plain text formatter - one clause per line
///
/// Columns are tab-separated: clause text, governing ending, register, and a
/// `review` marker when the clause needs a manual check.
pub struct TextFormatter<W: Write> {
    writer: W,
}

impl<W: Write> TextFormatter<W> {
    /// Create a new text formatter
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write + Send> OutputFormatter for TextFormatter<W> {
    fn write_document(&mut self, analysis: &DocumentAnalysis) -> Result<()> {
        if let Some(id) = &analysis.id {
            writeln!(self.writer, "# {id}")?;
        }

        for clause in &analysis.clauses {
            let ending: Vec<&str> = clause
                .real_ending
                .iter()
                .map(|t| t.surface.as_str())
                .collect();
            let register = if clause.is_banmal { "banmal" } else { "polite" };

            write!(
                self.writer,
                "{}\t{}\t{}",
                clause.sentence,
                ending.join("+"),
                register
            )?;
            if clause.needs_manual_review {
                write!(self.writer, "\treview")?;
            }
            writeln!(self.writer)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
