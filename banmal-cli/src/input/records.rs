//! JSON Lines document reader
//!
//! One [`Document`] per non-blank line. Lines that fail to parse are logged
//! and skipped so that a single bad record never aborts a run.

use super::FileReader;
use crate::error::CliError;
use anyhow::Result;
use banmal_core::Document;
use std::path::Path;

/// Documents parsed from one input file
#[derive(Debug, Default)]
pub struct DocumentBatch {
    pub documents: Vec<Document>,
    /// Lines that were not valid documents
    pub skipped_lines: usize,
}

/// Parse JSON Lines text
pub fn parse_documents(content: &str, source: &str) -> DocumentBatch {
    let mut batch = DocumentBatch::default();

    for (index, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Document>(line) {
            Ok(document) => batch.documents.push(document),
            Err(e) => {
                let error = CliError::InvalidRecord {
                    path: source.to_string(),
                    line: index + 1,
                    message: e.to_string(),
                };
                log::warn!("{error}");
                batch.skipped_lines += 1;
            }
        }
    }

    batch
}

/// Read every document in a JSON Lines file
pub fn read_documents(path: &Path) -> Result<DocumentBatch> {
    let content = FileReader::read_text(path)?;
    let batch = parse_documents(&content, &path.display().to_string());
    log::debug!(
        "{}: {} documents, {} skipped lines",
        path.display(),
        batch.documents.len(),
        batch.skipped_lines
    );
    Ok(batch)
}
