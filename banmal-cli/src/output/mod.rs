//! Output formatting module

use anyhow::Result;
use banmal_core::DocumentAnalysis;

/// Trait for output formatters
pub trait OutputFormatter: Send {
    /// Format and output one analyzed document
    fn write_document(&mut self, analysis: &DocumentAnalysis) -> Result<()>;

    /// Finalize output (e.g., close JSON array)
    fn finish(&mut self) -> Result<()>;
}

pub mod json;
pub mod jsonl;
pub mod text;

pub use json::JsonFormatter;
pub use jsonl::JsonLinesFormatter;
pub use text::TextFormatter;
