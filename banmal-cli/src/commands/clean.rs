//! Clean command implementation

use crate::input::{resolve_patterns, FileReader};
use anyhow::{Context, Result};
use banmal_core::{clean_text, split_sentences};
use clap::Args;
use std::fs;
use std::path::PathBuf;

/// Arguments for the clean command
#[derive(Debug, Args)]
pub struct CleanArgs {
    /// Raw text files or patterns, one post per line
    #[arg(short, long, value_name = "FILE/PATTERN", required = true)]
    pub input: Vec<String>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Keep each cleaned post on one line
    #[arg(long)]
    pub no_split: bool,
}

impl CleanArgs {
    /// Execute the clean command
    pub fn execute(&self) -> Result<()> {
        let files = resolve_patterns(&self.input)?;

        let mut lines = Vec::new();
        for path in &files {
            let content = FileReader::read_text(path)?;
            lines.extend(self.prepare(&content));
        }

        let mut text = lines.join("\n");
        if !text.is_empty() {
            text.push('\n');
        }

        match &self.output {
            Some(path) => fs::write(path, text)
                .with_context(|| format!("Failed to write to {}", path.display()))?,
            None => print!("{text}"),
        }
        Ok(())
    }

    /// Clean every post and split it unless `--no-split`
    fn prepare(&self, content: &str) -> Vec<String> {
        content
            .lines()
            .map(clean_text)
            .filter(|cleaned| !cleaned.is_empty())
            .flat_map(|cleaned| {
                if self.no_split {
                    vec![cleaned]
                } else {
                    split_sentences(&cleaned)
                }
            })
            .collect()
    }
}
