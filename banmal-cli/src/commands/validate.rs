//! Validate command implementation

use crate::config::CliConfig;
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the validate command
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short = 'c', long, value_name = "FILE", required = true)]
    pub config: PathBuf,
}

impl ValidateArgs {
    /// Execute the validate command
    pub fn execute(&self) -> Result<()> {
        println!("Validating configuration: {}", self.config.display());

        match CliConfig::load(&self.config) {
            Ok(config) => {
                let analysis = &config.analysis;
                println!("✓ Configuration is valid!");
                println!(
                    "  Review floor: {}",
                    analysis.thresholds.review_min_confidence
                );
                println!("  Context window: {}", analysis.thresholds.neighbor_window);
                println!(
                    "  Politeness markers: {}",
                    analysis.lexicon.polite_markers.len()
                );
                println!("  Ending aliases: {}", analysis.lexicon.ending_aliases.len());
                Ok(())
            }
            Err(e) => {
                println!("✗ Configuration is invalid!");
                println!("  Error: {e:#}");
                Err(anyhow::anyhow!("Validation failed: {:#}", e))
            }
        }
    }
}
