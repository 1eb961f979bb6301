//! Generate config command implementation

use crate::config::CliConfig;
use anyhow::{Context, Result};
use clap::Args;
use std::fs;
use std::path::PathBuf;

const HEADER: &str = "\
# banmal configuration
#
# [analysis]              clause segmentation and classification
# [analysis.thresholds]   confidence cut-offs (probabilities within [0, 1])
# [analysis.lexicon]      ending surfaces that drive the refinement rules
# [output]                formatting options
# [performance]           worker_threads = 0 uses one thread per CPU

";

/// Arguments for the generate-config command
#[derive(Debug, Args)]
pub struct GenerateConfigArgs {
    /// Output file path
    #[arg(short, long, value_name = "FILE", required = true)]
    pub output: PathBuf,
}

impl GenerateConfigArgs {
    /// Execute the generate-config command
    pub fn execute(&self) -> Result<()> {
        println!("Generating configuration template...");
        println!("  Output file: {}", self.output.display());

        let template = generate_template()?;
        fs::write(&self.output, template)
            .with_context(|| format!("Failed to write to {}", self.output.display()))?;

        println!("✓ Configuration template generated successfully!");
        println!();
        println!("Next steps:");
        println!("1. Edit thresholds and lexicon entries as needed");
        println!("2. Validate your configuration:");
        println!("   banmal validate -c {}", self.output.display());
        println!("3. Use it for processing:");
        println!(
            "   banmal process -i posts.jsonl --config {}",
            self.output.display()
        );

        Ok(())
    }
}

/// Default configuration with a commented header
fn generate_template() -> Result<String> {
    Ok(format!("{HEADER}{}", CliConfig::default().to_toml_string()?))
}
