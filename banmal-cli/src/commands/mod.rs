//! CLI command implementations

use anyhow::Result;
use banmal_core::tags;
use clap::Subcommand;

pub mod clean;
pub mod generate_config;
pub mod process;
pub mod validate;

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Segment tagged documents and classify each clause
    Process(process::ProcessArgs),

    /// Clean raw post text and split it into sentences for tagging
    Clean(clean::CleanArgs),

    /// Validate a configuration file
    Validate(validate::ValidateArgs),

    /// Write a configuration file with every default spelled out
    GenerateConfig(generate_config::GenerateConfigArgs),

    /// List available components
    List {
        #[command(subcommand)]
        subcommand: ListCommands,
    },
}

/// List subcommands
#[derive(Debug, Subcommand)]
pub enum ListCommands {
    /// List available output formats
    Formats,

    /// List tags that drive segmentation
    Tags,
}

impl Commands {
    pub fn execute(&self) -> Result<()> {
        match self {
            Commands::Process(args) => args.execute(),
            Commands::Clean(args) => args.execute(),
            Commands::Validate(args) => args.execute(),
            Commands::GenerateConfig(args) => args.execute(),
            Commands::List { subcommand } => {
                for line in subcommand.lines() {
                    println!("{line}");
                }
                Ok(())
            }
        }
    }
}

impl ListCommands {
    fn lines(&self) -> Vec<String> {
        match self {
            ListCommands::Formats => vec![
                "Available output formats:".to_string(),
                "  text  - Tab-separated clause, governing ending and register".to_string(),
                "  json  - JSON array of document analyses".to_string(),
                "  jsonl - One document analysis per line".to_string(),
            ],
            ListCommands::Tags => {
                let mut lines = vec!["Tags with segmentation roles:".to_string()];
                lines.extend(
                    tags::known_tags()
                        .iter()
                        .map(|(tag, category)| format!("  {tag:<7} {category}")),
                );
                lines
            }
        }
    }
}
