//! `banmal` command-line entry point

use banmal_cli::commands::Commands;
use clap::Parser;

/// Clause segmentation and banmal classification for tagged Korean text
#[derive(Debug, Parser)]
#[command(name = "banmal", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    cli.command.execute()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_process_command() {
        let cli = Cli::try_parse_from(["banmal", "process", "-i", "posts.jsonl", "-f", "jsonl"])
            .unwrap();
        assert!(matches!(cli.command, Commands::Process(_)));
    }
}
