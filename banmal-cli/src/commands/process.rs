//! Process command implementation

use crate::config::CliConfig;
use crate::error::CliError;
use crate::input::{read_documents, resolve_patterns, DocumentBatch};
use crate::interactive::ConsoleDecisionSource;
use crate::output::{JsonFormatter, JsonLinesFormatter, OutputFormatter, TextFormatter};
use crate::progress::ProgressReporter;
use anyhow::{Context, Result};
use banmal_core::{
    Analyzer, BatchSummary, DocumentAnalysis, Escalation, ExecutionMode, NeologismReport,
    Session, SessionStats,
};
use clap::Args;
use rayon::prelude::*;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

/// Arguments for the process command
#[derive(Debug, Args)]
pub struct ProcessArgs {
    /// Input JSON Lines files or patterns (supports glob)
    #[arg(short, long, value_name = "FILE/PATTERN", required = true)]
    pub input: Vec<String>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Configuration file
    #[arg(long, value_name = "FILE", env = "BANMAL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Ask on the terminal about ambiguous endings
    #[arg(long, conflicts_with = "presplit")]
    pub interactive: bool,

    /// Treat every input sentence as one hand-split clause
    #[arg(long)]
    pub presplit: bool,

    /// Only write documents classified as banmal
    #[arg(long)]
    pub banmal_only: bool,

    /// Analyze documents on a thread pool
    #[arg(short, long)]
    pub parallel: bool,

    /// Number of worker threads (implies --parallel)
    #[arg(short, long, value_name = "N")]
    pub threads: Option<usize>,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One tab-separated line per clause
    Text,
    /// JSON array of document analyses
    Json,
    /// One JSON document analysis per line
    Jsonl,
}

impl ProcessArgs {
    /// Execute the process command
    pub fn execute(&self) -> Result<()> {
        self.init_logging()?;

        log::info!("Starting document processing");
        log::debug!("Arguments: {:?}", self);

        let config = match &self.config {
            Some(path) => CliConfig::load(path)?,
            None => CliConfig::default(),
        };

        let files = resolve_patterns(&self.input)?;
        log::info!("Found {} files to process", files.len());

        let batches = files
            .par_iter()
            .map(|path| read_documents(path).map(|batch| (path.clone(), batch)))
            .collect::<Result<Vec<(PathBuf, DocumentBatch)>>>()?;

        let analyzer = Analyzer::new(config.analysis.clone());
        let session = Session::new();
        let console = self.interactive.then(ConsoleDecisionSource::stdio);
        let escalation = console
            .as_ref()
            .map(|source| Escalation::new(&session, source));
        let mode = self.execution_mode(&config);

        let mut formatter = self.create_formatter(config.output.pretty_json)?;
        // Prompts and the bar share stderr
        let mut progress = ProgressReporter::new(self.quiet || self.interactive);
        progress.init_files(batches.len() as u64);

        let mut summary = BatchSummary::default();
        let mut neologisms = NeologismReport::new(&analyzer.config().lexicon);

        for (path, batch) in &batches {
            if batch.skipped_lines > 0 {
                progress.println(&format!(
                    "{}: skipped {} invalid lines",
                    path.display(),
                    batch.skipped_lines
                ));
            }

            let results: Vec<banmal_core::Result<DocumentAnalysis>> = if self.presplit {
                batch
                    .documents
                    .iter()
                    .map(|document| Ok(analyzer.analyze_document_presplit(document)))
                    .collect()
            } else {
                analyzer
                    .analyze_batch(&batch.documents, escalation, mode)
                    .map_err(CliError::from)?
            };

            for (document, result) in batch.documents.iter().zip(results) {
                match result {
                    Ok(analysis) => {
                        summary.record(&analysis);
                        neologisms.record(&analysis);
                        if self.should_write(&analysis) {
                            formatter.write_document(&analysis)?;
                        }
                    }
                    Err(e) => {
                        log::warn!(
                            "Skipping document {}: {e}",
                            document.id.as_deref().unwrap_or("<no id>")
                        );
                        summary.record_failure();
                    }
                }
            }

            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            progress.file_completed(&name, batch.documents.len());
        }

        formatter.finish()?;
        progress.finish();

        if !self.quiet {
            for line in summary_lines(&summary, &session.stats(), &neologisms) {
                eprintln!("{line}");
            }
        }

        log::info!("Processing complete");
        Ok(())
    }

    fn execution_mode(&self, config: &CliConfig) -> ExecutionMode {
        if self.interactive {
            if self.parallel || self.threads.is_some() {
                log::warn!("Interactive mode runs sequentially; ignoring parallel options");
            }
            return ExecutionMode::Sequential;
        }

        if !self.parallel && self.threads.is_none() {
            return ExecutionMode::Sequential;
        }

        let threads = self
            .threads
            .or(config.worker_threads())
            .filter(|&n| n > 0)
            .unwrap_or_else(num_cpus::get);
        log::info!("Using {threads} worker threads");
        ExecutionMode::Parallel {
            threads: Some(threads),
        }
    }

    fn should_write(&self, analysis: &DocumentAnalysis) -> bool {
        !self.banmal_only || analysis.is_banmal
    }

    /// Create output formatter based on format and output destination
    fn create_formatter(&self, pretty_json: bool) -> Result<Box<dyn OutputFormatter>> {
        let writer: Box<dyn Write + Send> = match &self.output {
            Some(path) => {
                let file = File::create(path).with_context(|| {
                    format!("Failed to create output file: {}", path.display())
                })?;
                Box::new(BufWriter::new(file))
            }
            None => Box::new(io::stdout()),
        };

        Ok(match self.format {
            OutputFormat::Text => Box::new(TextFormatter::new(writer)),
            OutputFormat::Json => Box::new(JsonFormatter::new(writer, pretty_json)),
            OutputFormat::Jsonl => Box::new(JsonLinesFormatter::new(writer)),
        })
    }

    /// Initialize logging based on verbosity level
    fn init_logging(&self) -> Result<()> {
        let log_level = match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };

        if !self.quiet {
            if let Err(e) = env_logger::Builder::from_env(
                env_logger::Env::default().default_filter_or(log_level),
            )
            .try_init()
            {
                log::debug!("Logger already initialized: {e}");
            }
        }

        Ok(())
    }
}

/// End-of-run report
fn summary_lines(
    summary: &BatchSummary,
    stats: &SessionStats,
    neologisms: &NeologismReport,
) -> Vec<String> {
    vec![
        format!(
            "Processed {} documents ({} failed), {} clauses",
            summary.documents, summary.failed, summary.clauses
        ),
        format!(
            "Banmal documents: {}, clauses needing review: {}",
            summary.banmal, summary.needs_review
        ),
        format!(
            "Total corrections made: {}, clauses deleted: {}, prompts: {}",
            stats.corrections, summary.deleted_clauses, stats.prompts
        ),
        format!("Neologism endings: {neologisms}"),
    ]
}
