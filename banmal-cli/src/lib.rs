//! Banmal CLI library
//!
//! Batch driver around `banmal-core`: reads tagged documents as JSON Lines,
//! runs the analysis pipeline and writes clause records.
//!
//! # Usage
//!
//! ```bash
//! # One clause per output line
//! banmal process -i 'data/*.jsonl'
//!
//! # Only banmal documents, JSON Lines, 8 worker threads
//! banmal process -i posts.jsonl -f jsonl --banmal-only --threads 8 -o out.jsonl
//!
//! # Answer ambiguous endings on the terminal
//! banmal process -i posts.jsonl --interactive
//!
//! # Re-import hand-split clauses
//! banmal process -i corrected.jsonl --presplit -f json
//!
//! # Prepare raw text for the tagger
//! banmal clean -i raw.txt -o sentences.txt
//!
//! # Configuration
//! banmal generate-config -o banmal.toml
//! banmal validate -c banmal.toml
//! ```
//!
//! Each input line is one tagged document:
//!
//! ```json
//! {"id": "1", "full_text": "밥 먹었음?", "sentences": [{"sentence": "밥 먹었음?", "tokens": [["밥", "NNG", 0.99, 0], ["먹", "VV", 0.98, 0], ["음", "ETN", 0.6, 0], ["?", "SF", 0.99, 0]]}]}
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod input;
pub mod interactive;
pub mod output;
pub mod progress;

pub use error::{CliError, CliResult};
