//! Per-sentence and per-document analysis pipeline
//!
//! [`Analyzer`] wires the stages together:
//!
//! ```text
//! tokens ─▶ TagRefiner ─▶ locate ─▶ split ─▶ per clause: endings, symbols, banmal
//! ```
//!
//! Clauses an operator marked for deletion are dropped here, and documents
//! with no surviving clause get a fallback record flagged for review.

use crate::banmal::BanmalClassifier;
use crate::config::{Config, Thresholds};
use crate::decision::Escalation;
use crate::endings::{extract_endings, governing_ending, normalize_endings, GoverningEnding};
use crate::error::Result;
use crate::segmenter::{ClauseSegment, SentenceSegmenter};
use crate::symbols::extract_symbols;
use crate::token::{ingest, Document, TaggedSentence, Token};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Which confidence rule flags a clause for manual review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewPolicy {
    /// Clauses cut automatically: any weak token or any OOV token
    #[default]
    Segmented,
    /// Clauses split by hand and re-tagged: only a weak ending or a very
    /// weak token
    Reanalysis,
}

impl ReviewPolicy {
    fn needs_review(self, thresholds: &Thresholds, stats: &ClauseStats) -> bool {
        match self {
            ReviewPolicy::Segmented => {
                stats.min_prob < thresholds.review_min_confidence || stats.has_oov
            }
            ReviewPolicy::Reanalysis => {
                stats.last_token_prob < thresholds.reanalysis_last_token_min_confidence
                    || stats.min_prob < thresholds.reanalysis_min_confidence
            }
        }
    }

    /// Value used for `min_prob`/`last_token_prob` when a clause has no tokens
    fn empty_confidence(self) -> f64 {
        match self {
            ReviewPolicy::Segmented => 0.0,
            ReviewPolicy::Reanalysis => 1.0,
        }
    }
}

struct ClauseStats {
    min_prob: f64,
    last_token_prob: f64,
    has_oov: bool,
}

impl ClauseStats {
    fn of(tokens: &[Token], policy: ReviewPolicy) -> Self {
        let empty = policy.empty_confidence();
        Self {
            min_prob: tokens.iter().map(|t| t.confidence).reduce(f64::min).unwrap_or(empty),
            last_token_prob: tokens.last().map_or(empty, |t| t.confidence),
            has_oov: tokens.iter().any(|t| t.oov),
        }
    }
}

/// Output record for one clause
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClauseRecord {
    pub sentence: String,
    pub endings: Vec<Token>,
    pub real_ending: GoverningEnding,
    pub punctuation: Vec<String>,
    pub other_symbols: Vec<String>,
    pub min_prob: f64,
    pub last_token_prob: f64,
    pub has_oov: bool,
    pub needs_manual_review: bool,
    pub is_banmal: bool,
}

impl ClauseRecord {
    /// Record used when a document yields no clause at all
    pub fn fallback(full_text: &str) -> Self {
        Self {
            sentence: full_text.to_string(),
            endings: Vec::new(),
            real_ending: GoverningEnding::new(),
            punctuation: Vec::new(),
            other_symbols: Vec::new(),
            min_prob: 1.0,
            last_token_prob: 1.0,
            has_oov: false,
            needs_manual_review: true,
            is_banmal: false,
        }
    }
}

/// Token confidence summary for a sentence
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceStats {
    pub min: f64,
    pub mean: f64,
    pub last: f64,
}

impl ConfidenceStats {
    /// All zero for an empty token list
    pub fn of(tokens: &[Token]) -> Self {
        let Some(last) = tokens.last() else {
            return Self::default();
        };
        let sum: f64 = tokens.iter().map(|t| t.confidence).sum();
        Self {
            min: tokens.iter().map(|t| t.confidence).fold(f64::INFINITY, f64::min),
            mean: sum / tokens.len() as f64,
            last: last.confidence,
        }
    }
}

/// Analysis of one tagged sentence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentenceAnalysis {
    pub segments: Vec<ClauseRecord>,
    pub confidence: ConfidenceStats,
    pub needs_manual_review: bool,
    pub deleted_clauses: usize,
    pub malformed_tokens: usize,
}

/// Analysis of one post or comment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentAnalysis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub community: Option<String>,
    pub full_text: String,
    pub clauses: Vec<ClauseRecord>,
    pub is_banmal: bool,
    pub needs_manual_review: bool,
    pub deleted_clauses: usize,
    pub malformed_tokens: usize,
}

/// How a batch of documents is scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    #[default]
    Sequential,
    /// Dedicated thread pool; `None` uses one thread per CPU
    Parallel { threads: Option<usize> },
}

/// Runs the full pipeline with one configuration
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: Config,
}

impl Analyzer {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Analyze one sentence straight from tagger records
    pub fn analyze_sentence(
        &self,
        sentence: &TaggedSentence,
        escalation: Option<Escalation<'_>>,
    ) -> Result<SentenceAnalysis> {
        let (tokens, malformed) = ingest(&sentence.tokens);
        let mut analysis = self.analyze_tokens(&sentence.sentence, &tokens, escalation)?;
        analysis.malformed_tokens = malformed;
        Ok(analysis)
    }

    /// Analyze one sentence from already-typed tokens
    pub fn analyze_tokens(
        &self,
        sentence: &str,
        tokens: &[Token],
        escalation: Option<Escalation<'_>>,
    ) -> Result<SentenceAnalysis> {
        let segments =
            SentenceSegmenter::new(&self.config).segment(sentence, tokens, escalation)?;

        let mut deleted_clauses = 0;
        let mut records = Vec::with_capacity(segments.len());
        for segment in segments {
            if segment.is_marked_for_deletion() {
                tracing::debug!(clause = %segment.text, "dropping clause marked for deletion");
                deleted_clauses += 1;
                continue;
            }
            records.push(self.clause_record(segment, ReviewPolicy::Segmented));
        }

        Ok(SentenceAnalysis {
            needs_manual_review: records.iter().any(|r| r.needs_manual_review),
            confidence: ConfidenceStats::of(tokens),
            segments: records,
            deleted_clauses,
            malformed_tokens: 0,
        })
    }

    /// Record for a clause that was split by hand
    ///
    /// Skips refinement and segmentation; the tokens are taken as given.
    pub fn analyze_presplit(&self, sentence: &str, tokens: &[Token]) -> ClauseRecord {
        self.clause_record(
            ClauseSegment {
                text: sentence.to_string(),
                tokens: tokens.to_vec(),
            },
            ReviewPolicy::Reanalysis,
        )
    }

    /// Analyze every sentence of a document
    pub fn analyze_document(
        &self,
        document: &Document,
        escalation: Option<Escalation<'_>>,
    ) -> Result<DocumentAnalysis> {
        let mut clauses = Vec::new();
        let mut seen = HashSet::new();
        let mut deleted_clauses = 0;
        let mut malformed_tokens = 0;

        for sentence in &document.sentences {
            let analysis = self.analyze_sentence(sentence, escalation)?;
            deleted_clauses += analysis.deleted_clauses;
            malformed_tokens += analysis.malformed_tokens;

            for record in analysis.segments {
                if seen.insert(record.sentence.clone()) {
                    clauses.push(record);
                }
            }
        }

        if clauses.is_empty() {
            tracing::debug!(id = ?document.id, "no clause survived, using full text");
            clauses.push(ClauseRecord::fallback(&document.full_text));
        }

        Ok(self.document_analysis(document, clauses, deleted_clauses, malformed_tokens))
    }

    /// Build a document record from clauses split by hand
    ///
    /// Each entry of `sentences` is one clause; tokens are not refined.
    pub fn analyze_document_presplit(&self, document: &Document) -> DocumentAnalysis {
        let mut malformed_tokens = 0;
        let mut clauses: Vec<ClauseRecord> = document
            .sentences
            .iter()
            .filter(|s| !s.sentence.trim().is_empty())
            .map(|s| {
                let (tokens, malformed) = ingest(&s.tokens);
                malformed_tokens += malformed;
                self.analyze_presplit(s.sentence.trim(), &tokens)
            })
            .collect();

        if clauses.is_empty() {
            clauses.push(ClauseRecord::fallback(&document.full_text));
        }

        self.document_analysis(document, clauses, 0, malformed_tokens)
    }

    /// Analyze many documents; one failure never stops the others
    pub fn analyze_batch(
        &self,
        documents: &[Document],
        escalation: Option<Escalation<'_>>,
        mode: ExecutionMode,
    ) -> Result<Vec<Result<DocumentAnalysis>>> {
        match mode {
            ExecutionMode::Sequential => Ok(documents
                .iter()
                .map(|doc| self.analyze_document(doc, escalation))
                .collect()),
            ExecutionMode::Parallel { threads } => {
                self.analyze_parallel(documents, escalation, threads)
            }
        }
    }

    #[cfg(feature = "parallel")]
    fn analyze_parallel(
        &self,
        documents: &[Document],
        escalation: Option<Escalation<'_>>,
        threads: Option<usize>,
    ) -> Result<Vec<Result<DocumentAnalysis>>> {
        use crate::error::Error;
        use rayon::prelude::*;

        let threads = threads.filter(|&n| n > 0).unwrap_or_else(num_cpus::get);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| Error::ParallelError(e.to_string()))?;

        tracing::debug!(threads, documents = documents.len(), "analyzing in parallel");
        Ok(pool.install(|| {
            documents
                .par_iter()
                .map(|doc| self.analyze_document(doc, escalation))
                .collect()
        }))
    }

    #[cfg(not(feature = "parallel"))]
    fn analyze_parallel(
        &self,
        documents: &[Document],
        escalation: Option<Escalation<'_>>,
        _threads: Option<usize>,
    ) -> Result<Vec<Result<DocumentAnalysis>>> {
        self.analyze_batch(documents, escalation, ExecutionMode::Sequential)
    }

    fn clause_record(&self, segment: ClauseSegment, policy: ReviewPolicy) -> ClauseRecord {
        let raw_endings = extract_endings(&segment.tokens);
        let is_banmal = BanmalClassifier::new(&self.config).is_banmal(&raw_endings);
        let endings = if self.config.normalize_endings {
            normalize_endings(&self.config.lexicon, &raw_endings)
        } else {
            raw_endings
        };
        let real_ending = governing_ending(&endings);
        let symbols = extract_symbols(&segment.text, self.config.thresholds.max_symbol_chars);
        let stats = ClauseStats::of(&segment.tokens, policy);

        ClauseRecord {
            needs_manual_review: policy.needs_review(&self.config.thresholds, &stats),
            sentence: segment.text,
            endings,
            real_ending,
            punctuation: symbols.punctuation,
            other_symbols: symbols.symbols,
            min_prob: stats.min_prob,
            last_token_prob: stats.last_token_prob,
            has_oov: stats.has_oov,
            is_banmal,
        }
    }

    fn document_analysis(
        &self,
        document: &Document,
        clauses: Vec<ClauseRecord>,
        deleted_clauses: usize,
        malformed_tokens: usize,
    ) -> DocumentAnalysis {
        DocumentAnalysis {
            id: document.id.clone(),
            community: document.community.clone(),
            full_text: document.full_text.clone(),
            is_banmal: clauses.first().is_some_and(|c| c.is_banmal),
            needs_manual_review: clauses.iter().any(|c| c.needs_manual_review),
            clauses,
            deleted_clauses,
            malformed_tokens,
        }
    }
}
