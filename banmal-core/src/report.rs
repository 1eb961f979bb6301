//! Corpus-level tallies

use crate::analysis::DocumentAnalysis;
use crate::config::Lexicon;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// How often each tracked neologism ending occurs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeologismReport {
    pub counts: BTreeMap<String, usize>,
}

impl NeologismReport {
    /// Start a report with every neologism of `lexicon` at zero
    pub fn new(lexicon: &Lexicon) -> Self {
        Self {
            counts: lexicon
                .neologisms
                .iter()
                .map(|surface| (surface.clone(), 0))
                .collect(),
        }
    }

    pub fn record(&mut self, analysis: &DocumentAnalysis) {
        let endings = analysis.clauses.iter().flat_map(|c| c.endings.iter());
        for ending in endings {
            if let Some(count) = self.counts.get_mut(&ending.surface) {
                *count += 1;
            }
        }
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

impl fmt::Display for NeologismReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .counts
            .iter()
            .map(|(surface, count)| format!("'{surface}': {count}"))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

/// Outcome counts for a batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub documents: usize,
    pub failed: usize,
    pub banmal: usize,
    pub clauses: usize,
    pub needs_review: usize,
    pub deleted_clauses: usize,
    pub malformed_tokens: usize,
}

impl BatchSummary {
    pub fn record(&mut self, analysis: &DocumentAnalysis) {
        self.documents += 1;
        self.banmal += usize::from(analysis.is_banmal);
        self.clauses += analysis.clauses.len();
        self.needs_review += analysis
            .clauses
            .iter()
            .filter(|c| c.needs_manual_review)
            .count();
        self.deleted_clauses += analysis.deleted_clauses;
        self.malformed_tokens += analysis.malformed_tokens;
    }

    pub fn record_failure(&mut self) {
        self.failed += 1;
    }
}
