//! Clause segmentation on sentence-final endings

use crate::config::Config;
use crate::decision::Escalation;
use crate::error::Result;
use crate::position::{locate, PositionedToken};
use crate::refiner::TagRefiner;
use crate::tags::{self, TagCategory};
use crate::token::Token;
use serde::{Deserialize, Serialize};

/// A clause: trimmed text plus the tokens that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClauseSegment {
    pub text: String,
    pub tokens: Vec<Token>,
}

impl ClauseSegment {
    /// Whether an operator asked for this clause to be dropped
    pub fn is_marked_for_deletion(&self) -> bool {
        self.tokens
            .iter()
            .any(|t| t.category() == TagCategory::Deleted)
    }

    pub fn min_confidence(&self) -> Option<f64> {
        self.tokens.iter().map(|t| t.confidence).reduce(f64::min)
    }

    pub fn last_token_confidence(&self) -> Option<f64> {
        self.tokens.last().map(|t| t.confidence)
    }

    pub fn has_oov(&self) -> bool {
        self.tokens.iter().any(|t| t.oov)
    }
}

/// Splits a sentence into clauses after refining its tags
#[derive(Debug, Clone, Copy)]
pub struct SentenceSegmenter<'c> {
    refiner: TagRefiner<'c>,
}

impl<'c> SentenceSegmenter<'c> {
    pub fn new(config: &'c Config) -> Self {
        Self {
            refiner: TagRefiner::new(config),
        }
    }

    /// Refine, locate and split
    ///
    /// Never returns an empty list: an empty sentence or token list yields the
    /// whole sentence as one segment.
    pub fn segment(
        &self,
        sentence: &str,
        tokens: &[Token],
        escalation: Option<Escalation<'_>>,
    ) -> Result<Vec<ClauseSegment>> {
        if sentence.is_empty() || tokens.is_empty() {
            return Ok(vec![ClauseSegment {
                text: sentence.to_string(),
                tokens: tokens.to_vec(),
            }]);
        }

        let refined = self.refiner.refine(sentence, tokens, escalation)?;
        Ok(split(sentence, &refined))
    }
}

/// Split already-refined tokens on `EF` boundaries
///
/// After an `EF`, following particles, pre-final endings and punctuation stay
/// in the same clause. The cut falls at the start of the next remaining token
/// rather than the end of the last absorbed one, so characters the tagger
/// attributed elsewhere (contracted conjugations) stay with their clause.
pub fn split(sentence: &str, tokens: &[Token]) -> Vec<ClauseSegment> {
    let positions = locate(sentence, tokens);
    let mut builder = ClauseBuilder::new(sentence);
    let mut index = 0;

    while index < positions.len() {
        let current = &positions[index];
        builder.push(current);

        if !current.token.category().is_final_ending() {
            index += 1;
            continue;
        }

        let mut next = index + 1;
        while let Some(glued) = positions
            .get(next)
            .filter(|p| p.token.category().absorbed_after_split())
        {
            builder.push(glued);
            next += 1;
        }

        let boundary = match positions.get(next) {
            Some(following) => match builder.end {
                Some(end) if following.start < end => end,
                _ => following.start,
            },
            None => sentence.len(),
        };
        builder.flush(boundary);
        index = next;
    }

    builder.flush(sentence.len());
    builder.segments
}

struct ClauseBuilder<'s> {
    sentence: &'s str,
    tokens: Vec<Token>,
    start: Option<usize>,
    end: Option<usize>,
    segments: Vec<ClauseSegment>,
}

impl<'s> ClauseBuilder<'s> {
    fn new(sentence: &'s str) -> Self {
        Self {
            sentence,
            tokens: Vec::new(),
            start: None,
            end: None,
            segments: Vec::new(),
        }
    }

    fn push(&mut self, positioned: &PositionedToken<'_>) {
        self.tokens.push(positioned.token.clone());
        self.start.get_or_insert(positioned.start);
        // Unlocated tokens ride along with whichever clause claims them
        if !positioned.is_degenerate() {
            self.end = Some(positioned.end);
        }
    }

    fn flush(&mut self, boundary: usize) {
        let Some(start) = self.start.take() else {
            return;
        };
        self.end = None;

        let mut tokens = std::mem::take(&mut self.tokens);
        if let Some(last) = tokens.last_mut() {
            if last.category() == TagCategory::Connective {
                last.tag = tags::FINAL_CONNECTIVE.to_string();
            }
        }

        // Retried matches can put the boundary before the start
        let text = self
            .sentence
            .get(start..boundary)
            .unwrap_or_default()
            .trim()
            .to_string();

        self.segments.push(ClauseSegment { text, tokens });
    }
}
