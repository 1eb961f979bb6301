//! Tag correction rules applied before segmentation
//!
//! The tagger systematically misreads a few colloquial constructions. Three
//! automatic rules repair the common cases; anything still ambiguous can be
//! escalated to a [`DecisionSource`](crate::decision::DecisionSource).

use crate::config::Config;
use crate::decision::{DecisionRequest, Escalation, Resolution};
use crate::error::Result;
use crate::tags::{self, TagCategory};
use crate::token::Token;

/// Applies correction rules to a sentence's tokens
///
/// Every rule looks at the tokens as the tagger produced them. Output has the
/// same length as the input; a clause deletion is signalled by the
/// [`DELETE_SENTINEL`](crate::tags::DELETE_SENTINEL) tag, not by removal.
#[derive(Debug, Clone, Copy)]
pub struct TagRefiner<'c> {
    config: &'c Config,
}

impl<'c> TagRefiner<'c> {
    pub fn new(config: &'c Config) -> Self {
        Self { config }
    }

    /// Refine `tokens` from `sentence`, escalating ambiguous tokens if asked
    pub fn refine(
        &self,
        sentence: &str,
        tokens: &[Token],
        escalation: Option<Escalation<'_>>,
    ) -> Result<Vec<Token>> {
        let mut refined = Vec::with_capacity(tokens.len());

        for (index, token) in tokens.iter().enumerate() {
            let mut tag = self.automatic_tag(tokens, index);

            if let Some(escalation) = escalation {
                if self.needs_escalation(token, &tag) {
                    let request = self.request(sentence, tokens, index, &tag);
                    let resolution = escalation.session.resolve(escalation.source, &request)?;
                    match resolution {
                        Resolution::Unchanged => {}
                        Resolution::Retag(new_tag) => tag = new_tag,
                        Resolution::Delete => tag = tags::DELETE_SENTINEL.to_string(),
                    }
                }
            }

            if tag != token.tag {
                tracing::debug!(
                    index,
                    surface = %token.surface,
                    from = %token.tag,
                    to = %tag,
                    "retagged token"
                );
                refined.push(token.retagged(tag));
            } else {
                refined.push(token.clone());
            }
        }

        Ok(refined)
    }

    /// Tag after the automatic rules; later rules override earlier ones
    fn automatic_tag(&self, tokens: &[Token], index: usize) -> String {
        let token = &tokens[index];
        let lexicon = &self.config.lexicon;
        let mut tag = token.tag.as_str();

        match token.category() {
            TagCategory::Nominalizing if lexicon.is_deverbal(&token.surface) => {
                let followed_by_particle = tokens
                    .get(index + 1)
                    .is_some_and(|next| next.category().is_particle());
                if !followed_by_particle {
                    tag = tags::FINAL_ENDING;
                }
            }
            TagCategory::Connective => {
                let only_punctuation_follows = tokens[index + 1..]
                    .iter()
                    .all(|next| next.category().is_punctuation());
                if only_punctuation_follows {
                    tag = tags::FINAL_CONNECTIVE;
                }
            }
            _ => {}
        }

        if lexicon.is_colloquial(&token.surface)
            && token.confidence <= self.config.thresholds.colloquial_retag_max_confidence
        {
            tag = tags::FINAL_ENDING;
        }

        tag.to_string()
    }

    fn needs_escalation(&self, token: &Token, tag: &str) -> bool {
        let category = TagCategory::of(tag);
        let weak_connective = category == TagCategory::Connective
            && token.confidence <= self.config.thresholds.connective_escalation_max_confidence;
        let ambiguous_nominal = category == TagCategory::Nominalizing
            && self.config.lexicon.is_escalated_nominal(&token.surface);

        weak_connective
            || ambiguous_nominal
            || token.surface == self.config.lexicon.ambiguous_neologism
    }

    fn request<'a>(
        &self,
        sentence: &'a str,
        tokens: &'a [Token],
        index: usize,
        proposed_tag: &'a str,
    ) -> DecisionRequest<'a> {
        let radius = self.config.thresholds.neighbor_window;
        let start = index.saturating_sub(radius);
        let end = (index + radius + 1).min(tokens.len());

        DecisionRequest {
            token: &tokens[index],
            proposed_tag,
            window: &tokens[start..end],
            window_index: index - start,
            index,
            sentence,
        }
    }
}
