//! Sentence-final ending extraction

use crate::config::Lexicon;
use crate::tags;
use crate::token::Token;
use smallvec::SmallVec;

/// The one or two morphemes that decide a clause's register
pub type GoverningEnding = SmallVec<[Token; 2]>;

/// Collect every ending cluster in `tokens`
///
/// A cluster starts at an `EF` or `ECF` token and extends over the particles
/// and pre-final endings directly after it. Scanning resumes after the
/// cluster, so unsegmented input can yield several clusters.
pub fn extract_endings(tokens: &[Token]) -> Vec<Token> {
    let mut endings = Vec::new();
    let mut index = 0;

    while index < tokens.len() {
        if !tokens[index].category().starts_ending_cluster() {
            index += 1;
            continue;
        }

        endings.push(tokens[index].clone());
        index += 1;
        while let Some(glued) = tokens
            .get(index)
            .filter(|t| t.category().glues_to_ending())
        {
            endings.push(glued.clone());
            index += 1;
        }
    }

    endings
}

/// The ending that governs politeness
///
/// A trailing auxiliary particle (`JX`, e.g. 요) carries the register together
/// with the ending before it, so both are kept.
pub fn governing_ending(endings: &[Token]) -> GoverningEnding {
    match endings {
        [] => SmallVec::new(),
        [.., before, last] if last.tag == tags::AUXILIARY_PARTICLE => {
            SmallVec::from_buf([before.clone(), last.clone()])
        }
        [.., last] => smallvec::smallvec![last.clone()],
    }
}

/// Canonical form of an ending surface
pub fn normalize_ending<'a>(lexicon: &'a Lexicon, surface: &'a str) -> &'a str {
    lexicon
        .ending_aliases
        .get(surface)
        .map(String::as_str)
        .unwrap_or(surface)
}

/// Endings with their surfaces folded to canonical forms
pub fn normalize_endings(lexicon: &Lexicon, endings: &[Token]) -> Vec<Token> {
    endings
        .iter()
        .map(|token| Token {
            surface: normalize_ending(lexicon, &token.surface).to_string(),
            ..token.clone()
        })
        .collect()
}
