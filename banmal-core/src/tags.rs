//! Part-of-speech tag categories
//!
//! The tagger emits tags from a fixed Sejong-style tagset. Only a handful of
//! them matter for clause boundaries; everything else is [`TagCategory::Other`].

use std::fmt;

/// Sentence-final ending
pub const FINAL_ENDING: &str = "EF";
/// Connective ending that closes a clause (nothing meaningful follows it)
pub const FINAL_CONNECTIVE: &str = "ECF";
/// Mid-sentence connective ending
pub const CONNECTIVE: &str = "EC";
/// Nominalizing ending
pub const NOMINALIZING: &str = "ETN";
/// Pre-final (auxiliary) ending
pub const PRE_FINAL: &str = "EP";
/// Auxiliary particle, the only particle that joins a governing ending
pub const AUXILIARY_PARTICLE: &str = "JX";
/// Sentinel written by an operator decision to drop the enclosing clause
pub const DELETE_SENTINEL: &str = "DELETE";

/// Leading letter shared by every particle tag (JKS, JKO, JX, ...)
const PARTICLE_PREFIX: char = 'J';
/// Leading letter shared by every symbol tag (SF, SP, SE, ...)
const SYMBOL_PREFIX: char = 'S';

/// Closed classification of tag strings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagCategory {
    /// `EF`
    FinalEnding,
    /// `ECF`
    FinalConnective,
    /// `EC`
    Connective,
    /// `ETN`
    Nominalizing,
    /// `EP`
    PreFinalEnding,
    /// Any `J*` tag
    Particle,
    /// Any `S*` tag
    Punctuation,
    /// Clause marked for removal
    Deleted,
    /// Everything else
    Other,
}

impl TagCategory {
    /// Classify a raw tag string
    pub fn of(tag: &str) -> Self {
        match tag {
            FINAL_ENDING => TagCategory::FinalEnding,
            FINAL_CONNECTIVE => TagCategory::FinalConnective,
            CONNECTIVE => TagCategory::Connective,
            NOMINALIZING => TagCategory::Nominalizing,
            PRE_FINAL => TagCategory::PreFinalEnding,
            DELETE_SENTINEL => TagCategory::Deleted,
            _ if tag.starts_with(PARTICLE_PREFIX) => TagCategory::Particle,
            _ if tag.starts_with(SYMBOL_PREFIX) => TagCategory::Punctuation,
            _ => TagCategory::Other,
        }
    }

    /// True sentence-final ending; the only split point for segmentation
    #[inline]
    pub fn is_final_ending(self) -> bool {
        self == TagCategory::FinalEnding
    }

    /// Head of an ending cluster (`EF` or `ECF`)
    #[inline]
    pub fn starts_ending_cluster(self) -> bool {
        matches!(self, TagCategory::FinalEnding | TagCategory::FinalConnective)
    }

    /// Attaches grammatically to a preceding ending (particles, `EP`)
    #[inline]
    pub fn glues_to_ending(self) -> bool {
        matches!(self, TagCategory::Particle | TagCategory::PreFinalEnding)
    }

    /// Absorbed into the clause after a split point
    #[inline]
    pub fn absorbed_after_split(self) -> bool {
        self.glues_to_ending() || self == TagCategory::Punctuation
    }

    #[inline]
    pub fn is_particle(self) -> bool {
        self == TagCategory::Particle
    }

    #[inline]
    pub fn is_punctuation(self) -> bool {
        self == TagCategory::Punctuation
    }
}

impl fmt::Display for TagCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TagCategory::FinalEnding => "final-ending",
            TagCategory::FinalConnective => "final-connective",
            TagCategory::Connective => "connective",
            TagCategory::Nominalizing => "nominalizing",
            TagCategory::PreFinalEnding => "pre-final-ending",
            TagCategory::Particle => "particle",
            TagCategory::Punctuation => "punctuation",
            TagCategory::Deleted => "deleted",
            TagCategory::Other => "other",
        };
        f.write_str(name)
    }
}

/// Tags with a dedicated category, for listing in the CLI
pub fn known_tags() -> &'static [(&'static str, TagCategory)] {
    &[
        (FINAL_ENDING, TagCategory::FinalEnding),
        (FINAL_CONNECTIVE, TagCategory::FinalConnective),
        (CONNECTIVE, TagCategory::Connective),
        (NOMINALIZING, TagCategory::Nominalizing),
        (PRE_FINAL, TagCategory::PreFinalEnding),
        ("J*", TagCategory::Particle),
        ("S*", TagCategory::Punctuation),
        (DELETE_SENTINEL, TagCategory::Deleted),
    ]
}
