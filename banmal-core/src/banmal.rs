//! Informal register (banmal) classification

use crate::config::Config;
use crate::token::Token;
use std::sync::OnceLock;

/// Scores endings for politeness markers
#[derive(Debug, Clone, Copy)]
pub struct BanmalClassifier<'c> {
    config: &'c Config,
}

impl<'c> BanmalClassifier<'c> {
    pub fn new(config: &'c Config) -> Self {
        Self { config }
    }

    fn is_polite(&self, surface: &str) -> bool {
        self.config
            .lexicon
            .polite_markers
            .iter()
            .any(|marker| !marker.is_empty() && surface.contains(marker.as_str()))
    }

    /// True when `endings` read as informal speech
    ///
    /// Empty input is not informal. Any politeness marker wins as long as
    /// polite endings are at least half as many as plain ones.
    pub fn is_banmal(&self, endings: &[Token]) -> bool {
        if endings.is_empty() {
            return false;
        }

        let polite = endings
            .iter()
            .filter(|ending| self.is_polite(&ending.surface))
            .count();
        let informal = endings.len() - polite;

        let polite_dominates =
            polite > 0 && polite as f64 >= informal as f64 * self.config.thresholds.polite_ratio;
        !polite_dominates
    }
}

/// Classify with the default politeness markers and ratio
pub fn is_banmal(endings: &[Token]) -> bool {
    static DEFAULT: OnceLock<Config> = OnceLock::new();
    BanmalClassifier::new(DEFAULT.get_or_init(Config::default)).is_banmal(endings)
}
