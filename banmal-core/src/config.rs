//! Analysis configuration
//!
//! Every threshold and surface set used by the rules lives here. Values were
//! tuned empirically per call site and are not interchangeable.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Default configuration constants
pub mod defaults {
    /// Colloquial endings at or below this confidence are forced to `EF`
    pub const COLLOQUIAL_RETAG_MAX_CONFIDENCE: f64 = 0.9;

    /// Connective endings at or below this confidence are escalated
    pub const CONNECTIVE_ESCALATION_MAX_CONFIDENCE: f64 = 0.92;

    /// Segmented clauses below this minimum confidence need review
    pub const REVIEW_MIN_CONFIDENCE: f64 = 0.95;

    /// Re-analyzed clauses whose last token is below this need review
    pub const REANALYSIS_LAST_TOKEN_MIN_CONFIDENCE: f64 = 0.7;

    /// Re-analyzed clauses whose weakest token is below this need review
    pub const REANALYSIS_MIN_CONFIDENCE: f64 = 0.3;

    /// Polite count must reach this fraction of the informal count
    pub const POLITE_RATIO: f64 = 0.5;

    /// Tokens shown on each side of an escalated token
    pub const NEIGHBOR_WINDOW: usize = 3;

    /// Longest punctuation or emotive run recorded
    pub const MAX_SYMBOL_CHARS: usize = 3;

    pub const DEVERBAL_ENDINGS: &[&str] = &["ㅁ", "음", "기", "긔"];
    pub const COLLOQUIAL_ENDINGS: &[&str] = &["긔", "노", "나", "슨", "임"];
    pub const ESCALATED_NOMINAL_ENDINGS: &[&str] = &["ㅁ", "음"];
    pub const AMBIGUOUS_NEOLOGISM: &str = "임";
    pub const POLITE_MARKERS: &[&str] = &["요", "죠", "습니다", "ㅂ니다", "까요", "나요", "인가요"];
    pub const NEOLOGISMS: &[&str] = &["긔", "노", "슨"];

    /// Allomorphs folded together for analysis
    pub const ENDING_ALIASES: &[(&str, &str)] = &[
        ("ㅁ", "(으)ㅁ"),
        ("음", "(으)ㅁ"),
        ("임", "(으)ㅁ"),
        ("ㄴ", "(으)ㄴ"),
        ("은", "(으)ㄴ"),
        ("ㄹ", "(으)ㄹ"),
        ("을", "(으)ㄹ"),
        ("ㄹ까", "(으)ㄹ까"),
        ("을까", "(으)ㄹ까"),
        ("ㅂ니다", "ㅂ니다"),
        ("습니다", "ㅂ니다"),
        ("어라", "어/아라"),
        ("아라", "어/아라"),
        ("라", "어/아라"),
        ("어", "어/아"),
        ("아", "어/아"),
        ("은데", "(으)ㄴ데"),
        ("ㄴ데", "(으)ㄴ데"),
        ("어서", "어/아서"),
        ("아서", "어/아서"),
    ];
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

/// Numeric thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub colloquial_retag_max_confidence: f64,
    pub connective_escalation_max_confidence: f64,
    pub review_min_confidence: f64,
    pub reanalysis_last_token_min_confidence: f64,
    pub reanalysis_min_confidence: f64,
    pub polite_ratio: f64,
    pub neighbor_window: usize,
    pub max_symbol_chars: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            colloquial_retag_max_confidence: defaults::COLLOQUIAL_RETAG_MAX_CONFIDENCE,
            connective_escalation_max_confidence: defaults::CONNECTIVE_ESCALATION_MAX_CONFIDENCE,
            review_min_confidence: defaults::REVIEW_MIN_CONFIDENCE,
            reanalysis_last_token_min_confidence: defaults::REANALYSIS_LAST_TOKEN_MIN_CONFIDENCE,
            reanalysis_min_confidence: defaults::REANALYSIS_MIN_CONFIDENCE,
            polite_ratio: defaults::POLITE_RATIO,
            neighbor_window: defaults::NEIGHBOR_WINDOW,
            max_symbol_chars: defaults::MAX_SYMBOL_CHARS,
        }
    }
}

/// Fixed surface-form sets consulted by the rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lexicon {
    /// Nominalizing endings that read as sentence-final when no particle follows
    pub deverbal_endings: Vec<String>,
    /// Colloquial/neologism endings forced to `EF` at low confidence
    pub colloquial_endings: Vec<String>,
    /// Nominalizing endings always escalated to the decision source
    pub escalated_nominal_endings: Vec<String>,
    /// Surface escalated regardless of tag or confidence
    pub ambiguous_neologism: String,
    /// Substrings that mark an ending as polite
    pub polite_markers: Vec<String>,
    /// Ending surfaces counted by the neologism report
    pub neologisms: Vec<String>,
    /// Allomorph to canonical form
    pub ending_aliases: BTreeMap<String, String>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            deverbal_endings: strings(defaults::DEVERBAL_ENDINGS),
            colloquial_endings: strings(defaults::COLLOQUIAL_ENDINGS),
            escalated_nominal_endings: strings(defaults::ESCALATED_NOMINAL_ENDINGS),
            ambiguous_neologism: defaults::AMBIGUOUS_NEOLOGISM.to_string(),
            polite_markers: strings(defaults::POLITE_MARKERS),
            neologisms: strings(defaults::NEOLOGISMS),
            ending_aliases: defaults::ENDING_ALIASES
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
        }
    }
}

impl Lexicon {
    pub(crate) fn is_deverbal(&self, surface: &str) -> bool {
        self.deverbal_endings.iter().any(|s| s == surface)
    }

    pub(crate) fn is_colloquial(&self, surface: &str) -> bool {
        self.colloquial_endings.iter().any(|s| s == surface)
    }

    pub(crate) fn is_escalated_nominal(&self, surface: &str) -> bool {
        self.escalated_nominal_endings.iter().any(|s| s == surface)
    }
}

/// Complete analysis configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Fold ending allomorphs in clause records
    pub normalize_endings: bool,
    pub thresholds: Thresholds,
    pub lexicon: Lexicon,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            normalize_endings: true,
            thresholds: Thresholds::default(),
            lexicon: Lexicon::default(),
        }
    }
}

impl Config {
    /// Create a configuration builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| Error::Configuration(format!("Failed to parse TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Configuration(format!("Failed to read file '{}': {}", path.display(), e))
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            Error::Configuration(msg) => {
                Error::Configuration(format!("{} ({})", msg, path.display()))
            }
            other => other,
        })
    }

    /// Serialize to TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::Configuration(format!("Failed to serialize TOML: {e}")))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let t = &self.thresholds;
        let probabilities = [
            ("colloquial_retag_max_confidence", t.colloquial_retag_max_confidence),
            (
                "connective_escalation_max_confidence",
                t.connective_escalation_max_confidence,
            ),
            ("review_min_confidence", t.review_min_confidence),
            (
                "reanalysis_last_token_min_confidence",
                t.reanalysis_last_token_min_confidence,
            ),
            ("reanalysis_min_confidence", t.reanalysis_min_confidence),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::Configuration(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }

        if !t.polite_ratio.is_finite() || t.polite_ratio < 0.0 {
            return Err(Error::Configuration(
                "polite_ratio must be a non-negative number".into(),
            ));
        }

        if t.neighbor_window == 0 {
            return Err(Error::Configuration(
                "neighbor_window must be greater than 0".into(),
            ));
        }

        if t.max_symbol_chars == 0 {
            return Err(Error::Configuration(
                "max_symbol_chars must be greater than 0".into(),
            ));
        }

        if self.lexicon.polite_markers.iter().all(|m| m.is_empty()) {
            return Err(Error::Configuration(
                "polite_markers must contain at least one non-empty marker".into(),
            ));
        }

        Ok(())
    }
}

/// Fluent builder for configuration
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    thresholds: Option<Thresholds>,
    lexicon: Option<Lexicon>,
    normalize_endings: Option<bool>,
}

impl ConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self::default()
    }

    pub fn thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = Some(thresholds);
        self
    }

    pub fn lexicon(mut self, lexicon: Lexicon) -> Self {
        self.lexicon = Some(lexicon);
        self
    }

    pub fn normalize_endings(mut self, enabled: bool) -> Self {
        self.normalize_endings = Some(enabled);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<Config> {
        let mut config = Config::default();

        if let Some(thresholds) = self.thresholds {
            config.thresholds = thresholds;
        }

        if let Some(lexicon) = self.lexicon {
            config.lexicon = lexicon;
        }

        if let Some(enabled) = self.normalize_endings {
            config.normalize_endings = enabled;
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.thresholds.colloquial_retag_max_confidence, 0.9);
        assert_eq!(config.thresholds.connective_escalation_max_confidence, 0.92);
        assert_eq!(config.thresholds.review_min_confidence, 0.95);
        assert_eq!(config.lexicon.ending_aliases["습니다"], "ㅂ니다");
    }

    #[test]
    fn test_builder_rejects_zero_window() {
        let thresholds = Thresholds {
            neighbor_window: 0,
            ..Default::default()
        };
        let result = Config::builder().thresholds(thresholds).build();
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn test_builder_rejects_out_of_range_threshold() {
        let thresholds = Thresholds {
            review_min_confidence: 1.5,
            ..Default::default()
        };
        let err = Config::builder().thresholds(thresholds).build().unwrap_err();
        assert!(err.to_string().contains("review_min_confidence"));
    }

    #[test]
    fn test_builder_rejects_empty_markers() {
        let lexicon = Lexicon {
            polite_markers: vec![],
            ..Default::default()
        };
        assert!(Config::builder().lexicon(lexicon).build().is_err());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
normalize_endings = false

[thresholds]
review_min_confidence = 0.8

[lexicon]
neologisms = ["긔"]
"#,
        )
        .unwrap();

        assert!(!config.normalize_endings);
        assert_eq!(config.thresholds.review_min_confidence, 0.8);
        assert_eq!(config.thresholds.neighbor_window, 3);
        assert_eq!(config.lexicon.neologisms, vec!["긔".to_string()]);
        assert_eq!(config.lexicon.polite_markers.len(), 7);
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = Config::default();
        let text = config.to_toml_string().unwrap();
        let parsed = Config::from_toml_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_from_file_reports_path() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[thresholds]\nmax_symbol_chars = 0\n").unwrap();

        let err = Config::from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("max_symbol_chars"));
    }

    #[test]
    fn test_from_file_missing() {
        let err = Config::from_file(Path::new("/nonexistent/banmal.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read file"));
    }
}
