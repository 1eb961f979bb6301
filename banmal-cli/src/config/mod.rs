//! Configuration module

use crate::error::CliError;
use anyhow::{Context, Result};
use banmal_core::Config;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// CLI configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct CliConfig {
    /// Analysis thresholds and lexicon
    #[serde(default)]
    pub analysis: Config,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,

    /// Performance configuration
    #[serde(default)]
    pub performance: PerformanceConfig,
}

/// Output-related configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty print JSON output
    pub pretty_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty_json: true }
    }
}

/// Performance-related configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PerformanceConfig {
    /// Number of worker threads (0 = auto)
    pub worker_threads: usize,
}

impl CliConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: CliConfig = toml::from_str(content)
            .map_err(|e| CliError::ConfigError(format!("Failed to parse TOML: {e}")))?;
        config.analysis.validate().map_err(CliError::from)?;
        Ok(config)
    }

    /// Load and validate a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid configuration in {}", path.display()))
    }

    /// Serialize to TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CliError::ConfigError(format!("Failed to serialize TOML: {e}")).into())
    }

    /// Worker thread count, if one was configured
    pub fn worker_threads(&self) -> Option<usize> {
        Some(self.performance.worker_threads).filter(|&n| n > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = CliConfig::from_toml_str("").unwrap();
        assert_eq!(config, CliConfig::default());
        assert!(config.output.pretty_json);
        assert_eq!(config.worker_threads(), None);
    }

    #[test]
    fn test_sections_are_read() {
        let config = CliConfig::from_toml_str(
            r#"
[analysis]
normalize_endings = false

[analysis.thresholds]
review_min_confidence = 0.9

[output]
pretty_json = false

[performance]
worker_threads = 4
"#,
        )
        .unwrap();

        assert!(!config.analysis.normalize_endings);
        assert_eq!(config.analysis.thresholds.review_min_confidence, 0.9);
        assert!(!config.output.pretty_json);
        assert_eq!(config.worker_threads(), Some(4));
    }

    #[test]
    fn test_invalid_analysis_section_is_rejected() {
        let err = CliConfig::from_toml_str("[analysis.thresholds]\nneighbor_window = 0\n")
            .unwrap_err();
        assert!(err.to_string().contains("neighbor_window"));
    }

    #[test]
    fn test_load_and_roundtrip() {
        let text = CliConfig::default().to_toml_string().unwrap();
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{text}").unwrap();

        let loaded = CliConfig::load(file.path()).unwrap();
        assert_eq!(loaded, CliConfig::default());
    }

    #[test]
    fn test_load_missing_file() {
        let err = CliConfig::load(Path::new("/nonexistent/banmal.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
