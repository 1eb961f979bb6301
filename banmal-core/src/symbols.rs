//! Punctuation and emotive jamo inventories

use regex::Regex;
use std::sync::OnceLock;

/// Standalone jamo runs such as ㅋㅋ, ㅠㅠ, ㅈㄴ
fn emotive_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[ㄱ-ㅎㅏ-ㅣ]+").expect("jamo pattern is valid"))
}

fn punctuation_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[?!~….]+").expect("punctuation pattern is valid"))
}

/// Punctuation runs and emotive symbols found in a clause's text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolInventory {
    pub punctuation: Vec<String>,
    pub symbols: Vec<String>,
}

/// Scan `text` for punctuation and jamo runs
///
/// Each run is cut to `max_chars` characters and recorded once, in order of
/// first appearance.
pub fn extract_symbols(text: &str, max_chars: usize) -> SymbolInventory {
    SymbolInventory {
        punctuation: distinct_runs(punctuation_pattern(), text, max_chars),
        symbols: distinct_runs(emotive_pattern(), text, max_chars),
    }
}

fn distinct_runs(pattern: &Regex, text: &str, max_chars: usize) -> Vec<String> {
    let mut runs: Vec<String> = Vec::new();
    for found in pattern.find_iter(text) {
        let run: String = found.as_str().chars().take(max_chars).collect();
        if !run.is_empty() && !runs.contains(&run) {
            runs.push(run);
        }
    }
    runs
}
