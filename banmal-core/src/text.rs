//! Raw post text preparation before tagging

use regex::Regex;
use std::sync::OnceLock;

fn app_signature() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)-\s*dc\s+official\s+App").expect("signature pattern is valid")
    })
}

fn latin_letters() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[a-zA-Z]+").expect("latin pattern is valid"))
}

/// Strip the mobile-app signature and Latin letters, then collapse whitespace
pub fn clean_text(text: &str) -> String {
    let mut cleaned = text.to_string();
    for pattern in [app_signature(), latin_letters()] {
        cleaned = pattern.replace_all(&cleaned, "").into_owned();
    }
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split after `.`, `!` or `?` when whitespace follows
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((index, c)) = chars.next() {
        let terminal = matches!(c, '.' | '!' | '?');
        if terminal && chars.peek().is_some_and(|(_, next)| next.is_whitespace()) {
            sentences.push(&text[start..index + c.len_utf8()]);
            while chars.peek().is_some_and(|(_, next)| next.is_whitespace()) {
                chars.next();
            }
            start = chars.peek().map_or(text.len(), |(next, _)| *next);
        }
    }
    sentences.push(&text[start..]);

    sentences
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
