//! Property tests for segmentation and extraction

use banmal_core::{
    extract_endings, extract_symbols, governing_ending, Analyzer, Config, SentenceSegmenter,
    Token,
};
use proptest::prelude::*;

const SYLLABLES: &[&str] = &["밥", "먹", "었", "음", "가", "고", "요", "지", "임", "노", "?", "ㅋ"];
const TAGS: &[&str] = &["NNG", "VV", "EP", "EF", "EC", "ETN", "JX", "JKS", "SF", "IC"];

fn arb_token() -> impl Strategy<Value = Token> {
    (
        prop::sample::select(SYLLABLES),
        prop::sample::select(TAGS),
        0.0f64..=1.0,
        any::<bool>(),
    )
        .prop_map(|(surface, tag, confidence, oov)| Token::new(surface, tag, confidence, oov))
}

/// Words of one to three tokens, joined by single spaces in the sentence
fn arb_sentence() -> impl Strategy<Value = (String, Vec<Token>)> {
    prop::collection::vec(prop::collection::vec(arb_token(), 1..4), 1..8).prop_map(|words| {
        let sentence = words
            .iter()
            .map(|word| word.iter().map(|t| t.surface.as_str()).collect::<String>())
            .collect::<Vec<_>>()
            .join(" ");
        (sentence, words.into_iter().flatten().collect())
    })
}

/// Like [`arb_sentence`], but some words are written contracted so their
/// token surfaces never appear in the sentence text (가 + 았 + 어 as 갔어)
fn arb_contracted_sentence() -> impl Strategy<Value = (String, Vec<Token>)> {
    let word = prop_oneof![
        3 => prop::collection::vec(arb_token(), 1..4).prop_map(|tokens| {
            let text = tokens.iter().map(|t| t.surface.as_str()).collect::<String>();
            (text, tokens)
        }),
        1 => (0.0f64..=1.0).prop_map(|confidence| {
            let tokens = vec![
                Token::new("가", "VV", confidence, false),
                Token::new("았", "EP", confidence, false),
                Token::new("어", "EF", confidence, false),
            ];
            ("갔어".to_string(), tokens)
        }),
    ];
    prop::collection::vec(word, 1..8).prop_map(|words| {
        let sentence = words
            .iter()
            .map(|(text, _)| text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        (sentence, words.into_iter().flat_map(|(_, tokens)| tokens).collect())
    })
}

fn without_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

proptest! {
    #[test]
    fn segments_cover_the_sentence((sentence, tokens) in arb_sentence()) {
        let config = Config::default();
        let segments = SentenceSegmenter::new(&config)
            .segment(&sentence, &tokens, None)
            .unwrap();

        prop_assert!(!segments.is_empty());

        let joined = segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        prop_assert_eq!(without_whitespace(&joined), without_whitespace(&sentence));

        let token_count: usize = segments.iter().map(|s| s.tokens.len()).sum();
        prop_assert_eq!(token_count, tokens.len());
    }

    #[test]
    fn contracted_surfaces_keep_every_token((sentence, tokens) in arb_contracted_sentence()) {
        let config = Config::default();
        let segments = SentenceSegmenter::new(&config)
            .segment(&sentence, &tokens, None)
            .unwrap();

        prop_assert!(!segments.is_empty());
        let token_count: usize = segments.iter().map(|s| s.tokens.len()).sum();
        prop_assert_eq!(token_count, tokens.len());
    }

    #[test]
    fn analysis_is_deterministic((sentence, tokens) in arb_sentence()) {
        let analyzer = Analyzer::default();
        let first = analyzer.analyze_tokens(&sentence, &tokens, None).unwrap();
        let second = analyzer.analyze_tokens(&sentence, &tokens, None).unwrap();
        prop_assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn governing_ending_is_contiguous((sentence, tokens) in arb_sentence()) {
        let config = Config::default();
        let segments = SentenceSegmenter::new(&config)
            .segment(&sentence, &tokens, None)
            .unwrap();

        for segment in segments {
            let ending = governing_ending(&extract_endings(&segment.tokens));
            if ending.is_empty() {
                continue;
            }
            prop_assert!(
                segment.tokens.windows(ending.len()).any(|w| w == ending.as_slice()),
                "ending {:?} not contiguous in {:?}",
                ending,
                segment.tokens
            );
        }
    }

    #[test]
    fn symbols_are_short_and_distinct(text in "[ㅋㅎㅠ?!~.… 가나다]{0,40}") {
        let found = extract_symbols(&text, 3);
        for list in [&found.punctuation, &found.symbols] {
            for (i, run) in list.iter().enumerate() {
                prop_assert!(run.chars().count() <= 3);
                prop_assert!(!run.is_empty());
                prop_assert!(!list[..i].contains(run));
            }
        }
    }
}
