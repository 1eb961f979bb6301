//! Decision cache behavior across sentences and documents

use banmal_core::{
    Analyzer, CachedDecision, Decision, DecisionRequest, Error, Escalation, ExecutionMode,
    ScriptedDecisions, Session, TaggedSentence, Token,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

fn token(surface: &str, tag: &str, confidence: f64) -> Token {
    Token::new(surface, tag, confidence, false)
}

/// 학생임: the ambiguous neologism is always escalated
fn student_sentence() -> TaggedSentence {
    TaggedSentence::new("학생임", &[token("학생", "NNG", 0.99), token("임", "VCP", 0.99)])
}

#[test]
fn test_persisted_verdict_is_reused_across_sentences() {
    let analyzer = Analyzer::default();
    let session = Session::new();
    let source = ScriptedDecisions::new([Decision::Retag {
        tag: "EF".into(),
        persist: true,
    }]);
    let escalation = Escalation::new(&session, &source);

    let first = analyzer
        .analyze_sentence(&student_sentence(), Some(escalation))
        .unwrap();
    let second = analyzer
        .analyze_sentence(&student_sentence(), Some(escalation))
        .unwrap();

    assert_eq!(source.calls(), 1);
    assert_eq!(first, second);
    assert_eq!(first.segments[0].endings[0].tag, "EF");
    assert_eq!(
        session.cached("임", "VCP"),
        Some(CachedDecision::Retag("EF".into()))
    );

    let stats = session.stats();
    assert_eq!(stats.prompts, 1);
    assert_eq!(stats.corrections, 2);
}

#[test]
fn test_nominal_before_particle_verdict_is_reused() {
    let analyzer = Analyzer::default();
    let session = Session::new();
    let source = ScriptedDecisions::new([Decision::Retag {
        tag: "EF".into(),
        persist: true,
    }]);
    let escalation = Escalation::new(&session, &source);

    let eating = TaggedSentence::new(
        "먹음이 좋다",
        &[
            token("먹", "VV", 0.99),
            token("음", "ETN", 0.99),
            token("이", "JKS", 0.99),
            token("좋", "VA", 0.99),
            token("다", "EF", 0.99),
        ],
    );
    let walking = TaggedSentence::new(
        "걸음은 느림",
        &[
            token("걸", "VV", 0.99),
            token("음", "ETN", 0.99),
            token("은", "JX", 0.99),
            token("느리", "VA", 0.99),
            token("ㅁ", "ETN", 0.99),
        ],
    );

    analyzer.analyze_sentence(&eating, Some(escalation)).unwrap();
    assert_eq!(source.calls(), 1);

    analyzer.analyze_sentence(&walking, Some(escalation)).unwrap();
    assert_eq!(source.calls(), 1);
    assert_eq!(
        session.cached("음", "ETN"),
        Some(CachedDecision::Retag("EF".into()))
    );
    assert_eq!(session.stats().corrections, 2);
}

#[test]
fn test_unpersisted_verdict_prompts_again() {
    let analyzer = Analyzer::default();
    let session = Session::new();
    let source = ScriptedDecisions::new([
        Decision::Retag {
            tag: "EF".into(),
            persist: false,
        },
        Decision::Keep { persist: false },
    ]);
    let escalation = Escalation::new(&session, &source);

    let first = analyzer
        .analyze_sentence(&student_sentence(), Some(escalation))
        .unwrap();
    let second = analyzer
        .analyze_sentence(&student_sentence(), Some(escalation))
        .unwrap();

    assert_eq!(source.calls(), 2);
    assert_eq!(first.segments[0].endings.len(), 1);
    assert!(second.segments[0].endings.is_empty());
    assert!(session.is_empty());
}

#[test]
fn test_cache_is_keyed_by_original_tag() {
    let analyzer = Analyzer::default();
    let session = Session::new();
    let source = ScriptedDecisions::new([
        Decision::Skip { persist: true },
        Decision::Keep { persist: true },
    ]);
    let escalation = Escalation::new(&session, &source);

    analyzer
        .analyze_sentence(&student_sentence(), Some(escalation))
        .unwrap();
    let other = TaggedSentence::new("학생임", &[token("학생", "NNG", 0.99), token("임", "NNG", 0.99)]);
    analyzer.analyze_sentence(&other, Some(escalation)).unwrap();
    analyzer.analyze_sentence(&other, Some(escalation)).unwrap();

    assert_eq!(source.calls(), 2);
    let entries = session.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].tag, "NNG");
    assert_eq!(entries[0].decision, CachedDecision::Keep);
    assert_eq!(entries[1].decision, CachedDecision::Skip);
}

#[test]
fn test_seeded_cache_is_applied_silently() {
    let analyzer = Analyzer::default();
    let session = Session::new();
    session.remember("고", "EC", CachedDecision::Retag("ECF".into()));
    let source = ScriptedDecisions::new([]);

    let sentence = TaggedSentence::new(
        "가고 싶다",
        &[
            token("가", "VV", 0.99),
            token("고", "EC", 0.8),
            token("싶", "VX", 0.99),
            token("다", "EF", 0.99),
        ],
    );
    let analysis = analyzer
        .analyze_sentence(&sentence, Some(Escalation::new(&session, &source)))
        .unwrap();

    assert_eq!(source.calls(), 0);
    let sentences: Vec<_> = analysis.segments.iter().map(|s| s.sentence.as_str()).collect();
    assert_eq!(sentences, vec!["가고 싶다"]);
    assert_eq!(analysis.segments[0].endings[0].surface, "고");
    assert_eq!(session.stats().corrections, 1);
}

#[test]
fn test_source_sees_neighbor_window() {
    let analyzer = Analyzer::default();
    let session = Session::new();
    let seen = Mutex::new(Vec::new());
    let source = |request: &DecisionRequest<'_>| -> banmal_core::Result<Decision> {
        let window: Vec<String> = request
            .window
            .iter()
            .map(|t| format!("{}/{}", t.surface, t.tag))
            .collect();
        seen.lock().unwrap().push((request.index, window, request.sentence.to_string()));
        Ok(Decision::Keep { persist: false })
    };

    let sentence = TaggedSentence::new(
        "오늘 진짜 학생임 ㅋㅋ",
        &[
            token("오늘", "NNG", 0.99),
            token("진짜", "MAG", 0.99),
            token("학생", "NNG", 0.99),
            token("임", "VCP", 0.99),
            token("ㅋㅋ", "IC", 0.99),
        ],
    );
    analyzer
        .analyze_sentence(&sentence, Some(Escalation::new(&session, &source)))
        .unwrap();

    let seen = seen.into_inner().unwrap();
    assert_eq!(seen.len(), 1);
    let (index, window, text) = &seen[0];
    assert_eq!(*index, 3);
    assert_eq!(
        window,
        &vec!["오늘/NNG", "진짜/MAG", "학생/NNG", "임/VCP", "ㅋㅋ/IC"]
    );
    assert_eq!(text, "오늘 진짜 학생임 ㅋㅋ");
}

#[test]
fn test_failing_source_surfaces_error() {
    let analyzer = Analyzer::default();
    let session = Session::new();
    let source = |_: &DecisionRequest<'_>| -> banmal_core::Result<Decision> {
        Err(Error::DecisionSource("input closed".into()))
    };

    let err = analyzer
        .analyze_sentence(&student_sentence(), Some(Escalation::new(&session, &source)))
        .unwrap_err();
    assert!(matches!(err, Error::DecisionSource(_)));
}

#[test]
fn test_parallel_workers_prompt_once_per_pair() {
    let analyzer = Analyzer::default();
    let session = Session::new();
    let calls = AtomicUsize::new(0);
    let source = |_: &DecisionRequest<'_>| -> banmal_core::Result<Decision> {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(Decision::Retag {
            tag: "EF".into(),
            persist: true,
        })
    };

    let document = banmal_core::Document {
        full_text: "학생임".into(),
        sentences: vec![student_sentence()],
        ..Default::default()
    };
    let documents = vec![document; 32];

    let results = analyzer
        .analyze_batch(
            &documents,
            Some(Escalation::new(&session, &source)),
            ExecutionMode::Parallel { threads: Some(8) },
        )
        .unwrap();

    assert!(results.iter().all(|r| r.is_ok()));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(session.stats().corrections, 32);
}
