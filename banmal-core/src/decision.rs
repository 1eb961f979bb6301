//! Operator decisions for ambiguous tags
//!
//! A [`DecisionSource`] answers for tokens the automatic rules cannot settle.
//! Answers can be cached in a [`Session`] keyed by `(surface, original tag)`,
//! after which every later occurrence is resolved silently.

use crate::error::{Error, Result};
use crate::tags;
use crate::token::Token;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Everything a decision source is shown about one ambiguous token
#[derive(Debug, Clone, Copy)]
pub struct DecisionRequest<'a> {
    /// The token as the tagger produced it
    pub token: &'a Token,
    /// Tag the automatic rules would leave in place
    pub proposed_tag: &'a str,
    /// Neighboring tokens, the target included
    pub window: &'a [Token],
    /// Position of the target inside `window`
    pub window_index: usize,
    /// Position of the target inside the sentence
    pub index: usize,
    /// Full sentence text
    pub sentence: &'a str,
}

/// Verdict returned by a decision source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Replace the tag; with `persist`, apply to every later `(surface, tag)`
    Retag { tag: String, persist: bool },
    /// Leave the tag unchanged
    Keep { persist: bool },
    /// Drop the clause containing this token
    DeleteClause,
    /// Leave unchanged and stop asking about this pair
    Skip { persist: bool },
}

/// Source of verdicts for escalated tokens
///
/// Calls block until a verdict exists; there is no timeout.
pub trait DecisionSource: Send + Sync {
    fn decide(&self, request: &DecisionRequest<'_>) -> Result<Decision>;
}

impl<F> DecisionSource for F
where
    F: Fn(&DecisionRequest<'_>) -> Result<Decision> + Send + Sync,
{
    fn decide(&self, request: &DecisionRequest<'_>) -> Result<Decision> {
        self(request)
    }
}

/// Retags every escalated token to `EF`
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptFinalEnding {
    pub persist: bool,
}

impl DecisionSource for AcceptFinalEnding {
    fn decide(&self, _request: &DecisionRequest<'_>) -> Result<Decision> {
        Ok(Decision::Retag {
            tag: tags::FINAL_ENDING.to_string(),
            persist: self.persist,
        })
    }
}

/// Replays a fixed list of decisions in order
#[derive(Debug, Default)]
pub struct ScriptedDecisions {
    remaining: Mutex<VecDeque<Decision>>,
    calls: AtomicUsize,
}

impl ScriptedDecisions {
    pub fn new(decisions: impl IntoIterator<Item = Decision>) -> Self {
        Self {
            remaining: Mutex::new(decisions.into_iter().collect()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of times the source was consulted
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Decisions not yet consumed
    pub fn remaining(&self) -> usize {
        self.remaining
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl DecisionSource for ScriptedDecisions {
    fn decide(&self, request: &DecisionRequest<'_>) -> Result<Decision> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.remaining
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .ok_or_else(|| {
                Error::DecisionSource(format!(
                    "script exhausted at '{}' ({})",
                    request.token.surface, request.token.tag
                ))
            })
    }
}

/// Cached outcome for a `(surface, tag)` pair
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CachedDecision {
    Keep,
    Skip,
    Retag(String),
}

impl CachedDecision {
    pub fn as_str(&self) -> &str {
        match self {
            CachedDecision::Keep => "KEEP",
            CachedDecision::Skip => "SKIP",
            CachedDecision::Retag(tag) => tag,
        }
    }
}

impl From<&str> for CachedDecision {
    fn from(value: &str) -> Self {
        match value {
            "KEEP" => CachedDecision::Keep,
            "SKIP" => CachedDecision::Skip,
            tag => CachedDecision::Retag(tag.to_string()),
        }
    }
}

impl fmt::Display for CachedDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CachedDecision {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CachedDecision {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(CachedDecision::from(value.as_str()))
    }
}

/// One cached entry, for reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub surface: String,
    pub tag: String,
    pub decision: CachedDecision,
}

/// Counters accumulated over a session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    /// Retags applied, including silent cache hits
    pub corrections: usize,
    /// Clauses marked for deletion
    pub deletions: usize,
    /// Times the decision source was actually consulted
    pub prompts: usize,
}

/// Effect of a resolved decision on the token
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Resolution {
    Unchanged,
    Retag(String),
    Delete,
}

type CacheKey = (String, String);

/// Decision cache and counters for one processing session
///
/// Shared by reference across every sentence of a run. The cache lock is held
/// across lookup, prompt and insert so that concurrent workers never prompt
/// twice for the same pair.
#[derive(Debug, Default)]
pub struct Session {
    cache: Mutex<HashMap<CacheKey, CachedDecision>>,
    corrections: AtomicUsize,
    deletions: AtomicUsize,
    prompts: AtomicUsize,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_cache(&self) -> MutexGuard<'_, HashMap<CacheKey, CachedDecision>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Cached decision for a pair, if any
    pub fn cached(&self, surface: &str, tag: &str) -> Option<CachedDecision> {
        self.lock_cache()
            .get(&(surface.to_string(), tag.to_string()))
            .cloned()
    }

    /// Seed the cache with a decision
    pub fn remember(&self, surface: &str, tag: &str, decision: CachedDecision) {
        self.lock_cache()
            .insert((surface.to_string(), tag.to_string()), decision);
    }

    pub fn len(&self) -> usize {
        self.lock_cache().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_cache().is_empty()
    }

    /// Cache contents sorted by surface then tag
    pub fn entries(&self) -> Vec<CacheEntry> {
        let mut entries: Vec<CacheEntry> = self
            .lock_cache()
            .iter()
            .map(|((surface, tag), decision)| CacheEntry {
                surface: surface.clone(),
                tag: tag.clone(),
                decision: decision.clone(),
            })
            .collect();
        entries.sort_by(|a, b| (&a.surface, &a.tag).cmp(&(&b.surface, &b.tag)));
        entries
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            corrections: self.corrections.load(Ordering::SeqCst),
            deletions: self.deletions.load(Ordering::SeqCst),
            prompts: self.prompts.load(Ordering::SeqCst),
        }
    }

    /// Forget every cached decision and zero the counters
    pub fn reset(&self) {
        self.lock_cache().clear();
        self.corrections.store(0, Ordering::SeqCst);
        self.deletions.store(0, Ordering::SeqCst);
        self.prompts.store(0, Ordering::SeqCst);
    }

    /// Resolve one escalated token, consulting the cache before the source
    pub(crate) fn resolve(
        &self,
        source: &dyn DecisionSource,
        request: &DecisionRequest<'_>,
    ) -> Result<Resolution> {
        let key = (request.token.surface.clone(), request.token.tag.clone());
        let mut cache = self.lock_cache();

        if let Some(cached) = cache.get(&key) {
            tracing::debug!(surface = %key.0, tag = %key.1, decision = %cached, "decision cache hit");
            return Ok(match cached {
                CachedDecision::Keep | CachedDecision::Skip => Resolution::Unchanged,
                CachedDecision::Retag(tag) => {
                    self.corrections.fetch_add(1, Ordering::SeqCst);
                    Resolution::Retag(tag.clone())
                }
            });
        }

        self.prompts.fetch_add(1, Ordering::SeqCst);
        let decision = source.decide(request)?;
        tracing::debug!(surface = %key.0, tag = %key.1, ?decision, "decision received");

        let resolution = match decision {
            Decision::Retag { tag, persist } => {
                if persist {
                    cache.insert(key, CachedDecision::Retag(tag.clone()));
                }
                self.corrections.fetch_add(1, Ordering::SeqCst);
                Resolution::Retag(tag)
            }
            Decision::Keep { persist } => {
                if persist {
                    cache.insert(key, CachedDecision::Keep);
                }
                Resolution::Unchanged
            }
            Decision::Skip { persist } => {
                if persist {
                    cache.insert(key, CachedDecision::Skip);
                }
                Resolution::Unchanged
            }
            Decision::DeleteClause => {
                self.deletions.fetch_add(1, Ordering::SeqCst);
                Resolution::Delete
            }
        };

        Ok(resolution)
    }
}

/// Interactive escalation: a session plus the source to consult on cache miss
#[derive(Clone, Copy)]
pub struct Escalation<'a> {
    pub session: &'a Session,
    pub source: &'a dyn DecisionSource,
}

impl<'a> Escalation<'a> {
    pub fn new(session: &'a Session, source: &'a dyn DecisionSource) -> Self {
        Self { session, source }
    }
}

impl fmt::Debug for Escalation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Escalation")
            .field("session", &self.session.stats())
            .field("source", &"<dyn DecisionSource>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(token: &Token) -> DecisionRequest<'_> {
        DecisionRequest {
            token,
            proposed_tag: &token.tag,
            window: std::slice::from_ref(token),
            window_index: 0,
            index: 0,
            sentence: "테스트",
        }
    }

    #[test]
    fn test_persisted_retag_is_reused() {
        let session = Session::new();
        let source = ScriptedDecisions::new([Decision::Retag {
            tag: "EF".into(),
            persist: true,
        }]);
        let token = Token::new("음", "ETN", 0.6, false);

        let first = session.resolve(&source, &request(&token)).unwrap();
        let second = session.resolve(&source, &request(&token)).unwrap();

        assert_eq!(first, Resolution::Retag("EF".into()));
        assert_eq!(second, Resolution::Retag("EF".into()));
        assert_eq!(source.calls(), 1);
        assert_eq!(session.stats().corrections, 2);
        assert_eq!(session.stats().prompts, 1);
    }

    #[test]
    fn test_unpersisted_keep_asks_again() {
        let session = Session::new();
        let source = ScriptedDecisions::new([
            Decision::Keep { persist: false },
            Decision::Keep { persist: false },
        ]);
        let token = Token::new("고", "EC", 0.5, false);

        session.resolve(&source, &request(&token)).unwrap();
        session.resolve(&source, &request(&token)).unwrap();
        assert_eq!(source.calls(), 2);
        assert!(session.is_empty());
    }

    #[test]
    fn test_skip_is_cached() {
        let session = Session::new();
        let source = ScriptedDecisions::new([Decision::Skip { persist: true }]);
        let token = Token::new("임", "NNG", 0.99, false);

        assert_eq!(
            session.resolve(&source, &request(&token)).unwrap(),
            Resolution::Unchanged
        );
        assert_eq!(session.cached("임", "NNG"), Some(CachedDecision::Skip));
    }

    #[test]
    fn test_delete_is_never_cached() {
        let session = Session::new();
        let source = ScriptedDecisions::new([Decision::DeleteClause]);
        let token = Token::new("임", "NNG", 0.99, false);

        assert_eq!(
            session.resolve(&source, &request(&token)).unwrap(),
            Resolution::Delete
        );
        assert!(session.is_empty());
        assert_eq!(session.stats().deletions, 1);
    }

    #[test]
    fn test_exhausted_script_is_an_error() {
        let session = Session::new();
        let source = ScriptedDecisions::new(Vec::new());
        let token = Token::new("음", "ETN", 0.6, false);

        let err = session.resolve(&source, &request(&token)).unwrap_err();
        assert!(matches!(err, Error::DecisionSource(_)));
    }

    fn suffix_x(req: &DecisionRequest<'_>) -> Result<Decision> {
        Ok(Decision::Retag {
            tag: format!("{}X", req.token.tag),
            persist: false,
        })
    }

    #[test]
    fn test_function_source() {
        let session = Session::new();
        let token = Token::new("요", "JX", 0.9, false);
        assert_eq!(
            session.resolve(&suffix_x, &request(&token)).unwrap(),
            Resolution::Retag("JXX".into())
        );
    }

    #[test]
    fn test_entries_sorted_and_reset() {
        let session = Session::new();
        session.remember("임", "NNG", CachedDecision::Skip);
        session.remember("음", "ETN", CachedDecision::Retag("EF".into()));
        session.remember("고", "EC", CachedDecision::Keep);

        let surfaces: Vec<_> = session.entries().into_iter().map(|e| e.surface).collect();
        let mut sorted = surfaces.clone();
        sorted.sort();
        assert_eq!(surfaces, sorted);

        session.reset();
        assert!(session.is_empty());
        assert_eq!(session.stats(), SessionStats::default());
    }

    #[test]
    fn test_cached_decision_strings() {
        assert_eq!(CachedDecision::from("KEEP"), CachedDecision::Keep);
        assert_eq!(CachedDecision::from("SKIP"), CachedDecision::Skip);
        assert_eq!(
            CachedDecision::from("EF"),
            CachedDecision::Retag("EF".into())
        );
        let json = serde_json::to_string(&CachedDecision::Retag("JX".into())).unwrap();
        assert_eq!(json, "\"JX\"");
    }
}
