//! Clause segmentation and register classification for tagged Korean text
//!
//! This crate consumes per-sentence morpheme tags from an external tagger and
//! derives, for each clause, the sentence-final ending that governs it, the
//! punctuation and emotive jamo it carries, and whether it is written in
//! banmal (informal speech).
//!
//! # Architecture
//!
//! - **Tags and tokens**: closed tag categories and the tagger's 4-tuples
//! - **Refinement**: automatic tag corrections plus optional escalation to a
//!   [`DecisionSource`] through a caller-owned [`Session`]
//! - **Segmentation**: offset recovery and `EF`-driven clause splitting
//! - **Extraction**: endings, symbols and the banmal verdict per clause
//! - **Analysis**: sentence, document and batch pipelines
//!
//! # Example
//!
//! ```rust
//! use banmal_core::{Analyzer, Token};
//!
//! let analyzer = Analyzer::default();
//! let tokens = vec![
//!     Token::new("밥", "NNG", 0.99, false),
//!     Token::new("먹", "VV", 0.98, false),
//!     Token::new("었", "EP", 0.97, false),
//!     Token::new("음", "ETN", 0.6, false),
//!     Token::new("?", "SF", 0.99, false),
//!     Token::new("ㅋㅋㅋ", "IC", 0.8, false),
//! ];
//!
//! let analysis = analyzer.analyze_tokens("밥 먹었음? ㅋㅋㅋ", &tokens, None).unwrap();
//! assert_eq!(analysis.segments[0].sentence, "밥 먹었음?");
//! assert!(analysis.segments[0].is_banmal);
//! assert_eq!(analysis.segments[1].other_symbols, vec!["ㅋㅋㅋ"]);
//! ```
//!
//! # Features
//!
//! - `parallel` (default): enables [`ExecutionMode::Parallel`] on a rayon pool

pub mod analysis;
pub mod banmal;
pub mod config;
pub mod decision;
pub mod endings;
pub mod error;
pub mod position;
pub mod refiner;
pub mod report;
pub mod segmenter;
pub mod symbols;
pub mod tags;
pub mod text;
pub mod token;

pub use analysis::{
    Analyzer, ClauseRecord, ConfidenceStats, DocumentAnalysis, ExecutionMode, ReviewPolicy,
    SentenceAnalysis,
};
pub use banmal::{is_banmal, BanmalClassifier};
pub use config::{Config, ConfigBuilder, Lexicon, Thresholds};
pub use decision::{
    AcceptFinalEnding, CacheEntry, CachedDecision, Decision, DecisionRequest, DecisionSource,
    Escalation, ScriptedDecisions, Session, SessionStats,
};
pub use endings::{extract_endings, governing_ending, normalize_ending, GoverningEnding};
pub use error::{Error, Result};
pub use position::{locate, PositionedToken};
pub use refiner::TagRefiner;
pub use report::{BatchSummary, NeologismReport};
pub use segmenter::{ClauseSegment, SentenceSegmenter};
pub use symbols::{extract_symbols, SymbolInventory};
pub use tags::TagCategory;
pub use text::{clean_text, split_sentences};
pub use token::{Document, TaggedSentence, Token, TokenRecord};
