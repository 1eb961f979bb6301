//! Tagged morpheme model and tagger input records

use crate::tags::TagCategory;
use serde::de::{self, Deserializer};
use serde::ser::{SerializeTuple, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A morpheme as produced by the external tagger
///
/// Serialized as the tagger's own 4-tuple `[surface, tag, confidence, oov]`
/// with `oov` written as `0`/`1`.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub surface: String,
    pub tag: String,
    pub confidence: f64,
    pub oov: bool,
}

impl Token {
    pub fn new(
        surface: impl Into<String>,
        tag: impl Into<String>,
        confidence: f64,
        oov: bool,
    ) -> Self {
        Self {
            surface: surface.into(),
            tag: tag.into(),
            confidence,
            oov,
        }
    }

    /// Category of this token's tag
    #[inline]
    pub fn category(&self) -> TagCategory {
        TagCategory::of(&self.tag)
    }

    /// Copy of this token carrying a different tag
    pub fn retagged(&self, tag: impl Into<String>) -> Self {
        Self {
            surface: self.surface.clone(),
            tag: tag.into(),
            confidence: self.confidence,
            oov: self.oov,
        }
    }
}

impl Serialize for Token {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(4)?;
        tuple.serialize_element(&self.surface)?;
        tuple.serialize_element(&self.tag)?;
        tuple.serialize_element(&self.confidence)?;
        tuple.serialize_element(&u8::from(self.oov))?;
        tuple.end()
    }
}

impl<'de> Deserialize<'de> for Token {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let record = TokenRecord::deserialize(deserializer)?;
        record
            .to_token()
            .ok_or_else(|| de::Error::custom("token needs at least surface and tag"))
    }
}

/// One raw tagger tuple, kept untyped until ingestion
///
/// Tuples with fewer than two fields are malformed; they are dropped by
/// [`ingest`] without failing the sentence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenRecord(pub Value);

impl TokenRecord {
    /// Interpret the record as a token
    ///
    /// Missing confidence reads as `0.0`, missing OOV flag as `false`.
    pub fn to_token(&self) -> Option<Token> {
        let fields = self.0.as_array()?;
        if fields.len() < 2 {
            return None;
        }

        let surface = text_field(&fields[0])?;
        let tag = text_field(&fields[1])?;
        let confidence = fields.get(2).and_then(Value::as_f64).unwrap_or(0.0);
        let oov = fields.get(3).map(flag_field).unwrap_or(false);

        Some(Token {
            surface,
            tag,
            confidence,
            oov,
        })
    }
}

impl From<&Token> for TokenRecord {
    fn from(token: &Token) -> Self {
        TokenRecord(Value::Array(vec![
            Value::from(token.surface.as_str()),
            Value::from(token.tag.as_str()),
            Value::from(token.confidence),
            Value::from(u8::from(token.oov)),
        ]))
    }
}

fn text_field(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn flag_field(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v > 0.0),
        _ => false,
    }
}

/// Convert raw records to tokens, returning how many were malformed
pub fn ingest(records: &[TokenRecord]) -> (Vec<Token>, usize) {
    let mut tokens = Vec::with_capacity(records.len());
    let mut malformed = 0;

    for (index, record) in records.iter().enumerate() {
        match record.to_token() {
            Some(token) => tokens.push(token),
            None => {
                malformed += 1;
                tracing::warn!(index, record = %record.0, "skipping malformed token record");
            }
        }
    }

    (tokens, malformed)
}

/// A sentence and its tagger output
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaggedSentence {
    #[serde(default)]
    pub sentence: String,
    #[serde(default)]
    pub tokens: Vec<TokenRecord>,
}

impl TaggedSentence {
    pub fn new(sentence: impl Into<String>, tokens: &[Token]) -> Self {
        Self {
            sentence: sentence.into(),
            tokens: tokens.iter().map(TokenRecord::from).collect(),
        }
    }
}

/// A post or comment split into tagged sentences
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub community: Option<String>,
    #[serde(default)]
    pub full_text: String,
    #[serde(default, alias = "sentence_segments")]
    pub sentences: Vec<TaggedSentence>,
}
