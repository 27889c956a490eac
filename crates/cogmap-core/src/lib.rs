//! cogmap Core - Domain types, errors and configuration
//!
//! This crate defines the abstractions shared across the cogmap pipeline:
//! - Tagged tokens as produced by entity and part-of-speech taggers
//! - Subject-verb-object triples
//! - Common error types
//! - Configuration management

pub mod config;

pub use config::{
    AppConfig, ConfigError, GraphConfig, InputConfig, LoggingConfig, RenderConfig, TaggerBackend,
    TaggerConfig,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for cogmap operations
#[derive(Error, Debug)]
pub enum CogmapError {
    #[error("IO error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Tagger error: {0}")]
    Tagger(String),

    #[error("Lexicon error: {0}")]
    Lexicon(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CogmapError>;

// ============================================================================
// Tagging
// ============================================================================

/// Part-of-speech categories the relation extractor cares about
pub mod pos {
    pub const NOUN: &str = "NOUN";
    pub const PROPN: &str = "PROPN";
    pub const VERB: &str = "VERB";

    /// Whether the tag marks a noun or proper noun
    pub fn is_nominal(tag: &str) -> bool {
        tag == NOUN || tag == PROPN
    }

    /// Whether the tag marks a verb
    pub fn is_verb(tag: &str) -> bool {
        tag == VERB
    }
}

/// A token emitted by a sequence-labeling tagger
///
/// Mirrors the record shape returned by token-classification services:
/// `word` is the surface text, `group` the entity category or POS tag,
/// and `start`/`end` the byte span inside the tagged sentence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedToken {
    pub word: String,

    #[serde(rename = "entity_group", alias = "entity")]
    pub group: String,

    #[serde(default)]
    pub score: f32,

    #[serde(default)]
    pub start: Option<usize>,

    #[serde(default)]
    pub end: Option<usize>,
}

impl TaggedToken {
    /// Create a token without span information
    pub fn new(word: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            group: group.into(),
            score: 1.0,
            start: None,
            end: None,
        }
    }

    /// Attach a byte span
    pub fn with_span(mut self, start: usize, end: usize) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    /// Set the confidence score
    pub fn with_score(mut self, score: f32) -> Self {
        self.score = score;
        self
    }
}

// ============================================================================
// Relations
// ============================================================================

/// A relationship triple (Subject, Verb, Object)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    pub subject: String,
    pub verb: String,
    pub object: String,
}

impl Triple {
    /// Create a new triple
    pub fn new(
        subject: impl Into<String>,
        verb: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            verb: verb.into(),
            object: object.into(),
        }
    }
}

impl std::fmt::Display for Triple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({} -[{}]-> {})", self.subject, self.verb, self.object)
    }
}

// ============================================================================
// Tests
// ============================================================================
