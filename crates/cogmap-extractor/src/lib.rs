//! cogmap Extractor - Sentence tagging and relation extraction
//!
//! Splits the corpus into sentences, runs entity recognition and
//! part-of-speech tagging through a `Tagger`, filters the tagger output
//! down to clean whole words and derives at most one
//! subject-verb-object triple per sentence.

use async_trait::async_trait;
use cogmap_core::{Result, TaggedToken};

pub mod filter;
pub mod http;
pub mod lexicon;
pub mod relation;
pub mod sentence;

pub use filter::{filter_tokens, is_clean_word, SUBWORD_PREFIX};
pub use http::HttpTagger;
pub use lexicon::LexiconTagger;
pub use relation::{candidate_triple, extract_svo, is_acceptable};
pub use sentence::split_sentences;

/// Sequence-labeling capability used by the pipeline
///
/// Implementations wrap an entity recognizer and a part-of-speech tagger.
/// Both operate on a single sentence and return tokens in sentence order.
#[async_trait]
pub trait Tagger: Send + Sync {
    /// Grouped entity spans with a category label (PER, ORG, LOC, MISC)
    async fn tag_entities(&self, sentence: &str) -> Result<Vec<TaggedToken>>;

    /// Whole-word tokens with a universal part-of-speech tag
    async fn tag_pos(&self, sentence: &str) -> Result<Vec<TaggedToken>>;

    /// Backend name for logging
    fn name(&self) -> &str;
}

/// Filtered tagger output for one sentence
#[derive(Debug, Clone, Default)]
pub struct TaggedSentence {
    pub entities: Vec<TaggedToken>,
    pub pos: Vec<TaggedToken>,
}

/// Tag a sentence with both taggers and keep only clean whole-word tokens
pub async fn tag_sentence(tagger: &dyn Tagger, sentence: &str) -> Result<TaggedSentence> {
    let entities = filter_tokens(tagger.tag_entities(sentence).await?);
    let pos = filter_tokens(tagger.tag_pos(sentence).await?);

    Ok(TaggedSentence { entities, pos })
}
