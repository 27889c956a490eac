//! Token filtering
//!
//! Word-piece taggers emit fragments such as `##tion` and punctuation or
//! number tokens. Only whole alphabetic words longer than two characters
//! reach the relation extractor and the entity counts.

use cogmap_core::TaggedToken;

/// Prefix marking a word piece that continues the previous token
pub const SUBWORD_PREFIX: &str = "##";

/// A word that is purely alphabetic and longer than two characters
pub fn is_clean_word(word: &str) -> bool {
    word.chars().count() > 2 && word.chars().all(char::is_alphabetic)
}

/// Keep tokens that are clean whole words, preserving order
pub fn filter_tokens(tokens: Vec<TaggedToken>) -> Vec<TaggedToken> {
    tokens
        .into_iter()
        .filter(|t| !t.word.starts_with(SUBWORD_PREFIX) && is_clean_word(&t.word))
        .collect()
}
