//! Lexicon tagger
//!
//! Offline rule-based tagging for runs without an inference endpoint:
//! - Part of speech: lexicon lookup, closed-class word table, then
//!   suffix and capitalization heuristics
//! - Entities: dictionary matching plus a capitalized-span pattern
//!
//! Extra lexicon entries can be loaded from a TOML file:
//!
//! ```toml
//! [pos]
//! chased = "VERB"
//!
//! [entities]
//! "World Health Organization" = "ORG"
//! ```

use std::collections::{HashMap, HashSet};
use std::path::Path;

use async_trait::async_trait;
use cogmap_core::{pos, CogmapError, Result, TaggedToken};
use regex::Regex;
use serde::Deserialize;

use crate::Tagger;

/// Category assigned to capitalized spans not found in the dictionary
const PATTERN_ENTITY: &str = "MISC";

const DICTIONARY_SCORE: f32 = 0.95;
const PATTERN_SCORE: f32 = 0.6;

/// Closed-class words and their universal POS tags
const CLOSED_CLASS: &[(&str, &str)] = &[
    ("a", "DET"),
    ("an", "DET"),
    ("the", "DET"),
    ("this", "DET"),
    ("that", "DET"),
    ("these", "DET"),
    ("those", "DET"),
    ("each", "DET"),
    ("every", "DET"),
    ("some", "DET"),
    ("any", "DET"),
    ("no", "DET"),
    ("of", "ADP"),
    ("in", "ADP"),
    ("on", "ADP"),
    ("at", "ADP"),
    ("by", "ADP"),
    ("for", "ADP"),
    ("with", "ADP"),
    ("from", "ADP"),
    ("into", "ADP"),
    ("over", "ADP"),
    ("under", "ADP"),
    ("about", "ADP"),
    ("between", "ADP"),
    ("through", "ADP"),
    ("during", "ADP"),
    ("after", "ADP"),
    ("before", "ADP"),
    ("to", "PART"),
    ("not", "PART"),
    ("and", "CCONJ"),
    ("or", "CCONJ"),
    ("but", "CCONJ"),
    ("nor", "CCONJ"),
    ("if", "SCONJ"),
    ("because", "SCONJ"),
    ("while", "SCONJ"),
    ("although", "SCONJ"),
    ("whether", "SCONJ"),
    ("i", "PRON"),
    ("you", "PRON"),
    ("he", "PRON"),
    ("she", "PRON"),
    ("it", "PRON"),
    ("we", "PRON"),
    ("they", "PRON"),
    ("me", "PRON"),
    ("him", "PRON"),
    ("her", "PRON"),
    ("us", "PRON"),
    ("them", "PRON"),
    ("its", "PRON"),
    ("their", "PRON"),
    ("our", "PRON"),
    ("his", "PRON"),
    ("which", "PRON"),
    ("who", "PRON"),
    ("what", "PRON"),
    ("is", "AUX"),
    ("are", "AUX"),
    ("was", "AUX"),
    ("were", "AUX"),
    ("be", "AUX"),
    ("been", "AUX"),
    ("being", "AUX"),
    ("has", "AUX"),
    ("have", "AUX"),
    ("had", "AUX"),
    ("do", "AUX"),
    ("does", "AUX"),
    ("did", "AUX"),
    ("will", "AUX"),
    ("would", "AUX"),
    ("can", "AUX"),
    ("could", "AUX"),
    ("should", "AUX"),
    ("may", "AUX"),
    ("might", "AUX"),
    ("must", "AUX"),
    ("very", "ADV"),
    ("also", "ADV"),
    ("then", "ADV"),
    ("there", "ADV"),
    ("here", "ADV"),
    ("often", "ADV"),
];

/// Suffix rules applied to unknown lowercase words, first match wins
const SUFFIX_RULES: &[(&str, &str)] = &[
    ("ly", "ADV"),
    ("ing", "VERB"),
    ("ed", "VERB"),
    ("ize", "VERB"),
    ("ise", "VERB"),
    ("ous", "ADJ"),
    ("ful", "ADJ"),
    ("ive", "ADJ"),
    ("able", "ADJ"),
    ("ible", "ADJ"),
    ("ical", "ADJ"),
    ("less", "ADJ"),
];

/// Lexicon file contents
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LexiconFile {
    pos: HashMap<String, String>,
    entities: HashMap<String, String>,
}

/// Rule-based tagger using a word lexicon and regex patterns
pub struct LexiconTagger {
    /// Lowercase word -> POS tag
    pos_lexicon: HashMap<String, String>,
    /// Lowercase entity surface -> (case-insensitive matcher, category)
    entity_dictionary: HashMap<String, (Regex, String)>,
    /// Word and punctuation tokenizer
    token_pattern: Regex,
    /// Runs of capitalized words
    span_pattern: Regex,
}

impl LexiconTagger {
    /// Create a tagger with the built-in closed-class table
    pub fn new() -> Self {
        let mut tagger = Self {
            pos_lexicon: HashMap::new(),
            entity_dictionary: HashMap::new(),
            token_pattern: Regex::new(r"[A-Za-z]+(?:'[A-Za-z]+)?|[0-9]+(?:[.,][0-9]+)*|[^\sA-Za-z0-9]")
                .expect("valid token pattern"),
            span_pattern: Regex::new(r"\b[A-Z][A-Za-z]+(?:\s+[A-Z][A-Za-z]+)*\b")
                .expect("valid span pattern"),
        };

        for (word, tag) in CLOSED_CLASS {
            tagger.add_word(word, tag);
        }
        tagger
    }

    /// Create a tagger and extend it with entries from a TOML lexicon file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CogmapError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let file: LexiconFile = toml::from_str(&content)
            .map_err(|e| CogmapError::Lexicon(format!("{}: {e}", path.display())))?;

        let mut tagger = Self::new();
        for (word, tag) in &file.pos {
            tagger.add_word(word, tag);
        }
        for (term, category) in &file.entities {
            tagger.add_entity(term, category);
        }

        tracing::debug!(
            "Loaded lexicon {} ({} words, {} entities)",
            path.display(),
            file.pos.len(),
            file.entities.len()
        );

        Ok(tagger)
    }

    /// Add or replace a POS lexicon entry
    pub fn add_word(&mut self, word: &str, tag: &str) {
        self.pos_lexicon
            .insert(word.to_lowercase(), tag.to_uppercase());
    }

    /// Add or replace an entity dictionary entry
    pub fn add_entity(&mut self, term: &str, category: &str) {
        let pattern = format!("(?i){}", regex::escape(term));
        match Regex::new(&pattern) {
            Ok(matcher) => {
                self.entity_dictionary
                    .insert(term.to_lowercase(), (matcher, category.to_string()));
            }
            Err(e) => tracing::warn!("Skipping entity '{}': {}", term, e),
        }
    }

    fn is_closed_class(&self, word: &str) -> bool {
        let lower = word.to_lowercase();
        CLOSED_CLASS.iter().any(|(w, _)| *w == lower)
    }

    /// Tag a single word given its position in the sentence
    fn tag_word(&self, word: &str, sentence_initial: bool) -> &'static str {
        if let Some(tag) = self.pos_lexicon.get(&word.to_lowercase()) {
            return universal_tag(tag);
        }

        let first = word.chars().next().unwrap_or(' ');
        if first.is_ascii_digit() {
            return "NUM";
        }
        if !first.is_alphabetic() {
            return "PUNCT";
        }
        if first.is_uppercase() && !sentence_initial {
            return pos::PROPN;
        }

        let lower = word.to_lowercase();
        SUFFIX_RULES
            .iter()
            .find(|(suffix, _)| lower.len() > suffix.len() + 2 && lower.ends_with(suffix))
            .map(|(_, tag)| *tag)
            .unwrap_or(pos::NOUN)
    }

    /// Extract entities using dictionary lookup
    fn extract_by_dictionary(&self, text: &str) -> Vec<TaggedToken> {
        let mut entities = Vec::new();

        for (matcher, category) in self.entity_dictionary.values() {
            for mat in matcher.find_iter(text) {
                if !on_word_boundary(text, mat.start(), mat.end()) {
                    continue;
                }
                entities.push(
                    TaggedToken::new(mat.as_str(), category)
                        .with_span(mat.start(), mat.end())
                        .with_score(DICTIONARY_SCORE),
                );
            }
        }

        entities
    }

    /// Extract entities from runs of capitalized words
    fn extract_by_pattern(&self, text: &str) -> Vec<TaggedToken> {
        let mut entities = Vec::new();

        for mat in self.span_pattern.find_iter(text) {
            // Drop leading function words such as a sentence-initial "The"
            let mut start = mat.start();
            for word in mat.as_str().split_whitespace() {
                if !self.is_closed_class(word) {
                    break;
                }
                start += word.len();
                start += text[start..]
                    .chars()
                    .take_while(|c| c.is_whitespace())
                    .map(char::len_utf8)
                    .sum::<usize>();
            }

            if start >= mat.end() {
                continue;
            }

            // A lone capitalized first word is usually just sentence case
            let span = &text[start..mat.end()];
            if start == 0 && !span.contains(char::is_whitespace) {
                continue;
            }

            entities.push(
                TaggedToken::new(span, PATTERN_ENTITY)
                    .with_span(start, mat.end())
                    .with_score(PATTERN_SCORE),
            );
        }

        entities
    }

    /// Remove overlapping entities, keeping the highest score
    fn deduplicate(&self, mut entities: Vec<TaggedToken>) -> Vec<TaggedToken> {
        entities.sort_by(|a, b| {
            a.start
                .cmp(&b.start)
                .then(b.score.total_cmp(&a.score))
        });

        let mut result: Vec<TaggedToken> = Vec::new();
        let mut covered: HashSet<usize> = HashSet::new();

        for entity in entities {
            let (Some(start), Some(end)) = (entity.start, entity.end) else {
                continue;
            };
            if (start..end).any(|i| covered.contains(&i)) {
                continue;
            }
            covered.extend(start..end);
            result.push(entity);
        }

        result.sort_by_key(|e| e.start);
        result
    }
}

impl Default for LexiconTagger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tagger for LexiconTagger {
    async fn tag_entities(&self, sentence: &str) -> Result<Vec<TaggedToken>> {
        let mut entities = self.extract_by_dictionary(sentence);
        entities.extend(self.extract_by_pattern(sentence));

        Ok(self.deduplicate(entities))
    }

    async fn tag_pos(&self, sentence: &str) -> Result<Vec<TaggedToken>> {
        let tokens = self
            .token_pattern
            .find_iter(sentence)
            .enumerate()
            .map(|(i, mat)| {
                TaggedToken::new(mat.as_str(), self.tag_word(mat.as_str(), i == 0))
                    .with_span(mat.start(), mat.end())
            })
            .collect();

        Ok(tokens)
    }

    fn name(&self) -> &str {
        "lexicon"
    }
}

/// Map a lexicon tag onto the static universal tag set
fn universal_tag(tag: &str) -> &'static str {
    match tag {
        "NOUN" => pos::NOUN,
        "PROPN" => pos::PROPN,
        "VERB" => pos::VERB,
        "AUX" => "AUX",
        "ADJ" => "ADJ",
        "ADV" => "ADV",
        "ADP" => "ADP",
        "DET" => "DET",
        "PRON" => "PRON",
        "PART" => "PART",
        "CCONJ" => "CCONJ",
        "SCONJ" => "SCONJ",
        "NUM" => "NUM",
        "PUNCT" => "PUNCT",
        _ => "X",
    }
}

fn on_word_boundary(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{extract_svo, filter_tokens};
    use cogmap_core::Triple;
    use std::io::Write;

    fn tags(tokens: &[TaggedToken]) -> Vec<(&str, &str)> {
        tokens
            .iter()
            .map(|t| (t.word.as_str(), t.group.as_str()))
            .collect()
    }

    #[test]
    fn test_pos_heuristics() {
        let tagger = LexiconTagger::new();
        let tokens = tokio_test::block_on(tagger.tag_pos("The cat chased the mouse.")).unwrap();

        assert_eq!(
            tags(&tokens),
            vec![
                ("The", "DET"),
                ("cat", "NOUN"),
                ("chased", "VERB"),
                ("the", "DET"),
                ("mouse", "NOUN"),
                (".", "PUNCT"),
            ]
        );
        assert_eq!(tokens[2].start, Some(8));
        assert_eq!(tokens[2].end, Some(14));
    }

    #[test]
    fn test_pos_proper_nouns_and_numbers() {
        let tagger = LexiconTagger::new();
        let tokens =
            tokio_test::block_on(tagger.tag_pos("Researchers in Geneva published 12 reports"))
                .unwrap();

        assert_eq!(
            tags(&tokens),
            vec![
                ("Researchers", "NOUN"),
                ("in", "ADP"),
                ("Geneva", "PROPN"),
                ("published", "VERB"),
                ("12", "NUM"),
                ("reports", "NOUN"),
            ]
        );
    }

    #[test]
    fn test_lexicon_overrides_heuristics() {
        let mut tagger = LexiconTagger::new();
        tagger.add_word("bites", "verb");

        let tokens = tokio_test::block_on(tagger.tag_pos("dog bites man")).unwrap();
        let triple = extract_svo(&filter_tokens(tokens));

        assert_eq!(triple, Some(Triple::new("dog", "bites", "man")));
    }

    #[test]
    fn test_pattern_entities_skip_leading_determiner() {
        let tagger = LexiconTagger::new();
        let entities =
            tokio_test::block_on(tagger.tag_entities("The World Bank met Angela Merkel in Berlin."))
                .unwrap();

        let words: Vec<&str> = entities.iter().map(|e| e.word.as_str()).collect();
        assert_eq!(words, vec!["World Bank", "Angela Merkel", "Berlin"]);
        assert!(entities.iter().all(|e| e.group == PATTERN_ENTITY));
    }

    #[test]
    fn test_dictionary_wins_over_pattern() {
        let mut tagger = LexiconTagger::new();
        tagger.add_entity("World Bank", "ORG");

        let entities =
            tokio_test::block_on(tagger.tag_entities("Loans from the World Bank grew.")).unwrap();

        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].word, "World Bank");
        assert_eq!(entities[0].group, "ORG");
    }

    #[test]
    fn test_dictionary_respects_word_boundaries() {
        let mut tagger = LexiconTagger::new();
        tagger.add_entity("nasa", "ORG");

        let entities = tokio_test::block_on(tagger.tag_entities("nasals and nasa")).unwrap();
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].start, Some(11));
    }

    #[test]
    fn test_dictionary_matches_non_ascii_text() {
        let mut tagger = LexiconTagger::new();
        tagger.add_entity("\u{23a}bc", "ORG");
        tagger.add_entity("Z\u{fc}rich", "LOC");

        // Lowercasing changes the byte length of individual characters here
        let entities =
            tokio_test::block_on(tagger.tag_entities("\u{1e9e}\u{23a}bc")).unwrap();
        assert!(entities.is_empty());

        let entities =
            tokio_test::block_on(tagger.tag_entities("Flights to Z\u{dc}RICH resumed")).unwrap();
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].word, "Z\u{dc}RICH");
        assert_eq!(entities[0].group, "LOC");
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[pos]\nfund = \"VERB\"\n\n[entities]\n\"red cross\" = \"ORG\"\n"
        )
        .unwrap();

        let tagger = LexiconTagger::from_file(file.path()).unwrap();
        let tokens = tokio_test::block_on(tagger.tag_pos("donors fund clinics")).unwrap();
        assert_eq!(tokens[1].group, "VERB");

        let entities =
            tokio_test::block_on(tagger.tag_entities("the red cross helped")).unwrap();
        assert_eq!(entities[0].group, "ORG");
    }

    #[test]
    fn test_from_file_errors() {
        assert!(matches!(
            LexiconTagger::from_file(Path::new("/nonexistent/lexicon.toml")),
            Err(CogmapError::Io { .. })
        ));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[pos\nfund = ").unwrap();
        assert!(matches!(
            LexiconTagger::from_file(file.path()),
            Err(CogmapError::Lexicon(_))
        ));
    }
}
