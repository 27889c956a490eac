//! Relation Extraction (RE) module
//!
//! Positional subject-verb-object extraction: the first noun is the
//! subject, the first verb the predicate and the second noun the object.
//! Grammatical roles are not checked, so "the mouse was chased by the cat"
//! yields (mouse, chased, cat).

use cogmap_core::{pos, TaggedToken, Triple};

use crate::filter::is_clean_word;

/// Build the positional triple for one sentence, if it has enough tags
///
/// Needs at least two nouns (NOUN or PROPN) and one verb.
pub fn candidate_triple(pos_tokens: &[TaggedToken]) -> Option<Triple> {
    let mut nouns = pos_tokens.iter().filter(|t| pos::is_nominal(&t.group));
    let mut verbs = pos_tokens.iter().filter(|t| pos::is_verb(&t.group));

    let subject = nouns.next()?;
    let object = nouns.next()?;
    let verb = verbs.next()?;

    Some(Triple::new(&subject.word, &verb.word, &object.word))
}

/// Whether a candidate triple may enter the graph
///
/// Rejects self-relations and any triple with a field that is not a
/// clean word.
pub fn is_acceptable(triple: &Triple) -> bool {
    triple.subject != triple.object
        && is_clean_word(&triple.subject)
        && is_clean_word(&triple.verb)
        && is_clean_word(&triple.object)
}

/// Extract at most one accepted triple from a sentence's POS tokens
pub fn extract_svo(pos_tokens: &[TaggedToken]) -> Option<Triple> {
    candidate_triple(pos_tokens).filter(is_acceptable)
}
