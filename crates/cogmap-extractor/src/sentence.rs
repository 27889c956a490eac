//! Sentence segmentation using Unicode sentence boundaries (UAX #29)
//!
//! Line breaks are treated as ordinary spaces: the corpus ends every page
//! with a newline and a sentence may continue on the next page.

use unicode_segmentation::UnicodeSegmentation;

/// Split text into trimmed, non-empty sentences
pub fn split_sentences(text: &str) -> Vec<String> {
    let flattened = text.replace(|c| c == '\n' || c == '\r', " ");

    flattened
        .unicode_sentences()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_sentences() {
        let sentences = split_sentences("The cat chased the mouse. The dog chased the cat.");
        assert_eq!(
            sentences,
            vec!["The cat chased the mouse.", "The dog chased the cat."]
        );
    }

    #[test]
    fn test_sentence_continues_across_page_break() {
        let sentences = split_sentences("The committee of the city\napproved the budget.\n");
        assert_eq!(
            sentences,
            vec!["The committee of the city approved the budget."]
        );
    }

    #[test]
    fn test_page_break_after_full_stop() {
        let sentences = split_sentences("First page ends here.\nSecond page starts. Done!\r\n");
        assert_eq!(
            sentences,
            vec!["First page ends here.", "Second page starts.", "Done!"]
        );
    }

    #[test]
    fn test_empty_text() {
        assert!(split_sentences("").is_empty());
        assert!(split_sentences(" \n \n").is_empty());
    }
}
