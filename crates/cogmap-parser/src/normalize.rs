//! Page text normalization
//!
//! Extracted PDF text carries ligatures, stray control bytes and ragged
//! line wrapping. Normalization keeps printable 7-bit characters only,
//! folds every whitespace run into a single space and trims both ends.

/// Whether a character survives normalization as-is
fn is_printable_ascii(c: char) -> bool {
    (' '..='~').contains(&c)
}

/// Normalize raw page text
///
/// Non-printable and non-ASCII characters are dropped before whitespace is
/// collapsed, so a dropped character never leaves a double space behind and
/// `normalize_text(normalize_text(s)) == normalize_text(s)`.
pub fn normalize_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for c in text.chars() {
        if c.is_whitespace() {
            pending_space = true;
        } else if is_printable_ascii(c) {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(normalize_text("a  b\t\tc\n\nd"), "a b c d");
    }

    #[test]
    fn test_trims() {
        assert_eq!(normalize_text("   hello world \n"), "hello world");
        assert_eq!(normalize_text(" \t\n"), "");
        assert_eq!(normalize_text(""), "");
    }

    #[test]
    fn test_strips_non_ascii() {
        assert_eq!(normalize_text("caf\u{e9} na\u{ef}ve"), "caf nave");
        assert_eq!(normalize_text("\u{fb01}nance"), "nance");
    }

    #[test]
    fn test_dropped_char_between_spaces() {
        assert_eq!(normalize_text("a \u{2022} b"), "a b");
    }

    #[test]
    fn test_form_feed_and_controls() {
        assert_eq!(normalize_text("page one\x0Cpage two"), "page one page two");
        assert_eq!(normalize_text("bell\x07ing"), "belling");
    }

    proptest! {
        #[test]
        fn prop_idempotent(s in "\\PC*") {
            let once = normalize_text(&s);
            prop_assert_eq!(normalize_text(&once), once);
        }

        #[test]
        fn prop_output_is_printable_ascii(s in ".*") {
            let out = normalize_text(&s);
            prop_assert!(out.chars().all(|c| (' '..='~').contains(&c)));
            prop_assert!(!out.contains("  "));
            prop_assert_eq!(out.trim(), out.as_str());
        }
    }
}
