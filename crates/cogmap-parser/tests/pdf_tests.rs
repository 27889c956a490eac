//! PDF Extraction Integration Tests
//!
//! Reads a small two-page PDF fixture through the parser and the corpus
//! extractor.

use std::path::PathBuf;

use cogmap_parser::{normalize_text, CorpusExtractor, DocumentParser, FileType, PdfParser};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn test_pdf_pages_in_order() {
    let doc = PdfParser::new()
        .parse(&fixture("two_pages.pdf"))
        .unwrap();

    assert_eq!(doc.file_type, FileType::Pdf);
    assert_eq!(doc.page_count(), 2);
    assert_eq!(normalize_text(&doc.pages[0]), "Cognitive");
    assert_eq!(normalize_text(&doc.pages[1]), "Mapping");
}

#[test]
fn test_corpus_from_pdf_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::copy(fixture("two_pages.pdf"), dir.path().join("Notes.PDF")).unwrap();
    std::fs::write(dir.path().join("readme.txt"), "not a document").unwrap();

    let corpus = CorpusExtractor::new().extract_dir(dir.path()).unwrap();

    assert_eq!(corpus.documents, 1);
    assert_eq!(corpus.pages, 2);
    assert_eq!(corpus.text, "Cognitive\nMapping\n");
}
