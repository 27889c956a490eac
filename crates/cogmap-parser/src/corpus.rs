//! Corpus assembly
//!
//! Walks a directory (non-recursively), parses every PDF it finds and
//! joins the normalized text of all non-empty pages into one string, each
//! page followed by a newline.

use std::path::{Path, PathBuf};

use crate::{normalize_text, DocumentParser, FileType, ParserError, PdfParser, Result};

/// Normalized text gathered from a directory of documents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    /// Concatenated normalized page text
    pub text: String,

    /// Number of documents parsed
    pub documents: usize,

    /// Number of pages that contributed text
    pub pages: usize,
}

impl Corpus {
    /// Whether no page contributed any text
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Append one raw page; returns false when the page had no text
    pub fn push_page(&mut self, raw: &str) -> bool {
        let cleaned = normalize_text(raw);
        if cleaned.is_empty() {
            return false;
        }
        self.text.push_str(&cleaned);
        self.text.push('\n');
        self.pages += 1;
        true
    }
}

/// Extracts a corpus from a directory of documents
pub struct CorpusExtractor {
    parser: Box<dyn DocumentParser>,
}

impl CorpusExtractor {
    /// Create an extractor backed by the PDF parser
    pub fn new() -> Self {
        Self::with_parser(PdfParser::new())
    }

    /// Create an extractor with a custom parser
    pub fn with_parser<P: DocumentParser + 'static>(parser: P) -> Self {
        Self {
            parser: Box::new(parser),
        }
    }

    /// List the documents in `dir` this extractor will read, sorted by name
    pub fn list_documents(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let io_err = |e| ParserError::IoError {
            path: dir.display().to_string(),
            source: e,
        };

        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            if self.parser.can_parse(FileType::from_path(&path)) {
                paths.push(path);
            } else {
                tracing::debug!("Skipping {}: not a PDF", path.display());
            }
        }
        paths.sort();

        Ok(paths)
    }

    /// Read every document in `dir` into a single normalized corpus
    pub fn extract_dir(&self, dir: &Path) -> Result<Corpus> {
        let mut corpus = Corpus::default();

        for path in self.list_documents(dir)? {
            let doc = self.parser.parse(&path)?;
            let before = corpus.pages;
            for page in &doc.pages {
                corpus.push_page(page);
            }
            corpus.documents += 1;

            tracing::debug!(
                "{}: {} of {} pages had text",
                doc.file_path,
                corpus.pages - before,
                doc.page_count()
            );
        }

        tracing::info!(
            "Extracted {} characters from {} pages in {} documents",
            corpus.text.len(),
            corpus.pages,
            corpus.documents
        );

        Ok(corpus)
    }
}

impl Default for CorpusExtractor {
    fn default() -> Self {
        Self::new()
    }
}
