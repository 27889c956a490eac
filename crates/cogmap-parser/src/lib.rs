//! cogmap Parser - Document text extraction
//!
//! Reads every PDF in a directory, normalizes the text of each page and
//! concatenates the pages into a single corpus string.
//!
//! Parsers implement the `DocumentParser` trait and produce a
//! `ParsedDocument` holding raw page texts. `CorpusExtractor` walks a
//! directory, dispatches files to a parser and assembles the `Corpus`.

use std::path::Path;
use thiserror::Error;

pub mod corpus;
pub mod normalize;
pub mod pdf;

pub use corpus::{Corpus, CorpusExtractor};
pub use normalize::normalize_text;
pub use pdf::PdfParser;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur during document parsing
#[derive(Error, Debug)]
pub enum ParserError {
    /// IO error while reading a file or directory
    #[error("IO error reading {path}: {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// PDF parsing error
    #[error("PDF parsing error in {path}: {message}")]
    PdfError { path: String, message: String },
}

pub type Result<T> = std::result::Result<T, ParserError>;

// ============================================================================
// Parsed Document Types
// ============================================================================

/// A parsed document with raw per-page text
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    /// Original file path
    pub file_path: String,

    /// Detected file type
    pub file_type: FileType,

    /// Raw text of each page, in page order
    pub pages: Vec<String>,
}

impl ParsedDocument {
    /// Create a new parsed document
    pub fn new(file_path: impl Into<String>, file_type: FileType) -> Self {
        Self {
            file_path: file_path.into(),
            file_type,
            pages: Vec::new(),
        }
    }

    /// Set pages
    pub fn with_pages(mut self, pages: Vec<String>) -> Self {
        self.pages = pages;
        self
    }

    /// Number of pages
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Supported file types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Pdf,
    Unknown,
}

impl FileType {
    /// Detect file type from the case-insensitive suffix of the file name
    ///
    /// A file named just `.pdf` counts as a PDF.
    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        if name.ends_with(".pdf") {
            Self::Pdf
        } else {
            Self::Unknown
        }
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pdf => write!(f, "pdf"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

// ============================================================================
// Parser Trait
// ============================================================================

/// Trait for document parsers
pub trait DocumentParser: Send + Sync {
    /// Parse a document from a file path
    fn parse(&self, path: &Path) -> Result<ParsedDocument>;

    /// Get supported file types
    fn supported_types(&self) -> &[FileType];

    /// Check if this parser can handle a file type
    fn can_parse(&self, file_type: FileType) -> bool {
        self.supported_types().contains(&file_type)
    }
}

// ============================================================================
// Tests
// ============================================================================
