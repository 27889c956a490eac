//! PDF document parser using pdf-extract
//!
//! Extracts the raw text of every page of a PDF file.

use std::path::Path;

use crate::{DocumentParser, FileType, ParsedDocument, ParserError, Result};

/// PDF document parser
#[derive(Debug, Default)]
pub struct PdfParser;

impl PdfParser {
    /// Create a new PDF parser
    pub fn new() -> Self {
        Self
    }

    /// Extract per-page text from a PDF file
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>> {
        let bytes = std::fs::read(path).map_err(|e| ParserError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        pdf_extract::extract_text_from_mem_by_pages(&bytes).map_err(|e| ParserError::PdfError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}

impl DocumentParser for PdfParser {
    fn parse(&self, path: &Path) -> Result<ParsedDocument> {
        let pages = self.extract_pages(path)?;

        tracing::debug!("Parsed {} ({} pages)", path.display(), pages.len());

        Ok(ParsedDocument::new(path.display().to_string(), FileType::Pdf).with_pages(pages))
    }

    fn supported_types(&self) -> &[FileType] {
        &[FileType::Pdf]
    }
}
