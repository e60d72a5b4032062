// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader: load an in-memory PDF and pull out its text layer using the
// `lopdf` crate.

use lesewerk_core::error::ExtractError;
use lopdf::Document;
use tracing::{debug, instrument};

/// Read-only view of a parsed PDF document.
///
/// Wraps `lopdf::Document`. Construction fails for byte streams that do not
/// parse as PDF and for documents that remain encrypted after loading.
pub struct PdfReader {
    /// The underlying lopdf document.
    document: Document,
}

impl PdfReader {
    // -- Construction ---------------------------------------------------------

    /// Create a reader from raw PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, ExtractError> {
        let document = Document::load_mem(data).map_err(|err| {
            ExtractError::pdf_failed(format!("failed to load PDF from memory: {err}"))
        })?;

        if document.is_encrypted() {
            return Err(ExtractError::pdf_failed("document is encrypted"));
        }

        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");

        Ok(Self { document })
    }

    // -- Inspection -----------------------------------------------------------

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    // -- Extraction -----------------------------------------------------------

    /// Concatenate the text of every page, in page order.
    ///
    /// The text comes out in whatever order the content streams draw it; no
    /// layout reconstruction happens here. If any page fails to decode the
    /// whole extraction fails, so callers never see partial text.
    #[instrument(skip(self), fields(pages = self.page_count()))]
    pub fn extract_text(&self) -> Result<String, ExtractError> {
        // lopdf pages are keyed by 1-indexed page number; BTreeMap keys come out sorted.
        let page_numbers: Vec<u32> = self.document.get_pages().keys().copied().collect();
        if page_numbers.is_empty() {
            return Ok(String::new());
        }

        let text = self.document.extract_text(&page_numbers).map_err(|err| {
            ExtractError::pdf_failed(format!("failed to extract text layer: {err}"))
        })?;

        debug!(chars = text.chars().count(), "PDF text extracted");
        Ok(text)
    }
}

impl std::fmt::Debug for PdfReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfReader")
            .field("pages", &self.page_count())
            .finish()
    }
}
