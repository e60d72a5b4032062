// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF extraction strategy.

use lesewerk_core::FileClassification;
use lesewerk_core::error::ExtractError;
use tracing::{info, instrument};

use super::reader::PdfReader;

/// Text-layer extraction for `application/pdf` uploads.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract the text of every page.
    ///
    /// Re-checks that the classification really is `application/pdf` and
    /// fails fast otherwise, even though dispatch already looked at it.
    #[instrument(skip_all, fields(classification = %classification, bytes_len = bytes.len()))]
    pub fn extract(
        &self,
        classification: &FileClassification,
        bytes: &[u8],
    ) -> Result<String, ExtractError> {
        if !classification.is_pdf() {
            return Err(ExtractError::not_a_pdf(&classification.to_string()));
        }

        let reader = PdfReader::from_bytes(bytes)?;
        let text = reader.extract_text()?;

        info!(
            pages = reader.page_count(),
            chars = text.chars().count(),
            "PDF extraction complete"
        );
        Ok(text)
    }
}
