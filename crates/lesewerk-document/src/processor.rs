// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document processor: the single entry point from upload to text.
//
// Flow: presence check, classify, select a strategy, dispatch. Every failure
// leaves here as an `ExtractError`; there is no partial text on error.

use std::sync::Arc;

use lesewerk_core::config::OcrSettings;
use lesewerk_core::error::ExtractError;
use lesewerk_core::{Extraction, ExtractionResult, Strategy, UploadedFile};
use tracing::{info, instrument, warn};

use crate::classify::classify;
use crate::image::ImageExtractor;
use crate::pdf::PdfExtractor;
use crate::scan::{self, OcrBackend};

/// Owns one extractor per strategy. Shared across requests; holds no
/// per-request state.
#[derive(Debug, Clone)]
pub struct DocumentProcessor {
    image: ImageExtractor,
    pdf: PdfExtractor,
}

impl DocumentProcessor {
    pub fn new(backend: Arc<dyn OcrBackend>) -> Self {
        Self {
            image: ImageExtractor::new(backend),
            pdf: PdfExtractor::new(),
        }
    }

    /// Processor backed by the OCR engine named in `settings`.
    pub fn from_settings(settings: &OcrSettings) -> Self {
        Self::new(scan::backend_from_settings(settings))
    }

    pub fn ocr_backend(&self) -> &dyn OcrBackend {
        self.image.backend()
    }

    /// Extract the text of one uploaded file.
    ///
    /// # Errors
    ///
    /// - [`ExtractError::MissingInput`] when `file` is `None`.
    /// - [`ExtractError::UnsupportedType`] when the declared MIME type is
    ///   malformed or matches no strategy.
    /// - [`ExtractError::EngineInitFailed`] when the OCR engine cannot start.
    /// - [`ExtractError::ExtractionFailed`] when the selected strategy fails.
    #[instrument(skip_all, fields(
        mime_type = file.map(UploadedFile::mime_type),
        bytes_len = file.map(UploadedFile::len),
    ))]
    pub fn process(&self, file: Option<&UploadedFile>) -> ExtractionResult {
        let result = self.dispatch(file);
        match &result {
            Ok(extraction) => info!(
                strategy = %extraction.strategy,
                chars = extraction.text.chars().count(),
                "Document processed"
            ),
            Err(err) => warn!(kind = %err.kind(), error = %err, "Document processing failed"),
        }
        result
    }

    fn dispatch(&self, file: Option<&UploadedFile>) -> ExtractionResult {
        let file = file.ok_or(ExtractError::MissingInput)?;

        let classification = classify(file.mime_type())
            .ok_or_else(|| ExtractError::UnsupportedType(file.mime_type().to_string()))?;
        let strategy = Strategy::select(&classification)
            .ok_or_else(|| ExtractError::UnsupportedType(file.mime_type().to_string()))?;

        let text = match strategy {
            Strategy::Image => self.image.extract(&classification, file.bytes())?,
            Strategy::Pdf => self.pdf.extract(&classification, file.bytes())?,
        };
        Ok(Extraction { text, strategy })
    }
}
