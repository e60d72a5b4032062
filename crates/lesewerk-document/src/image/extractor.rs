// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image extraction strategy.

use std::sync::Arc;

use lesewerk_core::FileClassification;
use lesewerk_core::error::ExtractError;
use tracing::{info, instrument};

use crate::scan::session::{OcrBackend, OcrWorkerSession};

/// OCR over `image/*` uploads. Every call gets its own worker session.
#[derive(Debug, Clone)]
pub struct ImageExtractor {
    backend: Arc<dyn OcrBackend>,
}

impl ImageExtractor {
    pub fn new(backend: Arc<dyn OcrBackend>) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &dyn OcrBackend {
        self.backend.as_ref()
    }

    /// Recognise the text in one image.
    ///
    /// The session is released before this returns, on success and failure
    /// alike. A non-image classification fails before any engine starts.
    #[instrument(skip_all, fields(
        classification = %classification,
        bytes_len = bytes.len(),
        backend = self.backend.name(),
    ))]
    pub fn extract(
        &self,
        classification: &FileClassification,
        bytes: &[u8],
    ) -> Result<String, ExtractError> {
        if !classification.is_image() {
            return Err(ExtractError::not_an_image(&classification.to_string()));
        }

        let session = OcrWorkerSession::acquire(self.backend.as_ref())?;
        let text = session.recognize(bytes)?;

        info!(chars = text.chars().count(), "Image extraction complete");
        Ok(text)
    }
}
