// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// OCR engines and the per-image worker session.

pub mod ocr;
pub mod session;
pub mod tesseract;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use lesewerk_core::config::{OcrBackendKind, OcrSettings};
use tracing::info;

pub use ocr::{OcrModelConfig, OcrsBackend};
pub use session::{OcrBackend, OcrFailure, OcrWorkerSession, RecognitionSession, SessionState};
pub use tesseract::TesseractBackend;

/// Build the backend named in the settings.
///
/// Nothing is loaded or spawned here; a missing model or binary surfaces
/// when the first session is opened.
pub fn backend_from_settings(settings: &OcrSettings) -> Arc<dyn OcrBackend> {
    let backend: Arc<dyn OcrBackend> = match settings.backend {
        OcrBackendKind::Ocrs => Arc::new(OcrsBackend::from_model_dir(&settings.model_dir)),
        OcrBackendKind::Tesseract => Arc::new(TesseractBackend::new(&settings.tesseract_bin)),
    };
    info!(
        backend = backend.name(),
        available = backend.is_available(),
        "OCR backend configured"
    );
    backend
}
