// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// OCR backends and the scoped worker session.
//
// A backend knows how to bring up one recognition engine instance. The
// `OcrWorkerSession` guard owns that instance for exactly one recognition and
// releases it in `Drop`, so the engine is torn down on every exit path:
// success, classified failure, early return, or panic unwinding.

use lesewerk_core::error::ExtractError;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

/// Fixed recognition language set (tesseract codes): English + Portuguese.
pub const RECOGNITION_LANGUAGES: &[&str] = &["eng", "por"];

/// Engine-level failure, before re-classification into `ExtractError`.
#[derive(Debug, Error)]
pub enum OcrFailure {
    /// The engine could not be brought up (missing models, missing binary,
    /// missing language data).
    #[error("OCR engine unavailable: {0}")]
    Unavailable(String),

    /// The bytes could not be read as an image.
    #[error("could not decode image: {0}")]
    Decode(String),

    /// The engine ran and failed.
    #[error("recognition failed: {0}")]
    Recognition(String),
}

/// A source of OCR engine instances.
pub trait OcrBackend: Send + Sync + std::fmt::Debug {
    /// Short identifier for logs and the health endpoint.
    fn name(&self) -> &'static str;

    /// Cheap check that a session could be opened (models or binary present).
    fn is_available(&self) -> bool;

    /// Bring up a fresh engine instance for `languages`.
    fn open_session(&self, languages: &[&str])
    -> Result<Box<dyn RecognitionSession>, OcrFailure>;
}

/// One initialised engine instance.
pub trait RecognitionSession {
    /// Recognise the text in an encoded image.
    fn recognize(&mut self, image: &[u8]) -> Result<String, OcrFailure>;

    /// Release everything the instance holds. Called exactly once.
    fn terminate(self: Box<Self>);
}

/// Lifecycle of an [`OcrWorkerSession`]. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Initializing,
    Ready,
    Recognizing,
    Terminated,
}

/// Scoped OCR engine instance: acquired per image, used once, always released.
pub struct OcrWorkerSession {
    id: Uuid,
    backend: &'static str,
    state: SessionState,
    engine: Option<Box<dyn RecognitionSession>>,
}

impl OcrWorkerSession {
    /// Bring up an engine with the fixed language set.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::EngineInitFailed`] when the backend cannot
    /// create an instance.
    pub fn acquire(backend: &dyn OcrBackend) -> Result<Self, ExtractError> {
        let id = Uuid::new_v4();
        let mut state = SessionState::Uninitialized;
        debug!(session = %id, backend = backend.name(), ?state, "Acquiring OCR session");

        state = SessionState::Initializing;
        debug!(session = %id, ?state, languages = ?RECOGNITION_LANGUAGES, "Initialising OCR engine");

        let engine = backend
            .open_session(RECOGNITION_LANGUAGES)
            .map_err(|err| {
                warn!(session = %id, backend = backend.name(), error = %err, "OCR engine failed to start");
                ExtractError::EngineInitFailed(err.to_string())
            })?;

        state = SessionState::Ready;
        debug!(session = %id, ?state, "OCR session ready");

        Ok(Self {
            id,
            backend: backend.name(),
            state,
            engine: Some(engine),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Run recognition once. Consumes the session; the engine is released
    /// before this returns, whatever the outcome.
    pub fn recognize(mut self, image: &[u8]) -> Result<String, ExtractError> {
        let engine = self
            .engine
            .as_mut()
            .ok_or_else(|| ExtractError::image_failed("OCR session has no engine"))?;

        self.state = SessionState::Recognizing;
        debug!(session = %self.id, state = ?self.state, bytes_len = image.len(), "Recognising");

        engine.recognize(image).map_err(|err| {
            warn!(session = %self.id, backend = self.backend, error = %err, "OCR recognition failed");
            ExtractError::image_failed(err.to_string())
        })
    }
}

impl Drop for OcrWorkerSession {
    fn drop(&mut self) {
        if let Some(engine) = self.engine.take() {
            engine.terminate();
            self.state = SessionState::Terminated;
            debug!(session = %self.id, backend = self.backend, state = ?self.state, "OCR session released");
        }
    }
}

impl std::fmt::Debug for OcrWorkerSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OcrWorkerSession")
            .field("id", &self.id)
            .field("backend", &self.backend)
            .field("state", &self.state)
            .finish()
    }
}
