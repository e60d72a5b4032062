// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Closed error taxonomy for the extraction pipeline.
//
// Every failure raised by an underlying library (PDF parser, image decoder,
// OCR engine, tesseract subprocess) is re-classified into one of four kinds
// before it leaves a strategy. The `Display` text carries the full diagnostic
// detail for logs; `public_message` is the only text a client ever sees.

use serde::Serialize;
use thiserror::Error;

/// Client-facing message for a request without a file.
pub const MSG_MISSING_INPUT: &str = "No document uploaded";
/// Client-facing message for a MIME type that is neither image nor PDF.
pub const MSG_UNSUPPORTED_TYPE: &str = "Unsupported file type";
/// Client-facing message when no OCR session could be created.
pub const MSG_ENGINE_INIT: &str = "Error creating OCR worker";
/// Client-facing message for a failed recognition.
pub const MSG_IMAGE_FAILED: &str = "Error processing image";
/// Client-facing message for a failed PDF parse.
pub const MSG_PDF_FAILED: &str = "Error processing PDF";
/// Image strategy invoked on something that is not an image.
pub const MSG_NOT_AN_IMAGE: &str = "Image processor was chosen but no image was sent.";
/// PDF strategy invoked on something that is not a PDF.
pub const MSG_NOT_A_PDF: &str = "PDF processor was chosen but no PDF was sent.";

/// The four ways a request can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The boundary supplied no file.
    MissingInput,
    /// The declared MIME type is neither `image/*` nor `*/pdf`.
    UnsupportedType,
    /// The OCR engine could not be brought up.
    EngineInitFailed,
    /// A strategy ran and failed (bad bytes, engine error, re-validation).
    ExtractionFailed,
}

impl ErrorKind {
    /// HTTP status code the boundary answers with.
    pub fn http_status(self) -> u16 {
        match self {
            Self::MissingInput => 400,
            Self::UnsupportedType | Self::EngineInitFailed | Self::ExtractionFailed => 500,
        }
    }

    /// Stable snake_case identifier (used as a tracing field).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingInput => "missing_input",
            Self::UnsupportedType => "unsupported_type",
            Self::EngineInitFailed => "engine_init_failed",
            Self::ExtractionFailed => "extraction_failed",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified extraction failure.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("no document uploaded")]
    MissingInput,

    #[error("unsupported file type: {0:?}")]
    UnsupportedType(String),

    #[error("OCR engine could not be initialised: {0}")]
    EngineInitFailed(String),

    #[error("{message} ({detail})")]
    ExtractionFailed {
        /// Client-facing summary, one of the `MSG_*` constants.
        message: &'static str,
        /// Underlying cause, for logs only.
        detail: String,
    },
}

impl ExtractError {
    /// Recognition or image decoding failed.
    pub fn image_failed(detail: impl Into<String>) -> Self {
        Self::ExtractionFailed {
            message: MSG_IMAGE_FAILED,
            detail: detail.into(),
        }
    }

    /// PDF parsing or text extraction failed.
    pub fn pdf_failed(detail: impl Into<String>) -> Self {
        Self::ExtractionFailed {
            message: MSG_PDF_FAILED,
            detail: detail.into(),
        }
    }

    /// The image strategy was handed a non-image classification.
    pub fn not_an_image(mime_type: &str) -> Self {
        Self::ExtractionFailed {
            message: MSG_NOT_AN_IMAGE,
            detail: format!("declared type {mime_type:?}"),
        }
    }

    /// The PDF strategy was handed a non-PDF classification.
    pub fn not_a_pdf(mime_type: &str) -> Self {
        Self::ExtractionFailed {
            message: MSG_NOT_A_PDF,
            detail: format!("declared type {mime_type:?}"),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingInput => ErrorKind::MissingInput,
            Self::UnsupportedType(_) => ErrorKind::UnsupportedType,
            Self::EngineInitFailed(_) => ErrorKind::EngineInitFailed,
            Self::ExtractionFailed { .. } => ErrorKind::ExtractionFailed,
        }
    }

    pub fn http_status(&self) -> u16 {
        self.kind().http_status()
    }

    /// The message sent to clients. Never includes library error text.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::MissingInput => MSG_MISSING_INPUT,
            Self::UnsupportedType(_) => MSG_UNSUPPORTED_TYPE,
            Self::EngineInitFailed(_) => MSG_ENGINE_INIT,
            Self::ExtractionFailed { message, .. } => message,
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ExtractError>;
