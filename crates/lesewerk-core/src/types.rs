// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the extraction pipeline.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::ExtractError;

/// A single uploaded document: raw bytes plus the MIME type the client declared.
///
/// Owned by exactly one request and never shared.
#[derive(Clone)]
pub struct UploadedFile {
    bytes: Vec<u8>,
    mime_type: String,
    file_name: Option<String>,
}

impl UploadedFile {
    pub fn new(bytes: impl Into<Vec<u8>>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            mime_type: mime_type.into(),
            file_name: None,
        }
    }

    /// Attach the client-supplied file name (only ever used in logs).
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Declared MIME type, exactly as received.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Lowercase hex SHA-256 of the content, for correlating log lines
    /// without logging the document itself.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&self.bytes);
        hex::encode(hasher.finalize())
    }
}

// Manual impl: the derived one would dump the whole payload into logs.
impl std::fmt::Debug for UploadedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadedFile")
            .field("len", &self.bytes.len())
            .field("mime_type", &self.mime_type)
            .field("file_name", &self.file_name)
            .finish()
    }
}

/// The `(category, subtype)` pair derived from a declared MIME type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileClassification {
    /// Part before the separator, e.g. `image` or `application`.
    pub category: String,
    /// Part after the separator, e.g. `png` or `pdf`.
    pub subtype: String,
}

impl FileClassification {
    pub fn new(category: impl Into<String>, subtype: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            subtype: subtype.into(),
        }
    }

    pub fn is_image(&self) -> bool {
        self.category == "image"
    }

    /// Strictly `application/pdf`.
    pub fn is_pdf(&self) -> bool {
        self.category == "application" && self.subtype == "pdf"
    }
}

impl std::fmt::Display for FileClassification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.category, self.subtype)
    }
}

/// Extraction strategy selected for a classified file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Optical character recognition over a raster image.
    Image,
    /// Text-layer extraction from a PDF document.
    Pdf,
}

impl Strategy {
    /// Pick the strategy for a classification. First match wins: a `pdf`
    /// subtype goes to PDF extraction whatever its category, then any
    /// `image/*` goes to OCR. Everything else has no strategy.
    pub fn select(classification: &FileClassification) -> Option<Self> {
        if classification.subtype == "pdf" {
            Some(Self::Pdf)
        } else if classification.category == "image" {
            Some(Self::Image)
        } else {
            None
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Pdf => "pdf",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Successful outcome of processing one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Extraction {
    /// The extracted plain text.
    pub text: String,
    /// Which strategy produced it.
    pub strategy: Strategy,
}

/// Either extracted text or a classified failure, never both.
pub type ExtractionResult = std::result::Result<Extraction, ExtractError>;
