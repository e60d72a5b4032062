// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// lesewerk-document: Turns one uploaded document into plain text.
//
// Classifies the declared MIME type, picks an extraction strategy (OCR for
// images, text-layer extraction for PDFs), runs it, and re-classifies every
// library failure into the closed `ExtractError` taxonomy.

pub mod classify;
pub mod image;
pub mod pdf;
pub mod processor;
pub mod scan;

// Re-export the primary structs so callers can use `lesewerk_document::DocumentProcessor` etc.
pub use classify::classify;
pub use crate::image::extractor::ImageExtractor;
pub use pdf::extractor::PdfExtractor;
pub use pdf::reader::PdfReader;
pub use processor::DocumentProcessor;
pub use scan::session::{OcrBackend, OcrWorkerSession, RecognitionSession, SessionState};
