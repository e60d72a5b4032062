// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module: OCR-based text extraction from raster images.

pub mod extractor;

pub use extractor::ImageExtractor;
