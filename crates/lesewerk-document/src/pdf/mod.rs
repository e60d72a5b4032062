// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module: text-layer extraction from uploaded PDF documents.

pub mod extractor;
pub mod reader;

pub use extractor::PdfExtractor;
pub use reader::PdfReader;
