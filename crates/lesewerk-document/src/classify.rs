// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// File type classification from a declared MIME type.

use lesewerk_core::FileClassification;

/// Split a declared MIME type into `(category, subtype)`.
///
/// The input must consist of exactly two parts around a single `/`. Anything
/// else returns `None`, which dispatch treats as unsupported. No
/// normalisation is applied: case, whitespace and parameters are kept as-is.
pub fn classify(mime_type: &str) -> Option<FileClassification> {
    let mut parts = mime_type.split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(category), Some(subtype), None) => Some(FileClassification::new(category, subtype)),
        _ => None,
    }
}
