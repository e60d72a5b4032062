// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory OCR backend that counts sessions, for lifecycle tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::session::{OcrBackend, OcrFailure, RecognitionSession};

/// Echoes the image bytes back as text. [`CountingBackend::FAIL`] makes
/// recognition fail, [`CountingBackend::PANIC`] makes it panic.
#[derive(Debug, Default)]
pub(crate) struct CountingBackend {
    opened: Arc<AtomicUsize>,
    released: Arc<AtomicUsize>,
    unavailable: bool,
    languages: Mutex<Vec<String>>,
}

impl CountingBackend {
    pub(crate) const FAIL: &'static [u8] = b"<fail>";
    pub(crate) const PANIC: &'static [u8] = b"<panic>";

    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// A backend whose engine never starts.
    pub(crate) fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub(crate) fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub(crate) fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    pub(crate) fn last_languages(&self) -> Vec<String> {
        self.languages.lock().map(|l| l.clone()).unwrap_or_default()
    }
}

impl OcrBackend for CountingBackend {
    fn name(&self) -> &'static str {
        "counting"
    }

    fn is_available(&self) -> bool {
        !self.unavailable
    }

    fn open_session(
        &self,
        languages: &[&str],
    ) -> Result<Box<dyn RecognitionSession>, OcrFailure> {
        if self.unavailable {
            return Err(OcrFailure::Unavailable("test backend switched off".into()));
        }
        if let Ok(mut last) = self.languages.lock() {
            *last = languages.iter().map(|l| l.to_string()).collect();
        }
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(CountingSession {
            released: Arc::clone(&self.released),
        }))
    }
}

struct CountingSession {
    released: Arc<AtomicUsize>,
}

impl RecognitionSession for CountingSession {
    fn recognize(&mut self, image: &[u8]) -> Result<String, OcrFailure> {
        if image == CountingBackend::FAIL {
            return Err(OcrFailure::Recognition("forced failure".into()));
        }
        if image == CountingBackend::PANIC {
            panic!("forced panic inside recognition");
        }
        if image.is_empty() {
            return Err(OcrFailure::Decode("empty image".into()));
        }
        Ok(String::from_utf8_lossy(image).into_owned())
    }

    fn terminate(self: Box<Self>) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}
