// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Shared application state.

use std::sync::Arc;
use std::time::Duration;

use lesewerk_core::ServiceConfig;
use lesewerk_document::DocumentProcessor;

/// Cheap to clone; every handler gets its own handle to the same inner state.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServiceConfig,
    processor: Arc<DocumentProcessor>,
    request_timeout: Option<Duration>,
}

impl AppState {
    /// State with the OCR backend named in `config`.
    pub fn new(config: ServiceConfig) -> Self {
        let processor = DocumentProcessor::from_settings(&config.ocr);
        Self::with_processor(config, processor)
    }

    pub fn with_processor(config: ServiceConfig, processor: DocumentProcessor) -> Self {
        let request_timeout = config.request_timeout();
        Self {
            inner: Arc::new(AppStateInner {
                config,
                processor: Arc::new(processor),
                request_timeout,
            }),
        }
    }

    /// Override the extraction timeout, which the config only expresses in
    /// whole seconds.
    pub fn with_request_timeout(self, timeout: Duration) -> Self {
        let inner = AppStateInner {
            config: self.inner.config.clone(),
            processor: Arc::clone(&self.inner.processor),
            request_timeout: Some(timeout),
        };
        Self {
            inner: Arc::new(inner),
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.inner.config
    }

    pub fn processor(&self) -> Arc<DocumentProcessor> {
        Arc::clone(&self.inner.processor)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.inner.request_timeout
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("bind", &self.inner.config.bind_address())
            .field("ocr_backend", &self.inner.processor.ocr_backend().name())
            .field("request_timeout", &self.inner.request_timeout)
            .finish()
    }
}
