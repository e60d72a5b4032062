// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Liveness and health endpoints.

use axum::{Json, extract::State};
use serde::Serialize;
use serde_json::{Value, json};

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub ocr_backend: &'static str,
    /// Whether the OCR models or binary are in place. Image uploads fail
    /// with an engine error while this is false.
    pub ocr_available: bool,
}

/// `GET /`
pub async fn liveness() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let processor = state.processor();
    let ocr_backend = processor.ocr_backend().name();
    // The tesseract probe spawns a process.
    let ocr_available = tokio::task::spawn_blocking(move || processor.ocr_backend().is_available())
        .await
        .unwrap_or(false);

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        ocr_backend,
        ocr_available,
    })
}
