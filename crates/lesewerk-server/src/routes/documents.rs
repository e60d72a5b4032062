// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document upload endpoint.
//
// Reads the multipart field named `file`, hands it to the processor on the
// blocking pool, and answers with the text or a classified error.

use axum::{
    Json, Router,
    extract::{
        DefaultBodyLimit, Multipart, State,
        multipart::{MultipartError, MultipartRejection},
    },
    routing::post,
};
use lesewerk_core::UploadedFile;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppState;

/// Multipart field that carries the document.
pub const FILE_FIELD: &str = "file";

/// Declared type for a part sent without `Content-Type`.
const FALLBACK_MIME: &str = "application/octet-stream";

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub text: String,
}

pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/documents", post(extract_document))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}

/// `POST /api/v1/documents`
///
/// A request that is not multipart at all is treated like one with no file.
async fn extract_document(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ExtractResponse>, ApiError> {
    let file = match multipart {
        Ok(multipart) => read_file_field(multipart).await?,
        Err(rejection) => {
            debug!(reason = %rejection, "Request is not a multipart upload");
            None
        }
    };

    if let Some(file) = &file {
        info!(
            mime_type = file.mime_type(),
            file_name = file.file_name(),
            bytes_len = file.len(),
            sha256 = %file.digest(),
            "Document received"
        );
    }

    let processor = state.processor();
    let task = tokio::task::spawn_blocking(move || processor.process(file.as_ref()));

    let joined = match state.request_timeout() {
        Some(limit) => tokio::time::timeout(limit, task)
            .await
            .map_err(|_| ApiError::Timeout)?,
        None => task.await,
    };
    let extraction = joined.map_err(|err| ApiError::Internal(err.to_string()))??;

    Ok(Json(ExtractResponse {
        text: extraction.text,
    }))
}

/// First part named [`FILE_FIELD`], with its bytes read in full. Other parts
/// are skipped.
async fn read_file_field(mut multipart: Multipart) -> Result<Option<UploadedFile>, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            debug!(field = ?field.name(), "Skipping multipart field");
            continue;
        }

        let mime_type = field.content_type().unwrap_or(FALLBACK_MIME).to_string();
        let file_name = field.file_name().map(str::to_string);
        let bytes = field.bytes().await.map_err(multipart_error)?;

        let mut file = UploadedFile::new(bytes.to_vec(), mime_type);
        if let Some(name) = file_name {
            file = file.with_file_name(name);
        }
        return Ok(Some(file));
    }
    Ok(None)
}

fn multipart_error(err: MultipartError) -> ApiError {
    ApiError::Multipart {
        status: err.status(),
        detail: err.body_text(),
    }
}
