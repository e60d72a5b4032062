// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// HTTP error mapping.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use lesewerk_core::ExtractError;
use serde::Serialize;
use thiserror::Error;

pub const MSG_TIMEOUT: &str = "Document processing timed out";
pub const MSG_INTERNAL: &str = "Internal server error";
pub const MSG_NOT_FOUND: &str = "Not found";
pub const MSG_TOO_LARGE: &str = "Uploaded document is too large";
pub const MSG_MALFORMED_UPLOAD: &str = "Malformed upload";

/// Everything a handler can fail with.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Extraction(#[from] ExtractError),

    /// The multipart stream broke off or exceeded the body limit.
    #[error("multipart error ({status}): {detail}")]
    Multipart { status: StatusCode, detail: String },

    #[error("document processing timed out")]
    Timeout,

    /// The extraction task panicked or was cancelled.
    #[error("internal error: {0}")]
    Internal(String),

    #[error("route not found")]
    NotFound,
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Extraction(err) => StatusCode::from_u16(err.http_status())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            ApiError::Multipart { status, .. } => *status,
            ApiError::Timeout | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NotFound => StatusCode::NOT_FOUND,
        }
    }

    /// Client-facing text. Library error detail stays in the logs.
    pub fn public_message(&self) -> &'static str {
        match self {
            ApiError::Extraction(err) => err.public_message(),
            ApiError::Multipart { status, .. } if *status == StatusCode::PAYLOAD_TOO_LARGE => {
                MSG_TOO_LARGE
            }
            ApiError::Multipart { .. } => MSG_MALFORMED_UPLOAD,
            ApiError::Timeout => MSG_TIMEOUT,
            ApiError::Internal(_) => MSG_INTERNAL,
            ApiError::NotFound => MSG_NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Extraction(err) if status.is_server_error() => {
                tracing::error!(kind = %err.kind(), "Extraction failed: {}", err);
            }
            ApiError::Extraction(err) => {
                tracing::warn!(kind = %err.kind(), "Rejected upload: {}", err);
            }
            ApiError::Multipart { .. } => tracing::warn!("{}", self),
            ApiError::Timeout | ApiError::Internal(_) => tracing::error!("{}", self),
            ApiError::NotFound => {}
        }

        let body = Json(ErrorBody {
            error: self.public_message(),
        });
        (status, body).into_response()
    }
}
