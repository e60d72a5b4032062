// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Route table.

pub mod documents;
pub mod health;

use axum::{Router, routing::get};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::state::AppState;

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    let max_upload_bytes = state.config().max_upload_bytes;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(health::liveness))
        .route("/health", get(health::health))
        .nest("/api/v1", documents::router(max_upload_bytes))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use http_body_util::BodyExt;
    use lesewerk_core::ServiceConfig;
    use lesewerk_core::config::OcrBackendKind;
    use lesewerk_document::scan::OcrFailure;
    use lesewerk_document::{DocumentProcessor, OcrBackend, RecognitionSession};
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    use super::*;
    use crate::error::{MSG_INTERNAL, MSG_TIMEOUT, MSG_TOO_LARGE};

    const BOUNDARY: &str = "lesewerk-test-boundary";

    fn config() -> ServiceConfig {
        let mut config = ServiceConfig::default();
        config.ocr.backend = OcrBackendKind::Ocrs;
        config.ocr.model_dir = "/nonexistent/lesewerk/models".into();
        config
    }

    fn app() -> Router {
        router(AppState::new(config()))
    }

    /// OCR stand-in: echoes the bytes after `delay`, or panics.
    #[derive(Debug, Default)]
    struct ScriptedBackend {
        delay: Duration,
        panic: bool,
    }

    struct ScriptedSession {
        delay: Duration,
        panic: bool,
    }

    impl OcrBackend for ScriptedBackend {
        fn name(&self) -> &'static str {
            "scripted"
        }

        fn is_available(&self) -> bool {
            true
        }

        fn open_session(
            &self,
            _languages: &[&str],
        ) -> Result<Box<dyn RecognitionSession>, OcrFailure> {
            Ok(Box::new(ScriptedSession {
                delay: self.delay,
                panic: self.panic,
            }))
        }
    }

    impl RecognitionSession for ScriptedSession {
        fn recognize(&mut self, image: &[u8]) -> Result<String, OcrFailure> {
            std::thread::sleep(self.delay);
            if self.panic {
                panic!("scripted recognition panic");
            }
            Ok(String::from_utf8_lossy(image).into_owned())
        }

        fn terminate(self: Box<Self>) {}
    }

    fn scripted_state(backend: ScriptedBackend) -> AppState {
        AppState::with_processor(config(), DocumentProcessor::new(Arc::new(backend)))
    }

    fn upload(field: &str, content_type: Option<&str>, bytes: &[u8]) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"upload.bin\"\r\n"
            )
            .as_bytes(),
        );
        if let Some(content_type) = content_type {
            body.extend_from_slice(format!("Content-Type: {content_type}\r\n").as_bytes());
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/v1/documents")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn pdf_saying(text: &str) -> Vec<u8> {
        use lopdf::content::{Content, Operation};
        use lopdf::{Document, Object, Stream, dictionary};

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 18.into()]),
                Operation::new("Td", vec![100.into(), 600.into()]),
                Operation::new("Tj", vec![Object::string_literal(text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut out = Vec::new();
        doc.save_to(&mut out).unwrap();
        out
    }

    #[tokio::test]
    async fn liveness_reports_ok() {
        let request = Request::get("/").body(Body::empty()).unwrap();
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn health_names_the_backend() {
        let request = Request::get("/health").body(Body::empty()).unwrap();
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["ocr_backend"], "ocrs");
        assert_eq!(body["ocr_available"], false);
    }

    #[tokio::test]
    async fn missing_file_field_is_bad_request() {
        let (status, body) = send(app(), upload("attachment", Some("image/png"), b"x")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No document uploaded");
    }

    #[tokio::test]
    async fn non_multipart_request_is_bad_request() {
        let request = Request::post("/api/v1/documents")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"file":"nope"}"#))
            .unwrap();
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No document uploaded");
    }

    #[tokio::test]
    async fn plain_text_is_unsupported() {
        let (status, body) = send(app(), upload("file", Some("text/plain"), b"hello")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Unsupported file type");
    }

    #[tokio::test]
    async fn part_without_content_type_is_unsupported() {
        let (status, body) = send(app(), upload("file", None, b"%PDF-1.5")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Unsupported file type");
    }

    #[tokio::test]
    async fn pdf_upload_returns_text() {
        let bytes = pdf_saying("Hello from Lesewerk");
        let (status, body) = send(app(), upload("file", Some("application/pdf"), &bytes)).await;
        assert_eq!(status, StatusCode::OK);
        let text = body["text"].as_str().unwrap();
        assert_eq!(
            text.split_whitespace().collect::<Vec<_>>().join(" "),
            "Hello from Lesewerk"
        );
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn corrupt_pdf_has_no_text() {
        let (status, body) =
            send(app(), upload("file", Some("application/pdf"), b"%PDF-1.7 broken")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Error processing PDF");
        assert!(body.get("text").is_none());
    }

    #[tokio::test]
    async fn image_without_models_reports_engine_failure() {
        let (status, body) = send(app(), upload("file", Some("image/png"), b"\x89PNG")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Error creating OCR worker");
    }

    #[tokio::test]
    async fn image_upload_returns_recognised_text() {
        let app = router(scripted_state(ScriptedBackend::default()));
        let (status, body) = send(app, upload("file", Some("image/jpeg"), b"Recibo 42")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["text"], "Recibo 42");
    }

    #[tokio::test]
    async fn slow_extraction_times_out() {
        let state = scripted_state(ScriptedBackend {
            delay: Duration::from_millis(500),
            panic: false,
        })
        .with_request_timeout(Duration::from_millis(50));
        let (status, body) = send(router(state), upload("file", Some("image/png"), b"late")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], MSG_TIMEOUT);
    }

    #[tokio::test]
    async fn panicking_extraction_is_internal_error() {
        let state = scripted_state(ScriptedBackend {
            delay: Duration::ZERO,
            panic: true,
        });
        let (status, body) = send(router(state), upload("file", Some("image/png"), b"boom")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], MSG_INTERNAL);
    }

    #[tokio::test]
    async fn oversized_upload_is_rejected() {
        let mut config = config();
        config.max_upload_bytes = 256;
        let app = router(AppState::new(config));
        let (status, body) =
            send(app, upload("file", Some("application/pdf"), &[b'a'; 4096])).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["error"], MSG_TOO_LARGE);
    }

    #[tokio::test]
    async fn unknown_route_is_json_404() {
        let request = Request::get("/api/v1/nothing-here").body(Body::empty()).unwrap();
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Not found");
    }
}
