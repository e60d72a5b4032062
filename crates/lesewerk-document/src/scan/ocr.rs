// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// ocrs backend: pure-Rust OCR using neural network models executed via `rten`.
//
// # Model Setup
//
// The engine requires two model files in the configured model directory:
//
// - **Detection model** (`text-detection.rten`): locates text regions in the image.
// - **Recognition model** (`text-recognition.rten`): decodes characters from detected regions.
//
// Models can be downloaded from the ocrs-models repository:
//   <https://github.com/robertknight/ocrs-models/releases>
//
// Or obtained automatically by running the `ocrs-cli` tool once:
//   ```sh
//   cargo install ocrs-cli
//   ocrs some-image.png  # downloads models to ~/.cache/ocrs/
//   ```
//
// The recognition model covers Latin script, which includes both languages of
// the fixed set; the language list itself is not an ocrs parameter.

use std::path::{Path, PathBuf};

use ocrs::{ImageSource, OcrEngine as OcrsEngine, OcrEngineParams};
use rten::Model;
use tracing::{debug, info, instrument};

use super::session::{OcrBackend, OcrFailure, RecognitionSession};

/// Well-known filenames for the detection and recognition models.
const DETECTION_MODEL_FILENAME: &str = "text-detection.rten";
const RECOGNITION_MODEL_FILENAME: &str = "text-recognition.rten";

/// Locations of the two model files.
#[derive(Debug, Clone)]
pub struct OcrModelConfig {
    /// Path to the text-detection model file (`.rten`).
    pub detection_model_path: PathBuf,
    /// Path to the text-recognition model file (`.rten`).
    pub recognition_model_path: PathBuf,
}

impl OcrModelConfig {
    /// Create a config with explicit model directory.
    ///
    /// Expects the directory to contain `text-detection.rten` and
    /// `text-recognition.rten`.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            detection_model_path: dir.join(DETECTION_MODEL_FILENAME),
            recognition_model_path: dir.join(RECOGNITION_MODEL_FILENAME),
        }
    }

    /// Create a config pointing at two specific model files.
    pub fn from_paths(
        detection_model: impl Into<PathBuf>,
        recognition_model: impl Into<PathBuf>,
    ) -> Self {
        Self {
            detection_model_path: detection_model.into(),
            recognition_model_path: recognition_model.into(),
        }
    }

    /// Verify that both model files exist.
    pub fn validate(&self) -> Result<(), OcrFailure> {
        for path in [&self.detection_model_path, &self.recognition_model_path] {
            if !path.exists() {
                return Err(OcrFailure::Unavailable(format!(
                    "model not found at {}; run `ocrs-cli` once to download models, \
                     or see <https://github.com/robertknight/ocrs-models/releases>",
                    path.display()
                )));
            }
        }
        Ok(())
    }

    pub fn models_available(&self) -> bool {
        self.detection_model_path.exists() && self.recognition_model_path.exists()
    }
}

/// Brings up one `ocrs` engine per session, loading both models from disk.
#[derive(Debug, Clone)]
pub struct OcrsBackend {
    config: OcrModelConfig,
}

impl OcrsBackend {
    pub fn new(config: OcrModelConfig) -> Self {
        Self { config }
    }

    /// Load models from a specific directory.
    pub fn from_model_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(OcrModelConfig::from_dir(dir))
    }

    pub fn config(&self) -> &OcrModelConfig {
        &self.config
    }
}

impl OcrBackend for OcrsBackend {
    fn name(&self) -> &'static str {
        "ocrs"
    }

    fn is_available(&self) -> bool {
        self.config.models_available()
    }

    /// Model loading is the expensive step. It happens once per session, so
    /// an engine never outlives the request that created it.
    ///
    /// **Important:** `ocrs` and `rten` must be compiled in release mode.
    /// Debug builds are 10-100x slower.
    #[instrument(skip_all, fields(
        detection = %self.config.detection_model_path.display(),
        recognition = %self.config.recognition_model_path.display(),
    ))]
    fn open_session(
        &self,
        languages: &[&str],
    ) -> Result<Box<dyn RecognitionSession>, OcrFailure> {
        self.config.validate()?;
        debug!(?languages, "ocrs ignores the language list; model covers Latin script");

        let detection_model = Model::load_file(&self.config.detection_model_path).map_err(|err| {
            OcrFailure::Unavailable(format!(
                "failed to load detection model from {}: {err}",
                self.config.detection_model_path.display()
            ))
        })?;

        let recognition_model =
            Model::load_file(&self.config.recognition_model_path).map_err(|err| {
                OcrFailure::Unavailable(format!(
                    "failed to load recognition model from {}: {err}",
                    self.config.recognition_model_path.display()
                ))
            })?;

        let engine = OcrsEngine::new(OcrEngineParams {
            detection_model: Some(detection_model),
            recognition_model: Some(recognition_model),
            ..Default::default()
        })
        .map_err(|err| OcrFailure::Unavailable(format!("failed to initialise OCR engine: {err}")))?;

        info!("ocrs engine initialised");
        Ok(Box::new(OcrsSession { engine }))
    }
}

/// One loaded `ocrs` engine.
struct OcrsSession {
    engine: OcrsEngine,
}

impl RecognitionSession for OcrsSession {
    /// Decode the bytes, convert to RGB8 (the format ocrs expects), and return
    /// the recognised text with lines separated by newlines.
    fn recognize(&mut self, image: &[u8]) -> Result<String, OcrFailure> {
        let decoded =
            ::image::load_from_memory(image).map_err(|err| OcrFailure::Decode(err.to_string()))?;

        let rgb = decoded.to_rgb8();
        let (width, height) = rgb.dimensions();
        debug!(width, height, "Starting OCR text recognition");

        let source = ImageSource::from_bytes(rgb.as_raw(), (width, height)).map_err(|err| {
            OcrFailure::Recognition(format!(
                "failed to create image source ({width}x{height}): {err}"
            ))
        })?;

        let input = self
            .engine
            .prepare_input(source)
            .map_err(|err| OcrFailure::Recognition(format!("OCR preprocessing failed: {err}")))?;

        let text = self
            .engine
            .get_text(&input)
            .map_err(|err| OcrFailure::Recognition(format!("OCR text recognition failed: {err}")))?;

        debug!(
            line_count = text.lines().count(),
            char_count = text.len(),
            "OCR recognition complete"
        );
        Ok(text)
    }

    fn terminate(self: Box<Self>) {
        // Models and engine buffers are freed here.
        drop(self.engine);
    }
}
