// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// tesseract backend: drives the `tesseract` command-line program.
//
// A session checks the binary runs and has traineddata for every requested
// language, then owns a private temporary directory for its input file.
// Terminating the session removes that directory.

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;
use tracing::{debug, instrument, warn};

use super::session::{OcrBackend, OcrFailure, RecognitionSession};

const INPUT_FILENAME: &str = "input";

/// Spawns `tesseract` per recognition.
#[derive(Debug, Clone)]
pub struct TesseractBackend {
    binary: PathBuf,
}

impl TesseractBackend {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Languages with installed traineddata, as reported by `--list-langs`.
    fn installed_languages(&self) -> Result<Vec<String>, OcrFailure> {
        let output = Command::new(&self.binary)
            .arg("--list-langs")
            .output()
            .map_err(|err| {
                OcrFailure::Unavailable(format!("failed to run {}: {err}", self.binary.display()))
            })?;

        if !output.status.success() {
            return Err(OcrFailure::Unavailable(format!(
                "{} --list-langs exited with {}: {}",
                self.binary.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        // Tesseract 3.x prints the list on stderr, 4.x and later on stdout.
        let mut listing = String::from_utf8_lossy(&output.stdout).into_owned();
        listing.push('\n');
        listing.push_str(&String::from_utf8_lossy(&output.stderr));
        Ok(parse_language_list(&listing))
    }
}

impl OcrBackend for TesseractBackend {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("--version")
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    #[instrument(skip_all, fields(binary = %self.binary.display()))]
    fn open_session(
        &self,
        languages: &[&str],
    ) -> Result<Box<dyn RecognitionSession>, OcrFailure> {
        let installed = self.installed_languages()?;
        let missing: Vec<&str> = languages
            .iter()
            .copied()
            .filter(|lang| !installed.iter().any(|have| have == lang))
            .collect();
        if !missing.is_empty() {
            return Err(OcrFailure::Unavailable(format!(
                "tesseract has no traineddata for: {}",
                missing.join(", ")
            )));
        }

        let workdir = tempfile::Builder::new()
            .prefix("lesewerk-ocr-")
            .tempdir()
            .map_err(|err| OcrFailure::Unavailable(format!("failed to create work dir: {err}")))?;
        debug!(workdir = %workdir.path().display(), "tesseract session ready");

        Ok(Box::new(TesseractSession {
            binary: self.binary.clone(),
            languages: languages.join("+"),
            workdir,
        }))
    }
}

/// Pull language codes out of `tesseract --list-langs` output.
fn parse_language_list(listing: &str) -> Vec<String> {
    listing
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("List of"))
        .filter(|line| !line.contains(char::is_whitespace))
        .map(str::to_string)
        .collect()
}

struct TesseractSession {
    binary: PathBuf,
    /// `eng+por` style language argument.
    languages: String,
    workdir: TempDir,
}

impl RecognitionSession for TesseractSession {
    fn recognize(&mut self, image: &[u8]) -> Result<String, OcrFailure> {
        if image.is_empty() {
            return Err(OcrFailure::Decode("empty image".to_string()));
        }

        // Leptonica sniffs the format from the content, so no extension is needed.
        let input = self.workdir.path().join(INPUT_FILENAME);
        std::fs::write(&input, image)
            .map_err(|err| OcrFailure::Recognition(format!("failed to stage image: {err}")))?;

        let output = Command::new(&self.binary)
            .arg(&input)
            .arg("stdout")
            .arg("-l")
            .arg(&self.languages)
            .output()
            .map_err(|err| {
                OcrFailure::Recognition(format!("failed to run {}: {err}", self.binary.display()))
            })?;

        if !output.status.success() {
            return Err(OcrFailure::Recognition(format!(
                "tesseract exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!(char_count = text.len(), "tesseract recognition complete");
        Ok(text)
    }

    fn terminate(self: Box<Self>) {
        let path = self.workdir.path().to_path_buf();
        if let Err(err) = self.workdir.close() {
            warn!(workdir = %path.display(), error = %err, "failed to remove tesseract work dir");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::session::RECOGNITION_LANGUAGES;

    #[test]
    fn parses_modern_listing() {
        let listing = "List of available languages in \"/usr/share/tesseract-ocr/5/tessdata/\" (3):\neng\nosd\npor\n";
        assert_eq!(parse_language_list(listing), vec!["eng", "osd", "por"]);
    }

    #[test]
    fn parses_listing_with_blank_lines() {
        let listing = "\n\nList of available languages (2):\n  eng \n\npor\n";
        assert_eq!(parse_language_list(listing), vec!["eng", "por"]);
    }

    #[test]
    fn missing_binary_is_unavailable() {
        let backend = TesseractBackend::new("/nonexistent/bin/tesseract-lesewerk");
        assert!(!backend.is_available());
        assert!(matches!(
            backend.open_session(RECOGNITION_LANGUAGES),
            Err(OcrFailure::Unavailable(_))
        ));
    }

    #[test]
    fn terminate_removes_workdir() {
        let workdir = tempfile::tempdir().unwrap();
        let path = workdir.path().to_path_buf();
        let session = Box::new(TesseractSession {
            binary: PathBuf::from("tesseract"),
            languages: "eng+por".to_string(),
            workdir,
        });
        assert!(path.exists());
        session.terminate();
        assert!(!path.exists());
    }

    #[test]
    fn empty_image_fails_before_spawning() {
        let mut session = TesseractSession {
            binary: PathBuf::from("/nonexistent/bin/tesseract-lesewerk"),
            languages: "eng+por".to_string(),
            workdir: tempfile::tempdir().unwrap(),
        };
        assert!(matches!(session.recognize(b""), Err(OcrFailure::Decode(_))));
    }
}
