// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Service configuration, read from the process environment.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default request body limit: 20 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;
const DEFAULT_PORT: u16 = 3000;

/// A configuration value that could not be understood.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid value for {key}: {value:?} ({reason})")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: String,
}

/// Which OCR engine backs image extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OcrBackendKind {
    /// Pure-Rust neural OCR (`ocrs` + `rten`), models on disk.
    Ocrs,
    /// The `tesseract` command-line program.
    Tesseract,
}

impl OcrBackendKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ocrs => "ocrs",
            Self::Tesseract => "tesseract",
        }
    }
}

impl FromStr for OcrBackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ocrs" => Ok(Self::Ocrs),
            "tesseract" => Ok(Self::Tesseract),
            other => Err(format!("expected `ocrs` or `tesseract`, got `{other}`")),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable, for development.
    Pretty,
    /// One JSON object per line, for log shippers.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("expected `pretty` or `json`, got `{other}`")),
        }
    }
}

/// OCR engine settings. The recognition language set is not configurable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrSettings {
    pub backend: OcrBackendKind,
    /// Directory holding `text-detection.rten` and `text-recognition.rten`.
    pub model_dir: PathBuf,
    /// Path or name of the tesseract executable.
    pub tesseract_bin: PathBuf,
}

/// Settings for the HTTP service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    /// Largest request body accepted, in bytes.
    pub max_upload_bytes: usize,
    /// Upper bound on a single extraction, if any.
    pub request_timeout_secs: Option<u64>,
    pub log_format: LogFormat,
    pub ocr: OcrSettings,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            request_timeout_secs: None,
            log_format: LogFormat::Pretty,
            ocr: OcrSettings {
                backend: OcrBackendKind::Ocrs,
                model_dir: default_model_dir(|key| std::env::var(key).ok()),
                tesseract_bin: PathBuf::from("tesseract"),
            },
        }
    }
}

impl ServiceConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`, which maps a variable name to
    /// its value. Unset variables fall back to defaults; set but unparsable
    /// ones are an error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("LESEWERK_PORT") {
            Some(v) => parse("LESEWERK_PORT", v)?,
            None => match get("PORT") {
                Some(v) => parse("PORT", v)?,
                None => DEFAULT_PORT,
            },
        };

        let max_upload_bytes = match get("LESEWERK_MAX_UPLOAD_BYTES") {
            Some(v) => parse("LESEWERK_MAX_UPLOAD_BYTES", v)?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        let request_timeout_secs = match get("LESEWERK_REQUEST_TIMEOUT_SECS") {
            Some(v) => match parse::<u64>("LESEWERK_REQUEST_TIMEOUT_SECS", v)? {
                0 => None,
                secs => Some(secs),
            },
            None => None,
        };

        let log_format = match get("LESEWERK_LOG_FORMAT") {
            Some(v) => parse("LESEWERK_LOG_FORMAT", v)?,
            None => LogFormat::Pretty,
        };

        let backend = match get("LESEWERK_OCR_BACKEND") {
            Some(v) => parse("LESEWERK_OCR_BACKEND", v)?,
            None => OcrBackendKind::Ocrs,
        };

        Ok(Self {
            host: get("LESEWERK_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            max_upload_bytes,
            request_timeout_secs,
            log_format,
            ocr: OcrSettings {
                backend,
                model_dir: get("LESEWERK_OCR_MODEL_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| default_model_dir(&lookup)),
                tesseract_bin: get("LESEWERK_TESSERACT_BIN")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("tesseract")),
            },
        })
    }

    /// `host:port` suitable for binding a listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

fn parse<T>(key: &'static str, value: String) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value.trim().parse() {
        Ok(parsed) => Ok(parsed),
        Err(err) => Err(ConfigError {
            key,
            reason: err.to_string(),
            value,
        }),
    }
}

/// Default directory for cached OCR model files.
///
/// Follows the XDG Base Directory specification: `$XDG_CACHE_HOME/ocrs`, falling
/// back to `~/.cache/ocrs` when `XDG_CACHE_HOME` is unset.
fn default_model_dir<F>(lookup: F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(xdg) = lookup("XDG_CACHE_HOME") {
        PathBuf::from(xdg).join("ocrs")
    } else if let Some(home) = lookup("HOME") {
        PathBuf::from(home).join(".cache").join("ocrs")
    } else {
        // Relative to the working directory.
        PathBuf::from("ocrs-models")
    }
}
