//! Configuration management for the Loteamento server

use serde::Deserialize;
use std::env;

use crate::ocr::SegmentationMode;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub ocr: OcrConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Maximum PDF upload size in megabytes
    pub max_upload_mb: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OcrConfig {
    /// Rasterization resolution; 300 DPI keeps small-font survey tables legible
    pub dpi: u32,
    /// Tesseract language pack (survey documents are Brazilian Portuguese)
    pub language: String,
    /// Tesseract binary name or path
    pub tesseract_binary: String,
    /// Ordered segmentation passes run per page
    pub passes: Vec<SegmentationMode>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
                max_upload_mb: 50,
            },
            ocr: OcrConfig {
                dpi: 300,
                language: "por".to_string(),
                tesseract_binary: "tesseract".to_string(),
                passes: SegmentationMode::DEFAULT_PASSES.to_vec(),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        let defaults = Config::default();

        Ok(Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or(defaults.server.host),
                port: env::var("SERVER_PORT")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.server.port),
                max_upload_mb: env::var("MAX_UPLOAD_MB")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.server.max_upload_mb),
            },
            ocr: OcrConfig {
                dpi: env::var("OCR_DPI")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.ocr.dpi),
                language: env::var("OCR_LANGUAGE").unwrap_or(defaults.ocr.language),
                tesseract_binary: env::var("TESSERACT_BINARY")
                    .unwrap_or(defaults.ocr.tesseract_binary),
                passes: env::var("OCR_PASSES")
                    .ok()
                    .and_then(|v| parse_passes(&v))
                    .unwrap_or(defaults.ocr.passes),
            },
        })
    }

    /// Maximum upload size in bytes, for the request body limit.
    pub fn max_upload_bytes(&self) -> usize {
        self.server.max_upload_mb * 1024 * 1024
    }
}

/// Parse an ordered comma-separated pass list like "6,11,4" or
/// "block,sparse,column". Any unknown token rejects the whole list so a
/// typo falls back to the defaults instead of silently dropping a pass.
fn parse_passes(raw: &str) -> Option<Vec<SegmentationMode>> {
    let passes: Vec<SegmentationMode> = raw
        .split(',')
        .map(str::parse)
        .collect::<Result<_, _>>()
        .ok()?;
    if passes.is_empty() {
        None
    } else {
        Some(passes)
    }
}
