//! OCR Recognizers
//!
//! Defines the recognizer trait and the Tesseract CLI implementation.

use async_trait::async_trait;

use super::types::{OcrError, SegmentationMode};

/// A text recognizer for page images.
///
/// Implementations must be safe to call concurrently; the aggregator invokes
/// one pass at a time but tests and future hosts may not.
#[async_trait]
pub trait Recognizer: Send + Sync {
    /// Check if the recognizer can run on this host.
    async fn is_available(&self) -> bool;

    /// Recognize text in a PNG page image with the given language and
    /// segmentation mode.
    async fn recognize(
        &self,
        image: &[u8],
        language: &str,
        mode: SegmentationMode,
    ) -> Result<String, OcrError>;
}

/// Tesseract OCR via the system `tesseract` binary.
pub struct TesseractRecognizer {
    binary: String,
}

impl TesseractRecognizer {
    pub fn new(binary: &str) -> Self {
        Self {
            binary: binary.to_string(),
        }
    }
}

impl Default for TesseractRecognizer {
    fn default() -> Self {
        Self::new("tesseract")
    }
}

#[async_trait]
impl Recognizer for TesseractRecognizer {
    async fn is_available(&self) -> bool {
        let binary = self.binary.clone();
        tokio::task::spawn_blocking(move || {
            std::process::Command::new(&binary)
                .arg("--version")
                .output()
                .is_ok()
        })
        .await
        .unwrap_or(false)
    }

    async fn recognize(
        &self,
        image: &[u8],
        language: &str,
        mode: SegmentationMode,
    ) -> Result<String, OcrError> {
        let binary = self.binary.clone();
        let language = language.to_string();
        let image = image.to_vec();

        tokio::task::spawn_blocking(move || run_tesseract(&binary, &image, &language, mode))
            .await
            .map_err(|e| OcrError::ProcessingError(format!("Task join error: {}", e)))?
    }
}

/// Run one tesseract pass over a PNG image through temp files.
fn run_tesseract(
    binary: &str,
    image: &[u8],
    language: &str,
    mode: SegmentationMode,
) -> Result<String, OcrError> {
    use std::process::Command;

    let temp_dir = std::env::temp_dir();
    let input_path = temp_dir.join(format!("ocr_input_{}.png", uuid::Uuid::new_v4()));
    let output_base = temp_dir.join(format!("ocr_output_{}", uuid::Uuid::new_v4()));

    std::fs::write(&input_path, image)
        .map_err(|e| OcrError::ProcessingError(format!("Failed to write temp file: {}", e)))?;

    let output = Command::new(binary)
        .arg(&input_path)
        .arg(&output_base)
        .arg("-l")
        .arg(language)
        .arg("--oem")
        .arg("3")
        .arg("--psm")
        .arg(mode.as_psm())
        .output();

    // Clean up input file before inspecting the result
    let _ = std::fs::remove_file(&input_path);

    let output =
        output.map_err(|e| OcrError::ProcessingError(format!("Failed to run tesseract: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(OcrError::ProcessingError(format!(
            "Tesseract failed: {}",
            stderr
        )));
    }

    let output_file = format!("{}.txt", output_base.display());
    let text = std::fs::read_to_string(&output_file)
        .map_err(|e| OcrError::ProcessingError(format!("Failed to read output: {}", e)))?;

    let _ = std::fs::remove_file(&output_file);

    Ok(text)
}

/// Scripted recognizer for testing the aggregation policy.
#[cfg(test)]
pub(crate) struct ScriptedRecognizer {
    pub available: bool,
    /// Responses consumed in invocation order; `Err` entries simulate pass
    /// failures. An exhausted script yields empty transcriptions.
    pub script: std::sync::Mutex<Vec<Result<String, String>>>,
}

#[cfg(test)]
#[async_trait]
impl Recognizer for ScriptedRecognizer {
    async fn is_available(&self) -> bool {
        self.available
    }

    async fn recognize(
        &self,
        _image: &[u8],
        _language: &str,
        _mode: SegmentationMode,
    ) -> Result<String, OcrError> {
        let mut script = self.script.lock().unwrap();
        if script.is_empty() {
            return Ok(String::new());
        }
        script.remove(0).map_err(OcrError::ProcessingError)
    }
}
