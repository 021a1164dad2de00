//! OCR Types

use serde::{Deserialize, Serialize};

/// Tesseract page-segmentation mode used for one recognition pass.
///
/// Survey tables defeat any single segmentation strategy, so every page is
/// recognized once per mode and the transcriptions are pooled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentationMode {
    /// Assume a single uniform block of text (PSM 6).
    Block,
    /// Sparse text, find as much as possible in no particular order (PSM 11).
    Sparse,
    /// Assume a single column of text of variable sizes (PSM 4).
    Column,
}

impl SegmentationMode {
    /// The ordered set of passes run per page.
    pub const DEFAULT_PASSES: [SegmentationMode; 3] =
        [Self::Block, Self::Sparse, Self::Column];

    /// Tesseract `--psm` argument value.
    pub fn as_psm(&self) -> &'static str {
        match self {
            Self::Block => "6",
            Self::Sparse => "11",
            Self::Column => "4",
        }
    }
}

impl std::str::FromStr for SegmentationMode {
    type Err = String;

    /// Accepts the mode name or its PSM number.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "block" | "6" => Ok(Self::Block),
            "sparse" | "11" => Ok(Self::Sparse),
            "column" | "4" => Ok(Self::Column),
            other => Err(format!("unknown segmentation mode: {}", other)),
        }
    }
}

/// OCR error types
#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("OCR engine not available: {0}")]
    EngineUnavailable(String),

    #[error("OCR processing failed: {0}")]
    ProcessingError(String),
}
