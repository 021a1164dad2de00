//! Multi-pass Aggregator
//!
//! Pools every OCR transcription across all pages and all segmentation modes
//! into one corpus, in page-major emission order. No pass is privileged over
//! another; reconciling the duplication is the extraction engine's job.

use std::sync::Arc;

use crate::extract::Corpus;
use crate::pdf::PageImage;

use super::recognizer::Recognizer;
use super::types::{OcrError, SegmentationMode};

pub struct MultiPassAggregator {
    recognizer: Arc<dyn Recognizer>,
    language: String,
    passes: Vec<SegmentationMode>,
}

impl MultiPassAggregator {
    pub fn new(
        recognizer: Arc<dyn Recognizer>,
        language: &str,
        passes: Vec<SegmentationMode>,
    ) -> Self {
        Self {
            recognizer,
            language: language.to_string(),
            passes,
        }
    }

    /// Recognize every page once per segmentation mode and pool the texts.
    ///
    /// A single failed pass degrades to an empty transcription rather than
    /// aborting the run; the other passes usually still cover the entry. The
    /// run only fails if the recognizer is missing from the host entirely.
    pub async fn pool(&self, pages: &[PageImage]) -> Result<Corpus, OcrError> {
        if !self.recognizer.is_available().await {
            return Err(OcrError::EngineUnavailable(
                "no OCR engine found on this host".to_string(),
            ));
        }

        let mut texts = Vec::with_capacity(pages.len() * self.passes.len());

        for page in pages {
            for &mode in &self.passes {
                match self
                    .recognizer
                    .recognize(&page.png, &self.language, mode)
                    .await
                {
                    Ok(text) => {
                        tracing::debug!(
                            page = page.number,
                            mode = ?mode,
                            text_len = text.len(),
                            "OCR pass complete"
                        );
                        texts.push(text);
                    }
                    Err(e) => {
                        tracing::warn!(
                            page = page.number,
                            mode = ?mode,
                            error = %e,
                            "OCR pass failed, continuing with remaining passes"
                        );
                        texts.push(String::new());
                    }
                }
            }
        }

        Ok(Corpus::from_texts(texts))
    }
}
