//! OCR Module
//!
//! Optical character recognition for rasterized survey pages.
//!
//! The recognizer is invoked once per (page, segmentation mode) pair, three
//! modes per page, and every transcription is pooled into one corpus before
//! extraction. Running the same engine in several layout-segmentation modes
//! raises the chance that any given plot entry is legible in at least one
//! pass; the extraction engine resolves the resulting duplication.

mod aggregator;
mod recognizer;
mod types;

pub use aggregator::MultiPassAggregator;
pub use recognizer::{Recognizer, TesseractRecognizer};
pub use types::{OcrError, SegmentationMode};

#[cfg(test)]
pub(crate) use recognizer::ScriptedRecognizer;
