//! Plot Record Extraction
//!
//! Turns the pooled OCR corpus into a deduplicated, ordered list of plot
//! ("lote") records. This is the reconciliation core of the server: the OCR
//! passes produce heavily redundant, noisy transcriptions, and this module
//! owns the pattern rules, numeric normalization, and dedup bookkeeping that
//! resolve them into one record per printed entry.

mod engine;
mod types;

pub use engine::{extract_plots, normalize_area};
pub use types::{Corpus, PlotRecord};
