//! Extraction Types
//!
//! The corpus consumed by the extraction engine and the plot records it
//! produces.

use serde::Serialize;

/// The pooled OCR text, as an ordered sequence of trimmed lines.
///
/// Built once per request from every (page, segmentation-mode) transcription,
/// consumed once by [`extract_plots`](super::extract_plots), then discarded.
/// Line order matters only for the sequential numbering of area-only matches.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    lines: Vec<String>,
}

impl Corpus {
    /// Build a corpus from one or more transcription texts, in emission order.
    ///
    /// Each text is split on line breaks and every line is whitespace-trimmed,
    /// which is the input contract the engine's line rules assume.
    pub fn from_texts<I>(texts: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let lines = texts
            .into_iter()
            .flat_map(|text| {
                text.as_ref()
                    .lines()
                    .map(|line| line.trim().to_string())
                    .collect::<Vec<_>>()
            })
            .collect();
        Self { lines }
    }

    /// Build a corpus from a single text block.
    pub fn from_text(text: &str) -> Self {
        Self::from_texts([text])
    }

    /// Iterate over the lines in corpus order.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// Number of lines in the corpus.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// One extracted plot record.
///
/// Immutable once appended to the output list. `area_original` keeps the
/// exact matched token so callers can audit what was actually printed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotRecord {
    /// 3-digit zero-padded plot number, matched or sequentially assigned.
    pub identifier: String,
    /// Area in square meters, rounded to 2 fractional digits.
    pub area: f64,
    /// Record kind, always "lote".
    pub kind: &'static str,
    /// Raw matched area token, pre-normalization (e.g. "1.343,10").
    pub area_original: String,
}
