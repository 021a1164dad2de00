//! Extraction Engine
//!
//! Scans the corpus line by line against an ordered fallback chain of rules
//! describing how a plot entry may be printed, normalizes the Brazilian
//! number format of the matched area, and deduplicates repeat detections of
//! the same printed entry (the three OCR passes per page guarantee heavy
//! overlap).
//!
//! The engine is a pure fold over the corpus: per-request seen-key set and
//! record list, no shared state, no errors. Unparseable lines are skipped.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use super::types::{Corpus, PlotRecord};

/// Area token: digit groups separated by `.` thousands separators, then a
/// comma and exactly 2 decimal digits (e.g. "1.343,10", "55,00").
const AREA_TOKEN: &str = r"\d{1,4}(?:\.\d{3})*,\d{2}";

/// Rule 1: optional label ("lote"/"lot"/"lt", optional dot), plot number,
/// one or more separators, area token, unit. "Lote 01 - 1.343,10 m²".
/// Anchored at the start only; labeled entries often carry trailing text
/// (block names, survey remarks) that must not cost the match.
static LABELED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)^(?:(?:lote|lot|lt)\.?\s*)?(\d{{1,4}})[\s\-–:=]+({AREA_TOKEN})\s*m²"
    ))
    .expect("labeled rule pattern is valid")
});

/// Rule 2: bare plot number, whitespace, area token, unit. "01  1.343,10 m²".
static TABULAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)^(\d{{1,4}})\s+({AREA_TOKEN})\s*m²$"))
        .expect("tabular rule pattern is valid")
});

/// Rule 3: area token and unit alone; the plot number is assigned later.
static AREA_ONLY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)^({AREA_TOKEN})\s*m²$")).expect("area-only rule pattern is valid")
});

/// A line match, tagged with whether the printed entry carried its own
/// plot number.
struct LineMatch<'a> {
    /// Matched plot-number digits, if the rule captures one.
    identifier: Option<&'a str>,
    /// Raw area token exactly as printed.
    area_raw: &'a str,
}

/// Try the rules in priority order; the first match consumes the line.
fn match_line(line: &str) -> Option<LineMatch<'_>> {
    if let Some(caps) = LABELED.captures(line) {
        return Some(LineMatch {
            identifier: Some(caps.get(1)?.as_str()),
            area_raw: caps.get(2)?.as_str(),
        });
    }
    if let Some(caps) = TABULAR.captures(line) {
        return Some(LineMatch {
            identifier: Some(caps.get(1)?.as_str()),
            area_raw: caps.get(2)?.as_str(),
        });
    }
    if let Some(caps) = AREA_ONLY.captures(line) {
        return Some(LineMatch {
            identifier: None,
            area_raw: caps.get(1)?.as_str(),
        });
    }
    None
}

/// Normalize a Brazilian-format area token to a positive number.
///
/// Strips `.` thousands separators, maps the decimal `,` to `.`, parses, and
/// rounds to 2 fractional digits. Returns `None` for unparseable tokens and
/// for values ≤ 0; both are silent non-matches, never errors.
pub fn normalize_area(raw: &str) -> Option<f64> {
    let normalized = raw.replace('.', "").replace(',', ".");
    let value: f64 = normalized.parse().ok()?;
    if value <= 0.0 {
        return None;
    }
    Some((value * 100.0).round() / 100.0)
}

/// Zero-pad a matched plot number to width 3 ("1" → "001", "0023" → "023").
fn pad_identifier(digits: &str) -> String {
    match digits.parse::<u32>() {
        Ok(n) => format!("{:03}", n),
        Err(_) => format!("{:0>3}", digits),
    }
}

/// Extract the deduplicated, ordered plot records from a corpus.
///
/// Records appear in first-acceptance order. Dedup identity is the pair
/// (plot number as matched, or empty for area-only lines; raw area token),
/// both byte-exact, so records whose normalized areas merely coincide are
/// kept. Area-only records are numbered `accepted + 1` at append time, which
/// is why this must stay a single in-order pass.
pub fn extract_plots(corpus: &Corpus) -> Vec<PlotRecord> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut records: Vec<PlotRecord> = Vec::new();

    for line in corpus.lines() {
        let Some(matched) = match_line(line) else {
            continue;
        };
        let Some(area) = normalize_area(matched.area_raw) else {
            continue;
        };

        let matched_identifier = matched.identifier.map(pad_identifier).unwrap_or_default();

        // '|' is producible by neither field (digits, '.', ',' only).
        let key = format!("{}|{}", matched_identifier, matched.area_raw);
        if !seen.insert(key) {
            continue;
        }

        let identifier = if matched_identifier.is_empty() {
            format!("{:03}", records.len() + 1)
        } else {
            matched_identifier
        };

        tracing::debug!(
            identifier = %identifier,
            area = area,
            area_original = %matched.area_raw,
            "Accepted plot record"
        );

        records.push(PlotRecord {
            identifier,
            area,
            kind: "lote",
            area_original: matched.area_raw.to_string(),
        });
    }

    records
}
