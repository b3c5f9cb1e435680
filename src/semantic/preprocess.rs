//! Candidate text normalization.
//!
//! Profession labels may be missing in the source table. A missing label is
//! encoded as the empty string, never skipped, so candidate positions keep
//! lining up with record positions.

/// Markers spreadsheet exports use for an absent cell.
const MISSING_MARKERS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Whether a raw cell value stands for "no value".
pub fn is_missing(raw: &str) -> bool {
    MISSING_MARKERS.contains(&raw)
}

/// Turn an optional candidate into the text that gets embedded.
pub fn normalize_candidate<S: AsRef<str>>(value: Option<S>) -> String {
    match value {
        Some(text) if !is_missing(text.as_ref()) => text.as_ref().to_string(),
        _ => String::new(),
    }
}
