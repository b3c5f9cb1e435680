//! Terminal rendering of search outcomes.

use crate::semantic::{RankedMatch, SearchOutcome};

const PROGRESS_WIDTH: usize = 20;

const SUGGESTIONS: [&str; 4] = [
    "Using different keywords",
    "Using broader terms",
    "Try single word searches",
    "Check spelling",
];

/// Score as a whole percentage, e.g. `0.873` -> `87%`.
pub fn format_score(score: f32) -> String {
    format!("{:.0}%", score * 100.0)
}

/// Fixed-width bar filled in proportion to the score.
pub fn progress_bar(score: f32, width: usize) -> String {
    let filled = ((score.clamp(0.0, 1.0) * width as f32).round() as usize).min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

pub fn render_match(m: &RankedMatch) -> String {
    let p = &m.professional;
    let mut out = String::new();

    out.push_str(&format!("#{} - {}\n", m.rank, p.name));
    out.push_str(&format!("  Phone:      {}\n", p.display_phone()));
    out.push_str(&format!("  Email:      {}\n", p.email));
    out.push_str(&format!("  Profession: {}\n", p.profession));
    out.push_str(&format!(
        "  Match:      {} {}\n",
        progress_bar(m.score, PROGRESS_WIDTH),
        format_score(m.score)
    ));

    out
}

pub fn render_no_matches() -> String {
    let mut out = String::from("No matching professionals found. Try:\n");
    for suggestion in SUGGESTIONS {
        out.push_str(&format!("  - {suggestion}\n"));
    }
    out
}

pub fn render_outcome(outcome: &SearchOutcome) -> String {
    match outcome {
        SearchOutcome::NoMatches => render_no_matches(),
        SearchOutcome::Matches { matches } => {
            let mut out = format!("Found {} qualified professional(s):\n\n", matches.len());
            for m in matches {
                out.push_str(&render_match(m));
                out.push('\n');
            }
            out
        }
    }
}
