use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use inquire::{error::InquireError, Text};
use serde::Serialize;

use crate::{
    app::AppService,
    directory::Directory,
    display,
    semantic::{EmbeddingProvider, MatchParams, Matcher},
};

/// Run `f` behind a terminal spinner.
pub fn with_spinner<T>(message: &str, f: impl FnOnce() -> T) -> T {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(120));

    let result = f();

    spinner.finish_and_clear();
    result
}

pub fn handle_search(
    app: &AppService,
    query: &str,
    threshold: Option<f32>,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let outcome = app
        .search(query, threshold, limit)
        .context("Error during search")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print!("{}", display::render_outcome(&outcome));
    }

    Ok(())
}

pub fn handle_interactive(
    app: &AppService,
    threshold: Option<f32>,
    limit: Option<usize>,
) -> Result<()> {
    loop {
        let answer = Text::new("What kind of professional are you looking for?")
            .with_placeholder("e.g., marketing consultant, electrician, web designer...")
            .with_help_message("Press enter on an empty line to quit")
            .prompt();

        let query = match answer {
            Ok(query) => query,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err).context("Failed to read query"),
        };

        if query.trim().is_empty() {
            break;
        }

        match app.search(&query, threshold, limit) {
            Ok(outcome) => print!("{}", display::render_outcome(&outcome)),
            // keep the session alive, show the failure as an empty result
            Err(err) => {
                eprintln!("Error during search: {err}");
                print!("{}", display::render_no_matches());
            }
        }
        println!();
    }

    Ok(())
}

#[derive(Serialize)]
struct RankedCandidate<'a> {
    index: usize,
    score: f32,
    candidate: &'a str,
}

pub fn handle_rank(
    provider: &dyn EmbeddingProvider,
    defaults: MatchParams,
    query: &str,
    candidates: &[String],
    threshold: Option<f32>,
    limit: Option<usize>,
) -> Result<()> {
    let params = MatchParams::new(
        threshold.unwrap_or(defaults.threshold),
        limit.unwrap_or(defaults.limit),
    )?;

    let results = Matcher::new(provider)
        .rank(query, candidates, &params)
        .context("Error during ranking")?;

    let ranked: Vec<RankedCandidate> = results
        .iter()
        .map(|r| RankedCandidate {
            index: r.index,
            score: r.score,
            candidate: &candidates[r.index],
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&ranked)?);
    Ok(())
}

pub fn handle_list(directory: &Directory, count: bool) -> Result<()> {
    if count {
        println!("{} professionals", directory.len());
        return Ok(());
    }

    println!("{}", serde_json::to_string_pretty(directory.records())?);
    Ok(())
}
