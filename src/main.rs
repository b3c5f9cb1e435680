use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod app;
mod cli;
mod config;
mod directory;
mod display;
mod semantic;
mod storage;
#[cfg(test)]
mod tests;
mod web;

use app::{AppFactory, Overrides};
use cli::Command;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();

    init_logging();

    let paths = AppFactory::get_paths()?;
    let overrides = Overrides {
        dataset_path: args.data,
        model: args.model,
    };
    let config = AppFactory::create_config(&paths, &overrides)?;

    match args.command {
        Command::Search {
            query,
            threshold,
            limit,
            json,
        } => {
            let app = cli::with_spinner("Loading model and professionals...", || {
                AppFactory::create_app_service(config)
            })?;
            cli::handle_search(&app, &query, threshold, limit, json)
        }

        Command::Interactive { threshold, limit } => {
            let app = cli::with_spinner("Loading model and professionals...", || {
                AppFactory::create_app_service(config)
            })?;
            cli::handle_interactive(&app, threshold, limit)
        }

        Command::Rank {
            query,
            candidates,
            threshold,
            limit,
        } => {
            let provider = cli::with_spinner("Loading model...", || {
                AppFactory::create_provider(&config)
            })?;
            cli::handle_rank(
                provider.as_ref(),
                config.search.match_params(),
                &query,
                &candidates,
                threshold,
                limit,
            )
        }

        Command::List { count } => {
            let directory = AppFactory::load_directory(&config)?;
            cli::handle_list(&directory, count)
        }

        Command::Daemon { listen } => {
            let listen = match listen {
                Some(listen) => listen,
                None => config.listen_addr()?,
            };
            let app = AppFactory::create_app_service(config)
                .context("Failed to initialize search service")?;
            web::start_daemon(app, listen)
        }
    }
}
