use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod handlers;

pub use handlers::*;

#[derive(Parser, Debug)]
#[command(version, about = "Find a professional by describing what you need", long_about = None)]
pub struct Args {
    /// Professionals CSV (NAME, NUMBER, EMAIL, PROFESSION). Overrides dataset_path.
    #[clap(long, global = true)]
    pub data: Option<PathBuf>,

    /// Embedding model, e.g. all-MiniLM-L6-v2, bge-small-en-v1.5 or hash.
    /// Overrides search.model.
    #[clap(long, global = true)]
    pub model: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search the directory once
    Search {
        /// What kind of professional you are looking for
        query: String,

        /// Minimum similarity score between 0.0 and 1.0
        #[clap(short, long)]
        threshold: Option<f32>,

        /// Maximum number of results
        #[clap(short, long)]
        limit: Option<usize>,

        /// Print the outcome as JSON
        #[clap(long, default_value = "false")]
        json: bool,
    },
    /// Prompt for queries until an empty answer
    Interactive {
        /// Minimum similarity score between 0.0 and 1.0
        #[clap(short, long)]
        threshold: Option<f32>,

        /// Maximum number of results
        #[clap(short, long)]
        limit: Option<usize>,
    },
    /// Rank ad-hoc candidate labels against a query (prints JSON)
    Rank {
        query: String,

        /// Candidate label, repeat for each candidate
        #[clap(short, long = "candidate", required = true)]
        candidates: Vec<String>,

        /// Minimum similarity score between 0.0 and 1.0
        #[clap(short, long)]
        threshold: Option<f32>,

        /// Maximum number of results
        #[clap(short, long)]
        limit: Option<usize>,
    },
    /// Print the loaded professionals
    List {
        /// Print the count only
        #[clap(short = 'c', long, default_value = "false")]
        count: bool,
    },
    /// Serve search over HTTP
    Daemon {
        /// Address to listen on. Overrides daemon.listen.
        #[clap(long)]
        listen: Option<std::net::SocketAddr>,
    },
}
