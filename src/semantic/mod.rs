//! Semantic matching of free-text queries against profession labels.
//!
//! This module turns text into embeddings, scores them with cosine
//! similarity and ranks candidates.
//!
//! # Architecture
//!
//! - `embeddings`: Provider contract and the fastembed-backed model
//! - `hashing`: Offline feature-hashing provider
//! - `similarity`: Cosine similarity, single and batched
//! - `matcher`: Threshold/sort/truncate pipeline
//! - `index`: Candidate embeddings computed once per record set
//! - `preprocess`: Candidate text normalization
//! - `service`: Search over the professionals directory

pub mod embeddings;
mod hashing;
mod index;
mod matcher;
mod preprocess;
mod service;
mod similarity;

pub use embeddings::{EmbeddingError, EmbeddingProvider, EmbeddingVector, FastEmbedProvider};
pub use hashing::{HashEmbedder, HASH_MODEL};
pub use index::VectorIndex;
pub use matcher::{limit_from_signed, select_matches, MatchError, MatchParams, MatchResult, Matcher};
pub use preprocess::{is_missing, normalize_candidate};
pub use service::{RankedMatch, SearchOutcome, SearchService};
pub use similarity::{batch_similarity, cosine_similarity};

/// Default embedding model name
pub const DEFAULT_MODEL: &str = "all-MiniLM-L6-v2";

/// Default similarity threshold
pub const DEFAULT_THRESHOLD: f32 = 0.5;

/// Default maximum number of results
pub const DEFAULT_LIMIT: usize = 10;
