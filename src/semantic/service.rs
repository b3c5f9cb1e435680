//! Semantic search over the professionals directory.
//!
//! Ties the pieces together:
//! - Embeds every profession label once at construction
//! - Embeds the query per search and ranks against the precomputed index
//! - Joins ranked indices back to their records

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;

use crate::directory::{Directory, ProfessionalRecord};
use crate::semantic::embeddings::EmbeddingProvider;
use crate::semantic::index::VectorIndex;
use crate::semantic::matcher::{MatchError, MatchParams};

/// A match joined back to its record, ready for display.
#[derive(Debug, Clone, Serialize)]
pub struct RankedMatch {
    /// 1-based position in the result list
    pub rank: usize,
    /// Position of the record in the directory
    pub index: usize,
    pub score: f32,
    pub professional: ProfessionalRecord,
}

/// Result of a search that did not fail.
///
/// Keeps "nothing matched" apart from errors, which travel as `Err`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SearchOutcome {
    Matches { matches: Vec<RankedMatch> },
    #[serde(rename = "empty")]
    NoMatches,
}

impl SearchOutcome {
    pub fn matches(&self) -> &[RankedMatch] {
        match self {
            Self::Matches { matches } => matches,
            Self::NoMatches => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::NoMatches)
    }
}

/// Service for searching the directory by profession.
///
/// Both the provider and the directory are read-only after construction, so
/// a service can be shared across threads behind an `Arc`.
pub struct SearchService {
    provider: Arc<dyn EmbeddingProvider>,
    directory: Arc<Directory>,
    index: VectorIndex,
    defaults: MatchParams,
}

impl SearchService {
    /// Create a search service and embed all profession labels.
    ///
    /// # Arguments
    /// * `provider` - Embedding provider, shared for the process lifetime
    /// * `directory` - Loaded professionals
    /// * `defaults` - Threshold and limit used when a search omits them
    pub fn new(
        provider: Arc<dyn EmbeddingProvider>,
        directory: Arc<Directory>,
        defaults: MatchParams,
    ) -> Result<Self, MatchError> {
        defaults.validate()?;

        let now = Instant::now();
        let labels = directory.profession_labels();
        let index = VectorIndex::build(provider.as_ref(), &labels)?;

        log::info!(
            "Embedded {} profession labels with '{}' ({} dimensions) in {}ms",
            index.len(),
            index.model_name(),
            index.dimensions(),
            now.elapsed().as_millis()
        );

        Ok(Self {
            provider,
            directory,
            index,
            defaults,
        })
    }

    /// Name of the embedding model in use.
    pub fn model_name(&self) -> &str {
        self.index.model_name()
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    /// Search for professionals whose profession is similar to `query`.
    ///
    /// # Arguments
    /// * `query` - Free-text description of the professional
    /// * `threshold` - Minimum similarity (uses configured default if None)
    /// * `limit` - Maximum results (uses configured default if None)
    pub fn search(
        &self,
        query: &str,
        threshold: Option<f32>,
        limit: Option<usize>,
    ) -> Result<SearchOutcome, MatchError> {
        let params = MatchParams::new(
            threshold.unwrap_or(self.defaults.threshold),
            limit.unwrap_or(self.defaults.limit),
        )?;

        let query_embedding = self.provider.encode(query)?;
        let results = self.index.search(&query_embedding, &params)?;

        log::debug!(
            "query={query:?} threshold={} limit={} matches={}",
            params.threshold,
            params.limit,
            results.len()
        );

        if results.is_empty() {
            return Ok(SearchOutcome::NoMatches);
        }

        let mut matches = Vec::with_capacity(results.len());
        for (position, result) in results.into_iter().enumerate() {
            let professional = self
                .directory
                .get(result.index)
                .ok_or(MatchError::CountMismatch {
                    expected: self.directory.len(),
                    got: self.index.len(),
                })?
                .clone();

            matches.push(RankedMatch {
                rank: position + 1,
                index: result.index,
                score: result.score,
                professional,
            });
        }

        Ok(SearchOutcome::Matches { matches })
    }
}
