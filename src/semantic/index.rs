//! In-memory candidate embeddings.
//!
//! Embeds a candidate list once so repeated queries only pay for the query
//! embedding. Position `i` of the index always holds the embedding of
//! candidate `i`.

use super::embeddings::{EmbeddingProvider, EmbeddingVector};
use super::matcher::{select_matches, MatchError, MatchParams, MatchResult};
use super::similarity::batch_similarity;

/// Candidate embeddings in candidate order.
pub struct VectorIndex {
    /// Name of the model the embeddings came from
    model_name: String,
    /// Expected embedding dimensions
    dimensions: usize,
    embeddings: Vec<EmbeddingVector>,
}

impl VectorIndex {
    /// Embed every candidate in one batch call.
    pub fn build<S: AsRef<str>>(
        provider: &dyn EmbeddingProvider,
        candidates: &[S],
    ) -> Result<Self, MatchError> {
        let texts: Vec<String> = candidates.iter().map(|c| c.as_ref().to_string()).collect();
        let embeddings = provider.encode_batch(&texts)?;

        if embeddings.len() != texts.len() {
            return Err(MatchError::CountMismatch {
                expected: texts.len(),
                got: embeddings.len(),
            });
        }

        let dimensions = provider.dimensions();
        if let Some(bad) = embeddings.iter().find(|e| e.len() != dimensions) {
            return Err(MatchError::DimensionMismatch {
                expected: dimensions,
                got: bad.len(),
            });
        }

        Ok(Self {
            model_name: provider.name().to_string(),
            dimensions,
            embeddings,
        })
    }

    /// Get the model name the index was built with.
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Get the expected embedding dimensions.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Get the number of entries in the index.
    pub fn len(&self) -> usize {
        self.embeddings.len()
    }

    /// Check if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.embeddings.is_empty()
    }

    /// Score a query embedding against every candidate.
    ///
    /// Returns results sorted by similarity (highest first).
    pub fn search(
        &self,
        query: &[f32],
        params: &MatchParams,
    ) -> Result<Vec<MatchResult>, MatchError> {
        params.validate()?;

        if query.len() != self.dimensions {
            return Err(MatchError::DimensionMismatch {
                expected: self.dimensions,
                got: query.len(),
            });
        }

        let scores = batch_similarity(query, &self.embeddings);
        Ok(select_matches(&scores, params))
    }
}
