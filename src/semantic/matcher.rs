//! Ranking candidates against a query.
//!
//! The pipeline is: normalize candidates, embed query and candidates, score
//! with cosine similarity, keep scores at or above the threshold, stable-sort
//! by score descending, truncate to the limit.

use serde::Serialize;

use super::embeddings::{EmbeddingError, EmbeddingProvider};
use super::index::VectorIndex;
use super::preprocess::normalize_candidate;
use super::{DEFAULT_LIMIT, DEFAULT_THRESHOLD};

/// One candidate that passed the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MatchResult {
    /// Position of the candidate in the input sequence
    pub index: usize,
    /// Cosine similarity between query and candidate
    pub score: f32,
}

/// Threshold and result budget for one match.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MatchParams {
    pub threshold: f32,
    pub limit: usize,
}

impl Default for MatchParams {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl MatchParams {
    pub fn new(threshold: f32, limit: usize) -> Result<Self, MatchError> {
        let params = Self { threshold, limit };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), MatchError> {
        // NaN fails the range check too
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(MatchError::InvalidThreshold(self.threshold));
        }
        Ok(())
    }
}

/// Convert a limit from a signed source (JSON, config) into a result budget.
pub fn limit_from_signed(limit: i64) -> Result<usize, MatchError> {
    usize::try_from(limit).map_err(|_| MatchError::InvalidLimit(limit))
}

/// Errors that can occur while matching.
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    #[error("threshold must be between 0.0 and 1.0, got {0}")]
    InvalidThreshold(f32),

    #[error("limit must not be negative, got {0}")]
    InvalidLimit(i64),

    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("provider returned {got} embeddings for {expected} candidates")]
    CountMismatch { expected: usize, got: usize },
}

impl MatchError {
    /// Whether the caller supplied bad input, as opposed to an internal fault.
    pub fn is_invalid_parameter(&self) -> bool {
        matches!(self, Self::InvalidThreshold(_) | Self::InvalidLimit(_))
    }
}

/// Ranks candidate strings against a query using one embedding provider.
///
/// Holds no state besides the provider reference, so one matcher (or many)
/// can share a provider across threads.
pub struct Matcher<'a> {
    provider: &'a dyn EmbeddingProvider,
}

impl<'a> Matcher<'a> {
    pub fn new(provider: &'a dyn EmbeddingProvider) -> Self {
        Self { provider }
    }

    /// Rank `candidates` by similarity to `query`.
    ///
    /// Returns `(index, score)` pairs with `score >= threshold`, highest first,
    /// equal scores in candidate order, at most `limit` long. An empty result
    /// means nothing matched; failures come back as `Err`.
    pub fn rank<S: AsRef<str>>(
        &self,
        query: &str,
        candidates: &[S],
        params: &MatchParams,
    ) -> Result<Vec<MatchResult>, MatchError> {
        params.validate()?;

        let query_embedding = self.provider.encode(query)?;
        let index = VectorIndex::build(self.provider, candidates)?;

        index.search(&query_embedding, params)
    }

    /// Same as `rank()`, for candidates that may be missing.
    ///
    /// Missing candidates are scored as the empty string.
    pub fn rank_optional<S: AsRef<str>>(
        &self,
        query: &str,
        candidates: &[Option<S>],
        params: &MatchParams,
    ) -> Result<Vec<MatchResult>, MatchError> {
        let normalized: Vec<String> = candidates
            .iter()
            .map(|c| normalize_candidate(c.as_ref()))
            .collect();

        self.rank(query, &normalized, params)
    }
}

/// Filter, order and truncate per-candidate scores.
///
/// `scores[i]` belongs to candidate `i`.
pub fn select_matches(scores: &[f32], params: &MatchParams) -> Vec<MatchResult> {
    let mut results: Vec<MatchResult> = scores
        .iter()
        .enumerate()
        .filter(|(_, score)| **score >= params.threshold)
        .map(|(index, score)| MatchResult {
            index,
            score: *score,
        })
        .collect();

    // sort_by is stable: ties keep candidate order
    results.sort_by(|a, b| b.score.total_cmp(&a.score));
    results.truncate(params.limit);

    results
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(threshold: f32, limit: usize) -> MatchParams {
        MatchParams { threshold, limit }
    }

    #[test]
    fn test_default_params() {
        let p = MatchParams::default();
        assert!((p.threshold - 0.5).abs() < f32::EPSILON);
        assert_eq!(p.limit, 10);
    }

    #[test]
    fn test_threshold_bounds() {
        assert!(MatchParams::new(0.0, 1).is_ok());
        assert!(MatchParams::new(1.0, 1).is_ok());
        assert!(matches!(
            MatchParams::new(1.01, 1),
            Err(MatchError::InvalidThreshold(_))
        ));
        assert!(matches!(
            MatchParams::new(-0.1, 1),
            Err(MatchError::InvalidThreshold(_))
        ));
        assert!(matches!(
            MatchParams::new(f32::NAN, 1),
            Err(MatchError::InvalidThreshold(_))
        ));
    }

    #[test]
    fn test_limit_from_signed() {
        assert_eq!(limit_from_signed(0).unwrap(), 0);
        assert_eq!(limit_from_signed(25).unwrap(), 25);
        let err = limit_from_signed(-1).unwrap_err();
        assert!(matches!(err, MatchError::InvalidLimit(-1)));
        assert!(err.is_invalid_parameter());
    }

    #[test]
    fn test_select_filters_sorts_truncates() {
        let scores = [0.2, 0.9, 0.6, 0.75];
        let results = select_matches(&scores, &params(0.5, 2));

        assert_eq!(
            results,
            vec![
                MatchResult { index: 1, score: 0.9 },
                MatchResult { index: 3, score: 0.75 },
            ]
        );
    }

    #[test]
    fn test_select_threshold_is_inclusive() {
        let results = select_matches(&[0.5, 0.49999], &params(0.5, 10));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].index, 0);
    }

    #[test]
    fn test_select_ties_keep_candidate_order() {
        let scores = [0.7, 0.8, 0.7, 0.8, 0.7];
        let order: Vec<usize> = select_matches(&scores, &params(0.0, 10))
            .iter()
            .map(|r| r.index)
            .collect();

        assert_eq!(order, vec![1, 3, 0, 2, 4]);
    }

    #[test]
    fn test_select_zero_threshold_drops_negatives() {
        let results = select_matches(&[-0.3, 0.0, 0.1], &params(0.0, 10));
        let order: Vec<usize> = results.iter().map(|r| r.index).collect();
        assert_eq!(order, vec![2, 1]);
    }

    #[test]
    fn test_select_zero_limit() {
        assert!(select_matches(&[0.9, 0.8], &params(0.0, 0)).is_empty());
    }

    #[test]
    fn test_select_nan_never_matches() {
        let results = select_matches(&[f32::NAN, 0.6], &params(0.0, 10));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].index, 1);
    }
}
