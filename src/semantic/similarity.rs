//! Cosine similarity between embedding vectors.

/// Compute L2 norm of a vector.
fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Cosine similarity in [-1, 1].
///
/// A vector with norm below `f32::EPSILON` scores 0.0 against anything.
/// Vectors of different length also score 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        log::warn!(
            "embedding dimension mismatch ({} vs {}); returning zero similarity",
            a.len(),
            b.len()
        );
        return 0.0;
    }

    similarity_with_norm(a, l2_norm(a), b)
}

/// Score a query against every candidate, in candidate order.
pub fn batch_similarity(query: &[f32], candidates: &[Vec<f32>]) -> Vec<f32> {
    let query_norm = l2_norm(query);

    candidates
        .iter()
        .map(|candidate| {
            if candidate.len() != query.len() {
                return cosine_similarity(query, candidate);
            }
            similarity_with_norm(query, query_norm, candidate)
        })
        .collect()
}

/// Assumes `query_norm` is precomputed and lengths already match.
fn similarity_with_norm(query: &[f32], query_norm: f32, target: &[f32]) -> f32 {
    let target_norm = l2_norm(target);
    if query_norm < f32::EPSILON || target_norm < f32::EPSILON {
        return 0.0;
    }

    let dot_product: f32 = query.iter().zip(target.iter()).map(|(a, b)| a * b).sum();
    dot_product / (query_norm * target_norm)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_vectors_score_one() {
        let a = vec![1.0, 2.0, 3.0];
        assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_orthogonal_vectors_score_zero() {
        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_opposite_vectors_score_negative_one() {
        let a = vec![1.0, 1.0];
        let b = vec![-1.0, -1.0];
        assert!((cosine_similarity(&a, &b) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_magnitude_does_not_matter() {
        let a = vec![1.0, 2.0];
        let b = vec![10.0, 20.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_vector_scores_zero() {
        let zero = vec![0.0, 0.0, 0.0];
        let other = vec![1.0, 0.0, 0.0];

        assert_eq!(cosine_similarity(&zero, &other), 0.0);
        assert_eq!(cosine_similarity(&other, &zero), 0.0);
        assert_eq!(cosine_similarity(&zero, &zero), 0.0);
    }

    #[test]
    fn test_near_zero_norm_scores_zero() {
        let tiny = vec![1e-8, 0.0, 0.0];
        let other = vec![1.0, 0.0, 0.0];

        assert_eq!(cosine_similarity(&tiny, &other), 0.0);
        assert_eq!(batch_similarity(&other, &[tiny]), vec![0.0]);
    }

    #[test]
    fn test_dimension_mismatch_scores_zero() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_batch_preserves_candidate_order() {
        let query = vec![1.0, 0.0];
        let candidates = vec![
            vec![0.0, 1.0],
            vec![1.0, 0.0],
            vec![0.0, 0.0],
            vec![-1.0, 0.0],
            vec![1.0, 0.0, 0.0],
        ];

        let scores = batch_similarity(&query, &candidates);

        assert_eq!(scores.len(), 5);
        assert_eq!(scores[0], 0.0);
        assert!((scores[1] - 1.0).abs() < 1e-6);
        assert_eq!(scores[2], 0.0);
        assert!((scores[3] + 1.0).abs() < 1e-6);
        assert_eq!(scores[4], 0.0);
    }

    #[test]
    fn test_batch_with_zero_query_scores_all_zero() {
        let scores = batch_similarity(&[0.0, 0.0], &[vec![1.0, 0.0], vec![0.5, 0.5]]);
        assert_eq!(scores, vec![0.0, 0.0]);
    }

    #[test]
    fn test_batch_of_nothing_is_empty() {
        assert!(batch_similarity(&[1.0], &[]).is_empty());
    }
}
