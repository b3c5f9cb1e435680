//! Offline embedding provider based on feature hashing.
//!
//! Each word is padded (`^word$`) and split into character trigrams. A trigram
//! is hashed with SHA-256: the first eight bytes pick the bucket, the ninth
//! picks the sign. The accumulated vector is L2-normalized.
//!
//! Texts that share spelling score high, unrelated spellings score near zero.
//! There is no notion of synonyms, so this is a stand-in for a real sentence
//! model, not a replacement.

use sha2::{Digest, Sha256};

use super::embeddings::{EmbeddingError, EmbeddingProvider, EmbeddingVector};

/// Model name selecting this provider in configuration.
pub const HASH_MODEL: &str = "hash";

/// Matches the MiniLM dimension so configs can switch without other changes.
const DEFAULT_HASH_DIMENSIONS: usize = 384;

pub struct HashEmbedder {
    dimensions: usize,
}

impl HashEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    fn features(text: &str) -> Vec<String> {
        text.to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|word| !word.is_empty())
            .flat_map(|word| {
                let padded: Vec<char> = format!("^{word}$").chars().collect();
                padded
                    .windows(3)
                    .map(|w| w.iter().collect::<String>())
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    fn bucket(&self, feature: &str) -> (usize, f32) {
        let digest = Sha256::digest(feature.as_bytes());
        let mut head = [0u8; 8];
        head.copy_from_slice(&digest[..8]);
        let idx = (u64::from_le_bytes(head) % self.dimensions as u64) as usize;
        let sign = if digest[8] & 1 == 0 { 1.0 } else { -1.0 };
        (idx, sign)
    }

    fn embed_text(&self, text: &str) -> EmbeddingVector {
        let mut vector = vec![0.0f32; self.dimensions];

        for feature in Self::features(text) {
            let (idx, sign) = self.bucket(&feature);
            vector[idx] += sign;
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }

        vector
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_HASH_DIMENSIONS)
    }
}

impl EmbeddingProvider for HashEmbedder {
    fn name(&self) -> &str {
        HASH_MODEL
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn encode(&self, text: &str) -> Result<EmbeddingVector, EmbeddingError> {
        Ok(self.embed_text(text))
    }

    fn encode_batch(&self, texts: &[String]) -> Result<Vec<EmbeddingVector>, EmbeddingError> {
        Ok(texts.iter().map(|text| self.embed_text(text)).collect())
    }
}
