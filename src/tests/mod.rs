mod web;

use crate::semantic::{EmbeddingError, EmbeddingProvider, EmbeddingVector};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Provider with hand-picked vectors; unknown text maps to the zero vector.
pub struct FakeProvider {
    vectors: HashMap<String, EmbeddingVector>,
    dimensions: usize,
    calls: AtomicUsize,
}

impl FakeProvider {
    pub fn new(dimensions: usize, vectors: Vec<(&str, Vec<f32>)>) -> Self {
        Self {
            vectors: vectors
                .into_iter()
                .map(|(text, v)| (text.to_string(), v))
                .collect(),
            dimensions,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of encode/encode_batch calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn lookup(&self, text: &str) -> EmbeddingVector {
        self.vectors
            .get(text)
            .cloned()
            .unwrap_or_else(|| vec![0.0; self.dimensions])
    }
}

impl EmbeddingProvider for FakeProvider {
    fn name(&self) -> &str {
        "fake"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn encode(&self, text: &str) -> Result<EmbeddingVector, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.lookup(text))
    }

    fn encode_batch(&self, texts: &[String]) -> Result<Vec<EmbeddingVector>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts.iter().map(|t| self.lookup(t)).collect())
    }
}

/// Provider whose every call fails.
pub struct FailingProvider;

impl EmbeddingProvider for FailingProvider {
    fn name(&self) -> &str {
        "failing"
    }

    fn dimensions(&self) -> usize {
        3
    }

    fn encode(&self, _text: &str) -> Result<EmbeddingVector, EmbeddingError> {
        Err(EmbeddingError::EmbeddingFailed("provider offline".to_string()))
    }

    fn encode_batch(&self, _texts: &[String]) -> Result<Vec<EmbeddingVector>, EmbeddingError> {
        Err(EmbeddingError::EmbeddingFailed("provider offline".to_string()))
    }
}

/// Embeds candidates as zero vectors but fails every query encode.
pub struct QueryFailingProvider;

impl EmbeddingProvider for QueryFailingProvider {
    fn name(&self) -> &str {
        "query-failing"
    }

    fn dimensions(&self) -> usize {
        3
    }

    fn encode(&self, _text: &str) -> Result<EmbeddingVector, EmbeddingError> {
        Err(EmbeddingError::EmbeddingFailed("model unloaded".to_string()))
    }

    fn encode_batch(&self, texts: &[String]) -> Result<Vec<EmbeddingVector>, EmbeddingError> {
        Ok(vec![vec![0.0; 3]; texts.len()])
    }
}

pub const SAMPLE_CSV: &str = "\
NAME,NUMBER,EMAIL,PROFESSION
Ada Obi,8031111111,ada@example.com,Electrician
Bola Ade,8032222222,bola@example.com,Driver
Chidi Eze,8033333333,chidi@example.com,
Dayo Ola,8034444444.0,dayo@example.com,Accountant
Efe Ugo,8035555555,efe@example.com,Electrician
";
