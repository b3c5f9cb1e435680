//! Embedding providers.
//!
//! Provides the interface the matcher consumes for turning text into vectors:
//! - `EmbeddingProvider` trait (single and batch encoding)
//! - `FastEmbedProvider`, a fastembed-backed sentence embedding model
//! - Model download with timeout on first use

use fastembed::{InitOptions, TextEmbedding};
use std::path::PathBuf;
use std::sync::{mpsc, Mutex};
use std::time::Duration;

/// Default download timeout for model files (5 minutes)
const DEFAULT_DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(300);

/// A fixed-length embedding produced by one provider.
///
/// Vectors are only comparable when produced by the same provider/model.
pub type EmbeddingVector = Vec<f32>;

/// Maps text to embedding vectors.
///
/// Implementations must be deterministic for a fixed model and must accept
/// the empty string as ordinary input.
pub trait EmbeddingProvider: Send + Sync {
    /// Model name, used for logging and reporting.
    fn name(&self) -> &str;

    /// Length of every vector this provider produces.
    fn dimensions(&self) -> usize;

    /// Encode a single text.
    fn encode(&self, text: &str) -> Result<EmbeddingVector, EmbeddingError>;

    /// Encode many texts in one call, preserving order 1:1.
    fn encode_batch(&self, texts: &[String]) -> Result<Vec<EmbeddingVector>, EmbeddingError>;
}

/// Error type for embedding operations
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    #[error("Model initialization failed: {0}")]
    InitFailed(String),

    #[error("Embedding generation failed: {0}")]
    EmbeddingFailed(String),

    #[error("Model download timed out after {0} seconds")]
    DownloadTimeout(u64),

    #[error("Invalid model name: {0}")]
    InvalidModel(String),
}

/// Wrapper around fastembed's TextEmbedding model.
/// Uses a Mutex because fastembed's embed() requires &mut self.
pub struct FastEmbedProvider {
    model: Mutex<TextEmbedding>,
    model_name: String,
    dimensions: usize,
}

impl FastEmbedProvider {
    /// Load the named model, downloading it on first use.
    ///
    /// Models are cached in the `models/` subdirectory of `cache_dir`.
    ///
    /// # Arguments
    /// * `model_name` - Name of the model (e.g., "all-MiniLM-L6-v2")
    /// * `cache_dir` - Directory to cache downloaded models
    /// * `download_timeout` - Optional timeout for loading (includes download)
    pub fn new(
        model_name: &str,
        cache_dir: PathBuf,
        download_timeout: Option<Duration>,
    ) -> Result<Self, EmbeddingError> {
        let model_enum = parse_model_name(model_name)?;
        let timeout = download_timeout.unwrap_or(DEFAULT_DOWNLOAD_TIMEOUT);

        let models_dir = cache_dir.join("models");
        std::fs::create_dir_all(&models_dir).map_err(|e| {
            EmbeddingError::InitFailed(format!("Failed to create models directory: {}", e))
        })?;

        let options = InitOptions::new(model_enum)
            .with_cache_dir(models_dir)
            .with_show_download_progress(true);

        // Loading may block on a download; run it aside so we can give up.
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let _ = tx.send(TextEmbedding::try_new(options));
        });

        let mut model = match rx.recv_timeout(timeout) {
            Ok(result) => result.map_err(|e| EmbeddingError::InitFailed(e.to_string()))?,
            Err(mpsc::RecvTimeoutError::Timeout) => {
                return Err(EmbeddingError::DownloadTimeout(timeout.as_secs()))
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                return Err(EmbeddingError::InitFailed(
                    "model loader thread exited unexpectedly".to_string(),
                ))
            }
        };

        let dimensions = probe_dimensions(&mut model)?;

        log::info!("Loaded embedding model '{model_name}' ({dimensions} dimensions)");

        Ok(Self {
            model: Mutex::new(model),
            model_name: model_name.to_string(),
            dimensions,
        })
    }
}

impl EmbeddingProvider for FastEmbedProvider {
    fn name(&self) -> &str {
        &self.model_name
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn encode(&self, text: &str) -> Result<EmbeddingVector, EmbeddingError> {
        let mut model = self.model.lock().map_err(|e| {
            EmbeddingError::EmbeddingFailed(format!("Failed to acquire model lock: {}", e))
        })?;

        let embeddings = model
            .embed(vec![text], None)
            .map_err(|e| EmbeddingError::EmbeddingFailed(e.to_string()))?;

        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| EmbeddingError::EmbeddingFailed("No embedding returned".to_string()))
    }

    fn encode_batch(&self, texts: &[String]) -> Result<Vec<EmbeddingVector>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let mut model = self.model.lock().map_err(|e| {
            EmbeddingError::EmbeddingFailed(format!("Failed to acquire model lock: {}", e))
        })?;

        let embeddings = model
            .embed(texts.to_vec(), None)
            .map_err(|e| EmbeddingError::EmbeddingFailed(e.to_string()))?;

        if embeddings.len() != texts.len() {
            return Err(EmbeddingError::EmbeddingFailed(format!(
                "expected {} embeddings, model returned {}",
                texts.len(),
                embeddings.len()
            )));
        }

        Ok(embeddings)
    }
}

/// Parse model name string to fastembed enum.
fn parse_model_name(name: &str) -> Result<fastembed::EmbeddingModel, EmbeddingError> {
    match name.to_lowercase().as_str() {
        "all-minilm-l6-v2" | "allminiml6v2" => Ok(fastembed::EmbeddingModel::AllMiniLML6V2),
        "all-minilm-l6-v2-q" | "allminiml6v2q" => Ok(fastembed::EmbeddingModel::AllMiniLML6V2Q),
        "bge-small-en-v1.5" | "bgesmallenv15" => Ok(fastembed::EmbeddingModel::BGESmallENV15),
        "bge-small-en-v1.5-q" | "bgesmallenv15q" => Ok(fastembed::EmbeddingModel::BGESmallENV15Q),
        "bge-base-en-v1.5" | "bgebaseenv15" => Ok(fastembed::EmbeddingModel::BGEBaseENV15),
        "bge-base-en-v1.5-q" | "bgebaseenv15q" => Ok(fastembed::EmbeddingModel::BGEBaseENV15Q),
        "bge-large-en-v1.5" | "bgelargeenv15" => Ok(fastembed::EmbeddingModel::BGELargeENV15),
        "bge-large-en-v1.5-q" | "bgelargeenv15q" => Ok(fastembed::EmbeddingModel::BGELargeENV15Q),
        _ => Err(EmbeddingError::InvalidModel(format!(
            "Unknown model: {}. Supported models: all-MiniLM-L6-v2, bge-small-en-v1.5, bge-base-en-v1.5, bge-large-en-v1.5 (add -q suffix for quantized), or 'hash' for the offline embedder",
            name
        ))),
    }
}

/// Probe the model to determine embedding dimensions.
fn probe_dimensions(model: &mut TextEmbedding) -> Result<usize, EmbeddingError> {
    let test_embeddings = model
        .embed(vec!["test"], None)
        .map_err(|e| EmbeddingError::InitFailed(format!("Failed to probe dimensions: {}", e)))?;

    test_embeddings
        .first()
        .map(|v| v.len())
        .ok_or_else(|| EmbeddingError::InitFailed("Model returned no embedding".to_string()))
}
