use crate::{
    config::ConfigError,
    directory::DirectoryError,
    semantic::{EmbeddingError, MatchError},
};

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("search failed: {0}")]
    Match(#[from] MatchError),

    #[error("could not load the embedding model: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("could not load the professionals dataset: {0}")]
    Directory(#[from] DirectoryError),

    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("unexpected error: {0:?}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Whether the error was caused by the request rather than by the service.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Match(err) if err.is_invalid_parameter())
    }
}
