use crate::{
    app::{errors::AppError, service::AppService},
    config::Config,
    directory::Directory,
    semantic::{EmbeddingProvider, FastEmbedProvider, HashEmbedder, SearchService, HASH_MODEL},
};
use anyhow::{Context, Result};
use homedir::my_home;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Per-run values taken from the command line instead of config.yaml
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub dataset_path: Option<PathBuf>,
    pub model: Option<String>,
}

/// Application factory for creating and configuring application components
pub struct AppFactory;

impl AppFactory {
    /// Load config, dataset and embedding model, and embed the directory.
    ///
    /// This is the expensive startup step; the returned service is reused for
    /// every query.
    pub fn create_app_service(config: Config) -> Result<AppService, AppError> {
        let directory = Arc::new(Self::load_directory(&config)?);
        let provider = Self::create_provider(&config)?;

        let search = SearchService::new(provider, directory, config.search.match_params())?;

        Ok(AppService::new(config, search))
    }

    /// Read the professionals dataset named by the config
    pub fn load_directory(config: &Config) -> Result<Directory, AppError> {
        let path = config.dataset_path();
        let directory = Directory::load(&path)?;

        if directory.is_empty() {
            log::warn!("Dataset {} has no rows", path.display());
        } else {
            log::info!("Loaded {} professionals from {}", directory.len(), path.display());
        }

        Ok(directory)
    }

    /// Create the embedding provider named by `search.model`
    pub fn create_provider(config: &Config) -> Result<Arc<dyn EmbeddingProvider>, AppError> {
        let model = config.search.model.as_str();

        if model.eq_ignore_ascii_case(HASH_MODEL) {
            log::info!("Using offline hash embedder");
            return Ok(Arc::new(HashEmbedder::default()));
        }

        log::info!("Initializing embedding model '{model}'");
        let timeout = Duration::from_secs(config.search.download_timeout_secs);
        let provider = FastEmbedProvider::new(model, config.base_path().clone(), Some(timeout))?;

        Ok(Arc::new(provider))
    }

    /// Load configuration and apply command line overrides
    pub fn create_config(paths: &AppPaths, overrides: &Overrides) -> Result<Config> {
        let mut config = Config::load_with(&paths.base_path)
            .with_context(|| format!("Failed to load config from {}", paths.base_path.display()))?;

        if let Some(path) = &overrides.dataset_path {
            let path = if path.is_absolute() {
                path.clone()
            } else {
                std::env::current_dir()
                    .context("Failed to resolve working directory")?
                    .join(path)
            };
            config.dataset_path = path.to_string_lossy().to_string();
        }

        if let Some(model) = &overrides.model {
            config.search.model = model.clone();
        }

        config.validate()?;

        Ok(config)
    }

    /// Get application paths with validation
    pub fn get_paths() -> Result<AppPaths> {
        let base_path = Self::get_base_path()?;

        // Ensure base directory exists
        std::fs::create_dir_all(&base_path)
            .context("Failed to create application base directory")?;

        Ok(AppPaths { base_path })
    }

    /// Get the base path for the application
    fn get_base_path() -> Result<PathBuf> {
        if let Ok(base_path) = std::env::var("GICC_BASE_PATH") {
            return Ok(PathBuf::from(base_path));
        }

        let home = my_home()
            .ok()
            .flatten()
            .context("Could not determine home directory, set GICC_BASE_PATH")?;

        Ok(home.join(".local/share/gicc-finder"))
    }
}

/// Application paths structure
#[derive(Debug, Clone)]
pub struct AppPaths {
    pub base_path: PathBuf,
}
