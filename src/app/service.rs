use crate::{
    app::errors::AppError,
    config::Config,
    semantic::{SearchOutcome, SearchService},
};

/// Everything a surface (CLI, HTTP) needs, initialized once at startup.
pub struct AppService {
    config: Config,
    search: SearchService,
}

impl AppService {
    pub fn new(config: Config, search: SearchService) -> Self {
        Self { config, search }
    }

    pub fn search(
        &self,
        query: &str,
        threshold: Option<f32>,
        limit: Option<usize>,
    ) -> Result<SearchOutcome, AppError> {
        Ok(self.search.search(query, threshold, limit)?)
    }

    pub fn total(&self) -> usize {
        self.search.directory().len()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn model_name(&self) -> &str {
        self.search.model_name()
    }
}
