use std::sync::Arc;

use common::{error::AppError, utils::config::AppConfig};
use corpus_index::CorpusSearcher;

#[derive(Clone)]
pub struct ApiState {
    pub searcher: Arc<CorpusSearcher>,
    pub config: AppConfig,
}

impl ApiState {
    /// Loads the corpus and builds its indexes on the blocking pool.
    pub async fn new(config: &AppConfig) -> Result<Self, AppError> {
        let build_config = config.clone();
        let searcher =
            tokio::task::spawn_blocking(move || CorpusSearcher::from_config(&build_config))
                .await??;

        Ok(Self {
            searcher: Arc::new(searcher),
            config: config.clone(),
        })
    }

    pub fn with_searcher(searcher: CorpusSearcher, config: AppConfig) -> Self {
        Self {
            searcher: Arc::new(searcher),
            config,
        }
    }
}
