use std::sync::Arc;

use crate::config::Config;
use crate::search::{GoogleSearch, SearchProvider};
use crate::workflow::{LangflowClient, WorkflowClient};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub workflow: Arc<dyn WorkflowClient>,
    pub search: Arc<dyn SearchProvider>,
}

impl AppState {
    /// Wire up the HTTP-backed clients described by `config`.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let workflow = Arc::new(LangflowClient::new(&config.langflow)?);
        let search = Arc::new(GoogleSearch::new(&config.search));
        Ok(Self::with_clients(config, workflow, search))
    }

    pub fn with_clients(
        config: Config,
        workflow: Arc<dyn WorkflowClient>,
        search: Arc<dyn SearchProvider>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            workflow,
            search,
        }
    }
}
